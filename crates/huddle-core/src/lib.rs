// Library root: roster management, team partitioning, and the persistence
// bridge that keeps the roster across sessions.

pub mod config;
pub mod db;
pub mod persistence;
pub mod roster;
pub mod session;
pub mod teams;

pub use persistence::{MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
pub use roster::{EditOutcome, Member, MemberId, NamePolicy, RosterEvent, RosterStore};
pub use session::{Draw, Session};
pub use teams::{partition, partition_random, Team, TeamAssignment};
