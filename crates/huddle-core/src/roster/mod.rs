// Roster management: the deduplicated member list, its edit state, and
// change notifications.

pub mod edit;
pub mod name;
pub mod store;

use std::fmt;

pub use edit::{ActiveEdit, EditOutcome};
pub use name::{same_name, NamePolicy, NameRejection, DEFAULT_MAX_NAME_LEN};
pub use store::RosterStore;

/// Stable identity of a member within one `RosterStore`. Ids are handed out
/// in increasing order and never reused, so they survive renames and
/// removals of other members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u64);

impl MemberId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A roster entry. `name` keeps the casing it was first written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

/// Change notification pushed to every subscriber after a successful
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    /// The roster was replaced wholesale from a persisted snapshot.
    /// `Session::start` hydrates before anyone can subscribe, so through a
    /// session this never arrives; only subscribers registered directly on
    /// a `RosterStore` before `hydrate` see it.
    Hydrated { count: usize },
    Added { id: MemberId, name: String },
    Removed { id: MemberId, name: String },
    Renamed {
        id: MemberId,
        from: String,
        to: String,
    },
    /// Every member was dropped. `count` is how many there were.
    Cleared { count: usize },
}
