// Roster snapshot persistence.
//
// The roster is the source of truth in memory; the store only has to give
// back the last saved list of names at startup. Both directions are best
// effort: load failures read as "no snapshot", save failures are logged.

use tracing::{debug, warn};

use crate::db::Database;

/// Storage key used when none is configured.
pub const DEFAULT_SNAPSHOT_KEY: &str = "soccer_members";

/// External key-value store holding the roster snapshot.
pub trait SnapshotStore {
    /// The previously saved names, or `None` if nothing usable is stored.
    fn load_snapshot(&self) -> Option<Vec<String>>;

    /// Persist `names` in roster order. Never fails from the caller's point
    /// of view.
    fn save_snapshot(&mut self, names: &[String]);
}

/// Decode a stored snapshot. Anything other than a JSON array of strings is
/// treated as absent.
pub fn decode_snapshot(text: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(names) => Some(names),
        Err(e) => {
            warn!("ignoring unreadable roster snapshot: {e}");
            None
        }
    }
}

/// Encode `names` as the JSON array stored under the snapshot key.
pub fn encode_snapshot(names: &[String]) -> String {
    serde_json::Value::from(names.to_vec()).to_string()
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Snapshot store writing to the `kv_state` table of a [`Database`].
pub struct SqliteSnapshotStore {
    db: Database,
    key: String,
}

impl SqliteSnapshotStore {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        SqliteSnapshotStore {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load_snapshot(&self) -> Option<Vec<String>> {
        match self.db.load_raw(&self.key) {
            Ok(Some(text)) => decode_snapshot(&text),
            Ok(None) => {
                debug!(key = %self.key, "no roster snapshot stored");
                None
            }
            Err(e) => {
                warn!(key = %self.key, "failed to read roster snapshot: {e:#}");
                None
            }
        }
    }

    fn save_snapshot(&mut self, names: &[String]) {
        if let Err(e) = self.db.save_raw(&self.key, &encode_snapshot(names)) {
            warn!(key = %self.key, "failed to save roster snapshot: {e:#}");
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Snapshot store that keeps the encoded text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    raw: Option<String>,
    saves: usize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from arbitrary stored text, valid or not.
    pub fn with_raw(text: impl Into<String>) -> Self {
        MemorySnapshotStore {
            raw: Some(text.into()),
            saves: 0,
        }
    }

    pub fn with_names<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        Self::with_raw(encode_snapshot(&names))
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Number of `save_snapshot` calls received.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_snapshot(&self) -> Option<Vec<String>> {
        self.raw.as_deref().and_then(decode_snapshot)
    }

    fn save_snapshot(&mut self, names: &[String]) {
        self.raw = Some(encode_snapshot(names));
        self.saves += 1;
    }
}
