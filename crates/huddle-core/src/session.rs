// Session: the roster wired to its snapshot store, plus the current draw.
//
// Startup loads the snapshot exactly once. After that every successful
// roster mutation is followed by a save; rejected inputs never touch the
// store.

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::persistence::SnapshotStore;
use crate::roster::{
    ActiveEdit, EditOutcome, Member, MemberId, NamePolicy, RosterEvent, RosterStore,
};
use crate::teams::{partition, TeamAssignment};

/// A team assignment together with the roster state it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub assignment: TeamAssignment,
    /// Roster revision at the time of the draw.
    pub roster_revision: u64,
    pub drawn_at: DateTime<Utc>,
}

pub struct Session<S: SnapshotStore> {
    roster: RosterStore,
    store: S,
    draw: Option<Draw>,
}

impl<S: SnapshotStore> Session<S> {
    /// Build a session and hydrate the roster from `store`.
    ///
    /// A missing or unreadable snapshot starts an empty roster.
    pub fn start(policy: NamePolicy, store: S) -> Self {
        let mut roster = RosterStore::new(policy);
        match store.load_snapshot() {
            Some(names) => {
                let stored = names.len();
                let loaded = roster.hydrate(names);
                if loaded < stored {
                    info!(
                        "Loaded {} members from snapshot ({} blank or duplicate entries skipped)",
                        loaded,
                        stored - loaded
                    );
                } else {
                    info!("Loaded {} members from snapshot", loaded);
                }
            }
            None => info!("No saved roster, starting empty"),
        }

        Session {
            roster,
            store,
            draw: None,
        }
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// See [`RosterStore::subscribe`].
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RosterEvent> {
        self.roster.subscribe()
    }

    // ------------------------------------------------------------------
    // Roster mutations
    // ------------------------------------------------------------------

    pub fn add(&mut self, name: &str) -> Option<MemberId> {
        let id = self.roster.add(name)?;
        self.persist();
        Some(id)
    }

    pub fn remove(&mut self, name: &str) -> Option<Member> {
        let removed = self.roster.remove(name)?;
        self.persist();
        Some(removed)
    }

    pub fn remove_member(&mut self, id: MemberId) -> Option<Member> {
        let removed = self.roster.remove_member(id)?;
        self.persist();
        Some(removed)
    }

    pub fn rename(&mut self, index: usize, new_name: &str) -> EditOutcome {
        let outcome = self.roster.rename(index, new_name);
        self.persist_if_saved(&outcome);
        outcome
    }

    pub fn rename_member(&mut self, id: MemberId, new_name: &str) -> EditOutcome {
        let outcome = self.roster.rename_member(id, new_name);
        self.persist_if_saved(&outcome);
        outcome
    }

    /// Empty the roster and discard the current draw.
    pub fn clear(&mut self) -> usize {
        let count = self.roster.clear();
        if self.draw.take().is_some() {
            debug!("draw discarded by clear");
        }
        self.persist();
        count
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    pub fn start_edit(&mut self, id: MemberId) -> bool {
        self.roster.start_edit(id)
    }

    pub fn set_edit_draft(&mut self, draft: impl Into<String>) -> bool {
        self.roster.set_edit_draft(draft)
    }

    pub fn save_edit(&mut self) -> EditOutcome {
        let outcome = self.roster.save_edit();
        self.persist_if_saved(&outcome);
        outcome
    }

    pub fn cancel_edit(&mut self) -> Option<ActiveEdit> {
        self.roster.cancel_edit()
    }

    // ------------------------------------------------------------------
    // Draws
    // ------------------------------------------------------------------

    /// Partition the current roster with the thread-local RNG.
    pub fn randomize(&mut self, team_count: usize) -> &Draw {
        self.randomize_with(team_count, &mut rand::rng())
    }

    /// Partition the current roster, replacing any previous draw.
    pub fn randomize_with<R>(&mut self, team_count: usize, rng: &mut R) -> &Draw
    where
        R: Rng + ?Sized,
    {
        let names = self.roster.names();
        let assignment = partition(&names, team_count, rng);
        info!(
            "Drew {} members into {} teams (sizes {:?})",
            assignment.member_count(),
            assignment.team_count(),
            assignment.sizes()
        );
        self.draw.insert(Draw {
            assignment,
            roster_revision: self.roster.revision(),
            drawn_at: Utc::now(),
        })
    }

    pub fn draw(&self) -> Option<&Draw> {
        self.draw.as_ref()
    }

    /// Whether the roster changed since the current draw was made. Stale
    /// draws are kept, not recomputed.
    pub fn draw_is_stale(&self) -> bool {
        self.draw
            .as_ref()
            .is_some_and(|d| d.roster_revision != self.roster.revision())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn persist(&mut self) {
        self.store.save_snapshot(&self.roster.names());
    }

    fn persist_if_saved(&mut self, outcome: &EditOutcome) {
        if outcome.is_saved() {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session_with(names: &[&str]) -> Session<MemorySnapshotStore> {
        Session::start(NamePolicy::default(), MemorySnapshotStore::with_names(names))
    }

    #[test]
    fn start_hydrates_from_store() {
        let session = session_with(&["Ann", "Bob"]);
        assert_eq!(session.roster().names(), vec!["Ann", "Bob"]);
        // Loading is not a mutation the store needs to hear about.
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn corrupt_snapshot_starts_empty() {
        let session = Session::start(
            NamePolicy::default(),
            MemorySnapshotStore::with_raw("{\"oops\":"),
        );
        assert!(session.roster().is_empty());
    }

    #[test]
    fn successful_mutations_are_saved() {
        let mut session = session_with(&[]);
        session.add("Ann");
        session.add("Bob");
        session.rename(1, "Bobby");
        session.remove("ann");

        assert_eq!(session.store().save_count(), 4);
        assert_eq!(session.store().raw(), Some(r#"["Bobby"]"#));
    }

    #[test]
    fn rejected_mutations_are_not_saved() {
        let mut session = session_with(&["Ann", "Bob"]);
        session.add("ann");
        session.add("  ");
        session.remove("Zed");
        session.rename(0, "BOB");
        session.rename(0, "Ann");

        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn edit_save_persists() {
        let mut session = session_with(&["Ann"]);
        let ann = session.roster().members()[0].id;
        assert!(session.start_edit(ann));
        session.set_edit_draft("Annie");
        assert!(session.save_edit().is_saved());
        assert_eq!(session.store().raw(), Some(r#"["Annie"]"#));
    }

    #[test]
    fn cancel_edit_does_not_persist() {
        let mut session = session_with(&["Ann"]);
        let ann = session.roster().members()[0].id;
        session.start_edit(ann);
        session.set_edit_draft("Annie");
        session.cancel_edit();
        assert_eq!(session.store().save_count(), 0);
        assert_eq!(session.roster().names(), vec!["Ann"]);
    }

    #[test]
    fn randomize_does_not_touch_roster_or_store() {
        let mut session = session_with(&["Ann", "Bob", "Cy", "Di"]);
        let revision = session.roster().revision();
        let draw = session.randomize_with(2, &mut StdRng::seed_from_u64(5));
        assert_eq!(draw.assignment.sizes(), vec![2, 2]);
        assert_eq!(draw.roster_revision, revision);
        assert_eq!(session.roster().names(), vec!["Ann", "Bob", "Cy", "Di"]);
        assert_eq!(session.store().save_count(), 0);
    }

    #[test]
    fn draw_goes_stale_after_roster_change() {
        let mut session = session_with(&["Ann", "Bob"]);
        session.randomize(2);
        assert!(!session.draw_is_stale());

        session.add("Cy");
        assert!(session.draw_is_stale());
        // Stale draws are kept as they were.
        assert_eq!(session.draw().unwrap().assignment.member_count(), 2);
    }

    #[test]
    fn clear_discards_draw_and_saves_empty_snapshot() {
        let mut session = session_with(&["Ann", "Bob"]);
        session.randomize(2);
        assert_eq!(session.clear(), 2);

        assert!(session.roster().is_empty());
        assert!(session.draw().is_none());
        assert!(!session.draw_is_stale());
        assert_eq!(session.store().raw(), Some("[]"));
    }

    #[test]
    fn new_draw_replaces_previous() {
        let mut session = session_with(&["Ann", "Bob", "Cy"]);
        session.randomize(3);
        session.randomize(1);
        assert_eq!(session.draw().unwrap().assignment.team_count(), 1);
    }

    #[test]
    fn subscription_sees_session_mutations() {
        let mut session = session_with(&[]);
        let mut rx = session.subscribe();
        let id = session.add("Ann").unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            RosterEvent::Added {
                id,
                name: "Ann".into()
            }
        );
    }

    #[test]
    fn subscribers_never_see_startup_hydration() {
        let mut session = session_with(&["Ann", "Bob"]);
        let mut rx = session.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
