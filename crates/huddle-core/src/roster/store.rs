// Roster store: the canonical member list.
//
// Invariant: no two members are case-insensitively equal. Every mutation
// that would break it is ignored rather than reported as an error.

use tokio::sync::mpsc;
use tracing::debug;

use super::edit::{ActiveEdit, EditOutcome};
use super::name::{fold, same_name, NamePolicy, NameRejection};
use super::{Member, MemberId, RosterEvent};

/// Owns the ordered, deduplicated roster and the single pending edit.
#[derive(Debug, Default)]
pub struct RosterStore {
    members: Vec<Member>,
    policy: NamePolicy,
    active_edit: Option<ActiveEdit>,
    next_id: u64,
    /// Bumped on every successful mutation.
    revision: u64,
    subscribers: Vec<mpsc::UnboundedSender<RosterEvent>>,
}

impl RosterStore {
    pub fn new(policy: NamePolicy) -> Self {
        RosterStore {
            policy,
            ..RosterStore::default()
        }
    }

    /// Replace the roster with names from a persisted snapshot.
    ///
    /// Names are trimmed, blanks are dropped, and later case-insensitive
    /// duplicates of an earlier name are skipped. The length limit is not
    /// applied so that tightening it never discards saved members.
    ///
    /// Returns the number of members loaded.
    pub fn hydrate<I>(&mut self, names: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.members.clear();
        self.active_edit = None;

        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                debug!("skipping blank name in snapshot");
                continue;
            }
            if self.find(name).is_some() {
                debug!(name, "skipping duplicate name in snapshot");
                continue;
            }
            let id = self.allocate_id();
            self.members.push(Member {
                id,
                name: name.to_string(),
            });
        }

        let count = self.members.len();
        self.commit(RosterEvent::Hydrated { count });
        count
    }

    /// Append a member. Ignored (returns `None`) if the trimmed name is
    /// blank, too long, or matches an existing member.
    pub fn add(&mut self, raw: &str) -> Option<MemberId> {
        let name = match self.policy.normalize(raw) {
            Ok(name) => name,
            Err(reason) => {
                debug!(%reason, "ignoring add");
                return None;
            }
        };
        if self.find(name).is_some() {
            debug!(name, reason = %NameRejection::Duplicate, "ignoring add");
            return None;
        }

        let id = self.allocate_id();
        self.members.push(Member {
            id,
            name: name.to_string(),
        });
        self.commit(RosterEvent::Added {
            id,
            name: name.to_string(),
        });
        Some(id)
    }

    /// Remove the member whose name matches `name` case-insensitively.
    pub fn remove(&mut self, name: &str) -> Option<Member> {
        let idx = self.find(name)?;
        Some(self.remove_at(idx))
    }

    /// Remove a member by id.
    pub fn remove_member(&mut self, id: MemberId) -> Option<Member> {
        let idx = self.position(id)?;
        Some(self.remove_at(idx))
    }

    /// Rename the member at `index`. See [`RosterStore::rename_member`].
    pub fn rename(&mut self, index: usize, new_name: &str) -> EditOutcome {
        match self.members.get(index) {
            Some(member) => {
                let id = member.id;
                self.rename_member(id, new_name)
            }
            None => EditOutcome::NoEdit,
        }
    }

    /// Rename a member in place, keeping its position.
    ///
    /// The trimmed name is rejected if it is blank, too long, or matches any
    /// *other* member. A pending edit on this member ends whatever the
    /// outcome.
    pub fn rename_member(&mut self, id: MemberId, new_name: &str) -> EditOutcome {
        let Some(idx) = self.position(id) else {
            return EditOutcome::NoEdit;
        };

        if self.is_editing(id) {
            self.active_edit = None;
        }

        let name = match self.policy.normalize(new_name) {
            Ok(name) => name,
            Err(reason) => {
                debug!(member = %id, %reason, "rename rejected");
                return EditOutcome::Rejected { member: id, reason };
            }
        };
        if self
            .members
            .iter()
            .any(|m| m.id != id && same_name(&m.name, name))
        {
            debug!(member = %id, name, "rename rejected: duplicate");
            return EditOutcome::Rejected {
                member: id,
                reason: NameRejection::Duplicate,
            };
        }
        if self.members[idx].name == name {
            return EditOutcome::Unchanged { member: id };
        }

        let from = std::mem::replace(&mut self.members[idx].name, name.to_string());
        self.commit(RosterEvent::Renamed {
            id,
            from,
            to: name.to_string(),
        });
        EditOutcome::Saved {
            member: id,
            name: name.to_string(),
        }
    }

    /// Drop every member. Also ends any pending edit.
    pub fn clear(&mut self) -> usize {
        let count = self.members.len();
        self.members.clear();
        self.active_edit = None;
        self.commit(RosterEvent::Cleared { count });
        count
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    /// Put `id` into edit mode with its current name as the draft.
    ///
    /// Returns `false` if another edit is already active or the member does
    /// not exist.
    pub fn start_edit(&mut self, id: MemberId) -> bool {
        if let Some(edit) = &self.active_edit {
            debug!(active = %edit.member, requested = %id, "edit already in progress");
            return false;
        }
        let Some(member) = self.get(id) else {
            return false;
        };
        let draft = member.name.clone();
        self.active_edit = Some(ActiveEdit { member: id, draft });
        true
    }

    /// Index-based form of [`RosterStore::start_edit`].
    pub fn start_edit_at(&mut self, index: usize) -> bool {
        match self.members.get(index) {
            Some(member) => {
                let id = member.id;
                self.start_edit(id)
            }
            None => false,
        }
    }

    /// Replace the draft text of the active edit.
    pub fn set_edit_draft(&mut self, draft: impl Into<String>) -> bool {
        match self.active_edit.as_mut() {
            Some(edit) => {
                edit.draft = draft.into();
                true
            }
            None => false,
        }
    }

    /// Commit the active edit's draft as the member's new name.
    pub fn save_edit(&mut self) -> EditOutcome {
        match self.active_edit.take() {
            Some(edit) => self.rename_member(edit.member, &edit.draft),
            None => EditOutcome::NoEdit,
        }
    }

    /// Leave edit mode without touching the roster.
    pub fn cancel_edit(&mut self) -> Option<ActiveEdit> {
        self.active_edit.take()
    }

    pub fn active_edit(&self) -> Option<&ActiveEdit> {
        self.active_edit.as_ref()
    }

    pub fn is_editing(&self, id: MemberId) -> bool {
        self.active_edit.as_ref().is_some_and(|e| e.member == id)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Members whose name contains `query` case-insensitively, in roster
    /// order. An empty query matches everyone.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Member> + 'a {
        let needle = fold(query);
        self.members
            .iter()
            .filter(move |m| fold(&m.name).contains(needle.as_str()))
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Point-in-time copy of the names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn position(&self, id: MemberId) -> Option<usize> {
        self.members.iter().position(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn policy(&self) -> NamePolicy {
        self.policy
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Receive a `RosterEvent` after every successful mutation. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RosterEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn find(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| same_name(&m.name, name))
    }

    fn remove_at(&mut self, idx: usize) -> Member {
        let member = self.members.remove(idx);
        if self.is_editing(member.id) {
            debug!(member = %member.id, "removed member was being edited, cancelling edit");
            self.active_edit = None;
        }
        self.commit(RosterEvent::Removed {
            id: member.id,
            name: member.name.clone(),
        });
        member
    }

    fn allocate_id(&mut self) -> MemberId {
        let id = MemberId(self.next_id);
        self.next_id += 1;
        id
    }

    fn commit(&mut self, event: RosterEvent) {
        self.revision += 1;
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> RosterStore {
        let mut store = RosterStore::new(NamePolicy::default());
        for name in names {
            store.add(name).expect("fixture names should be valid");
        }
        store
    }

    fn id_of(store: &RosterStore, name: &str) -> MemberId {
        store
            .members()
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
            .unwrap()
    }

    // ------------------------------------------------------------------
    // add
    // ------------------------------------------------------------------

    #[test]
    fn add_appends_trimmed_name() {
        let mut store = roster(&[]);
        assert!(store.add("  Ann  ").is_some());
        assert!(store.add("Bob").is_some());
        assert_eq!(store.names(), vec!["Ann", "Bob"]);
    }

    #[test]
    fn add_is_idempotent_under_case() {
        let mut store = roster(&[]);
        assert!(store.add("Sam").is_some());
        assert!(store.add("sam").is_none());
        assert!(store.add(" SAM ").is_none());
        assert_eq!(store.names(), vec!["Sam"]);
    }

    #[test]
    fn add_ignores_blank_input() {
        let mut store = roster(&["Ann"]);
        let revision = store.revision();
        assert!(store.add("").is_none());
        assert!(store.add("   ").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn add_respects_length_limit() {
        let mut store = RosterStore::new(NamePolicy::with_max_len(5));
        assert!(store.add("Alice").is_some());
        assert!(store.add("Bernadette").is_none());
        assert_eq!(store.names(), vec!["Alice"]);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = roster(&[]);
        let first = store.add("Ann").unwrap();
        store.remove_member(first);
        let second = store.add("Ann").unwrap();
        assert_ne!(first, second);
        assert!(second > first);
    }

    // ------------------------------------------------------------------
    // remove
    // ------------------------------------------------------------------

    #[test]
    fn remove_matches_case_insensitively() {
        let mut store = roster(&["Ann", "Bob", "Cy"]);
        let removed = store.remove("BOB").unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(store.names(), vec!["Ann", "Cy"]);
    }

    #[test]
    fn remove_absent_name_is_noop() {
        let mut store = roster(&["Ann"]);
        let revision = store.revision();
        assert!(store.remove("Zed").is_none());
        assert_eq!(store.names(), vec!["Ann"]);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn removing_edited_member_cancels_edit() {
        let mut store = roster(&["Ann", "Bob"]);
        let bob = id_of(&store, "Bob");
        assert!(store.start_edit(bob));
        store.remove("bob");
        assert!(store.active_edit().is_none());
    }

    #[test]
    fn removing_other_member_keeps_edit() {
        let mut store = roster(&["Ann", "Bob"]);
        let bob = id_of(&store, "Bob");
        assert!(store.start_edit(bob));
        store.remove("Ann");
        assert_eq!(store.active_edit().map(|e| e.member), Some(bob));
    }

    // ------------------------------------------------------------------
    // rename
    // ------------------------------------------------------------------

    #[test]
    fn rename_replaces_in_place() {
        let mut store = roster(&["Ann", "Bob", "Cy"]);
        let outcome = store.rename(1, "  Robert ");
        assert!(outcome.is_saved());
        assert_eq!(store.names(), vec!["Ann", "Robert", "Cy"]);
    }

    #[test]
    fn rename_to_other_members_name_is_rejected() {
        let mut store = roster(&["Ann", "Bob"]);
        let outcome = store.rename(0, "bob");
        assert_eq!(
            outcome,
            EditOutcome::Rejected {
                member: id_of(&store, "Ann"),
                reason: NameRejection::Duplicate,
            }
        );
        assert_eq!(store.names(), vec!["Ann", "Bob"]);
    }

    #[test]
    fn rename_to_blank_is_rejected() {
        let mut store = roster(&["Ann"]);
        let outcome = store.rename(0, "   ");
        assert!(matches!(
            outcome,
            EditOutcome::Rejected {
                reason: NameRejection::Empty,
                ..
            }
        ));
        assert_eq!(store.names(), vec!["Ann"]);
    }

    #[test]
    fn rename_may_change_own_casing() {
        let mut store = roster(&["ann", "Bob"]);
        assert!(store.rename(0, "Ann").is_saved());
        assert_eq!(store.names(), vec!["Ann", "Bob"]);
    }

    #[test]
    fn rename_to_identical_name_is_unchanged() {
        let mut store = roster(&["Ann"]);
        let outcome = store.rename(0, "Ann");
        assert!(matches!(outcome, EditOutcome::Unchanged { .. }));
    }

    #[test]
    fn rename_out_of_range_is_noop() {
        let mut store = roster(&["Ann"]);
        assert_eq!(store.rename(5, "Zed"), EditOutcome::NoEdit);
    }

    #[test]
    fn rename_ends_pending_edit_on_that_member() {
        let mut store = roster(&["Ann", "Bob"]);
        let ann = id_of(&store, "Ann");
        store.start_edit(ann);
        store.rename(0, "Bob");
        assert!(store.active_edit().is_none());
    }

    // ------------------------------------------------------------------
    // edit mode
    // ------------------------------------------------------------------

    #[test]
    fn edit_save_flow() {
        let mut store = roster(&["Ann", "Bob"]);
        let bob = id_of(&store, "Bob");

        assert!(store.start_edit(bob));
        assert_eq!(store.active_edit().unwrap().draft, "Bob");
        assert!(store.set_edit_draft("Bobby"));

        let outcome = store.save_edit();
        assert_eq!(
            outcome,
            EditOutcome::Saved {
                member: bob,
                name: "Bobby".into()
            }
        );
        assert!(store.active_edit().is_none());
        assert_eq!(store.names(), vec!["Ann", "Bobby"]);
    }

    #[test]
    fn second_edit_is_rejected_until_first_ends() {
        let mut store = roster(&["Ann", "Bob"]);
        let ann = id_of(&store, "Ann");
        let bob = id_of(&store, "Bob");

        assert!(store.start_edit(ann));
        assert!(!store.start_edit(bob));
        assert_eq!(store.active_edit().unwrap().member, ann);

        store.cancel_edit();
        assert!(store.start_edit(bob));
    }

    #[test]
    fn rejected_save_cancels_edit() {
        let mut store = roster(&["Ann", "Bob"]);
        store.start_edit_at(0);
        store.set_edit_draft("BOB");
        assert!(!store.save_edit().is_saved());
        assert!(store.active_edit().is_none());
        assert_eq!(store.names(), vec!["Ann", "Bob"]);
    }

    #[test]
    fn edit_survives_reordering_of_visible_list() {
        // The edit is keyed by id, so removing an earlier member (which
        // shifts indices) still commits to the right member.
        let mut store = roster(&["Ann", "Bob", "Cy"]);
        let cy = id_of(&store, "Cy");
        store.start_edit(cy);
        store.remove("Ann");
        store.set_edit_draft("Cyrus");
        store.save_edit();
        assert_eq!(store.names(), vec!["Bob", "Cyrus"]);
    }

    #[test]
    fn add_allowed_while_editing() {
        let mut store = roster(&["Ann"]);
        store.start_edit_at(0);
        assert!(store.add("Bob").is_some());
        assert!(store.active_edit().is_some());
    }

    #[test]
    fn save_without_edit_is_noop() {
        let mut store = roster(&["Ann"]);
        assert_eq!(store.save_edit(), EditOutcome::NoEdit);
        assert!(!store.set_edit_draft("x"));
    }

    // ------------------------------------------------------------------
    // search
    // ------------------------------------------------------------------

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = roster(&["Annabel", "Bob", "Joanna", "Dan"]);
        let hits: Vec<&str> = store.search("AN").map(|m| m.name.as_str()).collect();
        assert_eq!(hits, vec!["Annabel", "Joanna", "Dan"]);
    }

    #[test]
    fn empty_query_matches_everyone() {
        let store = roster(&["Ann", "Bob"]);
        assert_eq!(store.search("").count(), 2);
    }

    #[test]
    fn search_does_not_mutate() {
        let store = roster(&["Ann", "Bob"]);
        let revision = store.revision();
        let _ = store.search("a").count();
        assert_eq!(store.revision(), revision);
    }

    // ------------------------------------------------------------------
    // clear / hydrate
    // ------------------------------------------------------------------

    #[test]
    fn clear_empties_roster_and_edit() {
        let mut store = roster(&["Ann", "Bob"]);
        store.start_edit_at(1);
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.active_edit().is_none());
    }

    #[test]
    fn hydrate_normalizes_snapshot() {
        let mut store = RosterStore::new(NamePolicy::with_max_len(3));
        let loaded = store.hydrate([" Ann ", "", "ANN", "Bernadette", "Bob"]);
        assert_eq!(loaded, 3);
        // The length limit does not apply to persisted names.
        assert_eq!(store.names(), vec!["Ann", "Bernadette", "Bob"]);
    }

    // ------------------------------------------------------------------
    // subscriptions
    // ------------------------------------------------------------------

    #[test]
    fn subscribers_receive_events_in_order() {
        let mut store = roster(&[]);
        let mut rx = store.subscribe();

        let ann = store.add("Ann").unwrap();
        store.add("ann");
        store.rename_member(ann, "Anne");
        store.clear();

        assert_eq!(
            rx.try_recv().unwrap(),
            RosterEvent::Added {
                id: ann,
                name: "Ann".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            RosterEvent::Renamed {
                id: ann,
                from: "Ann".into(),
                to: "Anne".into()
            }
        );
        assert_eq!(rx.try_recv().unwrap(), RosterEvent::Cleared { count: 1 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn hydrate_notifies_existing_subscribers() {
        let mut store = roster(&[]);
        let mut rx = store.subscribe();
        store.hydrate(["Ann", "ann", "Bob"]);
        assert_eq!(rx.try_recv().unwrap(), RosterEvent::Hydrated { count: 2 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut store = roster(&[]);
        let rx = store.subscribe();
        drop(rx);
        store.add("Ann");
        assert!(store.subscribers.is_empty());
    }
}
