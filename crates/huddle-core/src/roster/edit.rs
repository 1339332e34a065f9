// In-progress rename state.
//
// At most one member is in edit mode at a time. The edit tracks the member
// by id, so filtering or reordering the visible list never retargets it.

use super::name::NameRejection;
use super::MemberId;

/// The single pending rename: which member, and the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEdit {
    pub member: MemberId,
    pub draft: String,
}

/// Result of committing an edit (or a direct rename).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The member now carries `name`.
    Saved { member: MemberId, name: String },
    /// The new name was identical to the current one; nothing changed.
    Unchanged { member: MemberId },
    /// The new name was turned away. Treated as a cancel.
    Rejected {
        member: MemberId,
        reason: NameRejection,
    },
    /// There was nothing to commit: no edit active, or no such member.
    NoEdit,
}

impl EditOutcome {
    /// Whether the roster was changed.
    pub fn is_saved(&self) -> bool {
        matches!(self, EditOutcome::Saved { .. })
    }
}
