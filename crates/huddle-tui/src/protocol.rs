// Messages between the input handler and the app.

use huddle_core::MemberId;

/// Which control receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Add,
    Search,
    Members,
    TeamCount,
}

impl Focus {
    /// Focus order for Tab. Search and Members are skipped while the roster
    /// is empty, since they are hidden.
    pub fn next(self, roster_empty: bool) -> Focus {
        let next = match self {
            Focus::Add => Focus::Search,
            Focus::Search => Focus::Members,
            Focus::Members => Focus::TeamCount,
            Focus::TeamCount => Focus::Add,
        };
        if roster_empty && next.needs_members() {
            next.next(roster_empty)
        } else {
            next
        }
    }

    /// Focus order for Shift-Tab.
    pub fn prev(self, roster_empty: bool) -> Focus {
        let prev = match self {
            Focus::Add => Focus::TeamCount,
            Focus::Search => Focus::Add,
            Focus::Members => Focus::Search,
            Focus::TeamCount => Focus::Members,
        };
        if roster_empty && prev.needs_members() {
            prev.prev(roster_empty)
        } else {
            prev
        }
    }

    pub fn needs_members(self) -> bool {
        matches!(self, Focus::Search | Focus::Members)
    }
}

/// An action the app applies to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Add(String),
    Remove(MemberId),
    StartEdit(MemberId),
    SetEditDraft(String),
    SaveEdit,
    CancelEdit,
    Randomize(usize),
    ClearAll,
    Quit,
}
