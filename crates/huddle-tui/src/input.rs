// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages applied by the
// app, or into local ViewState mutations (focus, typing, selection, team
// count).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::{Focus, UserCommand};
use crate::ViewState;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press changes the session or
/// quits. Returns `None` when the key was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports Press and Release on some platforms
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits regardless of mode
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_clear {
        return handle_confirm_clear(key_event, view_state);
    }

    // A pending rename captures the keyboard until saved or cancelled
    if view_state.editing.is_some() {
        return handle_edit_mode(key_event, view_state);
    }

    if ctrl {
        return match key_event.code {
            KeyCode::Char('r') => Some(UserCommand::Randomize(view_state.team_count)),
            KeyCode::Char('l') => {
                if view_state.total_members > 0 {
                    view_state.confirm_clear = true;
                }
                None
            }
            _ => None,
        };
    }

    match key_event.code {
        KeyCode::Tab => {
            view_state.focus = view_state.focus.next(!view_state.roster_visible());
            return None;
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.prev(!view_state.roster_visible());
            return None;
        }
        _ => {}
    }

    match view_state.focus {
        Focus::Add => handle_add_input(key_event, view_state),
        Focus::Search => handle_search_input(key_event, view_state),
        Focus::Members => handle_members(key_event, view_state),
        Focus::TeamCount => handle_team_count(key_event, view_state),
    }
}

fn handle_confirm_clear(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_clear = false;
            Some(UserCommand::ClearAll)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_clear = false;
            None
        }
        _ => None,
    }
}

fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let mut draft = view_state.editing.as_ref()?.draft.clone();
    match key_event.code {
        KeyCode::Enter => Some(UserCommand::SaveEdit),
        KeyCode::Esc => Some(UserCommand::CancelEdit),
        KeyCode::Backspace => {
            draft.pop()?;
            Some(UserCommand::SetEditDraft(draft))
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            if !push_limited(&mut draft, c, view_state.max_name_len) {
                return None;
            }
            Some(UserCommand::SetEditDraft(draft))
        }
        _ => None,
    }
}

fn handle_add_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            if view_state.add_input.trim().is_empty() {
                None
            } else {
                Some(UserCommand::Add(view_state.add_input.clone()))
            }
        }
        KeyCode::Backspace => {
            view_state.add_input.pop();
            None
        }
        KeyCode::Esc => {
            view_state.add_input.clear();
            None
        }
        KeyCode::Char(c) => {
            push_limited(&mut view_state.add_input, c, view_state.max_name_len);
            None
        }
        _ => None,
    }
}

fn handle_search_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Backspace => {
            view_state.search.pop();
        }
        KeyCode::Esc => view_state.search.clear(),
        KeyCode::Char(c) => view_state.search.push(c),
        KeyCode::Down | KeyCode::Enter => {
            view_state.focus = Focus::Members;
            return None;
        }
        _ => return None,
    }
    view_state.selected = 0;
    None
}

fn handle_members(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected = view_state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.selected + 1 < view_state.visible.len() {
                view_state.selected += 1;
            }
            None
        }
        KeyCode::Home => {
            view_state.selected = 0;
            None
        }
        KeyCode::End => {
            view_state.selected = view_state.visible.len().saturating_sub(1);
            None
        }
        KeyCode::Enter | KeyCode::Char('e') => view_state
            .selected_member()
            .map(|row| UserCommand::StartEdit(row.id)),
        KeyCode::Delete | KeyCode::Char('d') => view_state
            .selected_member()
            .map(|row| UserCommand::Remove(row.id)),
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

fn handle_team_count(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Up | KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            if view_state.team_count < view_state.max_teams {
                view_state.team_count += 1;
            }
            None
        }
        KeyCode::Down | KeyCode::Left | KeyCode::Char('-') => {
            if view_state.team_count > view_state.min_teams {
                view_state.team_count -= 1;
            }
            None
        }
        KeyCode::Enter => Some(UserCommand::Randomize(view_state.team_count)),
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

/// Append `c` unless `text` already holds `max` characters.
fn push_limited(text: &mut String, c: char, max: usize) -> bool {
    if text.chars().count() >= max {
        return false;
    }
    text.push(c);
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
