// Terminal frontend: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the parts of the session it
// draws. After every command the app re-syncs the view from the session;
// the render tick redraws at ~30 fps.

pub mod app;
pub mod input;
pub mod layout;
pub mod protocol;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use huddle_core::config::{RosterConfig, TeamsConfig};
use huddle_core::{Draw, MemberId, Session, SnapshotStore, Team};
use ratatui::Frame;
use tracing::{info, warn};

use app::App;
use layout::build_layout;
use protocol::Focus;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// A member row as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: MemberId,
    pub name: String,
}

/// The pending rename, mirrored from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditView {
    pub member: MemberId,
    pub draft: String,
}

/// The current draw, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamsView {
    pub teams: Vec<Team>,
    /// Local wall-clock time of the draw, `HH:MM:SS`.
    pub drawn_at: String,
    /// The roster changed since this draw was made.
    pub stale: bool,
}

impl TeamsView {
    pub fn from_draw(draw: &Draw, stale: bool) -> Self {
        TeamsView {
            teams: draw.assignment.teams().to_vec(),
            drawn_at: draw
                .drawn_at
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string(),
            stale,
        }
    }
}

/// TUI-local state read by `render_frame`.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub focus: Focus,
    /// Text typed into the add-member input.
    pub add_input: String,
    /// Current search query.
    pub search: String,
    /// Team count offered to the partitioner.
    pub team_count: usize,
    pub min_teams: usize,
    pub max_teams: usize,
    /// Longest name the inputs accept.
    pub max_name_len: usize,
    /// Members matching `search`, in roster order.
    pub visible: Vec<MemberRow>,
    /// Index into `visible`.
    pub selected: usize,
    pub total_members: usize,
    pub editing: Option<EditView>,
    /// Whether the clear-all confirmation dialog is open.
    pub confirm_clear: bool,
    pub teams: Option<TeamsView>,
    /// Last roster event, shown in the help bar.
    pub status: Option<String>,
}

impl ViewState {
    pub fn new(roster: &RosterConfig, teams: &TeamsConfig) -> Self {
        ViewState {
            focus: Focus::Add,
            add_input: String::new(),
            search: String::new(),
            team_count: teams.clamp(teams.default_count),
            min_teams: teams.min_count,
            max_teams: teams.max_count,
            max_name_len: roster.max_name_len,
            visible: Vec::new(),
            selected: 0,
            total_members: 0,
            editing: None,
            confirm_clear: false,
            teams: None,
            status: None,
        }
    }

    /// Refresh everything derived from the session.
    pub fn sync<S: SnapshotStore>(&mut self, session: &Session<S>) {
        let roster = session.roster();
        self.total_members = roster.len();
        self.visible = roster
            .search(&self.search)
            .map(|m| MemberRow {
                id: m.id,
                name: m.name.clone(),
            })
            .collect();
        self.editing = roster.active_edit().map(|e| EditView {
            member: e.member,
            draft: e.draft.clone(),
        });

        if let Some(pos) = self
            .editing
            .as_ref()
            .and_then(|e| self.visible.iter().position(|row| row.id == e.member))
        {
            self.selected = pos;
        } else if self.visible.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.visible.len() - 1);
        }

        self.teams = session
            .draw()
            .map(|draw| TeamsView::from_draw(draw, session.draw_is_stale()));

        if roster.is_empty() && self.focus.needs_members() {
            self.focus = Focus::Add;
        }
    }

    pub fn selected_member(&self) -> Option<&MemberRow> {
        self.visible.get(self.selected)
    }

    /// Whether the member list and search box are shown.
    pub fn roster_visible(&self) -> bool {
        self.total_members > 0
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area(), state.roster_visible());

    widgets::header::render(frame, layout.header);
    widgets::text_input::render(
        frame,
        layout.add_input,
        "Add member",
        &state.add_input,
        "Type a name, Enter to add",
        state.focus == Focus::Add,
    );
    widgets::team_count::render(frame, layout.team_count, state);

    if let Some(search) = layout.search {
        widgets::text_input::render(
            frame,
            search,
            "Search",
            &state.search,
            "Filter members",
            state.focus == Focus::Search,
        );
    }
    if let Some(members) = layout.members {
        widgets::members::render(frame, members, state);
    }
    if let Some(total) = layout.total {
        widgets::members::render_total(frame, total, state);
    }

    widgets::teams::render(frame, layout.teams, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_clear {
        widgets::clear_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs a select loop over keyboard input, roster events, and render
///    ticks. Each key is handled to completion before the next is read.
/// 4. Restores the terminal on exit.
pub async fn run<S: SnapshotStore>(mut app: App<S>) -> anyhow::Result<()> {
    let mut roster_events = app.subscribe();

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("TUI started");

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        let command = input::handle_key(key_event, &mut app.view);
                        if let Some(cmd) = command {
                            if app.handle_command(cmd) {
                                break Ok(());
                            }
                        }
                        app.refresh();
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws.
                    }
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            Some(event) = roster_events.recv() => {
                app.on_roster_event(event);
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &app.view)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    info!("TUI stopped");

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::{MemorySnapshotStore, NamePolicy};

    fn view() -> ViewState {
        ViewState::new(&RosterConfig::default(), &TeamsConfig::default())
    }

    fn session(names: &[&str]) -> Session<MemorySnapshotStore> {
        Session::start(NamePolicy::default(), MemorySnapshotStore::with_names(names))
    }

    #[test]
    fn view_state_defaults_follow_config() {
        let state = view();
        assert_eq!(state.focus, Focus::Add);
        assert_eq!(state.team_count, 3);
        assert_eq!(state.min_teams, 2);
        assert_eq!(state.max_teams, 10);
        assert_eq!(state.max_name_len, 20);
        assert!(state.teams.is_none());
        assert!(!state.confirm_clear);
    }

    #[test]
    fn sync_applies_search_filter() {
        let session = session(&["Annabel", "Bob", "Joanna"]);
        let mut state = view();
        state.search = "ANN".into();
        state.sync(&session);

        let names: Vec<&str> = state.visible.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Annabel", "Joanna"]);
        assert_eq!(state.total_members, 3);
    }

    #[test]
    fn sync_clamps_selection() {
        let mut session = session(&["Ann", "Bob", "Cy"]);
        let mut state = view();
        state.sync(&session);
        state.selected = 2;

        session.remove("Cy");
        state.sync(&session);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn sync_selects_edited_member() {
        let mut session = session(&["Ann", "Bob", "Cy"]);
        let cy = session.roster().members()[2].id;
        session.start_edit(cy);

        let mut state = view();
        state.sync(&session);
        assert_eq!(state.selected, 2);
        assert_eq!(
            state.editing,
            Some(EditView {
                member: cy,
                draft: "Cy".into()
            })
        );
    }

    #[test]
    fn sync_moves_focus_off_hidden_controls() {
        let mut session = session(&["Ann"]);
        let mut state = view();
        state.focus = Focus::Members;
        session.clear();
        state.sync(&session);
        assert_eq!(state.focus, Focus::Add);
    }

    #[test]
    fn sync_reports_stale_draw() {
        let mut session = session(&["Ann", "Bob"]);
        session.randomize(2);
        let mut state = view();
        state.sync(&session);
        assert!(!state.teams.as_ref().unwrap().stale);

        session.add("Cy");
        state.sync(&session);
        assert!(state.teams.as_ref().unwrap().stale);
    }

    #[test]
    fn render_frame_does_not_panic() {
        let mut session = session(&["Ann", "Bob", "Cy", "Di"]);
        session.randomize(2);
        let mut state = view();
        state.sync(&session);
        state.confirm_clear = true;

        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_empty_roster_tiny_terminal() {
        let state = view();
        let backend = ratatui::backend::TestBackend::new(20, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
