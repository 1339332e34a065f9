// App: applies user commands to the session and keeps the view in sync.

use huddle_core::config::Config;
use huddle_core::roster::NameRejection;
use huddle_core::{EditOutcome, RosterEvent, Session, SnapshotStore};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::protocol::UserCommand;
use crate::ViewState;

pub struct App<S: SnapshotStore> {
    session: Session<S>,
    pub view: ViewState,
}

impl<S: SnapshotStore> App<S> {
    pub fn new(session: Session<S>, config: &Config) -> Self {
        let mut view = ViewState::new(&config.roster, &config.teams);
        // Hydration ran inside Session::start, before any subscriber
        // existed, so the startup status comes from the roster itself.
        let count = session.roster().len();
        view.status = Some(if count == 0 {
            "No saved roster".to_string()
        } else {
            format!("Loaded {} members", count)
        });
        view.sync(&session);
        App { session, view }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<RosterEvent> {
        self.session.subscribe()
    }

    /// Re-read the session into the view.
    pub fn refresh(&mut self) {
        self.view.sync(&self.session);
    }

    /// Apply one command. Returns `true` when the app should quit.
    pub fn handle_command(&mut self, cmd: UserCommand) -> bool {
        debug!("command: {:?}", cmd);
        match cmd {
            UserCommand::Add(name) => {
                if self.session.add(&name).is_some() {
                    self.view.add_input.clear();
                } else {
                    let reason = self.add_rejection(&name);
                    self.view.status = Some(format!("Not added: {}", reason));
                }
            }
            UserCommand::Remove(id) => {
                self.session.remove_member(id);
            }
            UserCommand::StartEdit(id) => {
                self.session.start_edit(id);
            }
            UserCommand::SetEditDraft(draft) => {
                self.session.set_edit_draft(draft);
            }
            UserCommand::SaveEdit => {
                if let EditOutcome::Rejected { reason, .. } = self.session.save_edit() {
                    self.view.status = Some(format!("Not renamed: {}", reason));
                }
            }
            UserCommand::CancelEdit => {
                self.session.cancel_edit();
            }
            UserCommand::Randomize(team_count) => {
                let draw = self.session.randomize(team_count);
                self.view.status = Some(format!(
                    "Drew {} teams from {} members",
                    draw.assignment.team_count(),
                    draw.assignment.member_count()
                ));
            }
            UserCommand::ClearAll => {
                self.session.clear();
            }
            UserCommand::Quit => {
                info!("quit requested");
                return true;
            }
        }
        self.refresh();
        false
    }

    /// Show a roster change in the status line.
    pub fn on_roster_event(&mut self, event: RosterEvent) {
        self.view.status = Some(describe_event(&event));
    }

    /// Why `add` turned `name` away. Anything the policy accepts was a
    /// duplicate.
    fn add_rejection(&self, name: &str) -> NameRejection {
        self.session
            .roster()
            .policy()
            .normalize(name)
            .err()
            .unwrap_or(NameRejection::Duplicate)
    }
}

/// One-line summary of a roster event.
pub fn describe_event(event: &RosterEvent) -> String {
    match event {
        // Only seen by subscribers attached before hydration.
        RosterEvent::Hydrated { count } => format!("Loaded {} members", count),
        RosterEvent::Added { name, .. } => format!("Added {}", name),
        RosterEvent::Removed { name, .. } => format!("Removed {}", name),
        RosterEvent::Renamed { from, to, .. } => format!("Renamed {} to {}", from, to),
        RosterEvent::Cleared { count } => format!("Cleared {} members", count),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
