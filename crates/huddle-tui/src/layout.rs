// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Header (1 row)                                    |
// +-------------------------------+------------------+
// | Add member (3 rows)           | Teams (3 rows)   |
// +-------------------------------+------------------+
// | Search (3 rows)     | Teams panel                 |
// | Members (fill)      |                             |
// | Total (1 row)       |                             |
// +---------------------+-----------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// While the roster is empty the search box, member list, and total are
// hidden and the teams panel takes the whole middle section.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: application title.
    pub header: Rect,
    /// Text input for new member names.
    pub add_input: Rect,
    /// Team count selector, beside the add input.
    pub team_count: Rect,
    pub search: Option<Rect>,
    pub members: Option<Rect>,
    /// "Total members: N" line under the list.
    pub total: Option<Rect>,
    /// Drawn teams.
    pub teams: Rect,
    /// Bottom row: keyboard hints and last roster event.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect, roster_visible: bool) -> AppLayout {
    // Vertical: header(1) | inputs(3) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = vertical[0];
    let inputs = vertical[1];
    let middle = vertical[2];
    let help_bar = vertical[3];

    let input_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(inputs);

    if !roster_visible {
        return AppLayout {
            header,
            add_input: input_row[0],
            team_count: input_row[1],
            search: None,
            members: None,
            total: None,
            teams: middle,
            help_bar,
        };
    }

    // Horizontal: roster column (40%) | teams (60%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(middle);

    let roster_column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(horizontal[0]);

    AppLayout {
        header,
        add_input: input_row[0],
        team_count: input_row[1],
        search: Some(roster_column[0]),
        members: Some(roster_column[1]),
        total: Some(roster_column[2]),
        teams: horizontal[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
