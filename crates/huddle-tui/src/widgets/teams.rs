// Teams panel: the latest draw, one block of lines per team.
//
// "Team 1 (3)" followed by indented member names, "(no players)" for a
// team left empty by a small roster.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use huddle_core::Team;

use crate::{TeamsView, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title(" Teams ");

    let Some(view) = state.teams.as_ref() else {
        let hint = if state.total_members == 0 {
            "  Add members, then press Ctrl+R to draw teams."
        } else {
            "  Press Ctrl+R to draw teams."
        };
        let paragraph = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let paragraph = Paragraph::new(draw_lines(view))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// All lines for a draw: the timestamp header, then each team.
pub fn draw_lines(view: &TeamsView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(
        format!(" Drawn at {}", view.drawn_at),
        Style::default().fg(Color::Gray),
    )];
    if view.stale {
        header.push(Span::styled(
            "  (roster changed, press Ctrl+R to redraw)",
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(header));

    for team in &view.teams {
        lines.push(Line::default());
        lines.extend(team_lines(team));
    }
    lines
}

fn team_lines(team: &Team) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!(" Team {} ({})", team.number, team.members.len()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    if team.members.is_empty() {
        lines.push(Line::from(Span::styled(
            "   (no players)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for name in &team.members {
        lines.push(Line::from(Span::styled(
            format!("   {}", name),
            Style::default().fg(Color::White),
        )));
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
