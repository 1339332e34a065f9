// Team count selector.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::Focus;
use crate::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::TeamCount;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let arrow = |enabled: bool, symbol: &'static str| {
        let color = if enabled { Color::White } else { Color::DarkGray };
        Span::styled(symbol, Style::default().fg(color))
    };

    let line = Line::from(vec![
        arrow(state.team_count > state.min_teams, " - "),
        Span::styled(
            state.team_count.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        arrow(state.team_count < state.max_teams, " + "),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Teams "),
    );
    frame.render_widget(paragraph, area);
}
