// Help bar: key hints for the focused control and the last roster event.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::Focus;
use crate::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        format!(" {}", hint_text(state)),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )];
    if let Some(status) = state.status.as_deref() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Green),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for the current mode.
pub fn hint_text(state: &ViewState) -> &'static str {
    if state.confirm_clear {
        return "y:Clear all | n/Esc:Keep";
    }
    if state.editing.is_some() {
        return "Enter:Save | Esc:Cancel";
    }
    match state.focus {
        Focus::Add => "Enter:Add | Tab:Next | ^R:Randomize | ^L:Clear | ^C:Quit",
        Focus::Search => "Type to filter | Esc:Reset | Tab:Next | ^C:Quit",
        Focus::Members => "Up/Down:Select | e:Edit | d:Remove | Tab:Next | q:Quit",
        Focus::TeamCount => "Up/Down/+/-:Teams | ^R:Randomize | Tab:Next | q:Quit",
    }
}
