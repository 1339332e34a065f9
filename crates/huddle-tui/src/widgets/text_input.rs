// Single-line text input box used for adding members and searching.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Render a bordered input with `title`. An empty value shows the
/// placeholder; a focused box gets a yellow border and a trailing cursor.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let paragraph = Paragraph::new(content_line(value, placeholder, focused)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", title)),
    );
    frame.render_widget(paragraph, area);
}

/// Build the inner line of the input box.
pub fn content_line<'a>(value: &'a str, placeholder: &'a str, focused: bool) -> Line<'a> {
    let mut spans = Vec::new();
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(value, Style::default().fg(Color::White)));
    }
    if focused {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}
