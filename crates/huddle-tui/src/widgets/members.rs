// Member list: search results with the selection cursor and inline rename.
//
// "Ann" for a plain row, "> Ann" for the selected row while the list has
// focus, and "Rename: Annie_" for the row being edited.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::protocol::Focus;
use crate::{MemberRow, ViewState};

/// Render the member list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Members;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let title = if state.search.is_empty() {
        " Members ".to_string()
    } else {
        format!(" Members ({} of {}) ", state.visible.len(), state.total_members)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);

    if state.visible.is_empty() {
        let paragraph = Paragraph::new("  No members match.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let total = state.visible.len();
    let scroll_offset = scroll_offset_for(state.selected, visible_rows, total);

    let items: Vec<ListItem> = state
        .visible
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(index, row)| format_row(row, state, focused && index == state.selected))
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Render the "Total members: N" line.
pub fn render_total(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        total_text(state.total_members),
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(paragraph, area);
}

pub fn total_text(count: usize) -> String {
    format!(" Total members: {}", count)
}

/// First row to draw so that `selected` stays on screen.
pub fn scroll_offset_for(selected: usize, visible_rows: usize, total: usize) -> usize {
    let max_offset = total.saturating_sub(visible_rows);
    (selected + 1).saturating_sub(visible_rows).min(max_offset)
}

fn format_row<'a>(row: &MemberRow, state: &ViewState, selected: bool) -> ListItem<'a> {
    let line = match state.editing.as_ref() {
        Some(edit) if edit.member == row.id => Line::from(vec![
            Span::styled(" Rename: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}_", edit.draft),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Some(_) => Line::from(Span::styled(
            format!("   {}", row.name),
            Style::default().fg(Color::DarkGray),
        )),
        None if selected => Line::from(Span::styled(
            format!(" > {}", row.name),
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            format!("   {}", row.name),
            Style::default().fg(Color::White),
        )),
    };
    ListItem::new(line)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
