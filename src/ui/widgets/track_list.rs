// src/ui/widgets/track_list.rs
//! Track selector list widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::player::Channel;

/// Render a channel's track list with its selection highlighted.
/// A channel without tracks renders a disabled placeholder.
pub fn render_track_list(f: &mut Frame<'_>, area: Rect, channel: &Channel, focused: bool) {
    let block = Block::default().borders(Borders::ALL).title("Tracks");

    if !channel.is_enabled() {
        let placeholder = List::new([ListItem::new(format!(
            "No {} tracks available",
            channel.kind()
        ))])
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = channel
        .tracks()
        .iter()
        .map(|track| ListItem::new(track.name.as_str()))
        .collect();

    let mut state = ListState::default();
    state.select(
        channel
            .selected_track_id()
            .and_then(|id| channel.tracks().iter().position(|t| t.id == id)),
    );

    let highlight = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut state);
}
