// src/ui/widgets/transport.rs
//! Play/pause button and key help.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::player::Player;

/// Render the shared play/pause button.
pub fn render_transport(f: &mut Frame<'_>, area: Rect, player: &Player) {
    let button = if !player.has_selection() {
        Span::styled(" ⏵ Play ", Style::default().fg(Color::DarkGray))
    } else if player.is_playing() {
        Span::styled(
            " ⏸ Pause ",
            Style::default().fg(Color::Black).bg(Color::Red),
        )
    } else {
        Span::styled(
            " ⏵ Play ",
            Style::default().fg(Color::Black).bg(Color::Green),
        )
    };

    f.render_widget(
        Paragraph::new(Line::from(button.patch_style(Style::default().add_modifier(Modifier::BOLD))))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let help =
        "space play/pause  tab/1/2 focus  ↑/↓ track  ←/→ volume  [/] seek  l loop  ? help  q quit";
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Keys")),
        area,
    );
}
