// src/ui/widgets/status_bar.rs
//! Title bar carrying the loading state, the current error or an empty-library hint.

use std::path::Path;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::catalog::{locator::kind_dir, ChannelKind};
use crate::player::Player;

/// Text and color of the status line.
pub fn status_line(player: &Player, library_root: &Path) -> (String, Color) {
    if player.is_loading() {
        return ("Loading audio tracks...".to_string(), Color::Yellow);
    }
    if let Some(error) = player.error() {
        return (error.to_string(), Color::Red);
    }
    if player.library_is_empty() {
        let dirs: Vec<String> = ChannelKind::ALL
            .iter()
            .map(|k| format!("{}/", kind_dir(library_root, *k).display()))
            .collect();
        return (
            format!("No audio files found. Add audio files to: {}", dirs.join("  ")),
            Color::Gray,
        );
    }
    (String::new(), Color::Gray)
}

pub fn render_status_bar(f: &mut Frame<'_>, area: Rect, player: &Player, library_root: &Path) {
    let (text, color) = status_line(player, library_root);
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        " Ambient Mixer ",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
