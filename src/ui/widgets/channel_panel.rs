// src/ui/widgets/channel_panel.rs
//! One channel's panel: track selector, volume slider and progress bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use super::track_list::render_track_list;
use crate::catalog::ChannelKind;
use crate::player::Channel;
use crate::ui::icons::{icon_for_channel, icon_for_state, LOOP_ICON};

/// `mm:ss`, or `--:--` for an unknown length.
pub fn format_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s.is_finite() => {
            let total = s.max(0.0) as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        _ => "--:--".to_string(),
    }
}

/// Render the panel for `channel`.
pub fn render_channel_panel(f: &mut Frame<'_>, area: Rect, channel: &Channel, focused: bool) {
    let number = match channel.kind() {
        ChannelKind::Music => 1,
        ChannelKind::Binaural => 2,
    };
    let mut title = vec![Span::raw(format!(
        "{}: {} {} {}",
        number,
        icon_for_channel(channel.kind()),
        channel.kind().label(),
        icon_for_state(channel.state()),
    ))];
    if channel.is_looping() {
        title.push(Span::raw(format!(" {LOOP_ICON}")));
    }
    if !channel.is_enabled() {
        title.push(Span::styled(
            " (No tracks available)",
            Style::default().fg(Color::Red),
        ));
    }

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::from(title)),
        area,
    );

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_track_list(f, inner[0], channel, focused);

    // Volume slider
    let volume_color = if channel.is_enabled() {
        Color::Green
    } else {
        Color::DarkGray
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(volume_color))
            .percent(u16::from(channel.volume()))
            .label(format!("Volume: {}%", channel.volume())),
        inner[1],
    );

    // Progress bar with time display
    let time_label = format!(
        "{} / {}",
        format_time(Some(channel.current_time())),
        format_time(channel.duration())
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(channel.progress_percent() / 100.0)
            .label(time_label),
        inner[2],
    );
}
