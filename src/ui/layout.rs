// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computed layout areas for rendering.
pub struct ComputedLayout {
    /// Title and status line
    pub status: Rect,
    /// Music panel, then binaural panel
    pub channels: [Rect; 2],
    /// Play/pause button row
    pub transport: Rect,
    /// Key help (if visible)
    pub help: Option<Rect>,
}

/// Compute the layout based on total area and whether help is shown.
pub fn compute_layout(area: Rect, show_help: bool) -> ComputedLayout {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Min(6),
        Constraint::Length(3),
    ];
    if show_help {
        constraints.push(Constraint::Length(3));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    ComputedLayout {
        status: rows[0],
        channels: [rows[1], rows[2]],
        transport: rows[3],
        help: show_help.then(|| rows[4]),
    }
}
