// src/ui/widgets/mod.rs
//! Custom widgets for the mixer UI.

pub mod channel_panel;
pub mod status_bar;
pub mod track_list;
pub mod transport;

// Re-export widget rendering functions
pub use channel_panel::render_channel_panel;
pub use status_bar::render_status_bar;
pub use track_list::render_track_list;
pub use transport::{render_help, render_transport};
