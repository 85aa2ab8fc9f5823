// src/ui/icons.rs
//! Icon mappings for channels and playback state.

use crate::catalog::ChannelKind;
use crate::player::PlaybackState;

/// Nerd-font glyph shown in a channel panel's title.
pub fn icon_for_channel(kind: ChannelKind) -> &'static str {
    match kind {
        ChannelKind::Music => "\u{f001}",    // music note
        ChannelKind::Binaural => "\u{f025}", // headphones
    }
}

/// Shown next to the state icon while tracks loop.
pub const LOOP_ICON: &str = "⟳";

pub fn icon_for_state(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "⏵",
        PlaybackState::Stopped => "⏸",
    }
}
