// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::catalog::ChannelKind;

/// Map digit keys to the channel they focus.
pub fn map_key_to_channel(k: &KeyEvent) -> Option<ChannelKind> {
    match k.code {
        KeyCode::Char('1') => Some(ChannelKind::Music),
        KeyCode::Char('2') => Some(ChannelKind::Binaural),
        _ => None,
    }
}

/// Actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixerAction {
    /// Select the previous (-1) or next (+1) track of the focused channel.
    StepTrack(isize),
    /// Lower (-1) or raise (+1) the focused channel's volume by one step.
    StepVolume(i8),
    /// Seek the focused channel back (-1) or forward (+1) by one step.
    StepSeek(i8),
    Focus(ChannelKind),
    FocusNext,
    TogglePlayback,
    ToggleLoop,
    ToggleHelp,
    Quit,
    None,
}

/// Convert a key event to a mixer action.
pub fn key_to_action(key: &KeyEvent) -> MixerAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return MixerAction::Quit;
    }
    if let Some(kind) = map_key_to_channel(key) {
        return MixerAction::Focus(kind);
    }

    match key.code {
        KeyCode::Up => MixerAction::StepTrack(-1),
        KeyCode::Down => MixerAction::StepTrack(1),
        KeyCode::Left => MixerAction::StepVolume(-1),
        KeyCode::Right => MixerAction::StepVolume(1),
        KeyCode::Char('[') => MixerAction::StepSeek(-1),
        KeyCode::Char(']') => MixerAction::StepSeek(1),
        KeyCode::Tab | KeyCode::BackTab => MixerAction::FocusNext,
        KeyCode::Char(' ') => MixerAction::TogglePlayback,
        KeyCode::Char('l') => MixerAction::ToggleLoop,
        KeyCode::Char('?') => MixerAction::ToggleHelp,
        KeyCode::Char('q') | KeyCode::Esc => MixerAction::Quit,
        _ => MixerAction::None,
    }
}
