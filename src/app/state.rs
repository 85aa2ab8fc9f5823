// src/app/state.rs
//! Application state management.

use std::{
    sync::{
        mpsc::{Receiver, Sender},
        Arc,
    },
    thread,
};

use crossterm::event::KeyEvent;
use ratatui::Frame;
use tracing::debug;

use crate::{
    audio::MediaBackend,
    catalog::{Catalog, CatalogError, CatalogProvider, ChannelKind},
    config::Config,
    player::{Player, MAX_VOLUME},
    ui::{
        keybindings::{key_to_action, MixerAction},
        layout::compute_layout,
        widgets::{render_channel_panel, render_help, render_status_bar, render_transport},
    },
};

type CatalogResult = Result<Catalog, CatalogError>;

/// Main application state.
pub struct App {
    pub config: Config,
    /// The dual-channel player
    pub player: Player,
    /// Channel that track, volume and seek keys act on
    pub focus: ChannelKind,
    /// Whether the key help row is visible
    pub show_help: bool,

    /// Catalog channel receiver (background loader -> UI)
    catalog_rx: Receiver<CatalogResult>,
}

impl App {
    /// Create the app and start loading the catalog configured in `config`.
    pub fn new(config: Config, backend: Arc<dyn MediaBackend>) -> Self {
        let provider = config.catalog_provider();
        Self::with_provider(config, backend, provider)
    }

    /// Create the app, loading the catalog from `provider` on a background thread.
    pub fn with_provider(
        config: Config,
        backend: Arc<dyn MediaBackend>,
        provider: Box<dyn CatalogProvider + Send>,
    ) -> Self {
        let (catalog_tx, catalog_rx): (Sender<CatalogResult>, _) = std::sync::mpsc::channel();

        let mut player = Player::new(backend);
        player.set_looping(config.looping);
        player.begin_loading();
        thread::spawn(move || {
            let _ = catalog_tx.send(provider.load());
        });

        Self {
            config,
            player,
            focus: ChannelKind::Music,
            show_help: true,
            catalog_rx,
        }
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            MixerAction::StepTrack(step) => {
                let next = self
                    .player
                    .channel(self.focus)
                    .adjacent_track_id(step)
                    .map(str::to_string);
                if let Some(id) = next {
                    let _ = self.player.select_channel_track(self.focus, &id);
                }
            }
            MixerAction::StepVolume(direction) => {
                let current = self.player.channel(self.focus).volume();
                let step = self.config.volume_step;
                let volume = if direction < 0 {
                    current.saturating_sub(step)
                } else {
                    current.saturating_add(step).min(MAX_VOLUME)
                };
                let _ = self.player.set_channel_volume(self.focus, volume);
            }
            MixerAction::StepSeek(direction) => {
                let target = self.player.channel(self.focus).current_time()
                    + f64::from(direction) * self.config.seek_step_secs;
                let _ = self.player.seek_channel(self.focus, target);
            }
            MixerAction::Focus(kind) => self.focus = kind,
            MixerAction::FocusNext => self.focus = self.focus.other(),
            MixerAction::TogglePlayback => {
                let _ = self.player.toggle_play_pause();
            }
            MixerAction::ToggleLoop => {
                let looping = !self.player.is_looping();
                self.player.set_looping(looping);
            }
            MixerAction::ToggleHelp => self.show_help = !self.show_help,
            MixerAction::Quit => {
                self.player.shutdown();
                return true; // Signal to quit
            }
            MixerAction::None => {}
        }
        false
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area(), self.show_help);

        render_status_bar(f, layout.status, &self.player, &self.config.library_root);
        for (area, kind) in layout.channels.iter().zip(ChannelKind::ALL) {
            render_channel_panel(f, *area, self.player.channel(kind), kind == self.focus);
        }
        render_transport(f, layout.transport, &self.player);
        if let Some(help) = layout.help {
            render_help(f, help);
        }
    }

    /// Hand the catalog to the player once the background loader is done.
    /// Returns true when a catalog (or its failure) was applied.
    pub fn process_catalog(&mut self) -> bool {
        match self.catalog_rx.try_recv() {
            Ok(fetched) => {
                debug!("catalog fetch finished");
                let _ = self.player.apply_catalog(fetched);
                true
            }
            Err(_) => false,
        }
    }

    /// Periodic update: pending catalog, then media events.
    pub fn tick(&mut self) {
        self.process_catalog();
        self.player.tick();
    }
}
