// src/ui/tui.rs
//! Terminal setup and the main event loop.

use std::{io, sync::Arc, time::Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::{app::App, audio::RodioBackend, config::Config};

/// Run the mixer until the user quits, restoring the terminal on the way out.
pub fn run(config: Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: Config) -> Result<()> {
    let media = Arc::new(RodioBackend::new(config.library_root.clone()));
    let tick_rate = config.tick_rate();
    let mut app = App::new(config, media);
    let mut last_tick = Instant::now();
    info!("mixer started");

    loop {
        terminal.draw(|f| app.draw(f))?;
        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key) {
                    info!("mixer stopped");
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick();
        }
    }
}
