//! Terminal User Interface for Stagehand

pub mod render;

use crate::app::{App, Event, Handler, TerminalControl};
use anyhow::Result;
use ratatui::crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

type Term = Terminal<CrosstermBackend<Stdout>>;

impl TerminalControl for Term {
    fn release(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.backend_mut(), LeaveAlternateScreen)?;
        self.show_cursor()?;
        Ok(())
    }

    fn reclaim(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(self.backend_mut(), EnterAlternateScreen)?;
        self.hide_cursor()?;
        self.clear()?;
        Ok(())
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or restored, or if a
/// handler reports a fatal error
pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = Handler::new(app.config.tick_rate_ms);

    let result = run_loop(&mut terminal, &mut app, &event_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Term, app: &mut App, event_handler: &Handler) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| render::render(frame, app))?;

        match event_handler.next()? {
            Event::Key(key) => app.handle_key(key)?,
            Event::Tick | Event::Resize(_, _) => {}
        }

        if app.handoff.is_active() {
            app.run_handoff(terminal)?;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
