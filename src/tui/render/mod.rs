//! TUI rendering
//!
//! This module contains all rendering logic for the TUI, organized into:
//! - `colors`: Color palette definitions
//! - `main_layout`: Panel column, main view, status bar
//! - `modals`: Overlay rendering

pub mod colors;
pub mod main_layout;
pub mod modals;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Render the full application UI
pub fn render(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    main_layout::render_main(frame, app, chunks[0]);
    main_layout::render_status_bar(frame, app, chunks[1]);

    for overlay in app.overlays.iter() {
        modals::render_overlay(frame, overlay);
    }
}
