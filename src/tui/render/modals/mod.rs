//! Modal rendering utilities and implementations
//!
//! One render function per overlay kind. Overlays are drawn bottom to top so
//! the one receiving input is always the visible one.

mod confirm;
mod error;
mod help;
mod input;

pub use confirm::render_confirm_overlay;
pub use error::render_error_modal;
pub use help::render_message_overlay;
pub use input::render_input_overlay;

use crate::app::{Overlay, OverlayKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;

/// Create a centered rect with percentage width and absolute height
#[must_use]
pub fn centered_rect_absolute(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical_padding = area.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(vertical_padding),
            Constraint::Length(height),
            Constraint::Length(vertical_padding),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rows `lines` occupy once wrapped to `width` columns
fn wrapped_rows(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Render one overlay
pub fn render_overlay(frame: &mut Frame<'_>, overlay: &Overlay) {
    match overlay.kind {
        OverlayKind::Confirmation => render_confirm_overlay(frame, overlay),
        OverlayKind::Prompt => render_input_overlay(
            frame,
            &overlay.title,
            &overlay.content,
            overlay.input.as_deref().unwrap_or_default(),
        ),
        OverlayKind::Message => render_message_overlay(frame, &overlay.title, &overlay.content),
        OverlayKind::Error => render_error_modal(frame, &overlay.content),
    }
}
