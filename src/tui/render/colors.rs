//! Color palette for the TUI
//!
//! Muted chrome colours; item colours come from the model itself.

use ratatui::style::Color;

// UI Chrome
/// `BORDER` palette colour.
pub const BORDER: Color = Color::Rgb(100, 110, 130);
/// `SELECTED` palette colour.
pub const SELECTED: Color = Color::Rgb(100, 180, 220);
/// `SURFACE_HIGHLIGHT` palette colour.
pub const SURFACE_HIGHLIGHT: Color = Color::Rgb(50, 55, 70);

// Text
/// `TEXT_PRIMARY` palette colour.
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 230);
/// `TEXT_DIM` palette colour.
pub const TEXT_DIM: Color = Color::Rgb(130, 135, 150);
/// `TEXT_MUTED` palette colour.
pub const TEXT_MUTED: Color = Color::Rgb(90, 95, 110);

// Status bar
/// `STATUS_MESSAGE` palette colour.
pub const STATUS_MESSAGE: Color = Color::Rgb(200, 180, 100);
/// `MERGING` palette colour.
pub const MERGING: Color = Color::Rgb(200, 100, 100);

// Modals
/// `MODAL_BG` palette colour.
pub const MODAL_BG: Color = Color::Rgb(25, 27, 35);
/// `MODAL_BORDER` palette colour.
pub const MODAL_BORDER: Color = Color::Rgb(100, 140, 200);
/// `MODAL_BORDER_WARNING` palette colour.
pub const MODAL_BORDER_WARNING: Color = Color::Rgb(200, 160, 80);
/// `MODAL_BORDER_ERROR` palette colour.
pub const MODAL_BORDER_ERROR: Color = Color::Rgb(200, 100, 100);
/// `INPUT_BG` palette colour.
pub const INPUT_BG: Color = Color::Rgb(35, 40, 50);

// Accent (for confirmations)
/// `ACCENT_POSITIVE` palette colour.
pub const ACCENT_POSITIVE: Color = Color::Rgb(120, 180, 120);
/// `ACCENT_NEGATIVE` palette colour.
pub const ACCENT_NEGATIVE: Color = Color::Rgb(200, 100, 100);
/// `ACCENT_WARNING` palette colour.
pub const ACCENT_WARNING: Color = Color::Rgb(200, 160, 80);
