//! Confirmation modal rendering

use crate::app::Overlay;
use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{centered_rect_absolute, wrapped_rows};
use crate::tui::render::colors;

fn key(label: &'static str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Render a confirmation overlay with yes/no buttons
///
/// A confirmation with a secondary answer shows it on `N` and adds an
/// explicit cancel button.
pub fn render_confirm_overlay(frame: &mut Frame<'_>, overlay: &Overlay) {
    let mut lines: Vec<Line<'_>> = overlay
        .content
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors::TEXT_PRIMARY))))
        .collect();

    lines.push(Line::from(""));
    let text = Style::default().fg(colors::TEXT_PRIMARY);
    lines.push(match &overlay.secondary_label {
        Some(label) => Line::from(vec![
            key("[Y]", colors::ACCENT_POSITIVE),
            Span::styled(" all  ", text),
            key("[N]", colors::ACCENT_WARNING),
            Span::styled(format!(" {label}  "), text),
            key("[Esc]", colors::ACCENT_NEGATIVE),
            Span::styled(" cancel", text),
        ]),
        None => Line::from(vec![
            key("[Y]", colors::ACCENT_POSITIVE),
            Span::styled("es  ", text),
            key("[N]", colors::ACCENT_NEGATIVE),
            Span::styled("o", text),
        ]),
    });

    // Height: wrapped content rows + 2 for borders
    let inner_width = (frame.area().width / 2).saturating_sub(2);
    let height = wrapped_rows(&lines, inner_width).saturating_add(2);
    let area = centered_rect_absolute(50, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", overlay.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER_WARNING)),
        )
        .style(Style::default().bg(colors::MODAL_BG))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
