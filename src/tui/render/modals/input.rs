//! Input modal rendering

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect_absolute;
use crate::tui::render::colors;

/// Render a single-line text input overlay
pub fn render_input_overlay(frame: &mut Frame<'_>, title: &str, prompt: &str, input: &str) {
    let mut lines: Vec<Line<'_>> = Vec::new();
    if !prompt.is_empty() {
        lines.push(Line::from(Span::styled(
            prompt,
            Style::default().fg(colors::TEXT_PRIMARY),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("{input}│"),
        Style::default()
            .fg(colors::TEXT_PRIMARY)
            .bg(colors::INPUT_BG)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter: submit | Esc: cancel",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = centered_rect_absolute(60, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER)),
        )
        .style(Style::default().bg(colors::MODAL_BG));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
