//! Message overlay rendering (help, progress notes)

use ratatui::{
    Frame,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect_absolute;
use crate::tui::render::colors;

/// Render an informational overlay dismissed by any key
pub fn render_message_overlay(frame: &mut Frame<'_>, title: &str, content: &str) {
    let mut lines: Vec<Line<'_>> = content
        .lines()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors::TEXT_PRIMARY))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    // Height: content lines + 2 for borders, capped to the screen
    let max_height = frame.area().height.saturating_sub(2);
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(max_height);
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
