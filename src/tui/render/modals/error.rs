//! Error modal rendering

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect_absolute;
use crate::tui::render::colors;

/// Widest line before wrapping, inside the borders
const MAX_LINE_WIDTH: usize = 56;

/// Word-wrap each line of `message` to [`MAX_LINE_WIDTH`] characters
///
/// Words longer than a whole line, such as deep paths, are split.
fn wrap_message(message: &str) -> Vec<String> {
    let mut out = Vec::new();
    for raw in message.lines() {
        let mut current = String::new();
        let mut width = 0;
        for piece in raw.split_whitespace().flat_map(split_long_word) {
            let piece_width = piece.chars().count();
            if current.is_empty() {
                current = piece;
                width = piece_width;
            } else if width + 1 + piece_width <= MAX_LINE_WIDTH {
                current.push(' ');
                current.push_str(&piece);
                width += 1 + piece_width;
            } else {
                out.push(std::mem::take(&mut current));
                current = piece;
                width = piece_width;
            }
        }
        out.push(current);
    }
    out
}

fn split_long_word(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(MAX_LINE_WIDTH)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Render an error modal dismissed by any key
pub fn render_error_modal(frame: &mut Frame<'_>, message: &str) {
    let mut lines: Vec<Line<'_>> = vec![
        Line::from(Span::styled(
            "✖ Error",
            Style::default()
                .fg(colors::MODAL_BORDER_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(wrap_message(message).into_iter().map(|line| {
        Line::from(Span::styled(line, Style::default().fg(colors::TEXT_PRIMARY)))
    }));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to dismiss",
        Style::default().fg(colors::TEXT_MUTED),
    )));

    // Height: content lines + 2 for borders, min 7 lines
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX).max(7);
    let area = centered_rect_absolute(60, height, frame.area());

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::MODAL_BORDER_ERROR)),
        )
        .style(Style::default().bg(colors::MODAL_BG))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
