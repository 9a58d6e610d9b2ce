//! Main layout rendering: panel column, main view, status bar

use crate::app::App;
use crate::model::PanelKind;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::colors;

/// Render the panel column and the main view
pub fn render_main(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    render_panels(frame, app, chunks[0]);
    render_main_view(frame, app, chunks[1]);
}

/// Render every panel in focus order, the files panel getting extra room
pub fn render_panels(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let order = app.focus.order();
    let constraints: Vec<Constraint> = order
        .iter()
        .map(|kind| {
            if *kind == PanelKind::Files {
                Constraint::Fill(2)
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (kind, chunk) in order.iter().zip(chunks.iter()) {
        render_panel(frame, app, *kind, *chunk);
    }
}

fn render_panel(frame: &mut Frame<'_>, app: &App, kind: PanelKind, area: Rect) {
    let panel = app.store.panel(kind);
    let focused = app.focused_panel() == kind;

    let border_color = if focused {
        colors::SELECTED
    } else {
        colors::BORDER
    };
    let title = if panel.is_empty() {
        format!(" {kind} ")
    } else {
        format!(" {kind} {}/{} ", panel.cursor() + 1, panel.len())
    };

    let items: Vec<ListItem<'_>> = panel.render_lines().into_iter().map(ListItem::new).collect();
    let highlight = if focused {
        Style::default()
            .bg(colors::SURFACE_HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(highlight);

    let mut state = ListState::default();
    if !panel.is_empty() {
        state.select(Some(panel.cursor()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render the diff / detail pane
pub fn render_main_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let main = app.store.main();
    let paragraph = Paragraph::new(main.text.clone())
        .block(
            Block::default()
                .title(format!(" {} ", main.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::BORDER)),
        )
        .scroll((main.scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Render the bottom line: status message if any, otherwise the hints
pub fn render_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if app.store.has_merge_conflicts() {
        spans.push(Span::styled(
            "MERGING ",
            Style::default()
                .fg(colors::MERGING)
                .add_modifier(Modifier::BOLD),
        ));
    }
    match app.store.status() {
        Some(message) => spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(colors::STATUS_MESSAGE),
        )),
        None => spans.push(Span::styled(
            app.hints.render(),
            Style::default().fg(colors::TEXT_DIM),
        )),
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
