//! Rendering through ratatui's `TestBackend`

use std::sync::Arc;

use crate::common::{FakeBackend, char_key, modified, settled_app, staged, type_text};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use stagehand::App;
use stagehand::app::{Overlay, Resolution};
use stagehand::tui::render;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn draw(app: &App) -> Result<Buffer, Box<dyn std::error::Error>> {
    let backend = TestBackend::new(100, 40);
    let mut terminal = Terminal::new(backend)?;
    terminal.draw(|frame| render::render(frame, app))?;
    Ok(terminal.backend().buffer().clone())
}

fn screen(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_panels_and_counts_are_drawn() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("src/lib.rs"), staged("Cargo.toml")]);
    let app = settled_app(&backend)?;

    let text = screen(&draw(&app)?);

    assert!(text.contains("Files 1/2"));
    for title in ["Branches", "Commits", "Stash", "Remotes"] {
        assert!(text.contains(title), "missing {title} panel");
    }
    assert!(text.contains("src/lib.rs"));
    assert!(text.contains("Cargo.toml"));
    Ok(())
}

#[test]
fn test_status_line_shows_hints_then_message() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    let mut app = settled_app(&backend)?;

    let text = screen(&draw(&app)?);
    assert!(text.contains("toggle staged"));

    app.handle_key(char_key('P'))?;
    let text = screen(&draw(&app)?);
    assert!(text.contains("Not on a branch"));
    assert!(!text.contains("toggle staged"));
    Ok(())
}

#[test]
fn test_empty_panel_placeholder_in_main_view() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    let app = settled_app(&backend)?;

    let text = screen(&draw(&app)?);
    assert!(text.contains("No changed files"));
    Ok(())
}

#[test]
fn test_confirmation_shows_both_answers() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    let mut app = settled_app(&backend)?;

    app.open(
        Overlay::confirm(
            "Discard changes",
            "Discard all changes to a.txt, or only the unstaged ones?",
            Resolution::ResetHard,
        )
        .with_secondary(
            "unstaged only",
            Resolution::DiscardUnstaged {
                name: "a.txt".to_string(),
            },
        ),
    )?;

    let text = screen(&draw(&app)?);
    assert!(text.contains("Discard changes"));
    assert!(text.contains("[Y] all"));
    assert!(text.contains("[N] unstaged only"));
    assert!(text.contains("[Esc] cancel"));
    Ok(())
}

#[test]
fn test_prompt_shows_typed_input() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![staged("a.txt")]);
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('c'))?;
    type_text(&mut app, "Fix typo")?;

    let text = screen(&draw(&app)?);
    assert!(text.contains("Commit message"));
    assert!(text.contains("Fix typo"));
    Ok(())
}

#[test]
fn test_error_overlay_is_drawn_on_top() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    let mut app = settled_app(&backend)?;

    app.overlays.push_error("git push failed: rejected");
    app.sync();

    let text = screen(&draw(&app)?);
    assert!(text.contains("git push failed: rejected"));
    assert!(text.contains("Press any key to dismiss"));
    Ok(())
}

#[test]
fn test_merge_marker_in_status_line() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    let mut app = settled_app(&backend)?;

    app.store.set_merge_conflicts(true);
    let text = screen(&draw(&app)?);
    assert!(text.contains("MERGING"));
    Ok(())
}
