//! Lending the terminal to interactive programs

use std::sync::Arc;
use std::time::Duration;

use crate::common::{
    FakeBackend, FakeTerminal, char_key, modified, settled_app, tick_until, wait_for,
};
use pretty_assertions::assert_eq;
use stagehand::app::{ActionError, Focus, HandoffError, KeyContext, OverlayKind, Target};
use stagehand::git::Interactive;
use stagehand::model::{Branch, PanelKind, Snapshot};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn generations(app: &stagehand::App) -> Vec<u64> {
    PanelKind::ALL
        .iter()
        .map(|kind| app.refresh.requested_generation(Target::Panel(*kind)))
        .collect()
}

#[test]
fn test_refresh_waits_for_reclaim_and_exit_refreshes_everything() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    let mut app = settled_app(&backend)?;

    let branches = Snapshot::Branches(vec![Branch {
        name: "master".to_string(),
        is_head: true,
        ..Branch::default()
    }]);
    backend.set(branches.clone());
    let gate = backend.script_gated(PanelKind::Branches, Ok(branches));
    let started = backend.queries_started();
    app.refresh.request(PanelKind::Branches);
    assert!(wait_for(|| backend.queries_started() == started + 1));

    app.handle_key(char_key('e'))?;
    assert!(app.handoff.is_active());
    assert_eq!(
        app.focus.state(),
        Focus::SubProcess {
            return_to: PanelKind::Files
        }
    );
    assert_eq!(app.focus.context(), KeyContext::Suspended);

    // The query finishes while the child owns the terminal
    let finished = backend.queries_finished();
    gate.send(())?;
    assert!(wait_for(|| backend.queries_finished() == finished + 1));
    for _ in 0..10 {
        app.tick();
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(app.store.branches.is_empty());

    let before = generations(&app);
    let mut terminal = FakeTerminal::default();
    app.run_handoff(&mut terminal)?;

    assert_eq!(terminal.calls, vec!["release", "reclaim"]);
    assert!(!app.handoff.is_active());
    assert_eq!(app.focus.state(), Focus::Panel(PanelKind::Files));
    let after = generations(&app);
    assert!(before.iter().zip(&after).all(|(b, a)| a == &(b + 1)));

    assert!(tick_until(&mut app, |app| app.store.branches.len() == 1));
    assert_eq!(
        backend.interactive_requests(),
        vec![Interactive::Edit {
            name: "a.txt".to_string()
        }]
    );
    Ok(())
}

#[test]
fn test_keys_are_ignored_while_suspended() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('e'))?;
    app.handle_key(char_key('q'))?;

    assert!(!app.should_quit);
    assert_eq!(backend.interactive_requests().len(), 1);
    Ok(())
}

#[test]
fn test_second_start_is_busy_and_keeps_handle() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('e'))?;
    let active = app.handoff.active().cloned();

    let result = app.start_interactive(&Interactive::CommitEditor);

    assert!(matches!(
        result,
        Err(ActionError::Handoff(HandoffError::Busy(_)))
    ));
    assert_eq!(app.handoff.active().cloned(), active);

    app.guard(|app| app.start_interactive(&Interactive::CommitEditor))?;
    assert_eq!(app.store.status(), Some("`true` is still running"));
    assert!(app.overlays.is_empty());
    Ok(())
}

#[test]
fn test_non_zero_exit_is_reported_inline() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    backend.set_program("false");
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('e'))?;
    app.run_handoff(&mut FakeTerminal::default())?;

    let status = app.store.status().ok_or("no status")?;
    assert!(status.starts_with("`false` exited with"));
    assert!(app.overlays.is_empty());
    Ok(())
}

#[test]
fn test_spawn_failure_opens_error_overlay() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    backend.set_program("stagehand-test-no-such-program");
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('e'))?;
    let mut terminal = FakeTerminal::default();
    app.run_handoff(&mut terminal)?;

    assert_eq!(terminal.calls, vec!["release", "reclaim"]);
    assert_eq!(app.overlays.top().map(|o| o.kind), Some(OverlayKind::Error));
    assert_eq!(
        app.focus.state(),
        Focus::Overlay {
            return_to: PanelKind::Files
        }
    );
    Ok(())
}

#[test]
fn test_reclaim_failure_is_fatal() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![modified("a.txt")]);
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('e'))?;
    let mut terminal = FakeTerminal {
        fail_reclaim: true,
        ..FakeTerminal::default()
    };

    let result = app.run_handoff(&mut terminal);
    assert!(matches!(result, Err(ActionError::Fatal(_))));
    Ok(())
}

#[test]
fn test_add_patch_refuses_untracked_file() -> TestResult {
    let backend = Arc::new(FakeBackend::new());
    backend.set_files(vec![crate::common::untracked("new.txt")]);
    let mut app = settled_app(&backend)?;

    app.handle_key(char_key('t'))?;

    assert!(!app.handoff.is_active());
    assert_eq!(
        app.store.status(),
        Some("Cannot git add --patch untracked files")
    );
    Ok(())
}
