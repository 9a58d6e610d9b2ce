//! Common test utilities shared across integration tests

pub mod fake;
pub mod fixture;

pub use fake::{FakeBackend, FakeTerminal};
pub use fixture::TestFixture;

use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stagehand::git::Backend;
use stagehand::model::{File, PanelKind};
use stagehand::{App, Config};

/// Config with the periodic refresh pushed out of the way
pub fn quiet_config() -> Config {
    Config {
        refresh_interval_ms: 3_600_000,
        ..Config::default()
    }
}

/// App over `backend` with its startup refresh applied
pub fn settled_app(backend: &Arc<FakeBackend>) -> Result<App, Box<dyn std::error::Error>> {
    let mut app = App::new(quiet_config(), Arc::clone(backend) as Arc<dyn Backend>);
    settle(&mut app)?;
    Ok(app)
}

/// Tick until nothing is in flight
pub fn settle(app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    let done = tick_until(app, |app| {
        PanelKind::ALL
            .iter()
            .all(|kind| !app.refresh.in_flight(stagehand::app::Target::Panel(*kind)))
            && !app.refresh.in_flight(stagehand::app::Target::Main)
    });
    if done {
        Ok(())
    } else {
        Err("refreshes never settled".into())
    }
}

/// Tick `app` until `condition` holds, giving up after two seconds
pub fn tick_until(app: &mut App, condition: impl Fn(&App) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        app.tick();
        if condition(app) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Wait for a condition that does not involve the app
pub fn wait_for(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !condition() {
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    true
}

/// Plain key press
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Plain character key press
pub fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

/// Press each character of `text`
pub fn type_text(app: &mut App, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    for c in text.chars() {
        app.handle_key(char_key(c))?;
    }
    Ok(())
}

/// A modified tracked file with only unstaged changes
pub fn modified(name: &str) -> File {
    File {
        name: name.to_string(),
        short_status: " M".to_string(),
        tracked: true,
        has_unstaged_changes: true,
        ..File::default()
    }
}

/// A staged tracked file
pub fn staged(name: &str) -> File {
    File {
        name: name.to_string(),
        short_status: "M ".to_string(),
        tracked: true,
        has_staged_changes: true,
        ..File::default()
    }
}

/// An untracked file
pub fn untracked(name: &str) -> File {
    File {
        name: name.to_string(),
        short_status: "??".to_string(),
        has_unstaged_changes: true,
        ..File::default()
    }
}

/// Names of the files panel, in display order
pub fn file_names(app: &App) -> Vec<String> {
    app.store
        .files
        .items()
        .iter()
        .map(|file| file.name.clone())
        .collect()
}
