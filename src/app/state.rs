//! The application context object
//!
//! [`App`] owns every piece of mutable state and is passed by `&mut` to each
//! handler. Only the main loop holds it; background threads talk to it
//! through the refresh channel.

use crate::config::Config;
use crate::git::{Backend, Interactive, Operation};
use crate::model::PanelKind;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{ActionError, ActionResult};
use super::focus::{Focus, FocusManager, KeyContext};
use super::handlers::Actions;
use super::handoff::{Handoff, HandoffError, TerminalControl};
use super::overlay::{Choice, Overlay, OverlayKind, OverlayStack};
use super::panel::HintBar;
use super::refresh::{RefreshCoordinator, RefreshEvent, Target, TaskTag};
use super::store::{MainView, Store};

/// Lines scrolled by one main view scroll action
const SCROLL_STEP: i32 = 10;

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,
    /// Panel data and the main view
    pub store: Store,
    /// Open overlays
    pub overlays: OverlayStack,
    /// Input routing
    pub focus: FocusManager,
    /// Background queries
    pub refresh: RefreshCoordinator,
    /// Interactive child process
    pub handoff: Handoff,
    /// Option hints for the focused panel
    pub hints: HintBar,
    /// Whether the application should quit
    pub should_quit: bool,
    backend: Arc<dyn Backend>,
    main_for: Option<(PanelKind, Option<String>)>,
    last_periodic: Instant,
}

impl App {
    /// Create the app and request the first snapshot of every panel
    #[must_use]
    pub fn new(config: Config, backend: Arc<dyn Backend>) -> Self {
        let focus = FocusManager::new(config.panels.clone());
        let mut app = Self {
            store: Store::new(),
            overlays: OverlayStack::new(),
            focus,
            refresh: RefreshCoordinator::new(Arc::clone(&backend)),
            handoff: Handoff::new(),
            hints: HintBar::default(),
            should_quit: false,
            backend,
            main_for: None,
            last_periodic: Instant::now(),
            config,
        };
        app.refresh_all();
        app.sync();
        app
    }

    /// The repository backend
    #[must_use]
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Focused panel (or the one focus returns to)
    #[must_use]
    pub const fn focused_panel(&self) -> PanelKind {
        self.focus.panel()
    }

    /// Re-query every visible panel
    pub fn refresh_all(&mut self) {
        self.refresh.request_all(self.focus.order());
    }

    /// Apply finished background work; call once per loop iteration before
    /// drawing
    ///
    /// Does nothing while a child process owns the terminal.
    pub fn tick(&mut self) {
        if matches!(self.focus.state(), Focus::SubProcess { .. }) {
            return;
        }

        let report = self.refresh.drain(&mut self.store);
        if report.discarded > 0 {
            tracing::debug!(discarded = report.discarded, "Dropped stale results");
        }
        if report.applied.contains(&self.focused_panel()) {
            self.main_for = None;
        }
        for event in report.events {
            match event {
                RefreshEvent::Failed(message) => {
                    self.overlays.push_error(message);
                }
                RefreshEvent::TaskDone {
                    tag,
                    error,
                    then_refresh,
                } => {
                    self.overlays.close_task(tag);
                    match error {
                        Some(message) => {
                            self.overlays.push_error(message);
                        }
                        None => self.store.set_status(format!("{} finished", tag.title())),
                    }
                    if then_refresh {
                        self.refresh_all();
                    }
                }
            }
        }

        let interval = Duration::from_millis(self.config.refresh_interval_ms);
        if self.last_periodic.elapsed() >= interval {
            self.last_periodic = Instant::now();
            if !self.refresh.in_flight(Target::Panel(PanelKind::Files)) {
                self.refresh.request(PanelKind::Files);
            }
        }

        self.sync();
    }

    /// Route one key press
    ///
    /// # Errors
    ///
    /// Returns only [`ActionError::Fatal`]; every other failure is shown to the
    /// user.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), ActionError> {
        let result = match self.focus.context() {
            KeyContext::Suspended => Ok(()),
            KeyContext::Overlay => self.handle_overlay_key(key),
            KeyContext::Panel(panel) => {
                self.store.clear_status();
                match self
                    .config
                    .keys
                    .action_for(panel, key.code, key.modifiers)
                {
                    Some(action) => self.guard(|app| Actions::new().handle_action(app, action)),
                    None => Ok(()),
                }
            }
        };
        self.sync();
        result
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Result<(), ActionError> {
        let Some(kind) = self.overlays.top().map(|overlay| overlay.kind) else {
            return Ok(());
        };

        let choice = match kind {
            OverlayKind::Confirmation => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Choice::Confirm,
                KeyCode::Char('n' | 'N') => Choice::Secondary,
                KeyCode::Esc => Choice::Cancel,
                _ => return Ok(()),
            },
            OverlayKind::Prompt => match key.code {
                KeyCode::Enter => Choice::Confirm,
                KeyCode::Esc => Choice::Cancel,
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Some(input) = self.overlays.top_mut().and_then(|o| o.input.as_mut()) {
                        input.push(c);
                    }
                    return Ok(());
                }
                KeyCode::Backspace => {
                    if let Some(input) = self.overlays.top_mut().and_then(|o| o.input.as_mut()) {
                        input.pop();
                    }
                    return Ok(());
                }
                _ => return Ok(()),
            },
            OverlayKind::Message | OverlayKind::Error => Choice::Cancel,
        };

        let resolved = self.overlays.resolve(choice);
        self.sync_focus();
        match resolved {
            Some(resolved) => self.guard(|app| Actions::new().resolve(app, resolved)),
            None => Ok(()),
        }
    }

    /// Run a handler inside the recovery boundary
    ///
    /// Input errors become the inline status message, backend failures become
    /// an error overlay. Only [`ActionError::Fatal`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Fatal`] if the handler reported one
    pub fn guard<F>(&mut self, handler: F) -> Result<(), ActionError>
    where
        F: FnOnce(&mut Self) -> ActionResult,
    {
        match handler(self) {
            Ok(()) => Ok(()),
            Err(ActionError::UserInput(message)) => {
                self.store.set_status(message);
                Ok(())
            }
            Err(e @ ActionError::Handoff(_)) => {
                self.store.set_status(e.to_string());
                Ok(())
            }
            Err(ActionError::Recoverable(e)) => {
                tracing::warn!("Action failed: {e:#}");
                self.overlays.push_error(format!("{e:#}"));
                Ok(())
            }
            Err(fatal @ ActionError::Fatal(_)) => {
                tracing::error!("{fatal}");
                Err(fatal)
            }
        }
    }

    /// Open an overlay and move focus to it
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UserInput`] if a dialog is already open
    pub fn open(&mut self, overlay: Overlay) -> ActionResult {
        self.overlays.push(overlay)?;
        self.sync_focus();
        Ok(())
    }

    /// Run a state-changing command on the main loop, then re-query `kinds`
    ///
    /// The re-query happens even if the command failed, since a failed command
    /// may still have changed the repository (a merge stopping on conflicts).
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Recoverable`] if the command fails
    pub fn execute(&mut self, operation: &Operation, kinds: &[PanelKind]) -> ActionResult {
        let result = self.backend.execute(operation);
        self.refresh.request_all(kinds);
        self.main_for = None;
        result.map_err(ActionError::from)
    }

    /// Same as [`App::execute`] but re-queries every panel
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Recoverable`] if the command fails
    pub fn execute_and_refresh_all(&mut self, operation: &Operation) -> ActionResult {
        let kinds = self.focus.order().to_vec();
        self.execute(operation, &kinds)
    }

    /// Start a background task announced by a message overlay
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::UserInput`] if the same task is still running
    pub fn start_task(&mut self, tag: TaskTag, operation: Operation) -> ActionResult {
        if self.refresh.task_running(tag) {
            return Err(ActionError::user(format!("{} is still running", tag.title())));
        }
        let message = operation.progress_label();
        self.refresh.spawn_task(tag, operation, true);
        self.open(Overlay::message(tag.title(), message).for_task(tag))
    }

    /// Register an interactive child process started from the focused panel
    ///
    /// The child runs when the event loop next calls [`App::run_handoff`].
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Handoff`] if a child is already registered, or
    /// [`ActionError::Recoverable`] if the command cannot be built
    pub fn start_interactive(&mut self, request: &Interactive) -> ActionResult {
        if let Some(active) = self.handoff.active() {
            return Err(HandoffError::Busy(active.spec.to_string()).into());
        }
        let spec = self.backend.interactive(request)?;
        let return_to = self.focused_panel();
        self.handoff.start_interactive(spec, return_to)?;
        self.focus.handoff_started(return_to);
        Ok(())
    }

    /// Hand the terminal to the registered child, if any, and take it back
    ///
    /// Every panel is re-queried afterwards whatever the exit status.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Fatal`] if the terminal could not be reclaimed
    pub fn run_handoff(&mut self, terminal: &mut dyn TerminalControl) -> Result<(), ActionError> {
        let Some(finished) = self.handoff.run(terminal) else {
            return Ok(());
        };
        finished
            .reclaimed
            .map_err(|e| ActionError::Fatal(format!("failed to reclaim the terminal: {e:#}")))?;

        self.focus.handoff_finished();
        match finished.status {
            Ok(status) if !status.success() => {
                self.store
                    .set_status(format!("`{}` exited with {status}", finished.handle.spec));
            }
            Ok(_) => {}
            Err(e) => {
                self.overlays.push_error(format!("{e:#}"));
            }
        }

        self.refresh_all();
        self.main_for = None;
        self.sync();
        Ok(())
    }

    /// Move the focused panel's cursor
    pub fn move_cursor(&mut self, delta: isize) {
        let panel = self.focused_panel();
        self.store.panel_mut(panel).move_cursor(delta);
    }

    /// Scroll the main view
    pub fn scroll_main(&mut self, down: bool) {
        let delta = if down { SCROLL_STEP } else { -SCROLL_STEP };
        self.store.main_mut().scroll_by(delta);
    }

    /// Bring focus, the main view and the hint bar in line with the state
    pub fn sync(&mut self) {
        self.sync_focus();
        if matches!(self.focus.state(), Focus::SubProcess { .. }) {
            return;
        }
        self.sync_main();
        let panel = self.focused_panel();
        self.hints.update(panel, &self.store, &self.config.keys);
    }

    fn sync_focus(&mut self) {
        if self.overlays.is_empty() {
            self.focus.overlays_cleared();
        } else {
            self.focus.overlay_opened();
        }
    }

    fn sync_main(&mut self) {
        let panel = self.focused_panel();
        let selected = self.store.panel(panel).selected_identity();
        let key = Some((panel, selected));
        if self.main_for == key {
            return;
        }
        self.main_for = key;

        match self.store.diff_target(panel) {
            Some((title, target)) => {
                self.refresh.request_diff(title, target);
            }
            None => {
                self.refresh.supersede(Target::Main);
                self.store
                    .set_main(MainView::new(panel.title(), panel.empty_text()));
            }
        }
    }
}
