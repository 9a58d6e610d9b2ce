//! Lending the terminal to an interactive child process
//!
//! While a child runs, the event loop blocks on it and nothing is drawn or
//! drained. Background refreshes keep completing into the apply queue and are
//! applied on the first tick after the terminal is reclaimed.

use crate::command::CommandSpec;
use crate::model::PanelKind;
use anyhow::{Context, Result};
use std::process::ExitStatus;
use thiserror::Error;

/// Ownership of raw mode and the alternate screen
pub trait TerminalControl {
    /// Leave raw mode and the alternate screen so a child can use the terminal
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be restored
    fn release(&mut self) -> Result<()>;

    /// Enter raw mode and the alternate screen again and force a full redraw
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up
    fn reclaim(&mut self) -> Result<()>;
}

/// Handoff errors
#[derive(Debug, Error)]
pub enum HandoffError {
    /// A child is already running
    #[error("`{0}` is still running")]
    Busy(String),
}

/// The active child process request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessHandle {
    /// What to run
    pub spec: CommandSpec,
    /// Panel that started it
    pub return_to: PanelKind,
}

/// Outcome of one handoff
#[derive(Debug)]
pub struct Finished {
    /// The handle that was cleared
    pub handle: SubprocessHandle,
    /// Exit status, or the reason the child could not run
    pub status: Result<ExitStatus>,
    /// Whether the terminal came back
    pub reclaimed: Result<()>,
}

/// At most one outstanding child process
#[derive(Debug, Default)]
pub struct Handoff {
    active: Option<SubprocessHandle>,
}

impl Handoff {
    /// No child running
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child to run on the next loop iteration
    ///
    /// # Errors
    ///
    /// Returns [`HandoffError::Busy`] if a child is already registered; the
    /// existing handle is left as it was.
    pub fn start_interactive(
        &mut self,
        spec: CommandSpec,
        return_to: PanelKind,
    ) -> Result<(), HandoffError> {
        if let Some(active) = &self.active {
            return Err(HandoffError::Busy(active.spec.to_string()));
        }
        tracing::info!(command = %spec, %return_to, "Handoff requested");
        self.active = Some(SubprocessHandle { spec, return_to });
        Ok(())
    }

    /// The registered child
    #[must_use]
    pub const fn active(&self) -> Option<&SubprocessHandle> {
        self.active.as_ref()
    }

    /// Whether a child is registered
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Run the registered child to completion
    ///
    /// Releases the terminal, waits for the child, then reclaims the terminal
    /// whether or not the child could be started. Returns `None` if nothing
    /// was registered.
    pub fn run(&mut self, terminal: &mut dyn TerminalControl) -> Option<Finished> {
        let spec = self.active.as_ref()?.spec.clone();

        let status = terminal.release().and_then(|()| {
            tracing::info!(command = %spec, "Handing terminal to child process");
            spec.to_command()
                .status()
                .with_context(|| format!("Failed to run `{spec}`"))
        });
        let reclaimed = terminal.reclaim();

        let handle = self.active.take()?;
        match &status {
            Ok(exit) => tracing::info!(command = %spec, %exit, "Child process exited"),
            Err(e) => tracing::warn!(command = %spec, "Child process failed: {e:#}"),
        }
        Some(Finished {
            handle,
            status,
            reclaimed,
        })
    }
}
