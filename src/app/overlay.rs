//! Modal overlay stack
//!
//! Confirmations and prompts are exclusive: only one of them may be open at a
//! time. Messages and errors are not. Errors raised while an exclusive overlay
//! is open wait in a queue until it resolves, so an error never ends up hidden
//! beneath a confirmation.

use crate::model::File;
use std::collections::VecDeque;
use thiserror::Error;

use super::refresh::TaskTag;

/// Overlay kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// Yes/no question, optionally with a second "no" action
    Confirmation,
    /// Single-line text input
    Prompt,
    /// Informational text dismissed by any key
    Message,
    /// Failure report dismissed by any key
    Error,
}

impl OverlayKind {
    /// Whether at most one overlay of this kind may be open
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Confirmation | Self::Prompt)
    }
}

/// Deferred work bound to an overlay button, run by the resolver table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Discard every change to a file (deleting it if untracked)
    DiscardFile {
        /// The file as shown when the question was asked
        file: File,
    },
    /// Discard only the unstaged changes to a file
    DiscardUnstaged {
        /// File path
        name: String,
    },
    /// `git reset --hard HEAD`
    ResetHard,
    /// Commit with the prompt input as message
    Commit,
    /// Stash with the prompt input as message
    StashSave,
    /// Create a branch named by the prompt input
    NewBranch,
    /// Delete a branch
    DeleteBranch {
        /// Branch name
        name: String,
    },
    /// Reset the current branch to a commit
    ResetToCommit {
        /// Commit id
        sha: String,
    },
    /// Drop a stash entry, looked up again by commit id at resolve time
    StashDrop {
        /// Commit id of the stash entry
        oid: String,
    },
}

/// A modal unit on the overlay stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Kind
    pub kind: OverlayKind,
    /// Border title
    pub title: String,
    /// Body text
    pub content: String,
    /// Bound to confirm/submit
    pub primary: Option<Resolution>,
    /// Bound to the second answer of a confirmation
    pub secondary: Option<Resolution>,
    /// Label for the secondary answer
    pub secondary_label: Option<String>,
    /// Text typed into a prompt
    pub input: Option<String>,
    /// Background task whose completion closes this overlay
    pub task: Option<TaskTag>,
}

impl Overlay {
    fn new(kind: OverlayKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            primary: None,
            secondary: None,
            secondary_label: None,
            input: None,
            task: None,
        }
    }

    /// A yes/no question
    #[must_use]
    pub fn confirm(
        title: impl Into<String>,
        content: impl Into<String>,
        resolution: Resolution,
    ) -> Self {
        Self {
            primary: Some(resolution),
            ..Self::new(OverlayKind::Confirmation, title, content)
        }
    }

    /// Bind the `n` answer to something other than cancel
    #[must_use]
    pub fn with_secondary(mut self, label: impl Into<String>, resolution: Resolution) -> Self {
        self.secondary = Some(resolution);
        self.secondary_label = Some(label.into());
        self
    }

    /// A text prompt
    #[must_use]
    pub fn prompt(title: impl Into<String>, content: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            primary: Some(resolution),
            input: Some(String::new()),
            ..Self::new(OverlayKind::Prompt, title, content)
        }
    }

    /// An informational message
    #[must_use]
    pub fn message(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(OverlayKind::Message, title, content)
    }

    /// An error report
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(OverlayKind::Error, "Error", message)
    }

    /// Close this overlay when `task` finishes
    #[must_use]
    pub const fn for_task(mut self, task: TaskTag) -> Self {
        self.task = Some(task);
        self
    }
}

/// The answer given to the top overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// `y`/`Enter`: run the primary resolution
    Confirm,
    /// `n`: run the secondary resolution, or cancel if there is none
    Secondary,
    /// `Esc` or dismissal
    Cancel,
}

/// A resolution to run, with the prompt text if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// What to run
    pub resolution: Resolution,
    /// Prompt input, empty for confirmations
    pub input: String,
}

/// Overlay stack errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    /// A confirmation or prompt is already open
    #[error("Finish \"{0}\" first")]
    ExclusiveActive(String),
}

/// Stack of open overlays plus errors waiting for an exclusive one to close
#[derive(Debug, Default)]
pub struct OverlayStack {
    stack: Vec<Overlay>,
    deferred: VecDeque<String>,
}

impl OverlayStack {
    /// Empty stack
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an overlay
    ///
    /// An exclusive overlay opened while errors are showing goes beneath them,
    /// so the errors stay on top until dismissed.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::ExclusiveActive`] if both the new overlay and
    /// one already open are exclusive.
    pub fn push(&mut self, overlay: Overlay) -> Result<(), OverlayError> {
        if !overlay.kind.is_exclusive() {
            self.stack.push(overlay);
            return Ok(());
        }
        if let Some(open) = self.stack.iter().find(|open| open.kind.is_exclusive()) {
            return Err(OverlayError::ExclusiveActive(open.title.clone()));
        }
        let errors_on_top = self
            .stack
            .iter()
            .rev()
            .take_while(|open| open.kind == OverlayKind::Error)
            .count();
        self.stack.insert(self.stack.len() - errors_on_top, overlay);
        Ok(())
    }

    /// Report an error, deferring it while an exclusive overlay is open
    ///
    /// Returns whether it was shown immediately.
    pub fn push_error(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.has_exclusive() {
            tracing::debug!(%message, "Deferring error until the open dialog resolves");
            self.deferred.push_back(message);
            false
        } else {
            self.stack.push(Overlay::error(message));
            true
        }
    }

    /// Pop the top overlay and return what its answer is bound to
    ///
    /// Cancel, and any answer to a message or error, yields `None`. Deferred
    /// errors are shown once no exclusive overlay remains.
    pub fn resolve(&mut self, choice: Choice) -> Option<Resolved> {
        let top = self.stack.pop()?;
        let resolution = match (top.kind, choice) {
            (OverlayKind::Confirmation | OverlayKind::Prompt, Choice::Confirm) => top.primary,
            (OverlayKind::Confirmation, Choice::Secondary) => top.secondary,
            _ => None,
        };
        self.flush_deferred();
        resolution.map(|resolution| Resolved {
            resolution,
            input: top.input.unwrap_or_default(),
        })
    }

    /// Close overlays announcing `task`
    pub fn close_task(&mut self, task: TaskTag) {
        self.stack.retain(|overlay| overlay.task != Some(task));
        self.flush_deferred();
    }

    /// Top overlay
    #[must_use]
    pub fn top(&self) -> Option<&Overlay> {
        self.stack.last()
    }

    /// Top overlay, mutable (for prompt editing)
    pub fn top_mut(&mut self) -> Option<&mut Overlay> {
        self.stack.last_mut()
    }

    /// Open overlays, bottom first
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.stack.iter()
    }

    /// Number of open overlays
    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether nothing is open
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether a confirmation or prompt is open
    #[must_use]
    pub fn has_exclusive(&self) -> bool {
        self.stack.iter().any(|overlay| overlay.kind.is_exclusive())
    }

    /// Errors waiting for the open dialog to close
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    fn flush_deferred(&mut self) {
        if self.has_exclusive() {
            return;
        }
        while let Some(message) = self.deferred.pop_front() {
            self.stack.push(Overlay::error(message));
        }
    }
}
