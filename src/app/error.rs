//! Error classes for action handlers

use thiserror::Error;

use super::handoff::HandoffError;
use super::overlay::OverlayError;

/// How a handler failure is surfaced
#[derive(Debug, Error)]
pub enum ActionError {
    /// Nothing to act on, or the action does not apply to the selection;
    /// shown as the inline status message
    #[error("{0}")]
    UserInput(String),

    /// A child process already owns the terminal; shown inline
    #[error(transparent)]
    Handoff(#[from] HandoffError),

    /// A backend call failed; shown as an error overlay
    #[error(transparent)]
    Recoverable(#[from] anyhow::Error),

    /// An internal invariant broke; ends the event loop
    #[error("internal error: {0}")]
    Fatal(String),
}

impl ActionError {
    /// Shorthand for [`ActionError::UserInput`]
    #[must_use]
    pub fn user(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }
}

impl From<OverlayError> for ActionError {
    fn from(error: OverlayError) -> Self {
        Self::UserInput(error.to_string())
    }
}

/// Result type of action handlers
pub type ActionResult<T = ()> = Result<T, ActionError>;
