//! Focus state machine
//!
//! Input goes to exactly one place: a panel, the overlay stack, or nowhere
//! while a child process owns the terminal.

use crate::model::PanelKind;

use super::error::ActionError;

/// Where input is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A panel has focus
    Panel(PanelKind),
    /// An overlay is open above the panel it was opened from
    Overlay {
        /// Panel that regains focus once the stack is empty
        return_to: PanelKind,
    },
    /// A child process owns the terminal
    SubProcess {
        /// Panel that started the child
        return_to: PanelKind,
    },
}

/// Key routing context derived from [`Focus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Panel bindings apply
    Panel(PanelKind),
    /// Keys answer the top overlay
    Overlay,
    /// Keys are ignored
    Suspended,
}

/// Focus transitions over a fixed panel order
#[derive(Debug, Clone)]
pub struct FocusManager {
    order: Vec<PanelKind>,
    state: Focus,
}

impl FocusManager {
    /// Start focused on the files panel
    #[must_use]
    pub fn new(order: Vec<PanelKind>) -> Self {
        Self {
            order,
            state: Focus::Panel(PanelKind::Files),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> Focus {
        self.state
    }

    /// Panels in cycle order
    #[must_use]
    pub fn order(&self) -> &[PanelKind] {
        &self.order
    }

    /// The focused panel, or the one focus will return to
    #[must_use]
    pub const fn panel(&self) -> PanelKind {
        match self.state {
            Focus::Panel(kind)
            | Focus::Overlay { return_to: kind }
            | Focus::SubProcess { return_to: kind } => kind,
        }
    }

    /// Whether an overlay or child process must resolve first
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self.state, Focus::Panel(_))
    }

    /// Routing context for the key router
    #[must_use]
    pub const fn context(&self) -> KeyContext {
        match self.state {
            Focus::Panel(kind) => KeyContext::Panel(kind),
            Focus::Overlay { .. } => KeyContext::Overlay,
            Focus::SubProcess { .. } => KeyContext::Suspended,
        }
    }

    /// Focus the next panel; refused while pending
    pub fn next_panel(&mut self) -> bool {
        self.step(1)
    }

    /// Focus the previous panel; refused while pending
    pub fn prev_panel(&mut self) -> bool {
        self.step(self.order.len().saturating_sub(1))
    }

    /// Focus a specific panel
    ///
    /// Returns `Ok(false)` while an overlay or child process is pending.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Fatal`] if `kind` is not in the panel order
    pub fn focus_panel(&mut self, kind: PanelKind) -> Result<bool, ActionError> {
        if !self.order.contains(&kind) {
            return Err(ActionError::Fatal(format!(
                "no {kind} panel in the focus order"
            )));
        }
        if self.is_pending() {
            return Ok(false);
        }
        self.state = Focus::Panel(kind);
        Ok(true)
    }

    /// An overlay became visible
    pub fn overlay_opened(&mut self) {
        if let Focus::Panel(kind) = self.state {
            self.state = Focus::Overlay { return_to: kind };
        }
    }

    /// The overlay stack became empty
    pub fn overlays_cleared(&mut self) {
        if let Focus::Overlay { return_to } = self.state {
            self.state = Focus::Panel(return_to);
        }
    }

    /// A child process took the terminal
    pub fn handoff_started(&mut self, return_to: PanelKind) {
        tracing::info!(%return_to, "Input suspended for child process");
        self.state = Focus::SubProcess { return_to };
    }

    /// The child process exited
    pub fn handoff_finished(&mut self) {
        if let Focus::SubProcess { return_to } = self.state {
            tracing::info!(%return_to, "Input resumed");
            self.state = Focus::Panel(return_to);
        }
    }

    fn step(&mut self, offset: usize) -> bool {
        let Focus::Panel(current) = self.state else {
            return false;
        };
        if self.order.is_empty() {
            return false;
        }
        let index = self
            .order
            .iter()
            .position(|kind| *kind == current)
            .unwrap_or(0);
        let next = self.order[(index + offset) % self.order.len()];
        self.state = Focus::Panel(next);
        next != current
    }
}
