//! Application state and logic
//!
//! - `store`: panel data, merge flag, main view
//! - `panel`: cursor semantics and the hint bar
//! - `overlay`: modal stack
//! - `focus`: input routing state machine
//! - `refresh`: background queries and their ordered application
//! - `handoff`: lending the terminal to a child process
//! - `handlers`: key actions and the overlay resolver table

mod error;
mod event;
mod focus;
mod handlers;
mod handoff;
mod overlay;
mod panel;
mod refresh;
mod state;
mod store;

pub use error::{ActionError, ActionResult};
pub use event::{Event, Handler};
pub use focus::{Focus, FocusManager, KeyContext};
pub use handlers::Actions;
pub use handoff::{Finished, Handoff, HandoffError, SubprocessHandle, TerminalControl};
pub use overlay::{Choice, Overlay, OverlayError, OverlayKind, OverlayStack, Resolution, Resolved};
pub use panel::{Hint, HintBar, Panel, PanelView};
pub use refresh::{DrainReport, RefreshCoordinator, RefreshEvent, Target, TaskTag};
pub use state::App;
pub use store::{MainView, Store};
