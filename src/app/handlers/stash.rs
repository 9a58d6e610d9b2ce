//! Stash panel actions

use crate::git::Operation;
use crate::model::StashEntry;

use super::super::error::ActionResult;
use super::super::overlay::{Overlay, Resolution};
use super::super::state::App;
use super::{Actions, selected};

fn selected_entry(app: &App) -> ActionResult<StashEntry> {
    selected(app.store.stash.selected(), "stash entry")
}

impl Actions {
    pub(super) fn stash_apply(self, app: &mut App) -> ActionResult {
        let entry = selected_entry(app)?;
        app.execute_and_refresh_all(&Operation::StashApply { index: entry.index })
    }

    pub(super) fn stash_pop(self, app: &mut App) -> ActionResult {
        let entry = selected_entry(app)?;
        app.execute_and_refresh_all(&Operation::StashPop { index: entry.index })
    }

    pub(super) fn stash_drop(self, app: &mut App) -> ActionResult {
        let entry = selected_entry(app)?;
        app.open(Overlay::confirm(
            "Drop stash",
            format!("Drop {}: {}?", entry.reference(), entry.message),
            Resolution::StashDrop { oid: entry.oid },
        ))
    }
}
