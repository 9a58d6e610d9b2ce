//! Remotes panel actions

use crate::git::Operation;

use super::super::error::ActionResult;
use super::super::refresh::TaskTag;
use super::super::state::App;
use super::{Actions, selected};

impl Actions {
    pub(super) fn fetch(self, app: &mut App) -> ActionResult {
        let remote = selected(app.store.remotes.selected(), "remote")?;
        app.start_task(
            TaskTag::Fetch,
            Operation::Fetch {
                remote: remote.name,
            },
        )
    }
}
