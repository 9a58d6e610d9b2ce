//! Commits panel actions

use super::super::error::ActionResult;
use super::super::overlay::{Overlay, Resolution};
use super::super::state::App;
use super::{Actions, selected};

impl Actions {
    pub(super) fn reset_to_commit(self, app: &mut App) -> ActionResult {
        let commit = selected(app.store.commits.selected(), "commit")?;
        app.open(Overlay::confirm(
            "Reset to commit",
            format!(
                "Reset the current branch to {} {}?\nChanges stay in the working tree.",
                commit.short_sha, commit.summary
            ),
            Resolution::ResetToCommit { sha: commit.sha },
        ))
    }
}
