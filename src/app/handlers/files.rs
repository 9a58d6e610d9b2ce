//! Files panel actions

use crate::git::{Interactive, Operation};
use crate::model::{File, PanelKind};

use super::super::error::{ActionError, ActionResult};
use super::super::overlay::{Overlay, Resolution};
use super::super::state::App;
use super::{Actions, selected};

fn selected_file(app: &App) -> ActionResult<File> {
    selected(app.store.files.selected(), "file")
}

fn ensure_can_commit(app: &App) -> ActionResult {
    if !app.store.any_staged() && !app.store.has_merge_conflicts() {
        return Err(ActionError::user("There are no staged files to commit"));
    }
    Ok(())
}

impl Actions {
    /// Stage or unstage the selected file; a conflicted file opens the merge
    /// tool instead
    pub(super) fn toggle_staged(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        if file.has_merge_conflicts {
            return app.start_interactive(&Interactive::MergeTool { name: file.name });
        }

        let operation = if file.has_unstaged_changes {
            Operation::Stage {
                name: file.name.clone(),
            }
        } else {
            Operation::Unstage {
                added: file.short_status.starts_with('A'),
                name: file.name.clone(),
            }
        };
        app.execute(&operation, &[PanelKind::Files])
    }

    pub(super) fn commit(self, app: &mut App) -> ActionResult {
        ensure_can_commit(app)?;
        app.open(Overlay::prompt(
            "Commit message",
            "",
            Resolution::Commit,
        ))
    }

    pub(super) fn commit_with_editor(self, app: &mut App) -> ActionResult {
        ensure_can_commit(app)?;
        app.start_interactive(&Interactive::CommitEditor)
    }

    pub(super) fn add_patch(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        if !file.tracked {
            return Err(ActionError::user("Cannot git add --patch untracked files"));
        }
        if !file.has_unstaged_changes {
            return Err(ActionError::user("File has no unstaged changes to add"));
        }
        app.start_interactive(&Interactive::AddPatch { name: file.name })
    }

    pub(super) fn edit_file(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        if file.deleted {
            return Err(ActionError::user(format!("{} has been deleted", file.name)));
        }
        app.start_interactive(&Interactive::Edit { name: file.name })
    }

    pub(super) fn open_file(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        app.backend().execute(&Operation::Open { name: file.name })?;
        Ok(())
    }

    pub(super) fn ignore_file(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        if file.tracked {
            return Err(ActionError::user("Cannot ignore tracked files"));
        }
        app.execute(&Operation::Ignore { name: file.name }, &[PanelKind::Files])
    }

    /// Ask before throwing away changes
    ///
    /// For a file with both staged and unstaged changes, `n` discards only the
    /// unstaged part.
    pub(super) fn discard_file(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        let overlay = if !file.tracked {
            Overlay::confirm(
                "Delete file",
                format!("Are you sure you want to delete {}?", file.name),
                Resolution::DiscardFile { file },
            )
        } else if file.has_staged_changes && file.has_unstaged_changes {
            let name = file.name.clone();
            Overlay::confirm(
                "Discard changes",
                format!("Discard all changes to {name}, or only the unstaged ones?"),
                Resolution::DiscardFile { file },
            )
            .with_secondary("unstaged only", Resolution::DiscardUnstaged { name })
        } else {
            Overlay::confirm(
                "Discard changes",
                format!("Discard all changes to {}?", file.name),
                Resolution::DiscardFile { file },
            )
        };
        app.open(overlay)
    }

    pub(super) fn reset_hard(self, app: &mut App) -> ActionResult {
        app.open(Overlay::confirm(
            "Reset hard",
            "Discard every change in the working tree and index?",
            Resolution::ResetHard,
        ))
    }

    pub(super) fn stash_save(self, app: &mut App) -> ActionResult {
        if !app.store.any_tracked_changes() {
            return Err(ActionError::user("You have no tracked or staged files to stash"));
        }
        app.open(Overlay::prompt(
            "Stash changes",
            "Stash message (optional)",
            Resolution::StashSave,
        ))
    }

    pub(super) fn abort_merge(self, app: &mut App) -> ActionResult {
        if !app.store.has_merge_conflicts() {
            return Err(ActionError::user("No merge in progress"));
        }
        app.execute_and_refresh_all(&Operation::AbortMerge)?;
        app.store.set_status("Merge aborted");
        Ok(())
    }

    pub(super) fn resolve_conflicts(self, app: &mut App) -> ActionResult {
        let file = selected_file(app)?;
        if !file.has_merge_conflicts {
            return Err(ActionError::user("This file has no merge conflicts"));
        }
        app.start_interactive(&Interactive::MergeTool { name: file.name })
    }
}
