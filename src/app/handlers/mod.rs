//! Action handlers for the application
//!
//! This module contains the `Actions` struct and all action handlers,
//! organized into focused submodules by panel. Handlers return an
//! [`ActionResult`]; [`App::guard`] decides how each failure is shown.

mod branches;
mod commits;
mod files;
mod remotes;
mod resolve;
mod stash;

use crate::config::Action;
use crate::git::Operation;
use crate::model::Item;

use super::error::{ActionError, ActionResult};
use super::overlay::Overlay;
use super::refresh::TaskTag;
use super::state::App;

/// Handler for application actions
#[derive(Debug, Clone, Copy, Default)]
pub struct Actions;

impl Actions {
    /// Create a new action handler
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Handle a keybinding action
    ///
    /// # Errors
    ///
    /// Returns an error if the action does not apply or a backend call fails
    pub fn handle_action(self, app: &mut App, action: Action) -> ActionResult {
        match action {
            Action::NextPanel => {
                app.focus.next_panel();
            }
            Action::PrevPanel => {
                app.focus.prev_panel();
            }
            Action::CursorUp => app.move_cursor(-1),
            Action::CursorDown => app.move_cursor(1),
            Action::ScrollUp => app.scroll_main(false),
            Action::ScrollDown => app.scroll_main(true),
            Action::Refresh => {
                app.refresh_all();
                app.store.set_status("Refreshing...");
            }
            Action::Pull => {
                app.start_task(TaskTag::Pull, Operation::Pull)?;
            }
            Action::Push => self.push(app)?,
            Action::Help => self.help(app)?,
            Action::Quit => app.should_quit = true,

            Action::ToggleStaged => self.toggle_staged(app)?,
            Action::Commit => self.commit(app)?,
            Action::CommitWithEditor => self.commit_with_editor(app)?,
            Action::AddPatch => self.add_patch(app)?,
            Action::EditFile => self.edit_file(app)?,
            Action::OpenFile => self.open_file(app)?,
            Action::IgnoreFile => self.ignore_file(app)?,
            Action::DiscardFile => self.discard_file(app)?,
            Action::ResetHard => self.reset_hard(app)?,
            Action::StashSave => self.stash_save(app)?,
            Action::AbortMerge => self.abort_merge(app)?,
            Action::ResolveConflicts => self.resolve_conflicts(app)?,

            Action::Checkout => self.checkout(app)?,
            Action::NewBranch => self.new_branch(app)?,
            Action::DeleteBranch => self.delete_branch(app)?,
            Action::MergeBranch => self.merge_branch(app)?,

            Action::ResetToCommit => self.reset_to_commit(app)?,

            Action::StashApply => self.stash_apply(app)?,
            Action::StashPop => self.stash_pop(app)?,
            Action::StashDrop => self.stash_drop(app)?,

            Action::Fetch => self.fetch(app)?,
        }
        Ok(())
    }

    fn push(self, app: &mut App) -> ActionResult {
        let Some(branch) = app.store.current_branch() else {
            return Err(ActionError::user("Not on a branch"));
        };
        let operation = Operation::Push {
            branch: branch.name.clone(),
            has_upstream: branch.upstream.is_some(),
        };
        app.start_task(TaskTag::Push, operation)
    }

    fn help(self, app: &mut App) -> ActionResult {
        let panel = app.focused_panel();
        let lines = app.config.keys.help_lines(panel);
        app.open(Overlay::message(
            format!("{panel} keys"),
            lines.join("\n"),
        ))
    }
}

/// The selected item of a panel, or an inline "nothing selected" message
fn selected<T: Item>(item: Option<&T>, what: &str) -> ActionResult<T> {
    item.cloned()
        .ok_or_else(|| ActionError::user(format!("No {what} selected")))
}
