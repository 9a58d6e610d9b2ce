//! Branches panel actions

use crate::git::Operation;
use crate::model::Branch;

use super::super::error::{ActionError, ActionResult};
use super::super::overlay::{Overlay, Resolution};
use super::super::state::App;
use super::{Actions, selected};

fn selected_branch(app: &App) -> ActionResult<Branch> {
    selected(app.store.branches.selected(), "branch")
}

impl Actions {
    pub(super) fn checkout(self, app: &mut App) -> ActionResult {
        let branch = selected_branch(app)?;
        if branch.is_head {
            return Err(ActionError::user(format!("Already on {}", branch.name)));
        }
        app.execute_and_refresh_all(&Operation::Checkout {
            branch: branch.name,
        })
    }

    pub(super) fn new_branch(self, app: &mut App) -> ActionResult {
        let from = app
            .store
            .current_branch()
            .map_or_else(|| "HEAD".to_string(), |branch| branch.name.clone());
        app.open(Overlay::prompt(
            "New branch",
            format!("Branch off {from}"),
            Resolution::NewBranch,
        ))
    }

    pub(super) fn delete_branch(self, app: &mut App) -> ActionResult {
        let branch = selected_branch(app)?;
        if branch.is_head {
            return Err(ActionError::user("Cannot delete the checked out branch"));
        }
        app.open(Overlay::confirm(
            "Delete branch",
            format!("Delete branch {}?", branch.name),
            Resolution::DeleteBranch { name: branch.name },
        ))
    }

    pub(super) fn merge_branch(self, app: &mut App) -> ActionResult {
        let branch = selected_branch(app)?;
        if branch.is_head {
            return Err(ActionError::user("Cannot merge a branch into itself"));
        }
        app.execute_and_refresh_all(&Operation::MergeBranch { name: branch.name })
    }
}
