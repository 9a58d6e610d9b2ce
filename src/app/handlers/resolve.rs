//! Resolver table for overlay answers
//!
//! Every [`Resolution`] variant is handled here, and nowhere else.

use crate::git::Operation;
use crate::model::PanelKind;

use super::super::error::{ActionError, ActionResult};
use super::super::overlay::{Resolution, Resolved};
use super::super::state::App;
use super::Actions;

fn required(input: &str, what: &str) -> ActionResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ActionError::user(format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

impl Actions {
    /// Run the work bound to a confirmed overlay
    ///
    /// # Errors
    ///
    /// Returns an error if the input is unusable or the backend call fails
    pub fn resolve(self, app: &mut App, resolved: Resolved) -> ActionResult {
        let Resolved { resolution, input } = resolved;
        tracing::debug!(?resolution, "Resolving overlay");

        match resolution {
            Resolution::DiscardFile { file } => {
                app.execute(&Operation::DiscardFile { file }, &[PanelKind::Files])
            }
            Resolution::DiscardUnstaged { name } => {
                app.execute(&Operation::DiscardUnstaged { name }, &[PanelKind::Files])
            }
            Resolution::ResetHard => app.execute_and_refresh_all(&Operation::ResetHard),
            Resolution::Commit => {
                let message = required(&input, "Commit message")?;
                app.execute_and_refresh_all(&Operation::Commit { message })
            }
            Resolution::StashSave => app.execute_and_refresh_all(&Operation::StashSave {
                message: input.trim().to_string(),
            }),
            Resolution::NewBranch => {
                let name = required(&input, "Branch name")?;
                app.execute_and_refresh_all(&Operation::CreateBranch { name })
            }
            Resolution::DeleteBranch { name } => {
                app.execute_and_refresh_all(&Operation::DeleteBranch { name })
            }
            Resolution::ResetToCommit { sha } => {
                app.execute_and_refresh_all(&Operation::ResetToCommit { sha })
            }
            Resolution::StashDrop { oid } => {
                let Some(entry) = app
                    .store
                    .stash
                    .items()
                    .iter()
                    .find(|entry| entry.oid == oid)
                else {
                    return Err(ActionError::user("That stash entry no longer exists"));
                };
                let index = entry.index;
                app.execute_and_refresh_all(&Operation::StashDrop { index })
            }
        }
    }
}
