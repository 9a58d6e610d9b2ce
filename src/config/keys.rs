//! Keybinding configuration
//!
//! Bindings are looked up per panel first and then in the global table, so the
//! same key can mean different things in different panels (`space` stages a
//! file but checks out a branch).

use crate::model::PanelKind;
use ratatui::crossterm::event::{KeyCode, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Focus the next panel
    NextPanel,
    /// Focus the previous panel
    PrevPanel,
    /// Move the cursor up
    CursorUp,
    /// Move the cursor down
    CursorDown,
    /// Scroll the main view up
    ScrollUp,
    /// Scroll the main view down
    ScrollDown,
    /// Refresh every panel
    Refresh,
    /// Pull the current branch
    Pull,
    /// Push the current branch
    Push,
    /// Show key help
    Help,
    /// Quit application
    Quit,
    /// Stage or unstage the selected file
    ToggleStaged,
    /// Commit staged changes with a message prompt
    Commit,
    /// Commit staged changes in the configured editor
    CommitWithEditor,
    /// Stage hunks interactively
    AddPatch,
    /// Edit the selected file
    EditFile,
    /// Open the selected file with the system opener
    OpenFile,
    /// Add the selected file to `.gitignore`
    IgnoreFile,
    /// Discard changes to (or delete) the selected file
    DiscardFile,
    /// Reset the working tree to HEAD
    ResetHard,
    /// Stash all changes
    StashSave,
    /// Abort the merge in progress
    AbortMerge,
    /// Resolve conflicts with the merge tool
    ResolveConflicts,
    /// Check out the selected branch
    Checkout,
    /// Create a branch from HEAD
    NewBranch,
    /// Delete the selected branch
    DeleteBranch,
    /// Merge the selected branch into the current one
    MergeBranch,
    /// Reset the current branch to the selected commit
    ResetToCommit,
    /// Apply the selected stash entry
    StashApply,
    /// Pop the selected stash entry
    StashPop,
    /// Drop the selected stash entry
    StashDrop,
    /// Fetch the selected remote
    Fetch,
}

impl Action {
    /// Short label used in the hint bar and help overlay
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NextPanel => "next panel",
            Self::PrevPanel => "previous panel",
            Self::CursorUp => "up",
            Self::CursorDown => "down",
            Self::ScrollUp => "scroll up",
            Self::ScrollDown => "scroll down",
            Self::Refresh => "refresh",
            Self::Pull => "pull",
            Self::Push => "push",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::ToggleStaged => "toggle staged",
            Self::Commit => "commit",
            Self::CommitWithEditor => "commit with editor",
            Self::AddPatch => "add patch",
            Self::EditFile => "edit",
            Self::OpenFile => "open",
            Self::IgnoreFile => "ignore",
            Self::DiscardFile => "delete",
            Self::ResetHard => "reset hard",
            Self::StashSave => "stash files",
            Self::AbortMerge => "abort merge",
            Self::ResolveConflicts => "resolve merge conflicts",
            Self::Checkout => "checkout",
            Self::NewBranch => "new branch",
            Self::DeleteBranch => "delete",
            Self::MergeBranch => "merge into current",
            Self::ResetToCommit => "reset to this commit",
            Self::StashApply => "apply",
            Self::StashPop => "pop",
            Self::StashDrop => "drop",
            Self::Fetch => "fetch",
        }
    }
}

type Table = HashMap<String, Action>;

/// Keybinding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Bindings active in every panel
    global: Table,
    /// Panel-specific bindings, consulted before the global ones
    panels: HashMap<PanelKind, Table>,
}

fn table(entries: &[(&str, Action)]) -> Table {
    entries
        .iter()
        .map(|(key, action)| ((*key).to_string(), *action))
        .collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        let global = table(&[
            ("Tab", Action::NextPanel),
            ("l", Action::NextPanel),
            ("Right", Action::NextPanel),
            ("BackTab", Action::PrevPanel),
            ("h", Action::PrevPanel),
            ("Left", Action::PrevPanel),
            ("k", Action::CursorUp),
            ("Up", Action::CursorUp),
            ("j", Action::CursorDown),
            ("Down", Action::CursorDown),
            ("PageUp", Action::ScrollUp),
            ("PageDown", Action::ScrollDown),
            ("R", Action::Refresh),
            ("p", Action::Pull),
            ("P", Action::Push),
            ("?", Action::Help),
            ("q", Action::Quit),
            ("Ctrl+c", Action::Quit),
        ]);

        let mut panels = HashMap::new();
        panels.insert(
            PanelKind::Files,
            table(&[
                (" ", Action::ToggleStaged),
                ("c", Action::Commit),
                ("C", Action::CommitWithEditor),
                ("t", Action::AddPatch),
                ("e", Action::EditFile),
                ("o", Action::OpenFile),
                ("i", Action::IgnoreFile),
                ("d", Action::DiscardFile),
                ("D", Action::ResetHard),
                ("s", Action::StashSave),
                ("a", Action::AbortMerge),
                ("m", Action::ResolveConflicts),
            ]),
        );
        panels.insert(
            PanelKind::Branches,
            table(&[
                (" ", Action::Checkout),
                ("n", Action::NewBranch),
                ("d", Action::DeleteBranch),
                ("M", Action::MergeBranch),
            ]),
        );
        panels.insert(PanelKind::Commits, table(&[("g", Action::ResetToCommit)]));
        panels.insert(
            PanelKind::Stash,
            table(&[
                (" ", Action::StashApply),
                ("g", Action::StashPop),
                ("d", Action::StashDrop),
            ]),
        );
        panels.insert(PanelKind::Remotes, table(&[("f", Action::Fetch)]));

        Self { global, panels }
    }
}

impl KeyBindings {
    /// Merge in any missing default keybindings
    ///
    /// Keeps bindings added in newer versions available for users with an
    /// older saved config.
    pub fn merge_defaults(&mut self) {
        let defaults = Self::default();
        for (key, action) in defaults.global {
            self.global.entry(key).or_insert(action);
        }
        for (kind, bindings) in defaults.panels {
            let table = self.panels.entry(kind).or_default();
            for (key, action) in bindings {
                table.entry(key).or_insert(action);
            }
        }
    }

    /// Resolve a key in the context of a panel
    #[must_use]
    pub fn action_for(
        &self,
        panel: PanelKind,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<Action> {
        let key = key_to_string(code, modifiers);
        if key.is_empty() {
            return None;
        }
        self.panels
            .get(&panel)
            .and_then(|bindings| bindings.get(&key))
            .or_else(|| self.global.get(&key))
            .copied()
    }

    /// All keys that trigger `action` in `panel`
    #[must_use]
    pub fn keys_for_action(&self, panel: PanelKind, action: Action) -> Vec<String> {
        let local = self.panels.get(&panel);
        let mut keys: Vec<String> = local
            .into_iter()
            .flat_map(|bindings| bindings.iter())
            .filter(|(_, bound)| **bound == action)
            .map(|(key, _)| key.clone())
            .collect();
        keys.extend(
            self.global
                .iter()
                .filter(|(key, bound)| {
                    **bound == action && !local.is_some_and(|bindings| bindings.contains_key(*key))
                })
                .map(|(key, _)| key.clone()),
        );
        keys
    }

    /// Format key(s) for an action for display (e.g. "Space" or "j/Down")
    #[must_use]
    pub fn format_keys(&self, panel: PanelKind, action: Action) -> String {
        let mut keys = self.keys_for_action(panel, action);
        keys.sort_by(|a, b| {
            let a_simple = a.chars().count() == 1;
            let b_simple = b.chars().count() == 1;
            b_simple.cmp(&a_simple).then_with(|| a.cmp(b))
        });
        keys.iter()
            .map(|key| {
                if key == " " {
                    "Space".to_string()
                } else {
                    key.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Help lines for a panel: "  keys    description"
    #[must_use]
    pub fn help_lines(&self, panel: PanelKind) -> Vec<String> {
        let mut actions: Vec<Action> = self
            .panels
            .get(&panel)
            .into_iter()
            .flat_map(|bindings| bindings.values().copied())
            .chain(self.global.values().copied())
            .collect();
        actions.sort_by_key(|action| action.description());
        actions.dedup();
        actions
            .into_iter()
            .map(|action| {
                let keys = self.format_keys(panel, action);
                format!("  {keys:<12} {}", action.description())
            })
            .collect()
    }
}

/// Convert a key code and modifiers to a string representation
#[must_use]
pub fn key_to_string(code: KeyCode, modifiers: KeyModifiers) -> String {
    let mut parts = Vec::new();

    if modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if modifiers.contains(KeyModifiers::SHIFT)
        && !matches!(code, KeyCode::Char(_) | KeyCode::BackTab)
    {
        parts.push("Shift".to_string());
    }

    let key_part = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "BackTab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return String::new(),
    };

    parts.push(key_part);
    parts.join("+")
}
