//! List panels with identity-preserving cursors, plus the hint bar

use crate::config::{Action, KeyBindings};
use crate::model::{File, Item, PanelKind};
use ratatui::text::Line;

use super::store::Store;

/// Ordered items of one kind and a cursor into them
///
/// The cursor always satisfies `cursor < max(1, items.len())`.
#[derive(Debug, Clone)]
pub struct Panel<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
        }
    }
}

impl<T: Item> Panel<T> {
    /// An empty panel
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current items
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Cursor position
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the panel has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item under the cursor, `None` on an empty panel
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.cursor)
    }

    /// Move the cursor by `delta`, clamped to the panel bounds
    ///
    /// Returns whether the cursor moved.
    pub fn move_cursor(&mut self, delta: isize) -> bool {
        let before = self.cursor;
        self.cursor = self.clamp(self.cursor.saturating_add_signed(delta));
        self.cursor != before
    }

    /// Put the cursor on `index`, clamped
    pub fn select(&mut self, index: usize) {
        self.cursor = self.clamp(index);
    }

    /// Swap in a fresh snapshot
    ///
    /// The cursor follows the selected item's identity if it survived,
    /// otherwise it stays at the same index clamped to the new length.
    pub fn replace(&mut self, items: Vec<T>) {
        let identity = self.selected().map(|item| item.identity().to_string());
        self.items = items;

        let followed = identity.and_then(|identity| {
            self.items
                .iter()
                .position(|item| item.identity() == identity)
        });
        self.cursor = followed.unwrap_or_else(|| self.clamp(self.cursor));
    }

    /// One styled line per item
    #[must_use]
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        self.items.iter().map(Item::line).collect()
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.items.len().saturating_sub(1))
    }
}

/// Kind-erased view of a panel, used by the renderer and cursor navigation
pub trait PanelView {
    /// Number of items
    fn len(&self) -> usize;

    /// Whether the panel has no items
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor position
    fn cursor(&self) -> usize;

    /// Move the cursor by `delta`, clamped; returns whether it moved
    fn move_cursor(&mut self, delta: isize) -> bool;

    /// Identity of the selected item
    fn selected_identity(&self) -> Option<String>;

    /// One styled line per item
    fn render_lines(&self) -> Vec<Line<'static>>;
}

impl<T: Item> PanelView for Panel<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn move_cursor(&mut self, delta: isize) -> bool {
        Self::move_cursor(self, delta)
    }

    fn selected_identity(&self) -> Option<String> {
        self.selected().map(|item| item.identity().to_string())
    }

    fn render_lines(&self) -> Vec<Line<'static>> {
        Self::render_lines(self)
    }
}

/// One entry of the hint bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Formatted key(s), e.g. `Space` or `j/Down`
    pub keys: String,
    /// What the key does for the current selection
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HintKey {
    panel: PanelKind,
    selected: Option<String>,
    merging: bool,
    file: Option<FileState>,
}

/// The parts of the selected file that decide which actions apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileState {
    tracked: bool,
    has_unstaged_changes: bool,
    has_merge_conflicts: bool,
}

impl From<&File> for FileState {
    fn from(file: &File) -> Self {
        Self {
            tracked: file.tracked,
            has_unstaged_changes: file.has_unstaged_changes,
            has_merge_conflicts: file.has_merge_conflicts,
        }
    }
}

/// Option hints for the focused panel
///
/// Recomputed only when the focused panel, its selection, the selected file's
/// state or the merge mode changes.
#[derive(Debug, Clone, Default)]
pub struct HintBar {
    key: Option<HintKey>,
    hints: Vec<Hint>,
}

impl HintBar {
    /// Current hints
    #[must_use]
    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    /// Recompute if the inputs changed; returns whether it did
    pub fn update(&mut self, panel: PanelKind, store: &Store, keys: &KeyBindings) -> bool {
        let key = HintKey {
            panel,
            selected: store.panel(panel).selected_identity(),
            merging: store.has_merge_conflicts(),
            file: store.files.selected().map(FileState::from),
        };
        if self.key.as_ref() == Some(&key) {
            return false;
        }
        self.hints = compute_hints(panel, store, keys);
        self.key = Some(key);
        true
    }

    /// Hints joined for the status line
    #[must_use]
    pub fn render(&self) -> String {
        self.hints
            .iter()
            .map(|hint| format!("{}: {}", hint.keys, hint.label))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn compute_hints(panel: PanelKind, store: &Store, keys: &KeyBindings) -> Vec<Hint> {
    let has_selection = !store.panel(panel).is_empty();
    let mut actions: Vec<(Action, &'static str)> = Vec::new();
    let mut add = |action: Action| actions.push((action, action.description()));

    match panel {
        PanelKind::Files => {
            let file = store.files.selected();
            if let Some(file) = file {
                if file.has_merge_conflicts {
                    add(Action::ResolveConflicts);
                } else {
                    add(Action::ToggleStaged);
                }
            }
            add(Action::Commit);
            add(Action::CommitWithEditor);
            if let Some(file) = file {
                if file.tracked && file.has_unstaged_changes {
                    add(Action::AddPatch);
                }
                add(Action::EditFile);
                add(Action::OpenFile);
                if !file.tracked {
                    add(Action::IgnoreFile);
                }
                add(Action::DiscardFile);
            }
            add(Action::ResetHard);
            add(Action::StashSave);
            if store.has_merge_conflicts() {
                add(Action::AbortMerge);
            }
        }
        PanelKind::Branches => {
            if has_selection {
                add(Action::Checkout);
            }
            add(Action::NewBranch);
            if has_selection {
                add(Action::DeleteBranch);
                add(Action::MergeBranch);
            }
        }
        PanelKind::Commits => {
            if has_selection {
                add(Action::ResetToCommit);
            }
        }
        PanelKind::Stash => {
            if has_selection {
                add(Action::StashApply);
                add(Action::StashPop);
                add(Action::StashDrop);
            }
        }
        PanelKind::Remotes => {
            if has_selection {
                add(Action::Fetch);
            }
        }
    }
    for action in [Action::Pull, Action::Push, Action::Help, Action::Quit] {
        add(action);
    }

    let discard_label = match store.files.selected() {
        Some(file) if file.tracked => "discard",
        _ => "delete",
    };

    actions
        .into_iter()
        .filter_map(|(action, label)| {
            let formatted = keys.format_keys(panel, action);
            let label = if action == Action::DiscardFile {
                discard_label
            } else {
                label
            };
            (!formatted.is_empty()).then(|| Hint {
                keys: formatted,
                label: label.to_string(),
            })
        })
        .collect()
}
