//! In-memory snapshot of every panel and the main view
//!
//! Written only from the main loop: by [`Store::apply`] during the refresh
//! drain, or by synchronous handlers.

use crate::git::DiffTarget;
use crate::model::{Branch, Commit, File, PanelKind, Remote, Snapshot, StashEntry};
use ansi_to_tui::IntoText;
use ratatui::text::Text;
use std::collections::HashMap;

use super::panel::{Panel, PanelView};

/// Contents of the detail pane
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainView {
    /// Border title
    pub title: String,
    /// Styled text, ANSI colours already converted
    pub text: Text<'static>,
    /// Vertical scroll offset
    pub scroll: u16,
}

impl MainView {
    /// Build from git output that may contain ANSI colour codes
    #[must_use]
    pub fn new(title: impl Into<String>, raw: &str) -> Self {
        let text = raw
            .into_text()
            .unwrap_or_else(|_| Text::raw(raw.to_string()));
        Self {
            title: title.into(),
            text,
            scroll: 0,
        }
    }

    /// Scroll by `delta` lines, clamped to the text height
    pub fn scroll_by(&mut self, delta: i32) {
        let max = u16::try_from(self.text.lines.len().saturating_sub(1)).unwrap_or(u16::MAX);
        let next = i32::from(self.scroll).saturating_add(delta).clamp(0, i32::from(max));
        self.scroll = u16::try_from(next).unwrap_or(0);
    }

    /// Plain text, for tests and logging
    #[must_use]
    pub fn plain(&self) -> String {
        self.text
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// All panel data plus cross-cutting flags
#[derive(Debug, Default)]
pub struct Store {
    /// Changed files
    pub files: Panel<File>,
    /// Local branches
    pub branches: Panel<Branch>,
    /// Commits from HEAD
    pub commits: Panel<Commit>,
    /// Stash entries
    pub stash: Panel<StashEntry>,
    /// Remotes
    pub remotes: Panel<Remote>,
    has_merge_conflicts: bool,
    main: MainView,
    status: Option<String>,
}

impl Store {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a query result into its panel
    pub fn apply(&mut self, snapshot: Snapshot) {
        match snapshot {
            Snapshot::Files { files, merging } => {
                let files = keep_order(self.files.items(), files);
                self.files.replace(files);
                self.set_merge_conflicts(merging);
            }
            Snapshot::Branches(items) => self.branches.replace(items),
            Snapshot::Commits(items) => self.commits.replace(items),
            Snapshot::Stash(items) => self.stash.replace(items),
            Snapshot::Remotes(items) => self.remotes.replace(items),
        }
    }

    /// Current contents of one panel
    #[must_use]
    pub fn snapshot(&self, kind: PanelKind) -> Snapshot {
        match kind {
            PanelKind::Files => Snapshot::Files {
                files: self.files.items().to_vec(),
                merging: self.has_merge_conflicts,
            },
            PanelKind::Branches => Snapshot::Branches(self.branches.items().to_vec()),
            PanelKind::Commits => Snapshot::Commits(self.commits.items().to_vec()),
            PanelKind::Stash => Snapshot::Stash(self.stash.items().to_vec()),
            PanelKind::Remotes => Snapshot::Remotes(self.remotes.items().to_vec()),
        }
    }

    /// Kind-erased panel
    #[must_use]
    pub fn panel(&self, kind: PanelKind) -> &dyn PanelView {
        match kind {
            PanelKind::Files => &self.files,
            PanelKind::Branches => &self.branches,
            PanelKind::Commits => &self.commits,
            PanelKind::Stash => &self.stash,
            PanelKind::Remotes => &self.remotes,
        }
    }

    /// Kind-erased panel, mutable
    pub fn panel_mut(&mut self, kind: PanelKind) -> &mut dyn PanelView {
        match kind {
            PanelKind::Files => &mut self.files,
            PanelKind::Branches => &mut self.branches,
            PanelKind::Commits => &mut self.commits,
            PanelKind::Stash => &mut self.stash,
            PanelKind::Remotes => &mut self.remotes,
        }
    }

    /// Whether the repository is mid-merge
    #[must_use]
    pub const fn has_merge_conflicts(&self) -> bool {
        self.has_merge_conflicts
    }

    /// Set the merge flag
    pub fn set_merge_conflicts(&mut self, merging: bool) {
        if merging != self.has_merge_conflicts {
            tracing::debug!(merging, "Merge state changed");
        }
        self.has_merge_conflicts = merging;
    }

    /// Detail pane contents
    #[must_use]
    pub const fn main(&self) -> &MainView {
        &self.main
    }

    /// Detail pane contents, mutable
    pub fn main_mut(&mut self) -> &mut MainView {
        &mut self.main
    }

    /// Replace the detail pane
    pub fn set_main(&mut self, main: MainView) {
        self.main = main;
    }

    /// Inline status message
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Show an inline status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Remove the inline status message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// The checked-out branch
    #[must_use]
    pub fn current_branch(&self) -> Option<&Branch> {
        self.branches.items().iter().find(|branch| branch.is_head)
    }

    /// Whether anything is staged
    #[must_use]
    pub fn any_staged(&self) -> bool {
        self.files.items().iter().any(|file| file.has_staged_changes)
    }

    /// Whether any tracked or staged file has changes worth stashing
    #[must_use]
    pub fn any_tracked_changes(&self) -> bool {
        self.files
            .items()
            .iter()
            .any(|file| file.tracked || file.has_staged_changes)
    }

    /// What the main view should show for the selection in `kind`
    #[must_use]
    pub fn diff_target(&self, kind: PanelKind) -> Option<(String, DiffTarget)> {
        match kind {
            PanelKind::Files => self.files.selected().map(|file| {
                (
                    file.name.clone(),
                    DiffTarget::File {
                        name: file.name.clone(),
                        tracked: file.tracked,
                        conflicted: file.has_merge_conflicts,
                    },
                )
            }),
            PanelKind::Branches => self.branches.selected().map(|branch| {
                (
                    branch.name.clone(),
                    DiffTarget::Branch {
                        name: branch.name.clone(),
                    },
                )
            }),
            PanelKind::Commits => self.commits.selected().map(|commit| {
                (
                    commit.short_sha.clone(),
                    DiffTarget::Commit {
                        sha: commit.sha.clone(),
                    },
                )
            }),
            PanelKind::Stash => self.stash.selected().map(|entry| {
                (
                    entry.reference(),
                    DiffTarget::Stash { index: entry.index },
                )
            }),
            PanelKind::Remotes => self.remotes.selected().map(|remote| {
                (
                    remote.name.clone(),
                    DiffTarget::Remote {
                        name: remote.name.clone(),
                    },
                )
            }),
        }
    }
}

/// Keep surviving files in their previous order and append new ones
fn keep_order(previous: &[File], incoming: Vec<File>) -> Vec<File> {
    let order: Vec<usize> = {
        let positions: HashMap<&str, usize> = incoming
            .iter()
            .enumerate()
            .map(|(i, file)| (file.name.as_str(), i))
            .collect();
        let mut taken = vec![false; incoming.len()];
        let mut order = Vec::with_capacity(incoming.len());
        for file in previous {
            if let Some(&i) = positions.get(file.name.as_str()) {
                if !taken[i] {
                    taken[i] = true;
                    order.push(i);
                }
            }
        }
        order.extend((0..incoming.len()).filter(|i| !taken[*i]));
        order
    };

    let mut slots: Vec<Option<File>> = incoming.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
