//! Item snapshots produced by the backend on every refresh
//!
//! Items are immutable: a refresh replaces them, it never edits one in place.
//! Each kind carries an identity that survives reordering, which is what the
//! panels use to keep the cursor on the same entry across refreshes.

use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};
use std::fmt;

const STAGED: Color = Color::Green;
const UNSTAGED: Color = Color::Red;
const DIM: Color = Color::DarkGray;

/// The entity kinds shown as panels, in focus-cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    /// Changed files in the working tree and index
    Files,
    /// Local branches
    Branches,
    /// Commits reachable from HEAD
    Commits,
    /// Stash entries
    Stash,
    /// Configured remotes
    Remotes,
}

impl PanelKind {
    /// Every panel kind, in the fixed focus order
    pub const ALL: [Self; 5] = [
        Self::Files,
        Self::Branches,
        Self::Commits,
        Self::Stash,
        Self::Remotes,
    ];

    /// Panel title shown in the border
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Files => "Files",
            Self::Branches => "Branches",
            Self::Commits => "Commits",
            Self::Stash => "Stash",
            Self::Remotes => "Remotes",
        }
    }

    /// Text shown in the main view when the panel is empty
    #[must_use]
    pub const fn empty_text(self) -> &'static str {
        match self {
            Self::Files => "No changed files",
            Self::Branches => "No branches",
            Self::Commits => "No commits",
            Self::Stash => "No stash entries",
            Self::Remotes => "No remotes",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Common behaviour of every item kind
pub trait Item: Clone + fmt::Debug + Send + 'static {
    /// Stable identity used to follow the item across refreshes
    fn identity(&self) -> &str;

    /// Plain display string
    fn display(&self) -> String;

    /// One styled line for the panel list
    fn line(&self) -> Line<'static> {
        Line::from(self.display())
    }
}

/// A changed file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct File {
    /// Path relative to the repository root
    pub name: String,
    /// Two-character porcelain status (`XY`)
    pub short_status: String,
    /// Whether git tracks the file
    pub tracked: bool,
    /// Whether the index differs from HEAD
    pub has_staged_changes: bool,
    /// Whether the working tree differs from the index
    pub has_unstaged_changes: bool,
    /// Whether the file is in a conflicted state
    pub has_merge_conflicts: bool,
    /// Whether the file was deleted
    pub deleted: bool,
}

impl Item for File {
    fn identity(&self) -> &str {
        &self.name
    }

    fn display(&self) -> String {
        format!("{} {}", self.short_status, self.name)
    }

    fn line(&self) -> Line<'static> {
        if !self.tracked && !self.has_staged_changes {
            return Line::from(Span::styled(self.display(), Style::default().fg(UNSTAGED)));
        }

        let mut status = self.short_status.chars();
        let index = status.next().unwrap_or(' ');
        let worktree = status.next().unwrap_or(' ');
        let name_color = if self.has_unstaged_changes {
            UNSTAGED
        } else {
            STAGED
        };

        Line::from(vec![
            Span::styled(index.to_string(), Style::default().fg(STAGED)),
            Span::styled(format!("{worktree} "), Style::default().fg(UNSTAGED)),
            Span::styled(self.name.clone(), Style::default().fg(name_color)),
        ])
    }
}

/// A local branch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch {
    /// Short branch name
    pub name: String,
    /// Whether HEAD points at this branch
    pub is_head: bool,
    /// Upstream in `remote/branch` form
    pub upstream: Option<String>,
    /// Seconds since the epoch of the tip commit, used for ordering
    pub last_commit_time: i64,
}

impl Item for Branch {
    fn identity(&self) -> &str {
        &self.name
    }

    fn display(&self) -> String {
        let marker = if self.is_head { "* " } else { "  " };
        self.upstream.as_ref().map_or_else(
            || format!("{marker}{}", self.name),
            |upstream| format!("{marker}{} -> {upstream}", self.name),
        )
    }

    fn line(&self) -> Line<'static> {
        let marker = if self.is_head { "* " } else { "  " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(STAGED)),
            Span::styled(
                self.name.clone(),
                Style::default().fg(if self.is_head { STAGED } else { Color::Reset }),
            ),
        ];
        if let Some(upstream) = &self.upstream {
            spans.push(Span::styled(
                format!(" -> {upstream}"),
                Style::default().fg(DIM),
            ));
        }
        Line::from(spans)
    }
}

/// A commit reachable from HEAD
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Commit {
    /// Full object id
    pub sha: String,
    /// Abbreviated object id
    pub short_sha: String,
    /// First line of the message
    pub summary: String,
    /// Author name
    pub author: String,
    /// Whether the upstream of HEAD already contains this commit
    pub pushed: bool,
}

impl Item for Commit {
    fn identity(&self) -> &str {
        &self.sha
    }

    fn display(&self) -> String {
        format!("{} {}", self.short_sha, self.summary)
    }

    fn line(&self) -> Line<'static> {
        let sha_color = if self.pushed { Color::Yellow } else { UNSTAGED };
        Line::from(vec![
            Span::styled(format!("{} ", self.short_sha), Style::default().fg(sha_color)),
            Span::raw(self.summary.clone()),
        ])
    }
}

/// A stash entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StashEntry {
    /// Position in the stash list (`stash@{index}`)
    pub index: usize,
    /// Stash message
    pub message: String,
    /// Object id of the stash commit
    pub oid: String,
}

impl StashEntry {
    /// Reference name understood by `git stash`
    #[must_use]
    pub fn reference(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }
}

impl Item for StashEntry {
    fn identity(&self) -> &str {
        &self.oid
    }

    fn display(&self) -> String {
        self.message.clone()
    }
}

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Remote {
    /// Remote name
    pub name: String,
    /// Fetch URL, if configured
    pub url: Option<String>,
}

impl Item for Remote {
    fn identity(&self) -> &str {
        &self.name
    }

    fn display(&self) -> String {
        self.name.clone()
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(self.name.clone())];
        if let Some(url) = &self.url {
            spans.push(Span::styled(format!(" {url}"), Style::default().fg(DIM)));
        }
        Line::from(spans)
    }
}

/// The result of one backend query, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Changed files plus whether a merge is in progress
    Files {
        /// Files in status order
        files: Vec<File>,
        /// Whether the repository is mid-merge
        merging: bool,
    },
    /// Local branches
    Branches(Vec<Branch>),
    /// Commits from HEAD
    Commits(Vec<Commit>),
    /// Stash entries
    Stash(Vec<StashEntry>),
    /// Remotes
    Remotes(Vec<Remote>),
}

impl Snapshot {
    /// The panel this snapshot belongs to
    #[must_use]
    pub const fn kind(&self) -> PanelKind {
        match self {
            Self::Files { .. } => PanelKind::Files,
            Self::Branches(_) => PanelKind::Branches,
            Self::Commits(_) => PanelKind::Commits,
            Self::Stash(_) => PanelKind::Stash,
            Self::Remotes(_) => PanelKind::Remotes,
        }
    }
}
