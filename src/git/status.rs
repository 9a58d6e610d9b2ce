//! Working tree status as [`File`] items

use crate::model::File;
use anyhow::{Context, Result};
use git2::{Repository, RepositoryState, Status, StatusOptions};

const INDEX_CHANGED: Status = Status::INDEX_NEW
    .union(Status::INDEX_MODIFIED)
    .union(Status::INDEX_DELETED)
    .union(Status::INDEX_RENAMED)
    .union(Status::INDEX_TYPECHANGE);

const WORKTREE_CHANGED: Status = Status::WT_NEW
    .union(Status::WT_MODIFIED)
    .union(Status::WT_DELETED)
    .union(Status::WT_RENAMED)
    .union(Status::WT_TYPECHANGE);

/// List changed files, in path order
///
/// # Errors
///
/// Returns an error if the status cannot be read
pub fn files(repo: &Repository) -> Result<Vec<File>> {
    let mut options = StatusOptions::new();
    options
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);

    let statuses = repo
        .statuses(Some(&mut options))
        .context("Failed to read repository status")?;

    Ok(statuses
        .iter()
        .filter_map(|entry| entry.path().map(|path| file_from_status(path, entry.status())))
        .collect())
}

/// Whether a merge is in progress
#[must_use]
pub fn is_merging(repo: &Repository) -> bool {
    repo.state() == RepositoryState::Merge
}

/// Build a [`File`] from a libgit2 status bitset
#[must_use]
pub fn file_from_status(name: &str, status: Status) -> File {
    let conflicted = status.contains(Status::CONFLICTED);
    let untracked = status.contains(Status::WT_NEW) && !status.intersects(INDEX_CHANGED);

    File {
        name: name.to_string(),
        short_status: short_status(status),
        tracked: !untracked,
        has_staged_changes: status.intersects(INDEX_CHANGED),
        has_unstaged_changes: conflicted || status.intersects(WORKTREE_CHANGED),
        has_merge_conflicts: conflicted,
        deleted: status.intersects(Status::INDEX_DELETED | Status::WT_DELETED),
    }
}

fn short_status(status: Status) -> String {
    if status.contains(Status::CONFLICTED) {
        return "UU".to_string();
    }
    if status.contains(Status::WT_NEW) && !status.intersects(INDEX_CHANGED) {
        return "??".to_string();
    }

    let index = if status.contains(Status::INDEX_NEW) {
        'A'
    } else if status.contains(Status::INDEX_MODIFIED) {
        'M'
    } else if status.contains(Status::INDEX_DELETED) {
        'D'
    } else if status.contains(Status::INDEX_RENAMED) {
        'R'
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else {
        ' '
    };

    let worktree = if status.contains(Status::WT_MODIFIED) {
        'M'
    } else if status.contains(Status::WT_DELETED) {
        'D'
    } else if status.contains(Status::WT_RENAMED) {
        'R'
    } else if status.contains(Status::WT_TYPECHANGE) {
        'T'
    } else {
        ' '
    };

    [index, worktree].iter().collect()
}
