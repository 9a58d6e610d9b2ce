//! Branches, commits, stash entries and remotes read through libgit2

use crate::model::{Branch, Commit, Remote, StashEntry};
use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Oid, Repository, Sort};
use std::collections::HashSet;

/// Local branches: HEAD first, then most recently committed to
///
/// # Errors
///
/// Returns an error if the branch list cannot be read
pub fn branches(repo: &Repository) -> Result<Vec<Branch>> {
    let mut out = Vec::new();
    for entry in repo
        .branches(Some(BranchType::Local))
        .context("Failed to list branches")?
    {
        let (branch, _) = entry.context("Failed to read branch")?;
        let Some(name) = branch.name().ok().flatten().map(String::from) else {
            continue;
        };
        let upstream = branch
            .upstream()
            .ok()
            .and_then(|upstream| upstream.name().ok().flatten().map(String::from));
        let last_commit_time = branch
            .get()
            .peel_to_commit()
            .map(|commit| commit.time().seconds())
            .unwrap_or_default();

        out.push(Branch {
            name,
            is_head: branch.is_head(),
            upstream,
            last_commit_time,
        });
    }

    out.sort_by(|a, b| {
        b.is_head
            .cmp(&a.is_head)
            .then_with(|| b.last_commit_time.cmp(&a.last_commit_time))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(out)
}

/// Up to `limit` commits reachable from HEAD, newest first
///
/// A repository without commits yields an empty list.
///
/// # Errors
///
/// Returns an error if HEAD or the history cannot be read
pub fn commits(repo: &Repository, limit: usize) -> Result<Vec<Commit>> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).context("Failed to resolve HEAD"),
    };
    let head_oid = head.target().context("HEAD has no target")?;

    let upstream_oid = head
        .shorthand()
        .filter(|_| head.is_branch())
        .and_then(|name| repo.find_branch(name, BranchType::Local).ok())
        .and_then(|branch| branch.upstream().ok())
        .and_then(|upstream| upstream.get().target());
    let unpushed = unpushed_commits(repo, head_oid, upstream_oid)?;

    let mut walk = repo.revwalk().context("Failed to walk history")?;
    walk.push(head_oid)?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

    let mut out = Vec::new();
    for oid in walk.take(limit) {
        let oid = oid.context("Failed to walk history")?;
        let commit = repo.find_commit(oid)?;
        let sha = oid.to_string();
        out.push(Commit {
            short_sha: sha.chars().take(7).collect(),
            sha,
            summary: commit.summary().unwrap_or_default().to_string(),
            author: commit.author().name().unwrap_or_default().to_string(),
            pushed: upstream_oid.is_some() && !unpushed.contains(&oid),
        });
    }
    Ok(out)
}

fn unpushed_commits(repo: &Repository, head: Oid, upstream: Option<Oid>) -> Result<HashSet<Oid>> {
    let Some(upstream) = upstream else {
        return Ok(HashSet::new());
    };
    let mut walk = repo.revwalk()?;
    walk.push(head)?;
    walk.hide(upstream)?;
    walk.collect::<Result<HashSet<_>, _>>()
        .context("Failed to compare HEAD with its upstream")
}

/// Stash entries, most recent first
///
/// # Errors
///
/// Returns an error if the stash cannot be read
pub fn stash_entries(repo: &mut Repository) -> Result<Vec<StashEntry>> {
    let mut out = Vec::new();
    repo.stash_foreach(|index, message, oid| {
        out.push(StashEntry {
            index,
            message: message.to_string(),
            oid: oid.to_string(),
        });
        true
    })
    .context("Failed to list stash entries")?;
    Ok(out)
}

/// Configured remotes in name order
///
/// # Errors
///
/// Returns an error if the remote list cannot be read
pub fn remotes(repo: &Repository) -> Result<Vec<Remote>> {
    let names = repo.remotes().context("Failed to list remotes")?;
    let mut out: Vec<Remote> = names
        .iter()
        .flatten()
        .map(|name| Remote {
            name: name.to_string(),
            url: repo
                .find_remote(name)
                .ok()
                .and_then(|remote| remote.url().map(String::from)),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}
