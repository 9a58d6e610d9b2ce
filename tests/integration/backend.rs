//! The git backend against real repositories

use crate::common::TestFixture;
use pretty_assertions::assert_eq;
use stagehand::git::{Backend, DiffTarget, Git, Operation};
use stagehand::model::{Branch, Commit, File, PanelKind, Remote, Snapshot, StashEntry};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn files(git: &Git) -> Result<(Vec<File>, bool), Box<dyn std::error::Error>> {
    match git.query(PanelKind::Files)? {
        Snapshot::Files { files, merging } => Ok((files, merging)),
        other => Err(format!("unexpected snapshot {other:?}").into()),
    }
}

fn file(git: &Git, name: &str) -> Result<File, Box<dyn std::error::Error>> {
    files(git)?
        .0
        .into_iter()
        .find(|file| file.name == name)
        .ok_or_else(|| format!("{name} not in status").into())
}

fn branches(git: &Git) -> Result<Vec<Branch>, Box<dyn std::error::Error>> {
    match git.query(PanelKind::Branches)? {
        Snapshot::Branches(branches) => Ok(branches),
        other => Err(format!("unexpected snapshot {other:?}").into()),
    }
}

fn commits(git: &Git) -> Result<Vec<Commit>, Box<dyn std::error::Error>> {
    match git.query(PanelKind::Commits)? {
        Snapshot::Commits(commits) => Ok(commits),
        other => Err(format!("unexpected snapshot {other:?}").into()),
    }
}

fn stash(git: &Git) -> Result<Vec<StashEntry>, Box<dyn std::error::Error>> {
    match git.query(PanelKind::Stash)? {
        Snapshot::Stash(entries) => Ok(entries),
        other => Err(format!("unexpected snapshot {other:?}").into()),
    }
}

fn remotes(git: &Git) -> Result<Vec<Remote>, Box<dyn std::error::Error>> {
    match git.query(PanelKind::Remotes)? {
        Snapshot::Remotes(remotes) => Ok(remotes),
        other => Err(format!("unexpected snapshot {other:?}").into()),
    }
}

#[test]
fn test_status_reports_untracked_and_modified() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("notes.txt", "hello\n")?;
    fixture.write("README.md", "# Changed\n")?;
    let git = fixture.git()?;

    let (listed, merging) = files(&git)?;
    assert!(!merging);
    assert_eq!(listed.len(), 2);

    let notes = file(&git, "notes.txt")?;
    assert_eq!(notes.short_status, "??");
    assert!(!notes.tracked);

    let readme = file(&git, "README.md")?;
    assert_eq!(readme.short_status, " M");
    assert!(readme.tracked);
    assert!(readme.has_unstaged_changes);
    assert!(!readme.has_staged_changes);
    Ok(())
}

#[test]
fn test_stage_and_unstage_new_file() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("notes.txt", "hello\n")?;
    let git = fixture.git()?;

    git.execute(&Operation::Stage {
        name: "notes.txt".to_string(),
    })?;
    let staged = file(&git, "notes.txt")?;
    assert_eq!(staged.short_status, "A ");
    assert!(staged.has_staged_changes);

    git.execute(&Operation::Unstage {
        name: "notes.txt".to_string(),
        added: true,
    })?;
    assert_eq!(file(&git, "notes.txt")?.short_status, "??");
    Ok(())
}

#[test]
fn test_commit_appears_first_in_history() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "# Changed\n")?;
    let git = fixture.git()?;

    git.execute(&Operation::Stage {
        name: "README.md".to_string(),
    })?;
    git.execute(&Operation::Commit {
        message: "Update readme".to_string(),
    })?;

    let history = commits(&git)?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].summary, "Update readme");
    assert_eq!(history[1].summary, "Initial commit");
    assert!(files(&git)?.0.is_empty());
    Ok(())
}

#[test]
fn test_discard_restores_tracked_and_deletes_untracked() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "# Changed\n")?;
    fixture.write("scratch.txt", "tmp\n")?;
    let git = fixture.git()?;

    let readme = file(&git, "README.md")?;
    git.execute(&Operation::DiscardFile { file: readme })?;
    assert_eq!(fixture.read("README.md")?, "# Test Repository\n");

    let scratch = file(&git, "scratch.txt")?;
    git.execute(&Operation::DiscardFile { file: scratch })?;
    assert!(!fixture.exists("scratch.txt"));
    Ok(())
}

#[test]
fn test_discard_unstaged_keeps_staged_part() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "staged\n")?;
    fixture.git_cmd(&["add", "README.md"])?;
    fixture.write("README.md", "staged\nunstaged\n")?;
    let git = fixture.git()?;

    let readme = file(&git, "README.md")?;
    assert!(readme.has_staged_changes && readme.has_unstaged_changes);

    git.execute(&Operation::DiscardUnstaged {
        name: "README.md".to_string(),
    })?;
    assert_eq!(fixture.read("README.md")?, "staged\n");
    assert_eq!(file(&git, "README.md")?.short_status, "M ");
    Ok(())
}

#[test]
fn test_branch_create_checkout_delete() -> TestResult {
    let fixture = TestFixture::new()?;
    let git = fixture.git()?;

    git.execute(&Operation::CreateBranch {
        name: "feature".to_string(),
    })?;
    let listed = branches(&git)?;
    assert_eq!(listed[0].name, "feature");
    assert!(listed[0].is_head);
    assert_eq!(listed.len(), 2);

    git.execute(&Operation::Checkout {
        branch: "master".to_string(),
    })?;
    assert_eq!(branches(&git)?[0].name, "master");

    git.execute(&Operation::DeleteBranch {
        name: "feature".to_string(),
    })?;
    let names: Vec<String> = branches(&git)?.into_iter().map(|b| b.name).collect();
    assert_eq!(names, vec!["master".to_string()]);
    Ok(())
}

#[test]
fn test_stash_save_and_pop() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "# Work in progress\n")?;
    let git = fixture.git()?;

    git.execute(&Operation::StashSave {
        message: "wip".to_string(),
    })?;
    let entries = stash(&git)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 0);
    assert!(entries[0].message.contains("wip"));
    assert!(files(&git)?.0.is_empty());

    git.execute(&Operation::StashPop { index: 0 })?;
    assert!(stash(&git)?.is_empty());
    assert_eq!(fixture.read("README.md")?, "# Work in progress\n");
    Ok(())
}

#[test]
fn test_merge_conflict_and_abort() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.git_cmd(&["checkout", "-b", "other"])?;
    fixture.write("README.md", "other side\n")?;
    fixture.commit_all("Other change")?;
    fixture.git_cmd(&["checkout", "master"])?;
    fixture.write("README.md", "master side\n")?;
    fixture.commit_all("Master change")?;
    let git = fixture.git()?;

    let merged = git.execute(&Operation::MergeBranch {
        name: "other".to_string(),
    });
    assert!(merged.is_err());

    let (listed, merging) = files(&git)?;
    assert!(merging);
    let readme = listed
        .iter()
        .find(|file| file.name == "README.md")
        .ok_or("README.md not in status")?;
    assert!(readme.has_merge_conflicts);
    assert_eq!(readme.short_status, "UU");

    git.execute(&Operation::AbortMerge)?;
    let (listed, merging) = files(&git)?;
    assert!(!merging);
    assert!(listed.is_empty());
    Ok(())
}

#[test]
fn test_reset_to_commit_keeps_working_tree() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "# Second\n")?;
    fixture.commit_all("Second")?;
    let git = fixture.git()?;

    let history = commits(&git)?;
    let first = history[1].sha.clone();
    git.execute(&Operation::ResetToCommit { sha: first })?;

    assert_eq!(commits(&git)?.len(), 1);
    assert_eq!(fixture.read("README.md")?, "# Second\n");
    assert_eq!(file(&git, "README.md")?.short_status, " M");
    Ok(())
}

#[test]
fn test_remotes_are_listed() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.git_cmd(&["remote", "add", "origin", "https://example.com/repo.git"])?;
    let git = fixture.git()?;

    let listed = remotes(&git)?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "origin");
    assert_eq!(
        listed[0].url.as_deref(),
        Some("https://example.com/repo.git")
    );
    Ok(())
}

#[test]
fn test_file_diff_shows_change() -> TestResult {
    let fixture = TestFixture::new()?;
    fixture.write("README.md", "# Test Repository\nnew line\n")?;
    let git = fixture.git()?;

    let text = git.diff(&DiffTarget::File {
        name: "README.md".to_string(),
        tracked: true,
        conflicted: false,
    })?;
    assert!(text.contains("new line"));
    Ok(())
}

#[test]
fn test_failed_command_reports_git_output() -> TestResult {
    let fixture = TestFixture::new()?;
    let git = fixture.git()?;

    let error = git
        .execute(&Operation::Checkout {
            branch: "does-not-exist".to_string(),
        })
        .err()
        .ok_or("checkout should fail")?;
    assert!(format!("{error:#}").contains("does-not-exist"));
    Ok(())
}
