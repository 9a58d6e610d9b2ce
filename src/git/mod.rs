//! Git backend
//!
//! The dashboard talks to the repository only through the [`Backend`] trait.
//! [`Git`] implements it: snapshots are read with libgit2, state-changing
//! commands and diffs go through the `git` executable so they honour the
//! user's hooks and configuration.

mod cli;
mod refs;
mod status;

pub use cli::{git_command, git_output, git_run};
pub use status::file_from_status;

use crate::command::CommandSpec;
use crate::config::Config;
use crate::model::{File, PanelKind, Snapshot};
use anyhow::{Context, Result};
use git2::Repository;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// State-changing commands run synchronously from handlers or as background tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `git add`
    Stage {
        /// File path
        name: String,
    },
    /// Remove a file from the index
    Unstage {
        /// File path
        name: String,
        /// Whether the file is new in the index (no HEAD version to reset to)
        added: bool,
    },
    /// Throw away every change to a file, deleting it if git never tracked it
    DiscardFile {
        /// The file as last seen
        file: File,
    },
    /// Throw away only the unstaged part of a file's changes
    DiscardUnstaged {
        /// File path
        name: String,
    },
    /// `git reset --hard HEAD`
    ResetHard,
    /// Append a path to `.gitignore`
    Ignore {
        /// File path
        name: String,
    },
    /// Commit the index
    Commit {
        /// Commit message
        message: String,
    },
    /// Stash all changes
    StashSave {
        /// Optional stash message
        message: String,
    },
    /// Apply a stash entry
    StashApply {
        /// Stash index
        index: usize,
    },
    /// Pop a stash entry
    StashPop {
        /// Stash index
        index: usize,
    },
    /// Drop a stash entry
    StashDrop {
        /// Stash index
        index: usize,
    },
    /// `git merge --abort`
    AbortMerge,
    /// Check out a branch
    Checkout {
        /// Branch name
        branch: String,
    },
    /// Create and check out a branch from HEAD
    CreateBranch {
        /// Branch name
        name: String,
    },
    /// Delete a fully merged branch
    DeleteBranch {
        /// Branch name
        name: String,
    },
    /// Merge a branch into the current one
    MergeBranch {
        /// Branch name
        name: String,
    },
    /// Move the current branch to a commit, keeping the working tree
    ResetToCommit {
        /// Commit id
        sha: String,
    },
    /// `git pull`
    Pull,
    /// Push the current branch, setting its upstream on first push
    Push {
        /// Current branch name
        branch: String,
        /// Whether the branch already tracks an upstream
        has_upstream: bool,
    },
    /// `git fetch <remote>`
    Fetch {
        /// Remote name
        remote: String,
    },
    /// Open a file with the configured opener without waiting for it
    Open {
        /// File path
        name: String,
    },
}

impl Operation {
    /// Progress message shown while the operation runs in the background
    #[must_use]
    pub fn progress_label(&self) -> String {
        match self {
            Self::Pull => "Pulling...".to_string(),
            Self::Push { branch, .. } => format!("Pushing {branch}..."),
            Self::Fetch { remote } => format!("Fetching {remote}..."),
            _ => "Working...".to_string(),
        }
    }
}

/// Interactive programs that take over the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interactive {
    /// `git commit` with the user's commit editor
    CommitEditor,
    /// `git add --patch` for one file
    AddPatch {
        /// File path
        name: String,
    },
    /// The configured editor on one file
    Edit {
        /// File path
        name: String,
    },
    /// `git mergetool` for one file
    MergeTool {
        /// File path
        name: String,
    },
}

/// What the main view should show a diff for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTarget {
    /// A changed file
    File {
        /// File path
        name: String,
        /// Whether git tracks it
        tracked: bool,
        /// Whether it has conflict markers
        conflicted: bool,
    },
    /// History of a branch
    Branch {
        /// Branch name
        name: String,
    },
    /// One commit
    Commit {
        /// Commit id
        sha: String,
    },
    /// One stash entry
    Stash {
        /// Stash index
        index: usize,
    },
    /// Remote-tracking branches of a remote
    Remote {
        /// Remote name
        name: String,
    },
}

/// The repository as seen by the dashboard
///
/// Implementations must be callable from background threads: queries and
/// diffs run off the main loop.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Read the current items of one panel kind
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be read
    fn query(&self, kind: PanelKind) -> Result<Snapshot>;

    /// Run a state-changing command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails
    fn execute(&self, operation: &Operation) -> Result<()>;

    /// Produce the main view text for a target
    ///
    /// # Errors
    ///
    /// Returns an error if the diff cannot be produced
    fn diff(&self, target: &DiffTarget) -> Result<String>;

    /// Describe the process to hand the terminal to
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be built (for example a
    /// malformed editor setting)
    fn interactive(&self, request: &Interactive) -> Result<CommandSpec>;
}

/// [`Backend`] for a repository on disk
#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
    commit_limit: usize,
    editor: String,
    opener: String,
}

impl Git {
    /// Find the repository containing `path`
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not inside a git work tree
    pub fn discover(path: &Path, config: &Config) -> Result<Self> {
        let repo = open_repository(path)?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .context("Repository has no working directory")?;
        Ok(Self {
            root,
            commit_limit: config.commit_limit,
            editor: config.editor_command(),
            opener: config.open_command(),
        })
    }

    /// Root of the working tree
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self) -> Result<Repository> {
        open_repository(&self.root)
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        git_run(&self.root, args)
    }

    fn output(&self, args: &[&str]) -> Result<String> {
        git_output(&self.root, args)
    }

    fn unstage(&self, name: &str, added: bool) -> Result<()> {
        if added {
            self.run(&["rm", "--cached", "--force", "--", name])
        } else {
            self.run(&["reset", "--quiet", "HEAD", "--", name])
        }
    }

    fn discard(&self, file: &File) -> Result<()> {
        let added = file.short_status.starts_with('A');
        if file.has_staged_changes {
            self.unstage(&file.name, added)?;
        }
        if file.tracked && !added {
            self.run(&["checkout", "--", &file.name])
        } else {
            let path = self.root.join(&file.name);
            if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            }
            .with_context(|| format!("Failed to delete {}", path.display()))
        }
    }

    fn ignore(&self, name: &str) -> Result<()> {
        let path = self.root.join(".gitignore");
        let needs_newline = fs::read_to_string(&path)
            .map(|contents| !contents.is_empty() && !contents.ends_with('\n'))
            .unwrap_or(false);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{name}").with_context(|| format!("Failed to write {}", path.display()))
    }

    fn open_file(&self, name: &str) -> Result<()> {
        let spec = CommandSpec::from_command_line(&self.opener)?
            .arg(name)
            .current_dir(&self.root);
        spec.to_command()
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to run {spec}"))?;
        Ok(())
    }

    fn file_diff(&self, name: &str, tracked: bool, conflicted: bool) -> Result<String> {
        if conflicted || !tracked {
            let path = self.root.join(name);
            if path.is_dir() {
                return Ok(format!("{name} is a directory"));
            }
            let bytes =
                fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }
        self.output(&["diff", "--color=always", "HEAD", "--", name])
            .or_else(|_| self.output(&["diff", "--color=always", "--cached", "--", name]))
    }
}

impl Backend for Git {
    fn query(&self, kind: PanelKind) -> Result<Snapshot> {
        let mut repo = self.open()?;
        let snapshot = match kind {
            PanelKind::Files => Snapshot::Files {
                files: status::files(&repo)?,
                merging: status::is_merging(&repo),
            },
            PanelKind::Branches => Snapshot::Branches(refs::branches(&repo)?),
            PanelKind::Commits => Snapshot::Commits(refs::commits(&repo, self.commit_limit)?),
            PanelKind::Stash => Snapshot::Stash(refs::stash_entries(&mut repo)?),
            PanelKind::Remotes => Snapshot::Remotes(refs::remotes(&repo)?),
        };
        Ok(snapshot)
    }

    fn execute(&self, operation: &Operation) -> Result<()> {
        tracing::debug!(?operation, "Executing git operation");
        match operation {
            Operation::Stage { name } => self.run(&["add", "--", name]),
            Operation::Unstage { name, added } => self.unstage(name, *added),
            Operation::DiscardFile { file } => self.discard(file),
            Operation::DiscardUnstaged { name } => self.run(&["checkout", "--", name]),
            Operation::ResetHard => self.run(&["reset", "--hard", "HEAD"]),
            Operation::Ignore { name } => self.ignore(name),
            Operation::Commit { message } => self.run(&["commit", "-m", message]),
            Operation::StashSave { message } => {
                if message.trim().is_empty() {
                    self.run(&["stash", "push"])
                } else {
                    self.run(&["stash", "push", "-m", message])
                }
            }
            Operation::StashApply { index } => {
                self.run(&["stash", "apply", &format!("stash@{{{index}}}")])
            }
            Operation::StashPop { index } => {
                self.run(&["stash", "pop", &format!("stash@{{{index}}}")])
            }
            Operation::StashDrop { index } => {
                self.run(&["stash", "drop", &format!("stash@{{{index}}}")])
            }
            Operation::AbortMerge => self.run(&["merge", "--abort"]),
            Operation::Checkout { branch } => self.run(&["checkout", branch]),
            Operation::CreateBranch { name } => self.run(&["checkout", "-b", name]),
            Operation::DeleteBranch { name } => self.run(&["branch", "-d", name]),
            Operation::MergeBranch { name } => self.run(&["merge", "--no-edit", name]),
            Operation::ResetToCommit { sha } => self.run(&["reset", sha]),
            Operation::Pull => self.run(&["pull", "--no-edit"]),
            Operation::Push {
                branch,
                has_upstream,
            } => {
                if *has_upstream {
                    self.run(&["push"])
                } else {
                    self.run(&["push", "--set-upstream", "origin", branch])
                }
            }
            Operation::Fetch { remote } => self.run(&["fetch", remote]),
            Operation::Open { name } => self.open_file(name),
        }
    }

    fn diff(&self, target: &DiffTarget) -> Result<String> {
        match target {
            DiffTarget::File {
                name,
                tracked,
                conflicted,
            } => self.file_diff(name, *tracked, *conflicted),
            DiffTarget::Branch { name } => self.output(&[
                "log",
                "--color=always",
                "--graph",
                "--oneline",
                "-n",
                "100",
                name,
                "--",
            ]),
            DiffTarget::Commit { sha } => {
                self.output(&["show", "--color=always", "--stat", "-p", sha])
            }
            DiffTarget::Stash { index } => self.output(&[
                "stash",
                "show",
                "--color=always",
                "-p",
                &format!("stash@{{{index}}}"),
            ]),
            DiffTarget::Remote { name } => {
                let pattern = format!("{name}/*");
                let branches = self.output(&["branch", "-r", "--list", &pattern])?;
                if branches.trim().is_empty() {
                    Ok(format!("No remote branches for {name}"))
                } else {
                    Ok(branches)
                }
            }
        }
    }

    fn interactive(&self, request: &Interactive) -> Result<CommandSpec> {
        let spec = match request {
            Interactive::CommitEditor => CommandSpec::new("git").arg("commit"),
            Interactive::AddPatch { name } => {
                CommandSpec::new("git").args(["add", "--patch", "--", name.as_str()])
            }
            Interactive::Edit { name } => CommandSpec::from_command_line(&self.editor)
                .with_context(|| format!("Invalid editor command '{}'", self.editor))?
                .arg(name.as_str()),
            Interactive::MergeTool { name } => {
                CommandSpec::new("git").args(["mergetool", "--", name.as_str()])
            }
        };
        Ok(spec.current_dir(&self.root))
    }
}

/// Open a git repository at the given path
///
/// # Errors
///
/// Returns an error if the path is not a git repository
pub fn open_repository(path: &Path) -> Result<Repository> {
    Repository::discover(path)
        .with_context(|| format!("Failed to open git repository at {}", path.display()))
}

/// Check if a path is inside a git repository
#[must_use]
pub fn is_git_repository(path: &Path) -> bool {
    Repository::discover(path).is_ok()
}
