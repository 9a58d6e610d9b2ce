//! Stagehand - a terminal dashboard for git
//!
//! Stagehand shows the files, branches, commits, stash entries and remotes of
//! a repository as synchronized list panels. Slow queries run in the
//! background, and interactive tools (editors, `git add --patch`,
//! `git mergetool`) get the whole terminal while they run.

pub mod app;
pub mod command;
pub mod config;
pub mod git;
pub mod model;
pub mod tui;

pub use app::App;
pub use config::Config;
