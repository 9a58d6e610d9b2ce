//! Helpers for running the `git` executable

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Command, Stdio};

/// A `git` command that never prompts on the terminal
///
/// Background commands (pull, push, fetch) must not ask for credentials while
/// the dashboard owns the screen.
pub fn git_command() -> Command {
    let mut command = Command::new("git");
    command
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null());
    command
}

/// Run `git args...` in `root` and return stdout
///
/// # Errors
///
/// Returns an error if git cannot be spawned or exits unsuccessfully; the
/// message carries git's stderr.
pub fn git_output(root: &Path, args: &[&str]) -> Result<String> {
    let output = git_command()
        .args(args)
        .current_dir(root)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        bail!("git {} failed: {detail}", args.join(" "));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run `git args...` in `root`, discarding stdout
///
/// # Errors
///
/// Returns an error if git cannot be spawned or exits unsuccessfully
pub fn git_run(root: &Path, args: &[&str]) -> Result<()> {
    git_output(root, args).map(|_| ())
}
