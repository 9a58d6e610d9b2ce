//! Test fixture for setting up temporary git repositories

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use git2::{Repository, RepositoryInitOptions, Signature};
use stagehand::config::Config;
use stagehand::git::Git;
use tempfile::TempDir;

/// Test fixture that sets up a temporary git repository with one commit
pub struct TestFixture {
    /// Temporary directory containing the git repo
    _temp_dir: TempDir,
    /// Path to the git repository
    pub repo_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        // Canonicalize to handle symlinked temp dirs.
        let repo_path = temp_dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| temp_dir.path().to_path_buf());

        // Pin the default branch so tests don't depend on the user's init config.
        let mut init_opts = RepositoryInitOptions::new();
        init_opts.initial_head("master");
        let repo = Repository::init_opts(&repo_path, &init_opts)?;
        repo.set_head("refs/heads/master")?;

        // The git CLI needs an identity for commits and stashes.
        let mut config = repo.config()?;
        config.set_str("user.name", "Test")?;
        config.set_str("user.email", "test@test.com")?;

        fs::write(repo_path.join("README.md"), "# Test Repository\n")?;
        let sig = Signature::now("Test", "test@test.com")?;
        let mut index = repo.index()?;
        index.add_path(Path::new("README.md"))?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;

        Ok(Self {
            _temp_dir: temp_dir,
            repo_path,
        })
    }

    /// Backend over the fixture repository
    pub fn git(&self) -> Result<Git, Box<dyn std::error::Error>> {
        Ok(Git::discover(&self.repo_path, &Config::default())?)
    }

    pub fn write(&self, name: &str, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
        let path = self.repo_path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<String, Box<dyn std::error::Error>> {
        Ok(fs::read_to_string(self.repo_path.join(name))?)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.repo_path.join(name).exists()
    }

    /// Run git in the fixture and return stdout
    pub fn git_cmd(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;
        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).into_owned().into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.git_cmd(&["add", "-A"])?;
        self.git_cmd(&["commit", "-m", message])?;
        Ok(())
    }
}
