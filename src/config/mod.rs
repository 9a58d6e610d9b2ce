//! Configuration management for Stagehand

mod keys;

pub use keys::{Action, KeyBindings, key_to_string};

use crate::model::PanelKind;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// How long the event loop waits for input before ticking, in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Interval between background refreshes of the files panel, in milliseconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// Maximum number of commits loaded into the commits panel
    #[serde(default = "default_commit_limit")]
    pub commit_limit: usize,

    /// Editor command line; falls back to `$VISUAL`, then `$EDITOR`, then `vi`
    #[serde(default)]
    pub editor: Option<String>,

    /// Command used to open files; falls back to the platform opener
    #[serde(default)]
    pub open_command: Option<String>,

    /// Panels to show, in focus order
    #[serde(default = "default_panels")]
    pub panels: Vec<PanelKind>,

    /// Keybindings configuration
    #[serde(default)]
    pub keys: KeyBindings,
}

const fn default_tick_rate() -> u64 {
    100
}

const fn default_refresh_interval() -> u64 {
    10_000
}

const fn default_commit_limit() -> usize {
    300
}

fn default_panels() -> Vec<PanelKind> {
    PanelKind::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            refresh_interval_ms: default_refresh_interval(),
            commit_limit: default_commit_limit(),
            editor: None,
            open_command: None,
            panels: default_panels(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if reading, parsing or validating the config file fails
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.keys.merge_defaults();
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stagehand")
            .join("config.json")
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if the panel list is empty, lacks the files panel, or
    /// repeats a panel
    pub fn validate(&self) -> Result<()> {
        if !self.panels.contains(&PanelKind::Files) {
            bail!("`panels` must include \"files\"");
        }
        for (i, kind) in self.panels.iter().enumerate() {
            if self.panels[..i].contains(kind) {
                bail!("`panels` lists \"{kind}\" more than once");
            }
        }
        if self.tick_rate_ms == 0 {
            bail!("`tick_rate_ms` must be positive");
        }
        Ok(())
    }

    /// Editor command line used for file edits
    #[must_use]
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|editor| !editor.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Command line used to open files without blocking
    #[must_use]
    pub fn open_command(&self) -> String {
        self.open_command.clone().unwrap_or_else(|| {
            if cfg!(target_os = "macos") {
                "open".to_string()
            } else {
                "xdg-open".to_string()
            }
        })
    }
}
