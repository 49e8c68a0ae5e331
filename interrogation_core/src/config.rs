//! Director configuration.
//!
//! Loaded from TOML; every field has a default so a partial or missing file
//! still yields a working director.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::knowledge_base::DisclosureMode;
use crate::memory::DEFAULT_CONTEXT_TURNS;

/// Settings for one dialogue director.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Turns of recent transcript included in the prompt.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// How the disclosure gate handles withheld facts.
    #[serde(default)]
    pub disclosure_mode: DisclosureMode,

    /// Whether gate refusals that skip generation are kept in memory.
    #[serde(default = "default_true")]
    pub record_bypass_turns: bool,

    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            context_turns: DEFAULT_CONTEXT_TURNS,
            disclosure_mode: DisclosureMode::default(),
            record_bypass_turns: true,
            audit: AuditConfig::default(),
        }
    }
}

/// Per-turn audit dump settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Directory the dump files are written to.
    #[serde(default = "default_dump_dir")]
    pub dump_dir: PathBuf,

    /// Include the recent transcript section in each dump.
    #[serde(default = "default_true")]
    pub include_transcript: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dump_dir: default_dump_dir(),
            include_transcript: true,
        }
    }
}

fn default_context_turns() -> usize {
    DEFAULT_CONTEXT_TURNS
}

fn default_true() -> bool {
    true
}

fn default_dump_dir() -> PathBuf {
    PathBuf::from("PromptDumps")
}

impl DirectorConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Director configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}
