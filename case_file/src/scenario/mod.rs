//! Scenario data - investigation state and knowledge loaded once at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::investigation::{InvestigationState, MAX_SCORE};
use crate::knowledge::{KnowledgeEntry, KnowledgeTopic};

/// Errors raised while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML scenario: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported scenario format: {0}")]
    UnsupportedFormat(String),

    #[error("duplicate knowledge entry for topic {0}")]
    DuplicateTopic(KnowledgeTopic),

    #[error("{field} is {value}, expected 0-100")]
    ScoreOutOfRange { field: String, value: u8 },
}

/// The complete static configuration of an interrogation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scenario {
    #[serde(default)]
    pub investigation: InvestigationState,

    #[serde(default)]
    pub knowledge: Vec<KnowledgeEntry>,
}

impl Scenario {
    /// Load a scenario from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        let scenario = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(ScenarioError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        info!(
            path = %path.display(),
            entries = scenario.knowledge.len(),
            phase = %scenario.investigation.phase(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Parse and validate a TOML scenario.
    pub fn from_toml_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse and validate a JSON scenario.
    pub fn from_json_str(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check topic uniqueness and score ranges.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let state = &self.investigation;
        if state.trust() > MAX_SCORE {
            return Err(out_of_range("investigation.trust", state.trust()));
        }
        if state.progress() > MAX_SCORE {
            return Err(out_of_range("investigation.progress", state.progress()));
        }

        let mut seen = HashSet::new();
        for entry in &self.knowledge {
            if !seen.insert(entry.id) {
                return Err(ScenarioError::DuplicateTopic(entry.id));
            }
            if entry.min_trust > MAX_SCORE {
                return Err(out_of_range(
                    &format!("knowledge.{}.min_trust", entry.id),
                    entry.min_trust,
                ));
            }
        }
        Ok(())
    }
}

fn out_of_range(field: &str, value: u8) -> ScenarioError {
    ScenarioError::ScoreOutOfRange {
        field: field.to_string(),
        value,
    }
}
