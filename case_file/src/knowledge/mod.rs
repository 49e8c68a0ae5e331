//! Knowledge entries - the facts Sigure may disclose, each behind a gate.

mod topic;

pub use topic::*;

use serde::{Deserialize, Serialize};

use crate::investigation::MAX_SCORE;

/// A single disclosable fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: KnowledgeTopic,

    /// Fact text handed to the generator when the gate opens.
    pub content: String,

    /// Minimum trust (0-100) required before the fact is disclosed.
    #[serde(default)]
    pub min_trust: u8,

    /// Only disclosable once the investigation is past Phase0.
    #[serde(default)]
    pub requires_phase1_plus: bool,
}

impl KnowledgeEntry {
    /// Create an ungated entry.
    pub fn new(id: KnowledgeTopic, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            min_trust: 0,
            requires_phase1_plus: false,
        }
    }

    /// Set the minimum trust, clamped to 0-100.
    pub fn with_min_trust(mut self, min_trust: u8) -> Self {
        self.min_trust = min_trust.min(MAX_SCORE);
        self
    }

    /// Require the investigation to be at Phase1 or later.
    pub fn with_phase1_plus(mut self) -> Self {
        self.requires_phase1_plus = true;
        self
    }
}
