//! Knowledge Base - the catalogue of disclosable facts, keyed by topic.

use case_file::{KnowledgeEntry, KnowledgeTopic, Scenario};
use std::collections::HashMap;

use crate::error::KnowledgeError;

/// Read-only lookup of knowledge entries, at most one per topic.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: HashMap<KnowledgeTopic, KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a knowledge base, rejecting duplicate topics.
    pub fn from_entries(
        entries: impl IntoIterator<Item = KnowledgeEntry>,
    ) -> Result<Self, KnowledgeError> {
        let mut base = Self::new();
        for entry in entries {
            base.add_entry(entry)?;
        }
        Ok(base)
    }

    /// Build the knowledge base of a loaded scenario.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, KnowledgeError> {
        Self::from_entries(scenario.knowledge.iter().cloned())
    }

    /// Add an entry. Fails if the topic already has one.
    pub fn add_entry(&mut self, entry: KnowledgeEntry) -> Result<(), KnowledgeError> {
        if self.entries.contains_key(&entry.id) {
            return Err(KnowledgeError::DuplicateTopic(entry.id));
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    /// Get the entry for a topic.
    pub fn get(&self, topic: KnowledgeTopic) -> Option<&KnowledgeEntry> {
        self.entries.get(&topic)
    }

    /// Check if a topic has an entry.
    pub fn contains(&self, topic: KnowledgeTopic) -> bool {
        self.entries.contains_key(&topic)
    }

    /// Iterate over all entries (unordered).
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
