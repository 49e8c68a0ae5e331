//! Error types for the interrogation pipeline.
//!
//! None of these cross `DialogueDirector::process_utterance`; every failure
//! there degrades to a fixed in-character reply.

use case_file::KnowledgeTopic;

/// Errors building the knowledge base.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("duplicate knowledge entry for topic {0}")]
    DuplicateTopic(KnowledgeTopic),
}

/// Errors reported by a generation backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend not ready: {0}")]
    NotReady(String),
    #[error("generation failed: {0}")]
    Generation(String),
}

/// Errors writing an audit record.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading director configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Degraded paths of a dialogue turn.
#[derive(Debug, thiserror::Error)]
pub enum DirectorError {
    #[error("generation backend is not configured")]
    ConfigurationMissing,
    #[error("utterance is empty")]
    EmptyInput,
    #[error(transparent)]
    Generation(#[from] BackendError),
    #[error(transparent)]
    AuditSink(#[from] AuditError),
}
