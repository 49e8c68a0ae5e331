//! Generation backend contract.

use async_trait::async_trait;

use crate::error::BackendError;

/// A text-generation backend: prompt in, continuation out.
///
/// Retries, model loading, and stop-sequence installation belong to the
/// implementation; the director calls `generate` once per turn and treats an
/// error as final for that turn.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Complete the prompt.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Forget any chat history the backend keeps on its side.
    async fn clear_history(&self) {}
}
