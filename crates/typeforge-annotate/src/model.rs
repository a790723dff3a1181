//! Language model collaborator interface

use async_trait::async_trait;

/// System instructions sent with every request
pub const INSTRUCTIONS: &str =
    "You are helpful electronic assistant with knowledge of Software Engineering.";

/// Errors from the language model collaborator
///
/// Transport details, retries, and backoff live behind the trait; by the
/// time an error reaches this crate it is terminal for the current attempt.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The request could not be completed
    #[error("language model request failed: {0}")]
    Request(String),
}

/// A conversational language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Ask for a completion
    ///
    /// `history` is prior `(question, answer)` turns, oldest first.
    async fn respond(
        &self,
        instructions: &str,
        history: &[(String, String)],
        prompt: &str,
    ) -> Result<String, ModelError>;
}
