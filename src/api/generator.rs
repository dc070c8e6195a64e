use crate::error::GenerationError;
use async_trait::async_trait;

/// Reply delivered in place of a model answer whenever generation fails.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting to my AI service right now. Please try again later.";

/// Anything that can turn an assembled conversation into a reply.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, conversation: &[String]) -> Result<String, GenerationError>;
}

/// Fail-soft wrapper: the caller always gets some text back. Generation
/// failures are logged and replaced with [`FALLBACK_REPLY`].
pub async fn reply(generator: &dyn Generator, conversation: &[String]) -> String {
    match generator.generate(conversation).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Generation API error: {e}");
            FALLBACK_REPLY.to_string()
        }
    }
}
