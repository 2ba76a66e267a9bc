pub mod anthropic;
pub mod prompts;

pub use anthropic::AnthropicGenerator;

use crate::error::GenerationError;
use crate::models::Dialect;
use async_trait::async_trait;

/// Everything the generation service gets to see about one component
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub component_name: String,
    /// Full text of the usage site
    pub context: String,
    pub dialect: Dialect,
}

/// External service turning a component name plus usage context into source text
///
/// Calls may be slow and may fail; callers treat every failure as local to
/// the component being generated.
#[async_trait]
pub trait ComponentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Short name for progress output
    fn name(&self) -> &'static str;
}
