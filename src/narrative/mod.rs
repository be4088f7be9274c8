//! Free-text generation for reports: the pricing answer that is parsed into a band,
//! the pricing recommendation and the "additional considerations" paragraph.

pub mod openai;
pub mod prompts;

use thiserror::Error;

pub use openai::OpenAiNarrator;
pub use prompts::PromptSet;

/// Text shown when a recommendation cannot be generated.
pub const RECOMMENDATION_PLACEHOLDER: &str =
    "A pricing recommendation could not be generated for this property.";

/// Text shown when the additional considerations cannot be generated.
pub const CONSIDERATIONS_PLACEHOLDER: &str =
    "Additional considerations could not be generated for this property.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Asks for "(low, mid, high)".
    Pricing,
    Recommendation,
    Considerations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativePrompt {
    pub kind: PromptKind,
    pub text: String,
}

impl NarrativePrompt {
    pub fn new(kind: PromptKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Recommendations go to the slower reasoning model.
    pub fn wants_reasoning(&self) -> bool {
        self.kind == PromptKind::Recommendation
    }
}

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty completion")]
    Empty,
}

pub trait NarrativeGenerator: Send + Sync {
    fn complete(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError>;
}

/// Runs a prompt, substituting `placeholder` when the generator fails.
pub fn complete_or(
    generator: &dyn NarrativeGenerator,
    prompt: &NarrativePrompt,
    placeholder: &str,
) -> String {
    match generator.complete(prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            tracing::warn!(kind = ?prompt.kind, "Narrative generation failed: {e}");
            placeholder.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl NarrativeGenerator for Failing {
        fn complete(&self, _prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
            Err(NarrativeError::Config("OPENAI_API_KEY not set".into()))
        }
    }

    struct Echo;

    impl NarrativeGenerator for Echo {
        fn complete(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
            Ok(format!("  {}\n", prompt.text))
        }
    }

    #[test]
    fn failure_yields_placeholder() {
        let prompt = NarrativePrompt::new(PromptKind::Considerations, "anything");
        assert_eq!(
            complete_or(&Failing, &prompt, CONSIDERATIONS_PLACEHOLDER),
            CONSIDERATIONS_PLACEHOLDER
        );
        assert_eq!(complete_or(&Echo, &prompt, "x"), "anything");
    }

    #[test]
    fn only_recommendations_use_reasoning() {
        assert!(NarrativePrompt::new(PromptKind::Recommendation, "").wants_reasoning());
        assert!(!NarrativePrompt::new(PromptKind::Pricing, "").wants_reasoning());
    }
}
