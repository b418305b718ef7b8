//! LLM caller port
//!
//! Defines the single seam between the scheduler and the model backend: one
//! `generate` call bound to one credential. Adapters classify their
//! provider-specific failures into the closed [`CallError`] enum at this
//! boundary — retry logic never inspects raw provider error shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to one credential in the pool.
///
/// The `index` is the credential's stable position in the pool; `label` is
/// the non-secret display name used in logs and statistics.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub index: usize,
    pub label: String,
    pub secret: String,
}

impl Credential {
    pub fn new(index: usize, label: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
            secret: secret.into(),
        }
    }
}

// The secret never reaches logs: Debug and Display show the label only.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Per-call response configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Request extra reasoning effort from the model
    pub reasoning: bool,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl ResponseConfig {
    /// The stripped-down configuration used for the one retry after an
    /// `InvalidArgument` rejection.
    pub fn minimal() -> Self {
        Self::default()
    }

    pub fn with_reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// A successful model response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateReply {
    pub text: String,
}

impl GenerateReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Classified call failure.
///
/// The three variants drive three different retry policies in the
/// dispatcher: rotation + backoff, one stripped-config retry, fail fast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The backend rejected the call for throughput reasons (HTTP 429,
    /// `RESOURCE_EXHAUSTED`)
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The request shape is invalid for this model/config combination
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Anything else: transport failures, auth failures, server errors
    #[error("call failed: {0}")]
    Other(String),
}

impl CallError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CallError::RateLimited(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CallError::InvalidArgument(_))
    }
}

/// The LLM call abstraction.
///
/// One method: generate text from a prompt, bound to a specific credential.
/// Direct-key and proxy-backed implementations are selected at construction
/// time in the infrastructure layer.
#[async_trait]
pub trait Caller: Send + Sync {
    async fn generate(
        &self,
        credential: &Credential,
        backend_model_name: &str,
        prompt: &str,
        config: &ResponseConfig,
    ) -> Result<GenerateReply, CallError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let credential = Credential::new(0, "key-1", "very-secret");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("key-1"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_error_classification_helpers() {
        assert!(CallError::RateLimited("429".into()).is_rate_limited());
        assert!(CallError::InvalidArgument("bad".into()).is_invalid_argument());
        assert!(!CallError::Other("boom".into()).is_rate_limited());
    }

    #[test]
    fn test_minimal_config_is_empty() {
        let config = ResponseConfig::minimal();
        assert!(!config.reasoning);
        assert!(config.temperature.is_none());
        assert!(config.max_output_tokens.is_none());
    }
}
