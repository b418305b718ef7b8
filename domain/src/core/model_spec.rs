//! Model specification value object
//!
//! A [`ModelSpec`] describes one backend model variant that can join a solve
//! job: its throughput limit, vote weight, and per-job call budget. Specs are
//! supplied by configuration and read-only to the solving core.

use serde::{Deserialize, Serialize};

/// Whether calls to a model request extra reasoning effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningMode {
    /// Never request reasoning
    #[default]
    None,
    /// Split the iteration budget between plain and reasoning calls
    Optional,
    /// Every call requests reasoning
    Required,
}

impl std::fmt::Display for ReasoningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningMode::None => write!(f, "none"),
            ReasoningMode::Optional => write!(f, "optional"),
            ReasoningMode::Required => write!(f, "required"),
        }
    }
}

/// One backend model variant (Value Object)
///
/// # Example
///
/// ```
/// use mcq_domain::{ModelSpec, ReasoningMode};
///
/// let spec = ModelSpec::new("flash", "gemini-2.5-flash")
///     .with_rpm(10)
///     .with_max_calls(3)
///     .with_weight(2)
///     .with_reasoning(ReasoningMode::Optional);
/// assert_eq!(spec.weight, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Stable identifier used in vote labels and configuration
    pub key: String,
    /// The name the backend expects in API calls
    pub backend_model_name: String,
    /// Requests per minute allowed per credential
    pub requests_per_minute: u32,
    /// How many calls this model contributes to one solve job
    pub max_calls_per_job: u32,
    /// Vote weight of each answer this model produces
    pub weight: u32,
    /// Reasoning behavior for this model's calls
    pub reasoning_mode: ReasoningMode,
}

impl ModelSpec {
    pub fn new(key: impl Into<String>, backend_model_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            backend_model_name: backend_model_name.into(),
            requests_per_minute: 10,
            max_calls_per_job: 1,
            weight: 1,
            reasoning_mode: ReasoningMode::None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_rpm(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    pub fn with_max_calls(mut self, max_calls: u32) -> Self {
        self.max_calls_per_job = max_calls;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_reasoning(mut self, mode: ReasoningMode) -> Self {
        self.reasoning_mode = mode;
        self
    }

    /// Weighted vote total this spec contributes to a job's expectation
    pub fn expected_weighted_votes(&self) -> u32 {
        self.max_calls_per_job * self.weight
    }

    /// Reasoning flags for each iteration of this spec's call budget.
    ///
    /// `Optional` splits the budget: the first half plain, the second half
    /// with reasoning.
    pub fn iteration_reasoning_flags(&self) -> Vec<bool> {
        let n = self.max_calls_per_job as usize;
        match self.reasoning_mode {
            ReasoningMode::None => vec![false; n],
            ReasoningMode::Required => vec![true; n],
            ReasoningMode::Optional => (0..n).map(|i| i >= n / 2).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = ModelSpec::new("flash", "gemini-2.5-flash");
        assert_eq!(spec.weight, 1);
        assert_eq!(spec.max_calls_per_job, 1);
        assert_eq!(spec.reasoning_mode, ReasoningMode::None);
    }

    #[test]
    fn test_expected_weighted_votes() {
        let spec = ModelSpec::new("pro", "gemini-2.5-pro")
            .with_max_calls(3)
            .with_weight(2);
        assert_eq!(spec.expected_weighted_votes(), 6);
    }

    #[test]
    fn test_reasoning_flags_none_and_required() {
        let spec = ModelSpec::new("a", "m").with_max_calls(3);
        assert_eq!(spec.iteration_reasoning_flags(), vec![false, false, false]);

        let spec = spec.with_reasoning(ReasoningMode::Required);
        assert_eq!(spec.iteration_reasoning_flags(), vec![true, true, true]);
    }

    #[test]
    fn test_reasoning_flags_optional_split() {
        let spec = ModelSpec::new("a", "m")
            .with_max_calls(4)
            .with_reasoning(ReasoningMode::Optional);
        assert_eq!(
            spec.iteration_reasoning_flags(),
            vec![false, false, true, true]
        );

        // Odd budgets give the extra iteration to the reasoning half
        let spec = spec.with_max_calls(3);
        assert_eq!(spec.iteration_reasoning_flags(), vec![false, true, true]);
    }

    #[test]
    fn test_reasoning_mode_toml_names() {
        let mode: ReasoningMode = serde_json::from_str("\"optional\"").unwrap();
        assert_eq!(mode, ReasoningMode::Optional);
    }
}
