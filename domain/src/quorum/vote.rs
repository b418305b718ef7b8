//! Vote types for weighted consensus
//!
//! This module defines the voting primitives used when merging answers from
//! independent calls.

use serde::{Deserialize, Serialize};

/// Label used for synthetic votes injected by `finalize`
pub const FALLBACK_LABEL: &str = "fallback";

/// Where a vote came from
///
/// # Example
///
/// ```
/// use mcq_domain::VoteSource;
///
/// let source = VoteSource::model("gemini-pro", 2);
/// assert_eq!(source.label(), "gemini-pro#2");
/// assert!(!source.is_fallback());
/// assert_eq!(VoteSource::Fallback.label(), "fallback");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSource {
    /// A real answer from one (model, iteration) call
    Model { key: String, iteration: u32 },
    /// A synthetic vote injected to guarantee resolution
    Fallback,
}

impl VoteSource {
    pub fn model(key: impl Into<String>, iteration: u32) -> Self {
        VoteSource::Model {
            key: key.into(),
            iteration,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, VoteSource::Fallback)
    }

    /// The model key, if this is a real vote
    pub fn model_key(&self) -> Option<&str> {
        match self {
            VoteSource::Model { key, .. } => Some(key),
            VoteSource::Fallback => None,
        }
    }

    /// Render the source as a stable label, e.g. `"gemini-pro#2"`
    pub fn label(&self) -> String {
        match self {
            VoteSource::Model { key, iteration } => format!("{}#{}", key, iteration),
            VoteSource::Fallback => FALLBACK_LABEL.to_string(),
        }
    }
}

impl std::fmt::Display for VoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One option-letter answer for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Which question this vote answers
    pub question_id: String,
    /// The chosen option letter
    pub option: char,
    /// Who produced the answer
    pub source: VoteSource,
}

impl Vote {
    pub fn new(question_id: impl Into<String>, option: char, source: VoteSource) -> Self {
        Self {
            question_id: question_id.into(),
            option: option.to_ascii_uppercase(),
            source,
        }
    }
}
