//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid model spec: {0}")]
    InvalidModelSpec(String),

    #[error("Unknown question id: {0}")]
    UnknownQuestion(String),
}
