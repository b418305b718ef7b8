//! Core domain types

pub mod error;
pub mod model_spec;
pub mod question;

pub use error::DomainError;
pub use model_spec::{ModelSpec, ReasoningMode};
pub use question::Question;
