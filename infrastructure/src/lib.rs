//! Infrastructure layer for mcq-quorum
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the Gemini HTTP caller (direct-key and proxy-backed),
//! TOML configuration loading, and the JSONL solve-event log.

pub mod config;
pub mod gemini;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileCredentialEntry, FileModelEntry, FileProviderConfig,
    FileSolverConfig, validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use gemini::{caller::DirectCaller, error::classify_response, proxy::ProxyCaller};
pub use logging::JsonlEventLogger;
