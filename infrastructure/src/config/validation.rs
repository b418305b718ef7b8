//! Severity-tagged configuration issues
//!
//! `validate()` on the file config returns all detected problems at once so
//! the CLI can print them together instead of failing on the first.

use serde::{Deserialize, Serialize};

/// How bad a config issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The configuration cannot be used
    Error,
    /// Suspicious but usable
    Warning,
}

/// Machine-readable issue codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigIssueCode {
    NoCredentials,
    EmptyCredentialKey { label: String },
    DuplicateCredentialLabel { label: String },
    NoModels,
    DuplicateModelKey { key: String },
    EmptyModelName { key: String },
    ZeroRpm { key: String },
    ZeroWeight { key: String },
    ZeroMaxCalls { key: String },
    MissingProxyUrl,
}

/// One detected configuration problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", tag, self.message)
    }
}
