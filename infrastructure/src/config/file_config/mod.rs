//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain/application
//! types once validated.

mod credentials;
mod models;
mod provider;
mod solver;

pub use credentials::FileCredentialEntry;
pub use models::FileModelEntry;
pub use provider::{FileProviderConfig, ProviderMode};
pub use solver::FileSolverConfig;

use serde::{Deserialize, Serialize};

use mcq_domain::ModelSpec;

use super::validation::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
///
/// # Example
///
/// ```toml
/// [[credentials]]
/// label = "key-1"
/// key = "AIza..."
///
/// [[models]]
/// key = "pro"
/// model = "gemini-2.5-pro"
/// rpm = 5
/// max_calls = 2
/// weight = 3
/// reasoning = "optional"
///
/// [solver]
/// strategy = "batched"
/// early_stop_percent = 60.0
///
/// [provider]
/// mode = "direct"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// The credential pool, in index order
    pub credentials: Vec<FileCredentialEntry>,
    /// Enabled model variants
    pub models: Vec<FileModelEntry>,
    /// Solve loop control
    pub solver: FileSolverConfig,
    /// Backend selection (direct keys vs relay)
    pub provider: FileProviderConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.credentials.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoCredentials,
                "no [[credentials]] configured; at least one key is required",
            ));
        }
        let mut labels_seen = std::collections::HashSet::new();
        for entry in &self.credentials {
            issues.extend(entry.validate());
            if !labels_seen.insert(entry.label.as_str()) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::DuplicateCredentialLabel {
                        label: entry.label.clone(),
                    },
                    format!(
                        "credentials: label '{}' appears more than once; statistics will merge",
                        entry.label
                    ),
                ));
            }
        }

        if self.models.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoModels,
                "no [[models]] configured; at least one model is required",
            ));
        }
        let mut keys_seen = std::collections::HashSet::new();
        for entry in &self.models {
            issues.extend(entry.validate());
            if !keys_seen.insert(entry.key.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateModelKey {
                        key: entry.key.clone(),
                    },
                    format!("models: key '{}' appears more than once", entry.key),
                ));
            }
        }

        issues.extend(self.provider.validate());
        issues
    }

    /// `(label, secret)` pairs for the credential pool, in index order
    pub fn credential_entries(&self) -> Vec<(String, String)> {
        self.credentials
            .iter()
            .map(|e| (e.label.clone(), e.key.clone()))
            .collect()
    }

    /// Model specs, keeping only `enabled_keys` when given
    pub fn model_specs(&self, enabled_keys: &[String]) -> Vec<ModelSpec> {
        self.models
            .iter()
            .filter(|e| enabled_keys.is_empty() || enabled_keys.contains(&e.key))
            .map(FileModelEntry::to_spec)
            .collect()
    }
}
