//! Credential entries from TOML (`[[credentials]]` sections)

use serde::{Deserialize, Serialize};

use crate::config::validation::{ConfigIssue, ConfigIssueCode};

/// One credential in the pool
///
/// The `label` is the non-secret display name used in logs and statistics;
/// `key` is the opaque secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCredentialEntry {
    pub label: String,
    pub key: String,
}

impl FileCredentialEntry {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.key.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCredentialKey {
                    label: self.label.clone(),
                },
                format!("credentials: '{}' has an empty key", self.label),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_error() {
        let entry = FileCredentialEntry {
            label: "key-1".to_string(),
            key: "  ".to_string(),
        };
        let issues = entry.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_valid_entry_passes() {
        let entry = FileCredentialEntry {
            label: "key-1".to_string(),
            key: "AIza-something".to_string(),
        };
        assert!(entry.validate().is_empty());
    }
}
