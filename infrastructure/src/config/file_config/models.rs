//! Model entries from TOML (`[[models]]` sections)

use serde::{Deserialize, Serialize};

use mcq_domain::{ModelSpec, ReasoningMode};

use crate::config::validation::{ConfigIssue, ConfigIssueCode};

/// One backend model variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelEntry {
    /// Stable id used in vote labels and `--model` filters
    pub key: String,
    /// Backend model name sent on the wire
    pub model: String,
    /// Requests per minute per credential
    pub rpm: u32,
    /// Calls contributed to one solve job
    pub max_calls: u32,
    /// Vote weight
    pub weight: u32,
    /// Reasoning behavior: "none", "optional", or "required"
    pub reasoning: ReasoningMode,
}

impl Default for FileModelEntry {
    fn default() -> Self {
        Self {
            key: String::new(),
            model: String::new(),
            rpm: 10,
            max_calls: 1,
            weight: 1,
            reasoning: ReasoningMode::None,
        }
    }
}

impl FileModelEntry {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    key: self.key.clone(),
                },
                format!("models: '{}' has an empty backend model name", self.key),
            ));
        }
        if self.rpm == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroRpm {
                    key: self.key.clone(),
                },
                format!("models: '{}' has rpm = 0; it would never be rate limited", self.key),
            ));
        }
        if self.weight == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroWeight {
                    key: self.key.clone(),
                },
                format!("models: '{}' has weight = 0; its votes would not count", self.key),
            ));
        }
        if self.max_calls == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroMaxCalls {
                    key: self.key.clone(),
                },
                format!("models: '{}' has max_calls = 0; it will never be called", self.key),
            ));
        }
        issues
    }

    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec::new(&self.key, &self.model)
            .with_rpm(self.rpm)
            .with_max_calls(self.max_calls)
            .with_weight(self.weight)
            .with_reasoning(self.reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let entry: FileModelEntry = toml::from_str(
            r#"
key = "pro"
model = "gemini-2.5-pro"
"#,
        )
        .unwrap();
        assert_eq!(entry.rpm, 10);
        assert_eq!(entry.max_calls, 1);
        assert_eq!(entry.weight, 1);
        assert_eq!(entry.reasoning, ReasoningMode::None);
        assert!(entry.validate().is_empty());
    }

    #[test]
    fn test_zero_fields_flagged() {
        let entry = FileModelEntry {
            key: "pro".to_string(),
            model: "gemini-2.5-pro".to_string(),
            rpm: 0,
            max_calls: 0,
            weight: 0,
            reasoning: ReasoningMode::None,
        };
        let issues = entry.validate();
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 2);
        assert_eq!(issues.iter().filter(|i| !i.is_error()).count(), 1);
    }

    #[test]
    fn test_to_spec_carries_everything() {
        let entry = FileModelEntry {
            key: "pro".to_string(),
            model: "gemini-2.5-pro".to_string(),
            rpm: 5,
            max_calls: 3,
            weight: 2,
            reasoning: ReasoningMode::Required,
        };
        let spec = entry.to_spec();
        assert_eq!(spec.backend_model_name, "gemini-2.5-pro");
        assert_eq!(spec.requests_per_minute, 5);
        assert_eq!(spec.expected_weighted_votes(), 6);
        assert_eq!(spec.reasoning_mode, ReasoningMode::Required);
    }
}
