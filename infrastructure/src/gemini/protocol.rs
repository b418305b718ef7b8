//! Gemini GenerateContent API types.
//!
//! Only the slice of the protocol this crate uses: text-in, text-out, plus
//! the error body shape needed for classification.

use serde::{Deserialize, Serialize};

use mcq_application::ResponseConfig;

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Reasoning-effort knob for models that support it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: i32,
}

/// Thinking budget requested when a call asks for reasoning
const REASONING_THINKING_BUDGET: i32 = 8_192;

impl GenerateContentRequest {
    /// Build a text-only request from a prompt and the per-call config
    pub fn from_prompt(prompt: &str, config: &ResponseConfig) -> Self {
        let thinking_config = config.reasoning.then_some(ThinkingConfig {
            thinking_budget: REASONING_THINKING_BUDGET,
        });
        let generation_config = if config.temperature.is_none()
            && config.max_output_tokens.is_none()
            && thinking_config.is_none()
        {
            None
        } else {
            Some(GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                thinking_config,
            })
        };

        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

/// Response body for `generateContent`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Error body shape: `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case() {
        let config = ResponseConfig::default()
            .with_reasoning(true)
            .with_max_output_tokens(256);
        let request = GenerateContentRequest::from_prompt("hello", &config);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"maxOutputTokens\":256"));
        assert!(json.contains("\"thinkingBudget\":8192"));
        assert!(json.contains("\"text\":\"hello\""));
    }

    #[test]
    fn test_minimal_request_omits_generation_config() {
        let request = GenerateContentRequest::from_prompt("hi", &ResponseConfig::minimal());
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("generationConfig"));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"1: A\n"},{"text":"2: B"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text().unwrap(), "1: A\n2: B");
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#,
        )
        .unwrap();
        let detail = body.error.unwrap();
        assert_eq!(detail.code, Some(429));
        assert_eq!(detail.status.as_deref(), Some("RESOURCE_EXHAUSTED"));
    }
}
