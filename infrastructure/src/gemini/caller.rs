//! Direct-key Gemini caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use mcq_application::{CallError, Caller, Credential, GenerateReply, ResponseConfig};

use super::error::{classify_response, classify_transport};
use super::protocol::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Caller that hits the Gemini API directly, one key per call.
///
/// The credential's secret travels in the `x-goog-api-key` header so it
/// never appears in URLs or logs.
#[derive(Debug, Clone)]
pub struct DirectCaller {
    client: reqwest::Client,
    base_url: String,
}

impl DirectCaller {
    pub fn new(timeout: Duration) -> Result<Self, CallError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CallError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| CallError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn generate_url(&self, backend_model_name: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url, backend_model_name
        )
    }
}

#[async_trait]
impl Caller for DirectCaller {
    async fn generate(
        &self,
        credential: &Credential,
        backend_model_name: &str,
        prompt: &str,
        config: &ResponseConfig,
    ) -> Result<GenerateReply, CallError> {
        let request = GenerateContentRequest::from_prompt(prompt, config);
        debug!(model = backend_model_name, credential = %credential, "sending generateContent");

        let response = self
            .client
            .post(self.generate_url(backend_model_name))
            .header("x-goog-api-key", &credential.secret)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(&e))?;

        if !(200..300).contains(&status) {
            return Err(classify_response(status, &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| CallError::Other(format!("malformed response body: {}", e)))?;
        match parsed.text() {
            Some(text) => Ok(GenerateReply::new(text)),
            None => Err(CallError::Other("response contained no text".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_shape() {
        let caller =
            DirectCaller::with_base_url("https://example.test/v1beta/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            caller.generate_url("gemini-2.5-pro"),
            "https://example.test/v1beta/models/gemini-2.5-pro:generateContent"
        );
    }
}
