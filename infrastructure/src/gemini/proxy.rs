//! Relay-backed Gemini caller.
//!
//! Speaks the same `generateContent` protocol as [`DirectCaller`], but to a
//! configured relay base URL. The relay authenticates the client with its
//! own bearer token; the per-call credential still travels in
//! `x-goog-api-key` so the relay can spend the right quota.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use mcq_application::{CallError, Caller, Credential, GenerateReply, ResponseConfig};

use super::error::{classify_response, classify_transport};
use super::protocol::{GenerateContentRequest, GenerateContentResponse};

/// Caller that routes every call through a relay
#[derive(Debug, Clone)]
pub struct ProxyCaller {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyCaller {
    pub fn new(
        base_url: impl Into<String>,
        relay_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, CallError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = relay_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| CallError::Other("relay token is not a valid header".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

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
impl Caller for ProxyCaller {
    async fn generate(
        &self,
        credential: &Credential,
        backend_model_name: &str,
        prompt: &str,
        config: &ResponseConfig,
    ) -> Result<GenerateReply, CallError> {
        let request = GenerateContentRequest::from_prompt(prompt, config);
        debug!(model = backend_model_name, credential = %credential, "relaying generateContent");

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
    fn test_generate_url_uses_relay_base() {
        let caller =
            ProxyCaller::new("https://relay.example/gemini", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            caller.generate_url("gemini-2.5-flash"),
            "https://relay.example/gemini/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_bad_relay_token_rejected() {
        let result = ProxyCaller::new(
            "https://relay.example",
            Some("token\nwith-newline"),
            Duration::from_secs(5),
        );
        assert!(result.is_err());
    }
}
