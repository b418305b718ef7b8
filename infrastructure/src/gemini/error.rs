//! Provider error classification.
//!
//! The one place that understands Gemini's error shapes. Everything past
//! this boundary sees only the closed [`CallError`] enum, so retry logic
//! never sniffs provider-specific fields.

use mcq_application::CallError;

use super::protocol::ErrorBody;

/// Classify a non-success HTTP response into a [`CallError`].
///
/// Rate limit: HTTP 429 or provider status `RESOURCE_EXHAUSTED`.
/// Invalid argument: HTTP 400 or provider status `INVALID_ARGUMENT`.
/// Everything else is `Other`.
pub fn classify_response(http_status: u16, body: &str) -> CallError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_default();

    let provider_status = detail.status.as_deref().unwrap_or("");
    let message = detail
        .message
        .unwrap_or_else(|| truncate(body, 200).to_string());
    let code = detail.code.unwrap_or(http_status);

    if http_status == 429 || code == 429 || provider_status == "RESOURCE_EXHAUSTED" {
        return CallError::RateLimited(message);
    }
    if http_status == 400 || code == 400 || provider_status == "INVALID_ARGUMENT" {
        return CallError::InvalidArgument(message);
    }
    CallError::Other(format!("HTTP {}: {}", http_status, message))
}

/// Classify a transport-level failure (connect, timeout, decode)
pub fn classify_transport(error: &reqwest::Error) -> CallError {
    CallError::Other(format!("transport error: {}", error))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
