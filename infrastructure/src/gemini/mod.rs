//! Gemini backend adapters
//!
//! Two [`Caller`](mcq_application::Caller) implementations share the
//! `generateContent` wire protocol:
//!
//! - [`DirectCaller`](caller::DirectCaller) sends each call straight to the
//!   Gemini API with the selected credential's key.
//! - [`ProxyCaller`](proxy::ProxyCaller) sends the same protocol to a relay
//!   base URL, forwarding the credential alongside a relay token.
//!
//! The variant is chosen at construction time; nothing swaps callers at
//! runtime. Provider-specific error shapes are classified into
//! [`CallError`](mcq_application::CallError) in [`error`] and nowhere else.

pub mod caller;
pub mod error;
pub mod protocol;
pub mod proxy;

pub use caller::DirectCaller;
pub use proxy::ProxyCaller;
