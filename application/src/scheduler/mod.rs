//! The request scheduler
//!
//! Three cooperating pieces sit between the solve use case and the
//! [`Caller`](crate::ports::caller::Caller) port:
//!
//! - [`CredentialPool`](credential_pool::CredentialPool) — exclusive leases
//!   over the interchangeable API keys, with cooldown after rate limits.
//! - [`AggregateRateLimiter`](rate_limiter::AggregateRateLimiter) — one
//!   sliding 60-second window per backend model, sized
//!   `rpm x credential count`.
//! - [`CallDispatcher`](dispatcher::CallDispatcher) — admission, credential
//!   selection, and classified retry around a single outbound call.

pub mod credential_pool;
pub mod dispatcher;
pub mod rate_limiter;
pub mod stats;
