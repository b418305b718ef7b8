//! Application layer for mcq-quorum
//!
//! This crate contains the request scheduler (credential pool, aggregate
//! rate limiter, call dispatcher), the ports to the outside world, and the
//! solve use case. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod scheduler;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DispatchStrategy, SolveOptions};
pub use ports::{
    caller::{CallError, Caller, Credential, GenerateReply, ResponseConfig},
    progress::{CompositeProgress, NoProgress, ProgressNotifier, SolveProgress},
};
pub use scheduler::{
    credential_pool::{CredentialLease, CredentialPool},
    dispatcher::CallDispatcher,
    rate_limiter::AggregateRateLimiter,
    stats::{UsageSnapshot, UsageStats},
};
pub use use_cases::solve::{SolveError, SolveInput, SolveOutcome, SolveUseCase};
