//! Domain layer for mcq-quorum
//!
//! This crate contains the core business logic for batch multiple-choice
//! solving: questions, model specifications, votes, and the weighted
//! consensus tally. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quorum
//!
//! Every question is answered by a quorum of independent calls — different
//! backend models, different prompt iterations — and each answer becomes a
//! weighted vote. The option with the strictly greatest accumulated weight
//! leads; fallback votes guarantee that every question resolves even when
//! every call fails.
//!
//! ## Votes and Tallies
//!
//! - **Vote**: one option-letter answer attributed to one (model, iteration)
//!   source, or the synthetic `fallback` sentinel.
//! - **QuestionTally**: the running per-question scoreboard.
//! - **ConsensusBoard**: all tallies for one solve job.

pub mod core;
pub mod prompt;
pub mod quorum;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model_spec::{ModelSpec, ReasoningMode},
    question::Question,
};
pub use prompt::PromptTemplate;
pub use quorum::{
    board::ConsensusBoard,
    parsing::{parse_answer_lines, parse_single_answer},
    tally::QuestionTally,
    vote::{Vote, VoteSource},
};
