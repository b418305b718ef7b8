//! Weighted consensus domain
//!
//! This module contains the core concepts for merging independently obtained
//! answers into one confident answer per question.
//!
//! # Core Concepts
//!
//! ## Votes
//! Each call that answers a question yields one [`Vote`]: an option letter
//! attributed to a (model, iteration) source. Votes are append-only and
//! weighted by the model that produced them.
//!
//! ## Tallies
//! A [`QuestionTally`] accumulates votes for one question: leader selection
//! is strictly-greater-weight-wins with first-seen keeping ties, so the
//! leader never flaps retroactively.
//!
//! ## Fallback votes
//! [`QuestionTally::finalize`] tops a tally up with synthetic weight-1 votes
//! cycling the option keys in order, so every question resolves even when
//! every real call failed.

pub mod board;
pub mod parsing;
pub mod tally;
pub mod vote;

// Re-export main types
pub use board::ConsensusBoard;
pub use parsing::{parse_answer_lines, parse_single_answer};
pub use tally::QuestionTally;
pub use vote::{Vote, VoteSource};
