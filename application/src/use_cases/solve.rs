//! Solve use case
//!
//! Orchestrates one batch solve: fans calls out across the enabled model
//! specs (batched or per-question), records the resulting votes on the
//! consensus board, streams partial answers, and finalizes every question
//! to a guaranteed answer.
//!
//! A question moves Pending -> Accumulating -> Resolved; there is no error
//! terminal state. Individual call failures cost votes, never the job —
//! only a job-level fault (nothing to solve, nothing to solve with) errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use mcq_domain::{
    ConsensusBoard, ModelSpec, PromptTemplate, Question, VoteSource, parse_answer_lines,
    parse_single_answer,
};

use crate::config::{DispatchStrategy, SolveOptions};
use crate::ports::caller::{CallError, GenerateReply, ResponseConfig};
use crate::ports::progress::{NoProgress, ProgressNotifier, SolveProgress};
use crate::scheduler::dispatcher::CallDispatcher;

/// Cycle budget for racing dispatch in batched mode
const RACING_CYCLES: usize = 3;

/// Job-level faults — the only errors a solve surfaces
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolveError {
    #[error("No questions to solve")]
    NoQuestions,

    #[error("No models enabled")]
    NoModels,

    #[error("No credentials configured")]
    NoCredentials,
}

/// Input for the solve use case
#[derive(Debug, Clone)]
pub struct SolveInput {
    pub questions: Vec<Question>,
    /// Enabled model specs; each contributes `max_calls_per_job` calls
    pub specs: Vec<ModelSpec>,
    pub options: SolveOptions,
}

impl SolveInput {
    pub fn new(questions: Vec<Question>, specs: Vec<ModelSpec>) -> Self {
        Self {
            questions,
            specs,
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }
}

/// The finished job: every question has an answer
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Final leading answer per question id
    pub answers: BTreeMap<String, char>,
    /// Full tallies, for confidence display and auditing
    pub board: ConsensusBoard,
    /// How many synthetic votes finalization injected
    pub fallback_votes: u32,
}

struct ScheduledCall {
    spec: ModelSpec,
    iteration: u32,
    reasoning: bool,
    /// Batched mode answers all questions at once
    question_index: Option<usize>,
}

/// Use case for solving a question batch via weighted multi-model quorum
pub struct SolveUseCase {
    dispatcher: Arc<CallDispatcher>,
}

impl SolveUseCase {
    pub fn new(dispatcher: Arc<CallDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: SolveInput) -> Result<SolveOutcome, SolveError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: SolveInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SolveOutcome, SolveError> {
        if input.questions.is_empty() {
            return Err(SolveError::NoQuestions);
        }
        if input.specs.is_empty() {
            return Err(SolveError::NoModels);
        }
        if self.dispatcher.pool().total_count() == 0 {
            return Err(SolveError::NoCredentials);
        }

        info!(
            questions = input.questions.len(),
            models = input.specs.len(),
            strategy = ?input.options.strategy,
            "starting solve"
        );

        let mut board = ConsensusBoard::new(&input.questions, &input.specs);
        self.run_schedule(&input, &mut board, progress).await;

        let fallback_votes = board.finalize_all();
        if fallback_votes > 0 {
            info!(fallback_votes, "injected fallback votes to resolve remaining questions");
        }
        progress.on_solve_complete(board.question_count());

        Ok(SolveOutcome {
            answers: board.answers(),
            board,
            fallback_votes,
        })
    }

    fn build_schedule(&self, input: &SolveInput) -> Vec<ScheduledCall> {
        let mut schedule = Vec::new();
        for spec in &input.specs {
            for (iteration, reasoning) in spec.iteration_reasoning_flags().into_iter().enumerate() {
                match input.options.strategy {
                    DispatchStrategy::Batched => schedule.push(ScheduledCall {
                        spec: spec.clone(),
                        iteration: iteration as u32,
                        reasoning,
                        question_index: None,
                    }),
                    DispatchStrategy::PerQuestion => {
                        for question_index in 0..input.questions.len() {
                            schedule.push(ScheduledCall {
                                spec: spec.clone(),
                                iteration: iteration as u32,
                                reasoning,
                                question_index: Some(question_index),
                            });
                        }
                    }
                }
            }
        }
        schedule
    }

    /// Spawn the scheduled calls (bounded by the concurrency cap), record
    /// votes as calls complete, and stop scheduling once every question is
    /// confident enough.
    ///
    /// Early stop drops *not-yet-started* calls only: tasks already spawned
    /// run to completion and their votes still count.
    async fn run_schedule(
        &self,
        input: &SolveInput,
        board: &mut ConsensusBoard,
        progress: &dyn ProgressNotifier,
    ) {
        let schedule = self.build_schedule(input);
        progress.on_solve_start(schedule.len());

        let batch_prompt = Arc::new(PromptTemplate::batch_prompt(&input.questions));
        let concurrency = input.options.concurrency_limit.unwrap_or(usize::MAX).max(1);
        let cooldown = input.options.cooldown;
        let racing = input.options.racing;

        let mut pending = schedule.into_iter();
        let mut next = pending.next();
        let mut in_flight: JoinSet<(String, u32, Option<usize>, Result<GenerateReply, CallError>)> =
            JoinSet::new();
        let mut stopped = false;

        loop {
            while !stopped && next.is_some() && in_flight.len() < concurrency {
                let call = next.take().expect("checked above");
                next = pending.next();

                let dispatcher = Arc::clone(&self.dispatcher);
                let config = ResponseConfig::default().with_reasoning(call.reasoning);
                match call.question_index {
                    None => {
                        let prompt = Arc::clone(&batch_prompt);
                        in_flight.spawn(async move {
                            let op = format!("batch:{}#{}", call.spec.key, call.iteration);
                            let result = if racing {
                                dispatcher
                                    .dispatch_racing(&op, &call.spec, &prompt, &config, RACING_CYCLES)
                                    .await
                            } else {
                                dispatcher
                                    .dispatch(&op, &call.spec, &prompt, &config, None)
                                    .await
                            };
                            (call.spec.key, call.iteration, None, result)
                        });
                    }
                    Some(question_index) => {
                        let question = input.questions[question_index].clone();
                        in_flight.spawn(async move {
                            let op = format!(
                                "question:{}:{}#{}",
                                question.id(),
                                call.spec.key,
                                call.iteration
                            );
                            let prompt = PromptTemplate::single_prompt(&question);
                            let result = dispatcher
                                .dispatch_exclusive(&op, &call.spec, &prompt, &config, cooldown)
                                .await;
                            (call.spec.key, call.iteration, Some(question_index), result)
                        });
                    }
                }
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let Ok((model_key, iteration, question_index, result)) = joined else {
                warn!("solve task panicked");
                continue;
            };

            match result {
                Ok(reply) => {
                    self.record_reply(
                        input,
                        board,
                        &model_key,
                        iteration,
                        question_index,
                        &reply.text,
                    );
                    progress.on_batch_recorded(&SolveProgress {
                        model_key,
                        iteration,
                        answers_so_far: board.answers(),
                    });

                    if !stopped
                        && let Some(threshold) = input.options.early_stop_confidence_percent
                        && board.all_above(threshold)
                    {
                        info!(threshold, "every question confident enough; dropping unscheduled calls");
                        stopped = true;
                    }
                }
                Err(error) => {
                    warn!(model = %model_key, iteration, %error, "call failed past retries");
                    progress.on_call_failed(&model_key, iteration, &error.to_string());
                }
            }
        }
    }

    /// Turn one reply into votes. Unparseable text, missing answers, and
    /// out-of-range letters all degrade to missing votes.
    fn record_reply(
        &self,
        input: &SolveInput,
        board: &mut ConsensusBoard,
        model_key: &str,
        iteration: u32,
        question_index: Option<usize>,
        text: &str,
    ) {
        let source = VoteSource::model(model_key, iteration);
        match question_index {
            None => {
                let mut recorded = 0;
                for (index, letter) in parse_answer_lines(text) {
                    if let Some(question) = input.questions.get(index - 1)
                        && board.record_vote(question.id(), letter, &source)
                    {
                        recorded += 1;
                    }
                }
                debug!(model = model_key, iteration, recorded, "batch votes recorded");
            }
            Some(question_index) => {
                let question = &input.questions[question_index];
                match parse_single_answer(text) {
                    Some(letter) => {
                        if board.record_vote(question.id(), letter, &source) {
                            debug!(question = question.id(), %letter, "vote recorded");
                        } else {
                            debug!(question = question.id(), %letter, "answer outside option set, discarded");
                        }
                    }
                    None => {
                        debug!(question = question.id(), "no usable answer in reply");
                    }
                }
            }
        }
    }
}
