//! Job-wide consensus state
//!
//! A [`ConsensusBoard`] owns one [`QuestionTally`] per question for the
//! duration of a solve job, resolves vote weights from the enabled model
//! specs, and answers the early-stop and finalization queries the
//! orchestrator needs. Accumulation is commutative: the board's final state
//! does not depend on the order in which calls complete (ties keep the
//! first-seen leader, the one documented exception).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{ModelSpec, Question};

use super::tally::QuestionTally;
use super::vote::VoteSource;

/// All tallies for one solve job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusBoard {
    tallies: BTreeMap<String, QuestionTally>,
    /// Vote weight per model key
    weights: HashMap<String, u32>,
    /// Weighted vote total each question expects
    expected_votes: u32,
}

impl ConsensusBoard {
    /// Create an empty board for `questions`, with the expectation sized
    /// from the enabled `specs` (sum of `max_calls_per_job x weight`).
    pub fn new(questions: &[Question], specs: &[ModelSpec]) -> Self {
        let expected_votes = specs.iter().map(ModelSpec::expected_weighted_votes).sum();
        let weights = specs
            .iter()
            .map(|s| (s.key.clone(), s.weight))
            .collect();
        let tallies = questions
            .iter()
            .map(|q| {
                (
                    q.id().to_string(),
                    QuestionTally::new(q.option_keys().collect(), expected_votes),
                )
            })
            .collect();

        Self {
            tallies,
            weights,
            expected_votes,
        }
    }

    /// Record one vote; the weight comes from the source's model spec
    /// (fallback votes weigh 1, as do votes from unknown model keys).
    ///
    /// Returns `false` when the question is unknown or the option letter is
    /// outside the question's key set.
    pub fn record_vote(&mut self, question_id: &str, option: char, source: &VoteSource) -> bool {
        let weight = match source.model_key() {
            Some(key) => self.weights.get(key).copied().unwrap_or(1),
            None => 1,
        };
        match self.tallies.get_mut(question_id) {
            Some(tally) => tally.record(option, source.label(), weight),
            None => false,
        }
    }

    /// Finalize every tally, injecting fallback votes until each question
    /// resolves. Returns the total number of votes injected.
    pub fn finalize_all(&mut self) -> u32 {
        self.tallies.values_mut().map(QuestionTally::finalize).sum()
    }

    /// Whether every question's leader confidence has reached `percent`
    pub fn all_above(&self, percent: f64) -> bool {
        self.tallies
            .values()
            .all(|t| t.confidence_percent() >= percent)
    }

    /// Whether every question has met its expected vote total
    pub fn is_fully_resolved(&self) -> bool {
        self.tallies.values().all(QuestionTally::is_resolved)
    }

    /// Current leading answer per question (questions with no votes yet are
    /// omitted)
    pub fn answers(&self) -> BTreeMap<String, char> {
        self.tallies
            .iter()
            .filter_map(|(id, t)| t.leading_option().map(|o| (id.clone(), o)))
            .collect()
    }

    pub fn tally(&self, question_id: &str) -> Option<&QuestionTally> {
        self.tallies.get(question_id)
    }

    pub fn tallies(&self) -> &BTreeMap<String, QuestionTally> {
        &self.tallies
    }

    pub fn expected_votes(&self) -> u32 {
        self.expected_votes
    }

    pub fn question_count(&self) -> usize {
        self.tallies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        vec![
            Question::new("q1", "First?", vec!["a", "b", "c"]),
            Question::new("q2", "Second?", vec!["a", "b"]),
        ]
    }

    fn specs() -> Vec<ModelSpec> {
        vec![
            ModelSpec::new("pro", "gemini-2.5-pro")
                .with_max_calls(1)
                .with_weight(3),
            ModelSpec::new("flash", "gemini-2.5-flash")
                .with_max_calls(2)
                .with_weight(1),
        ]
    }

    #[test]
    fn test_expected_votes_sums_specs() {
        let board = ConsensusBoard::new(&questions(), &specs());
        // 1x3 + 2x1
        assert_eq!(board.expected_votes(), 5);
    }

    #[test]
    fn test_weight_resolved_from_source() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        board.record_vote("q1", 'A', &VoteSource::model("pro", 0));
        board.record_vote("q1", 'B', &VoteSource::model("flash", 0));
        board.record_vote("q1", 'B', &VoteSource::model("flash", 1));

        let tally = board.tally("q1").unwrap();
        // 3 > 2: the weighted vote leads
        assert_eq!(tally.leading_option(), Some('A'));
        assert!((tally.confidence_percent() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_model_key_weighs_one() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        board.record_vote("q1", 'C', &VoteSource::model("stranger", 0));
        assert_eq!(board.tally("q1").unwrap().weight_for('C'), 1);
    }

    #[test]
    fn test_unknown_question_rejected() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        assert!(!board.record_vote("q9", 'A', &VoteSource::Fallback));
    }

    #[test]
    fn test_finalize_all_resolves_everything() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        board.record_vote("q1", 'B', &VoteSource::model("pro", 0));

        let injected = board.finalize_all();
        // q1 needs 2 more, q2 needs all 5
        assert_eq!(injected, 7);
        assert!(board.is_fully_resolved());

        // Every leader is a member of its question's key set
        for (id, tally) in board.tallies() {
            let leader = tally.leading_option().unwrap();
            assert!(
                tally.option_keys().contains(&leader),
                "{}: leader {} outside key set",
                id,
                leader
            );
        }
    }

    #[test]
    fn test_answers_snapshot() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        board.record_vote("q2", 'B', &VoteSource::model("flash", 0));

        let answers = board.answers();
        assert_eq!(answers.get("q2"), Some(&'B'));
        assert!(!answers.contains_key("q1"));
    }

    #[test]
    fn test_all_above_threshold() {
        let mut board = ConsensusBoard::new(&questions(), &specs());
        assert!(!board.all_above(50.0));

        board.record_vote("q1", 'A', &VoteSource::model("pro", 0));
        board.record_vote("q2", 'A', &VoteSource::model("pro", 0));
        // 3/5 = 60% each
        assert!(board.all_above(50.0));
        assert!(!board.all_above(80.0));
    }
}
