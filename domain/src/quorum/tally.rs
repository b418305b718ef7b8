//! Per-question vote tally
//!
//! A [`QuestionTally`] is the running scoreboard for one question. Votes are
//! appended with a weight; the leader is the option whose accumulated weight
//! is strictly greatest, and exact ties keep whichever option led first, so
//! a resolved leader never flips retroactively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vote::FALLBACK_LABEL;

/// Running weighted tally for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionTally {
    /// Valid option keys, in order
    option_keys: Vec<char>,
    /// Source labels per option, in arrival order
    votes: BTreeMap<char, Vec<String>>,
    /// Accumulated weight per option
    weights: BTreeMap<char, u32>,
    /// Weighted vote total this question expects from the job
    expected_votes: u32,
    /// Weighted votes received so far
    received_weighted_votes: u32,
    /// Current leader (strictly-greater-weight wins, first-seen keeps ties)
    leading_option: Option<char>,
}

impl QuestionTally {
    pub fn new(option_keys: Vec<char>, expected_votes: u32) -> Self {
        Self {
            option_keys,
            votes: BTreeMap::new(),
            weights: BTreeMap::new(),
            expected_votes,
            received_weighted_votes: 0,
            leading_option: None,
        }
    }

    /// Record one vote.
    ///
    /// Returns `false` (and records nothing) when `option` is not one of the
    /// question's keys — out-of-range answers are discarded, not errors.
    pub fn record(&mut self, option: char, source_label: impl Into<String>, weight: u32) -> bool {
        let option = option.to_ascii_uppercase();
        if !self.option_keys.contains(&option) {
            return false;
        }

        self.votes.entry(option).or_default().push(source_label.into());
        let total = self.weights.entry(option).or_insert(0);
        *total += weight;
        let total = *total;
        self.received_weighted_votes += weight;

        // Strictly greater weight takes the lead; ties keep the current
        // leader.
        match self.leading_option {
            None => self.leading_option = Some(option),
            Some(leader) if option != leader => {
                if total > self.weights.get(&leader).copied().unwrap_or(0) {
                    self.leading_option = Some(option);
                }
            }
            Some(_) => {}
        }

        true
    }

    /// Top the tally up with synthetic weight-1 votes, cycling the option
    /// keys from the first, until the expected total is met.
    ///
    /// Also injects one fallback vote when the tally is empty, so a leader
    /// always exists afterwards. Returns the number of votes injected.
    pub fn finalize(&mut self) -> u32 {
        let mut injected = 0;
        let mut cycle = self.option_keys.clone().into_iter().cycle();
        while self.received_weighted_votes < self.expected_votes || self.leading_option.is_none() {
            let Some(option) = cycle.next() else {
                break; // no options — nothing to inject
            };
            self.record(option, FALLBACK_LABEL, 1);
            injected += 1;
        }
        injected
    }

    pub fn leading_option(&self) -> Option<char> {
        self.leading_option
    }

    /// Leader weight as a percentage of the expected total.
    ///
    /// A zero-expectation tally reports 100 once any vote exists.
    pub fn confidence_percent(&self) -> f64 {
        let leader_weight = match self.leading_option {
            Some(leader) => self.weights.get(&leader).copied().unwrap_or(0),
            None => return 0.0,
        };
        if self.expected_votes == 0 {
            return 100.0;
        }
        leader_weight as f64 / self.expected_votes as f64 * 100.0
    }

    pub fn is_resolved(&self) -> bool {
        self.received_weighted_votes >= self.expected_votes && self.leading_option.is_some()
    }

    pub fn expected_votes(&self) -> u32 {
        self.expected_votes
    }

    pub fn received_weighted_votes(&self) -> u32 {
        self.received_weighted_votes
    }

    /// Source labels recorded for `option`, in arrival order
    pub fn votes_for(&self, option: char) -> &[String] {
        self.votes
            .get(&option.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All recorded votes, per option
    pub fn votes(&self) -> &BTreeMap<char, Vec<String>> {
        &self.votes
    }

    /// Accumulated weight for `option`
    pub fn weight_for(&self, option: char) -> u32 {
        self.weights
            .get(&option.to_ascii_uppercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn option_keys(&self) -> &[char] {
        &self.option_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(expected: u32) -> QuestionTally {
        QuestionTally::new(vec!['A', 'B', 'C'], expected)
    }

    #[test]
    fn test_weighted_leader() {
        // A single weight-3 vote beats two weight-1 votes
        let mut t = tally(5);
        t.record('A', "model1#0", 3);
        t.record('B', "model2#0", 1);
        t.record('B', "model2#1", 1);

        assert_eq!(t.leading_option(), Some('A'));
        assert_eq!(t.received_weighted_votes(), 5);
        assert!((t.confidence_percent() - 60.0).abs() < f64::EPSILON);
        assert!(t.is_resolved());
    }

    #[test]
    fn test_tie_keeps_first_seen_leader() {
        let mut t = tally(4);
        t.record('B', "m#0", 2);
        t.record('A', "m#1", 2);
        // A ties B but does not take the lead
        assert_eq!(t.leading_option(), Some('B'));

        t.record('A', "m#2", 1);
        // Strictly greater now
        assert_eq!(t.leading_option(), Some('A'));
    }

    #[test]
    fn test_out_of_range_vote_discarded() {
        let mut t = tally(2);
        assert!(!t.record('D', "m#0", 1));
        assert!(!t.record('1', "m#0", 1));
        assert_eq!(t.received_weighted_votes(), 0);
        assert_eq!(t.leading_option(), None);
    }

    #[test]
    fn test_finalize_cycles_from_first_key() {
        // Total failure: 5 fallbacks cycle A,B,C,A,B
        let mut t = tally(5);
        let injected = t.finalize();

        assert_eq!(injected, 5);
        assert!(t.is_resolved());
        assert_eq!(t.weight_for('A'), 2);
        assert_eq!(t.weight_for('B'), 2);
        assert_eq!(t.weight_for('C'), 1);
        // A reached the max first among the tie
        assert_eq!(t.leading_option(), Some('A'));
        assert_eq!(t.votes_for('A'), ["fallback", "fallback"]);
    }

    #[test]
    fn test_finalize_noop_when_already_resolved() {
        let mut t = tally(1);
        t.record('C', "m#0", 1);
        assert_eq!(t.finalize(), 0);
        assert_eq!(t.leading_option(), Some('C'));
    }

    #[test]
    fn test_finalize_guarantees_leader_even_with_zero_expectation() {
        let mut t = tally(0);
        assert!(!t.is_resolved());
        t.finalize();
        assert_eq!(t.leading_option(), Some('A'));
        assert!(t.is_resolved());
    }

    #[test]
    fn test_weighted_sum_invariant() {
        let mut t = tally(10);
        t.record('A', "a#0", 3);
        t.record('B', "b#0", 2);
        t.record('C', "c#0", 1);
        t.record('B', "b#1", 2);

        let per_option: u32 = ['A', 'B', 'C'].iter().map(|&o| t.weight_for(o)).sum();
        assert_eq!(per_option, t.received_weighted_votes());

        t.finalize();
        let per_option: u32 = ['A', 'B', 'C'].iter().map(|&o| t.weight_for(o)).sum();
        assert_eq!(per_option, t.received_weighted_votes());
    }

    #[test]
    fn test_order_independence_with_unique_max() {
        // Same multiset of votes in any permutation yields the same leader
        // and confidence
        let votes = [('A', 3u32), ('B', 1), ('B', 1), ('C', 2)];
        let mut permutations: Vec<Vec<(char, u32)>> = vec![
            votes.to_vec(),
            vec![votes[3], votes[2], votes[1], votes[0]],
            vec![votes[1], votes[3], votes[0], votes[2]],
        ];

        let mut seen: Option<(Option<char>, f64)> = None;
        for perm in permutations.drain(..) {
            let mut t = tally(7);
            for (i, (option, weight)) in perm.into_iter().enumerate() {
                t.record(option, format!("m#{}", i), weight);
            }
            let outcome = (t.leading_option(), t.confidence_percent());
            match &seen {
                None => seen = Some(outcome),
                Some(expected) => assert_eq!(*expected, outcome),
            }
        }
    }
}
