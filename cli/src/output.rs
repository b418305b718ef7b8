//! Console output formatting for solve results

use colored::Colorize;

use mcq_application::{SolveOutcome, UsageSnapshot};

/// Formats solve outcomes for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per question: id, answer, confidence
    pub fn format_answers(outcome: &SolveOutcome) -> String {
        let mut out = String::new();
        for (id, answer) in &outcome.answers {
            let confidence = outcome
                .board
                .tally(id)
                .map(|t| t.confidence_percent())
                .unwrap_or(0.0);
            out.push_str(&format!(
                "{}: {} {}\n",
                id.bold(),
                answer.to_string().green().bold(),
                format!("({:.0}%)", confidence).dimmed()
            ));
        }
        if outcome.fallback_votes > 0 {
            out.push_str(&format!(
                "{}\n",
                format!("{} fallback votes injected", outcome.fallback_votes).yellow()
            ));
        }
        out
    }

    /// Answers plus the per-option vote detail
    pub fn format_full(outcome: &SolveOutcome) -> String {
        let mut out = String::new();
        for (id, tally) in outcome.board.tallies() {
            let leader = tally
                .leading_option()
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{} -> {} {} [{} / {} weighted votes]\n",
                id.bold(),
                leader.green().bold(),
                format!("({:.0}%)", tally.confidence_percent()).dimmed(),
                tally.received_weighted_votes(),
                tally.expected_votes()
            ));
            for &option in tally.option_keys() {
                let sources = tally.votes_for(option);
                if sources.is_empty() {
                    continue;
                }
                out.push_str(&format!(
                    "    {} ({}): {}\n",
                    option,
                    tally.weight_for(option),
                    sources.join(", ")
                ));
            }
        }
        out
    }

    /// Machine-readable output
    pub fn format_json(outcome: &SolveOutcome) -> String {
        let answers: serde_json::Map<String, serde_json::Value> = outcome
            .answers
            .iter()
            .map(|(id, answer)| (id.clone(), serde_json::json!(answer.to_string())))
            .collect();
        serde_json::to_string_pretty(&serde_json::json!({
            "answers": answers,
            "fallback_votes": outcome.fallback_votes,
            "tallies": outcome.board.tallies(),
        }))
        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Usage statistics footer
    pub fn format_stats(snapshot: &UsageSnapshot) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}: {} calls, {} rotations, {} rate-limit hits\n",
            "usage".bold(),
            snapshot.total_calls,
            snapshot.rotations,
            snapshot.rate_limit_hits
        ));
        for (model, count) in &snapshot.per_model {
            out.push_str(&format!("  model {}: {}\n", model, count));
        }
        for (credential, count) in &snapshot.per_credential {
            out.push_str(&format!("  credential {}: {}\n", credential, count));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_domain::{ConsensusBoard, ModelSpec, Question, VoteSource};
    use std::collections::BTreeMap;

    fn outcome() -> SolveOutcome {
        let questions = vec![Question::new("q1", "First?", vec!["a", "b"])];
        let specs = vec![ModelSpec::new("pro", "gemini-2.5-pro")];
        let mut board = ConsensusBoard::new(&questions, &specs);
        board.record_vote("q1", 'B', &VoteSource::model("pro", 0));
        SolveOutcome {
            answers: BTreeMap::from([("q1".to_string(), 'B')]),
            board,
            fallback_votes: 0,
        }
    }

    #[test]
    fn test_answers_format_contains_confidence() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_answers(&outcome());
        assert!(text.contains("q1: B (100%)"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let text = ConsoleFormatter::format_json(&outcome());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["answers"]["q1"], "B");
        assert_eq!(value["fallback_votes"], 0);
    }

    #[test]
    fn test_full_format_lists_votes() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_full(&outcome());
        assert!(text.contains("q1 -> B"));
        assert!(text.contains("pro#0"));
    }
}
