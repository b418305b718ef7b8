//! Prompt templates for the answer exchange format.
//!
//! The templates pin down the one contract the parser in
//! [`crate::quorum::parsing`] relies on: batch responses answer with one
//! `N: L` line per question, single-question responses with a lone letter.
//! Wording beyond that contract is free to evolve.

use crate::core::Question;

/// Static prompt builders
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for batch solving
    pub fn batch_system() -> &'static str {
        "You are answering a multiple-choice exam. For every question, pick \
         exactly one option letter. Reply with one line per question in the \
         form `NUMBER: LETTER` and nothing else."
    }

    /// Serialize all questions into one numbered batch prompt
    pub fn batch_prompt(questions: &[Question]) -> String {
        let mut prompt = String::new();
        for (i, question) in questions.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, question.statement()));
            for (key, text) in question.option_keys().zip(question.options()) {
                prompt.push_str(&format!("{}) {}\n", key, text));
            }
            prompt.push('\n');
        }
        prompt.push_str(
            "Answer every question. Reply with exactly one line per question, \
             formatted `NUMBER: LETTER`.",
        );
        prompt
    }

    /// Prompt for answering a single question
    pub fn single_prompt(question: &Question) -> String {
        let mut prompt = format!("{}\n", question.statement());
        for (key, text) in question.option_keys().zip(question.options()) {
            prompt.push_str(&format!("{}) {}\n", key, text));
        }
        prompt.push_str("\nReply with the single letter of the correct option and nothing else.");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::parsing::{parse_answer_lines, parse_single_answer};

    fn sample() -> Vec<Question> {
        vec![
            Question::new("q1", "Largest planet?", vec!["Mars", "Jupiter"]),
            Question::new("q2", "Smallest prime?", vec!["1", "2", "3"]),
        ]
    }

    #[test]
    fn test_batch_prompt_numbers_questions() {
        let prompt = PromptTemplate::batch_prompt(&sample());
        assert!(prompt.contains("1. Largest planet?"));
        assert!(prompt.contains("2. Smallest prime?"));
        assert!(prompt.contains("B) Jupiter"));
        assert!(prompt.contains("NUMBER: LETTER"));
    }

    #[test]
    fn test_batch_format_round_trips_through_parser() {
        // A well-behaved model echoing the requested format parses cleanly
        let reply = "1: B\n2: B\n";
        let parsed = parse_answer_lines(reply);
        assert_eq!(parsed, vec![(1, 'B'), (2, 'B')]);
    }

    #[test]
    fn test_single_prompt_lists_options() {
        let prompt = PromptTemplate::single_prompt(&sample()[0]);
        assert!(prompt.contains("A) Mars"));
        assert!(prompt.contains("single letter"));
        assert_eq!(parse_single_answer("B"), Some('B'));
    }
}
