//! Answer extraction from model output.
//!
//! These functions pull option letters out of free-form LLM responses using
//! the prompt-agreed format (one `N: L` line per question for batches, a
//! lone letter for single questions). They are pure domain logic — no I/O,
//! no session management, just text pattern matching.
//!
//! Anything that does not match is skipped silently: a malformed line means
//! a missing vote, never an error.

/// Parse the batch answer format: one `N: L` line per question.
///
/// Accepted per line (case-insensitive, surrounding prose ignored):
/// `12: B`, `12. B`, `12) B`, `Q12: B`. Returns `(index, letter)` pairs with
/// 1-based indices, letters uppercased. Later duplicates of an index are
/// kept — the caller decides what a duplicate means.
pub fn parse_answer_lines(text: &str) -> Vec<(usize, char)> {
    let mut answers = Vec::new();

    for line in text.lines() {
        let line = line.trim().trim_start_matches(['*', '-', '>']).trim();
        if line.is_empty() {
            continue;
        }

        let rest = line
            .strip_prefix('Q')
            .or_else(|| line.strip_prefix('q'))
            .unwrap_or(line);

        // Leading question number
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        let Ok(index) = digits.parse::<usize>() else {
            continue;
        };
        if index == 0 {
            continue;
        }

        // Separator, then the letter
        let rest = rest[digits.len()..].trim_start();
        let rest = rest.trim_start_matches([':', '.', ')', '-']).trim_start();
        let mut chars = rest.chars();
        let Some(letter) = chars.next() else {
            continue;
        };
        if !letter.is_ascii_alphabetic() {
            continue;
        }
        // A lone letter, possibly followed by punctuation or the option text
        // restated after a separator; `12: Because...` must not parse as B.
        match chars.next() {
            None => {}
            Some(next) if !next.is_ascii_alphanumeric() => {}
            Some(_) => continue,
        }

        answers.push((index, letter.to_ascii_uppercase()));
    }

    answers
}

/// Parse a single-question response down to one option letter.
///
/// Prefers an explicit `Answer: L` line, then falls back to the first line
/// that is a lone letter. Returns `None` when nothing matches.
pub fn parse_single_answer(text: &str) -> Option<char> {
    // Explicit "Answer: X" wins
    for line in text.lines() {
        let line = line.trim();
        let lowered = line.to_ascii_lowercase();
        if let Some(rest) = lowered.strip_prefix("answer") {
            let rest = rest.trim_start_matches([':', '.', '-', ' ']);
            if let Some(letter) = rest.chars().next()
                && letter.is_ascii_alphabetic()
                && rest.chars().nth(1).map(|c| !c.is_ascii_alphanumeric()).unwrap_or(true)
            {
                return Some(letter.to_ascii_uppercase());
            }
        }
    }

    // Otherwise the first line that is just one letter
    for line in text.lines() {
        let line = line.trim().trim_matches(['*', '`', '"', '\'', '.', ')']);
        let mut chars = line.chars();
        if let Some(letter) = chars.next()
            && letter.is_ascii_alphabetic()
            && chars.next().is_none()
        {
            return Some(letter.to_ascii_uppercase());
        }
    }

    None
}
