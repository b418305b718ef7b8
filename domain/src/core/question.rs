//! Question value object

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A multiple-choice question to be answered by the quorum (Value Object)
///
/// Options are keyed by contiguous capital letters starting at `A`; the key
/// for an option is derived from its position, so the ordering of the
/// `options` list is load-bearing.
///
/// # Example
///
/// ```
/// use mcq_domain::Question;
///
/// let q = Question::new("q1", "Largest planet?", vec!["Mars", "Jupiter", "Venus"]);
/// assert_eq!(q.option_keys().collect::<Vec<_>>(), vec!['A', 'B', 'C']);
/// assert!(q.has_option('B'));
/// assert!(!q.has_option('D'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: String,
    statement: String,
    options: Vec<String>,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the question would be invalid (see [`Question::try_new`])
    pub fn new(
        id: impl Into<String>,
        statement: impl Into<String>,
        options: Vec<impl Into<String>>,
    ) -> Self {
        Self::try_new(id, statement, options).expect("invalid question")
    }

    /// Try to create a new question.
    ///
    /// Requires a non-empty id, a non-empty statement, and between 2 and 26
    /// options (one per capital letter).
    pub fn try_new(
        id: impl Into<String>,
        statement: impl Into<String>,
        options: Vec<impl Into<String>>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let statement = statement.into();
        let options: Vec<String> = options.into_iter().map(Into::into).collect();

        if id.trim().is_empty() {
            return Err(DomainError::InvalidQuestion("empty id".to_string()));
        }
        if statement.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(format!(
                "{}: empty statement",
                id
            )));
        }
        if options.len() < 2 || options.len() > 26 {
            return Err(DomainError::InvalidQuestion(format!(
                "{}: expected 2-26 options, got {}",
                id,
                options.len()
            )));
        }

        Ok(Self {
            id,
            statement,
            options,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// Option texts in key order
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The option keys, `A`, `B`, ... in order
    pub fn option_keys(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.options.len()).map(|i| (b'A' + i as u8) as char)
    }

    /// Whether `key` is a valid option letter for this question
    pub fn has_option(&self, key: char) -> bool {
        let key = key.to_ascii_uppercase();
        key >= 'A' && (key as u8 - b'A') < self.options.len() as u8
    }

    /// The option text for `key`, if valid
    pub fn option_text(&self, key: char) -> Option<&str> {
        let key = key.to_ascii_uppercase();
        if !key.is_ascii_uppercase() {
            return None;
        }
        self.options
            .get((key as u8 - b'A') as usize)
            .map(String::as_str)
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new("q1", "What is Rust?", vec!["A language", "A fungus"]);
        assert_eq!(q.id(), "q1");
        assert_eq!(q.statement(), "What is Rust?");
        assert_eq!(q.options().len(), 2);
    }

    #[test]
    fn test_option_keys_are_contiguous() {
        let q = Question::new("q1", "Pick one", vec!["a", "b", "c", "d"]);
        let keys: Vec<char> = q.option_keys().collect();
        assert_eq!(keys, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn test_has_option_bounds() {
        let q = Question::new("q1", "Pick one", vec!["a", "b", "c"]);
        assert!(q.has_option('A'));
        assert!(q.has_option('c')); // case-insensitive
        assert!(!q.has_option('D'));
        assert!(!q.has_option('1'));
    }

    #[test]
    fn test_option_text_lookup() {
        let q = Question::new("q1", "Pick one", vec!["first", "second"]);
        assert_eq!(q.option_text('B'), Some("second"));
        assert_eq!(q.option_text('C'), None);
    }

    #[test]
    fn test_too_few_options_rejected() {
        assert!(Question::try_new("q1", "Pick one", vec!["only"]).is_err());
    }

    #[test]
    fn test_empty_statement_rejected() {
        assert!(Question::try_new("q1", "   ", vec!["a", "b"]).is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(Question::try_new("", "Pick one", vec!["a", "b"]).is_err());
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_invalid() {
        Question::new("q1", "Pick one", vec!["only"]);
    }
}
