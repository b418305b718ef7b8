//! Question file loading
//!
//! The document-extraction pipeline that produces question batches is an
//! external collaborator; this reader only accepts its JSON output shape:
//!
//! ```json
//! [
//!   {"id": "q1", "statement": "Largest planet?", "options": ["Mars", "Jupiter"]}
//! ]
//! ```
//!
//! Missing ids are filled from the 1-based position.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use mcq_domain::Question;

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    #[serde(default)]
    id: Option<String>,
    statement: String,
    options: Vec<String>,
}

/// Load and validate a question batch from a JSON file
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read questions file {}", path.display()))?;
    let entries: Vec<QuestionEntry> = serde_json::from_str(&text)
        .with_context(|| format!("could not parse questions file {}", path.display()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let id = entry.id.unwrap_or_else(|| format!("q{}", i + 1));
            Question::try_new(id, entry.statement, entry.options)
                .map_err(anyhow::Error::from)
        })
        .collect()
}
