//! FAQ lookup against a static question/answer corpus.
//!
//! Two passes: substring containment in corpus order (first match wins),
//! then token-overlap scoring (highest count wins, first-seen wins ties).
//! The corpus comes from an injected [`CorpusProvider`], read fresh on every
//! call; a missing or unreadable corpus is an empty corpus, never an error.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::warn;

use crate::error::AgentError;
use crate::models::FaqEntry;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("Invalid regex: word tokens"));

/// Supplies the ordered FAQ corpus. Implementations must never fail: read
/// problems surface as an empty corpus.
pub trait CorpusProvider: Send + Sync {
    fn load(&self) -> Vec<FaqEntry>;
}

/// Corpus backed by a JSON file: an array of `{question, answer}` objects.
pub struct JsonFileCorpus {
    path: PathBuf,
}

impl JsonFileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<FaqEntry>, AgentError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl CorpusProvider for JsonFileCorpus {
    fn load(&self) -> Vec<FaqEntry> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), "FAQ corpus unavailable: {}", e);
                Vec::new()
            }
        }
    }
}

/// In-memory corpus for tests and embedding callers.
pub struct StaticCorpus {
    entries: Vec<FaqEntry>,
}

impl StaticCorpus {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Convenience constructor from `(question, answer)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(q, a)| FaqEntry {
                    question: q.to_string(),
                    answer: a.to_string(),
                })
                .collect(),
        )
    }
}

impl CorpusProvider for StaticCorpus {
    fn load(&self) -> Vec<FaqEntry> {
        self.entries.clone()
    }
}

fn tokens(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Matches `text` against the corpus; hits return `"FAQ: <answer>"`.
pub fn match_faq(text: &str, corpus: &[FaqEntry]) -> Option<String> {
    if corpus.is_empty() {
        return None;
    }
    let q = text.to_lowercase();

    // Pass 1: substring containment, corpus order, first match wins.
    for entry in corpus {
        let question = entry.question.to_lowercase();
        if !question.is_empty() && q.contains(&question) {
            return Some(format!("FAQ: {}", entry.answer));
        }
    }

    // Pass 2: token-overlap scoring. Strict '>' keeps the first-seen entry
    // on ties, and a zero best score means no match at all.
    let input_tokens = tokens(&q);
    let mut best: Option<&FaqEntry> = None;
    let mut best_score = 0usize;
    for entry in corpus {
        let score = input_tokens
            .intersection(&tokens(&entry.question.to_lowercase()))
            .count();
        if score > best_score {
            best_score = score;
            best = Some(entry);
        }
    }
    best.map(|entry| format!("FAQ: {}", entry.answer))
}
