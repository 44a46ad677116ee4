//! Word list parsing.
//!
//! The word list is a plain UTF-8 file with one entry per line:
//!
//! ```text
//! abandon [əˈbændən] vt.丢弃；放弃，抛弃
//! ```
//!
//! Section letters, blank lines and the list's title/count headings are
//! skipped. Entries are identified by their position, so the file must not be
//! reordered between runs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

use crate::error::CorpusError;

static WORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z\-]+)\s+(\[.*?\])?\s+(.+)$").expect("word line pattern is valid")
});

const HEADING_PREFIXES: [&str; 2] = ["大学英语", "(共"];

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    /// Phonetic transcription including its brackets, empty when absent.
    pub phonetic: String,
    pub definition: String,
}

impl WordRecord {
    pub fn new(
        word: impl Into<String>,
        phonetic: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            phonetic: phonetic.into(),
            definition: definition.into(),
        }
    }
}

/// The ordered, immutable word list for one run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: Vec<WordRecord>,
}

impl Corpus {
    /// Read and parse a word list file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::parse(&content);
        tracing::debug!(path = %path.display(), words = corpus.len(), "word list parsed");
        Ok(corpus)
    }

    /// Like [`Corpus::load`], but an empty list is an error.
    pub fn load_non_empty(path: &Path) -> Result<Self, CorpusError> {
        let corpus = Self::load(path)?;
        if corpus.is_empty() {
            return Err(CorpusError::Empty(path.to_path_buf()));
        }
        Ok(corpus)
    }

    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !is_skippable(line))
            .filter_map(|line| {
                let parsed = parse_line(line);
                if parsed.is_none() {
                    tracing::debug!(line, "skipping unrecognised word list line");
                }
                parsed
            })
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<&WordRecord> {
        self.words.get(index)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordRecord> {
        self.words.iter()
    }
}

fn is_skippable(line: &str) -> bool {
    line.is_empty()
        || line.chars().count() == 1
        || HEADING_PREFIXES.iter().any(|p| line.starts_with(p))
}

fn parse_line(line: &str) -> Option<WordRecord> {
    let caps = WORD_LINE.captures(line)?;
    Some(WordRecord {
        word: caps[1].to_string(),
        phonetic: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        definition: caps[3].to_string(),
    })
}
