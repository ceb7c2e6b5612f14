//! Image filename candidates: the ordered naming fallbacks used to pair a
//! word with an image on disk.
//!
//! # Default order
//! 1. Zero-padded global index at width 3, then 2, then 1 (`007`, `07`, `7`)
//! 2. Lowercased word text (`apple`)
//!
//! Each strategy is tried with every extension in order (`png`, `jpg`, `jpeg`)
//! before moving to the next strategy. The first existing file wins.

use std::path::{Path, PathBuf};

use crate::wordlist::source::IMAGE_EXTENSIONS;

/// One way of turning `(index, word)` into a file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// The 1-based index, zero-padded to `width` digits.
    ZeroPaddedIndex { width: usize },
    /// The word itself, lowercased. Skipped for empty words.
    LowercaseWord,
}

impl CandidateStrategy {
    fn stem(&self, index: usize, word: &str) -> Option<String> {
        match self {
            CandidateStrategy::ZeroPaddedIndex { width } => {
                Some(format!("{index:0width$}", width = *width))
            }
            CandidateStrategy::LowercaseWord => {
                let word = word.trim();
                (!word.is_empty()).then(|| word.to_lowercase())
            }
        }
    }
}

/// Ordered strategies × ordered extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePolicy {
    strategies: Vec<CandidateStrategy>,
    extensions: Vec<&'static str>,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self::new(
            vec![
                CandidateStrategy::ZeroPaddedIndex { width: 3 },
                CandidateStrategy::ZeroPaddedIndex { width: 2 },
                CandidateStrategy::ZeroPaddedIndex { width: 1 },
                CandidateStrategy::LowercaseWord,
            ],
            IMAGE_EXTENSIONS.to_vec(),
        )
    }
}

impl CandidatePolicy {
    pub fn new(strategies: Vec<CandidateStrategy>, extensions: Vec<&'static str>) -> Self {
        Self {
            strategies,
            extensions,
        }
    }

    /// Index-based names only, for labels that never match a file name.
    pub fn index_only() -> Self {
        let mut policy = Self::default();
        policy
            .strategies
            .retain(|s| matches!(s, CandidateStrategy::ZeroPaddedIndex { .. }));
        policy
    }

    /// File names to try, in priority order. Duplicates (e.g. `100` at every
    /// width) are listed once.
    pub fn candidates(&self, index: usize, word: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for strategy in &self.strategies {
            let Some(stem) = strategy.stem(index, word) else {
                continue;
            };
            for ext in &self.extensions {
                let name = format!("{stem}.{ext}");
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// First candidate that exists as a file in `dir`.
    pub fn resolve(&self, dir: &Path, index: usize, word: &str) -> Option<PathBuf> {
        self.candidates(index, word)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }
}
