//! Core data types shared across the analyzer, writer, and query evaluator.

use serde::{Deserialize, Serialize};

/// A single token produced by a [`crate::tokenizer::Tokenize`] implementation
/// and threaded through the filter chain.
///
/// `start`/`end` are byte offsets into the original (pre-analysis) string,
/// so a caller can slice the source text to recover the matched span even
/// after filters have rewritten `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub position: u32,
    pub value: String,
}

impl Token {
    pub fn new(start: usize, end: usize, position: u32, value: impl Into<String>) -> Self {
        Token {
            start,
            end,
            position,
            value: value.into(),
        }
    }
}

/// One document's occurrences of a single term.
///
/// `positions` holds every token position (not byte offset) at which the
/// term occurred in the document; `frequency` is always `positions.len()`.
/// `boost` starts at `1.0` and is overwritten by the scorer — posting lists
/// pulled from the index must be cloned before scoring so the stored copy
/// stays pristine (see [`crate::index::Index::search`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: u32,
    pub frequency: u32,
    pub boost: f32,
    pub positions: Vec<u32>,
}

impl Posting {
    pub fn new(doc_id: u32, positions: Vec<u32>) -> Self {
        Posting {
            doc_id,
            frequency: positions.len() as u32,
            boost: 1.0,
            positions,
        }
    }
}

/// A document handed to [`crate::index::Index::add`].
///
/// Mirrors the teacher's category-plus-text shape rather than introducing a
/// generic `Document` trait: the writer only ever needs the analyzed text
/// and the set of category labels a document belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexDoc {
    pub text: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl IndexDoc {
    pub fn new(text: impl Into<String>) -> Self {
        IndexDoc {
            text: text.into(),
            categories: Vec::new(),
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }
}

/// One row of a facet/token-stats result: a label and an integer count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub name: String,
    pub count: u64,
}
