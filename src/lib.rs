//! An inverted-index full-text search engine for Turkish and English text:
//! tokenization, a Turkish-aware filter chain, BM25 ranking, boolean/phrase
//! queries, roaring-bitmap facets, and CDB persistence.

pub mod analyzer;
pub mod cdb;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod facets;
pub mod filters;
pub mod highlight;
pub mod index;
pub mod scoring;
pub mod search;
pub mod tokenizer;
pub mod types;

pub use analyzer::{default_analyzer, Analyzer};
pub use config::{AnalyzerConfig, FilterConfig, TokenizerKind};
pub use error::{IndexError, Result};
pub use highlight::{SimpleHighlighter, SpanHighlighter};
pub use index::Index;
pub use types::{FacetCount, IndexDoc, Posting, Token};
