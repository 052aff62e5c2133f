//! JSON-driven analyzer construction: an alternative to composing an
//! [`crate::analyzer::Analyzer`] by hand in code, for callers that want the
//! tokenizer choice and filter chain order to live in a config file instead.

use std::path::Path;

use serde::Deserialize;

use crate::analyzer::Analyzer;
use crate::error::{IndexError, Result};
use crate::filters::{
    EnglishStemFilter, MaxTokenLengthFilter, StopFilter, TurkishAccentFilter,
    TurkishLowercaseFilter, TurkishStemFilter,
};
use crate::tokenizer::{KeywordTokenizer, WordTokenizer};

/// Which tokenizer an [`AnalyzerConfig`] selects.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    Word,
    Keyword,
}

/// One entry in an [`AnalyzerConfig`]'s filter chain, in registration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    TurkishLowercase,
    TurkishAccent,
    /// `stems_path` points at the same gzip-compressed `word=>stem`
    /// dictionary file [`TurkishStemFilter::load_gz`] reads.
    TurkishStem { stems_path: String },
    EnglishStem,
    Stop { words: Vec<String> },
    MaxTokenLength { max_length: usize },
}

/// A serde-`Deserialize` description of an [`Analyzer`]: a tokenizer choice
/// plus an ordered filter chain, loadable from a JSON manifest rather than
/// assembled with [`Analyzer::add_filter`] calls in code.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    pub tokenizer: TokenizerKind,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl AnalyzerConfig {
    /// Parses an `AnalyzerConfig` from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(IndexError::ConfigParse)
    }

    /// Builds the described [`Analyzer`], loading any referenced stem
    /// dictionary files from disk along the way.
    pub fn build(&self) -> Result<Analyzer> {
        let mut analyzer = match self.tokenizer {
            TokenizerKind::Word => Analyzer::new(WordTokenizer::new()),
            TokenizerKind::Keyword => Analyzer::new(KeywordTokenizer::new()),
        };

        for filter in &self.filters {
            analyzer = match filter {
                FilterConfig::TurkishLowercase => analyzer.add_filter(TurkishLowercaseFilter::new()),
                FilterConfig::TurkishAccent => analyzer.add_filter(TurkishAccentFilter::new()),
                FilterConfig::TurkishStem { stems_path } => {
                    analyzer.add_filter(TurkishStemFilter::load_gz(stems_path)?)
                }
                FilterConfig::EnglishStem => analyzer.add_filter(EnglishStemFilter::new()),
                FilterConfig::Stop { words } => {
                    analyzer.add_filter(StopFilter::new(words.iter().cloned()))
                }
                FilterConfig::MaxTokenLength { max_length } => {
                    analyzer.add_filter(MaxTokenLengthFilter::new(*max_length))
                }
            };
        }

        Ok(analyzer)
    }
}
