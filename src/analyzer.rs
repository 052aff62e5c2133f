//! Composes a tokenizer with an ordered chain of token filters.

use std::collections::HashMap;

use crate::filters::{
    EnglishStemFilter, MaxTokenLengthFilter, StopFilter, TokenFilter, TurkishAccentFilter,
    TurkishLowercaseFilter, TurkishStemFilter,
};
use crate::tokenizer::{Tokenize, WordTokenizer};
use crate::types::Token;

/// Runs a tokenizer, then folds each registered filter over the resulting
/// token stream in registration order.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenize + Send + Sync>,
    filters: Vec<Box<dyn TokenFilter + Send + Sync>>,
}

impl Analyzer {
    pub fn new(tokenizer: impl Tokenize + Send + Sync + 'static) -> Self {
        Analyzer {
            tokenizer: Box::new(tokenizer),
            filters: Vec::new(),
        }
    }

    /// Registers a filter at the end of the chain; returns `self` so
    /// construction can be chained.
    pub fn add_filter(mut self, filter: impl TokenFilter + Send + Sync + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        tokens
    }
}

/// Builds the word tokenizer + Turkish/English filter chain used by the
/// `build`/`search` CLI subcommands: lowercase (Turkish rules), accent
/// fold, Turkish stem lookup, English Porter stem, stop-word removal, and
/// a max-token-length cutoff.
pub fn default_analyzer(
    turkish_stems: HashMap<String, String>,
    stop_words: impl IntoIterator<Item = String>,
    max_token_length: usize,
) -> Analyzer {
    Analyzer::new(WordTokenizer::new())
        .add_filter(TurkishLowercaseFilter::new())
        .add_filter(TurkishAccentFilter::new())
        .add_filter(TurkishStemFilter::new(turkish_stems))
        .add_filter(EnglishStemFilter::new())
        .add_filter(StopFilter::new(stop_words))
        .add_filter(MaxTokenLengthFilter::new(max_token_length))
}
