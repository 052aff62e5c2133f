//! Token filters: the chain stage that runs after tokenization.
//!
//! Filters operate on the whole token stream (not one token at a time)
//! because [`StopFilter`] needs to remove entries without renumbering the
//! positions of the tokens around them — phrase matching depends on the
//! original position gaps surviving stop-word removal.

use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};

use flate2::read::GzDecoder;
use rust_stemmers::{Algorithm, Stemmer};

use crate::types::Token;

/// Rewrites or removes tokens in place.
pub trait TokenFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token>;
}

/// Turkish-aware lowercasing: `İ` (dotted capital I) maps to `i`, and the
/// plain ASCII `I` maps to `ı` (dotless i) rather than to ASCII `i`.
/// Every other character uses the standard Unicode lowercase mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurkishLowercaseFilter;

impl TurkishLowercaseFilter {
    pub fn new() -> Self {
        TurkishLowercaseFilter
    }
}

fn turkish_lowercase_char(c: char) -> String {
    match c {
        '\u{0130}' => "i".to_string(), // İ -> i
        'I' => "ı".to_string(),        // I -> ı (dotless i)
        other => other.to_lowercase().collect(),
    }
}

impl TokenFilter for TurkishLowercaseFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            token.value = token.value.chars().map(turkish_lowercase_char).collect();
        }
        tokens
    }
}

/// Folds the six Turkish circumflexed vowels to their plain counterparts:
/// â→a, î→i, û→u, Â→A, Î→İ, Û→U.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurkishAccentFilter;

impl TurkishAccentFilter {
    pub fn new() -> Self {
        TurkishAccentFilter
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'â' => 'a',
        'î' => 'i',
        'û' => 'u',
        'Â' => 'A',
        'Î' => '\u{0130}', // İ
        'Û' => 'U',
        other => other,
    }
}

impl TokenFilter for TurkishAccentFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            token.value = token.value.chars().map(fold_accent).collect();
        }
        tokens
    }
}

/// Replaces a token's value with its stem if the stem dictionary has an
/// entry for it; leaves unknown words untouched.
#[derive(Debug, Clone)]
pub struct TurkishStemFilter {
    dict: HashMap<String, String>,
}

impl TurkishStemFilter {
    pub fn new(dict: HashMap<String, String>) -> Self {
        TurkishStemFilter { dict }
    }

    /// Loads a `word=>stem` dictionary from a gzip-compressed text file,
    /// one mapping per line.
    pub fn load_gz(path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = io::BufReader::new(GzDecoder::new(file));
        let mut dict = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            if let Some((word, stem)) = line.split_once("=>") {
                dict.insert(word.to_string(), stem.to_string());
            }
        }

        Ok(TurkishStemFilter { dict })
    }

    /// Consumes the filter and returns the underlying dictionary, for
    /// callers that want to build an [`crate::analyzer::Analyzer`] via
    /// [`crate::analyzer::default_analyzer`] instead of registering this
    /// filter directly.
    pub fn into_dict(self) -> HashMap<String, String> {
        self.dict
    }
}

impl TokenFilter for TurkishStemFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            if let Some(stem) = self.dict.get(&token.value) {
                token.value = stem.clone();
            }
        }
        tokens
    }
}

/// Porter-stems English tokens via [`rust_stemmers`].
#[derive(Debug)]
pub struct EnglishStemFilter {
    stemmer: Stemmer,
}

impl Default for EnglishStemFilter {
    fn default() -> Self {
        EnglishStemFilter::new()
    }
}

impl EnglishStemFilter {
    pub fn new() -> Self {
        EnglishStemFilter {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl TokenFilter for EnglishStemFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            token.value = self.stemmer.stem(&token.value).into_owned();
        }
        tokens
    }
}

/// Drops tokens whose value is in the stop-word set. Positions of the
/// surviving tokens are left exactly as assigned by the tokenizer — there
/// is no renumbering — so a phrase query spanning a removed stop word still
/// sees the original position gap and can decide for itself whether that
/// gap still counts as "adjacent".
#[derive(Debug, Clone)]
pub struct StopFilter {
    words: HashSet<String>,
}

impl StopFilter {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        StopFilter {
            words: words.into_iter().collect(),
        }
    }
}

impl TokenFilter for StopFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|t| !self.words.contains(&t.value))
            .collect()
    }
}

/// Truncates each token's `value` to at most `max_length` codepoints.
/// `start`/`end` are left untouched — they still describe the full
/// original match span in the source text, not the truncated value.
#[derive(Debug, Clone, Copy)]
pub struct MaxTokenLengthFilter {
    max_length: usize,
}

impl MaxTokenLengthFilter {
    pub fn new(max_length: usize) -> Self {
        MaxTokenLengthFilter { max_length }
    }
}

impl TokenFilter for MaxTokenLengthFilter {
    fn filter(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in &mut tokens {
            if token.value.chars().count() > self.max_length {
                token.value = token.value.chars().take(self.max_length).collect();
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_lowercase_maps_dotted_and_dotless_i() {
        let f = TurkishLowercaseFilter::new();
        let tokens = vec![Token::new(0, 1, 0, "İ"), Token::new(0, 1, 1, "I")];
        let out = f.filter(tokens);
        assert_eq!(out[0].value, "i");
        assert_eq!(out[1].value, "ı");
    }

    #[test]
    fn turkish_accent_filter_folds_circumflex_vowels() {
        let f = TurkishAccentFilter::new();
        let tokens = vec![Token::new(0, 1, 0, "âîûÂÎÛ")];
        let out = f.filter(tokens);
        assert_eq!(out[0].value, "aiuAİU");
    }

    #[test]
    fn turkish_stem_filter_replaces_known_words_only() {
        let mut dict = HashMap::new();
        dict.insert("kitaplar".to_string(), "kitap".to_string());
        let f = TurkishStemFilter::new(dict);
        let tokens = vec![Token::new(0, 8, 0, "kitaplar"), Token::new(0, 3, 1, "ev")];
        let out = f.filter(tokens);
        assert_eq!(out[0].value, "kitap");
        assert_eq!(out[1].value, "ev");
    }

    #[test]
    fn stop_filter_removes_without_renumbering_positions() {
        let f = StopFilter::new(["the".to_string()]);
        let tokens = vec![
            Token::new(0, 3, 0, "the"),
            Token::new(4, 9, 1, "quick"),
            Token::new(10, 13, 2, "fox"),
        ];
        let out = f.filter(tokens);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, 1);
        assert_eq!(out[1].position, 2);
    }

    #[test]
    fn max_token_length_filter_truncates_value_keeps_span() {
        let f = MaxTokenLengthFilter::new(5);
        let tokens = vec![Token::new(7, 20, 1, "verylongtoken")];
        let out = f.filter(tokens);
        assert_eq!(out[0].value, "veryl");
        assert_eq!(out[0].start, 7);
        assert_eq!(out[0].end, 20);
    }

    #[test]
    fn max_token_length_filter_leaves_short_tokens_alone() {
        let f = MaxTokenLengthFilter::new(5);
        let tokens = vec![Token::new(0, 6, 0, "aydın")];
        let out = f.filter(tokens);
        assert_eq!(out[0].value, "aydın");
    }
}
