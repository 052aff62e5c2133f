//! Tokenizers: the first stage of the analysis pipeline.

use crate::types::Token;

/// Splits a string into a sequence of [`Token`]s.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Splits on runs of letters/digits, treating everything else (punctuation,
/// whitespace, symbols) as a separator. Maximal runs of codepoints where
/// `c.is_alphabetic() || c.is_numeric()` become tokens; zero-length runs
/// between consecutive separators are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordTokenizer;

impl WordTokenizer {
    pub fn new() -> Self {
        WordTokenizer
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c.is_numeric()
}

impl Tokenize for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;
        let mut chars = text.char_indices().peekable();

        while let Some(&(start, c)) = chars.peek() {
            if !is_word_char(c) {
                chars.next();
                continue;
            }

            let mut end = start + c.len_utf8();
            chars.next();
            while let Some(&(idx, c2)) = chars.peek() {
                if !is_word_char(c2) {
                    break;
                }
                end = idx + c2.len_utf8();
                chars.next();
            }

            tokens.push(Token::new(start, end, position, &text[start..end]));
            position += 1;
        }

        tokens
    }
}

/// Emits the entire input as a single token at position 0. Useful for
/// exact-match fields (identifiers, category slugs) that should never be
/// split on word boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTokenizer;

impl KeywordTokenizer {
    pub fn new() -> Self {
        KeywordTokenizer
    }
}

impl Tokenize for KeywordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        vec![Token::new(0, text.len(), 0, text)]
    }
}
