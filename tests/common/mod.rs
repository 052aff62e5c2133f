//! Shared test fixtures.

#![allow(dead_code)]

use turknish::analyzer::Analyzer;
use turknish::index::Index;
use turknish::tokenizer::WordTokenizer;
use turknish::types::IndexDoc;

/// Builds a plain word-tokenizer index (no stemming/stop-words) from a
/// slice of document texts, with `avg_field_len` already computed.
pub fn build_test_index(texts: &[&str]) -> Index {
    let mut index = Index::new(Analyzer::new(WordTokenizer::new()));
    for text in texts {
        index.add(IndexDoc::new(*text)).unwrap();
    }
    index.update_avg_field_len();
    index
}

/// Same as [`build_test_index`] but attaches one category list per document.
pub fn build_test_index_with_categories(docs: &[(&str, &[&str])]) -> Index {
    let mut index = Index::new(Analyzer::new(WordTokenizer::new()));
    for (text, categories) in docs {
        let categories = categories.iter().map(|c| c.to_string()).collect();
        index
            .add(IndexDoc::new(*text).with_categories(categories))
            .unwrap();
    }
    index.update_avg_field_len();
    index.build_category_bitmap();
    index
}
