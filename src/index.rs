//! The index writer: owns analyzed postings, field lengths, and document
//! categories, and builds the roaring-bitmap facets used at query time.

use std::collections::HashMap;
use std::sync::Arc;

use roaring::RoaringBitmap;

use crate::analyzer::Analyzer;
use crate::error::{IndexError, Result};
use crate::types::{IndexDoc, Posting, Token};

/// An in-memory inverted index.
///
/// Single-writer, many-reader: every mutating method takes `&mut self`,
/// every query method takes `&self`. Once [`Index::freeze`] (or a CDB load)
/// marks the index read-only, [`Index::add`] and friends return
/// [`IndexError::ReadOnlyViolation`] instead of panicking.
///
/// The analyzer is kept behind an `Arc` rather than owned directly so that a
/// component building a throwaway secondary index — [`crate::highlight::SpanHighlighter`]'s
/// snippet sub-index, for instance — can share the exact same analyzer
/// instance instead of needing `Analyzer` to be `Clone` (it can't be: it
/// holds `Box<dyn Tokenize>`/`Box<dyn TokenFilter>` trait objects).
pub struct Index {
    pub(crate) terms: HashMap<String, Vec<Posting>>,
    pub(crate) field_len: Vec<u32>,
    pub(crate) doc_category: HashMap<String, Vec<u32>>,
    pub(crate) category_bitmap: HashMap<String, RoaringBitmap>,
    pub(crate) store: Vec<String>,
    pub(crate) doc_id_counter: u32,
    pub(crate) num_docs: u32,
    pub(crate) avg_field_len: f64,
    pub(crate) read_only: bool,
    pub(crate) analyzer: Arc<Analyzer>,
}

impl Index {
    pub fn new(analyzer: Analyzer) -> Self {
        Self::from_analyzer_arc(Arc::new(analyzer))
    }

    /// Builds an index that shares an already-`Arc`-wrapped analyzer with
    /// another index, rather than owning a fresh one.
    pub fn from_analyzer_arc(analyzer: Arc<Analyzer>) -> Self {
        Index {
            terms: HashMap::new(),
            field_len: Vec::new(),
            doc_category: HashMap::new(),
            category_bitmap: HashMap::new(),
            store: Vec::new(),
            doc_id_counter: 0,
            num_docs: 0,
            avg_field_len: 0.0,
            read_only: false,
            analyzer,
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// The index's analyzer, shareable with another index built via
    /// [`Index::from_analyzer_arc`].
    pub fn analyzer_arc(&self) -> Arc<Analyzer> {
        Arc::clone(&self.analyzer)
    }

    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn avg_field_len(&self) -> f64 {
        self.avg_field_len
    }

    pub fn field_len(&self) -> &[u32] {
        &self.field_len
    }

    /// Every term's posting list, keyed by the term's analyzed value.
    pub fn terms(&self) -> &HashMap<String, Vec<Posting>> {
        &self.terms
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn get_text(&self, doc_id: u32) -> Option<&str> {
        self.store.get(doc_id as usize).map(String::as_str)
    }

    /// Analyzes `doc.text`, appends one posting per distinct term to the
    /// index, records the document's categories, and returns its new
    /// document id. Positions are grouped by term value; a term's postings
    /// are appended in document-insertion order, which is also doc-id
    /// order, so the posting list stays sorted without a separate sort
    /// pass.
    pub fn add(&mut self, doc: IndexDoc) -> Result<u32> {
        let tokens = self.analyzer.analyze(&doc.text);
        self.add_tokens(tokens, doc.text, &doc.categories)
    }

    /// Same as [`Index::add`], but takes tokens that have already been run
    /// through the analyzer — lets a caller analyze documents ahead of time
    /// (e.g. concurrently, via `rayon`) while still inserting them one at a
    /// time on the writer thread, since the posting-list/field-length/
    /// category maps are not `Sync`-safe to mutate from multiple threads.
    pub fn add_tokens(
        &mut self,
        tokens: Vec<Token>,
        text: String,
        categories: &[String],
    ) -> Result<u32> {
        if self.read_only {
            return Err(IndexError::ReadOnlyViolation);
        }

        let doc_id = self.doc_id_counter;

        let mut positions_by_term: HashMap<&str, Vec<u32>> = HashMap::new();
        for token in &tokens {
            positions_by_term
                .entry(token.value.as_str())
                .or_default()
                .push(token.position);
        }

        for (term, positions) in positions_by_term {
            self.terms
                .entry(term.to_string())
                .or_default()
                .push(Posting::new(doc_id, positions));
        }

        for category in categories {
            self.doc_category
                .entry(category.clone())
                .or_default()
                .push(doc_id);
        }

        self.field_len.push(tokens.len() as u32);
        self.store.push(text);
        self.doc_id_counter += 1;
        self.num_docs += 1;

        Ok(doc_id)
    }

    /// Recomputes `avg_field_len` as `sum(field_len) / num_docs`. Must be
    /// called after the last `add` and before persisting or scoring, since
    /// the scorer treats `avg_field_len` as a precomputed constant rather
    /// than recomputing it per query.
    pub fn update_avg_field_len(&mut self) {
        let total: u64 = self.field_len.iter().map(|&l| l as u64).sum();
        self.avg_field_len = if self.num_docs == 0 {
            0.0
        } else {
            total as f64 / self.num_docs as f64
        };
    }

    /// Builds one roaring bitmap per category from `doc_category`. Must be
    /// called after the last `add` (and is idempotent — call again after
    /// further mutation if needed).
    pub fn build_category_bitmap(&mut self) {
        for (category, doc_ids) in &self.doc_category {
            let mut bitmap = RoaringBitmap::new();
            for &doc_id in doc_ids {
                bitmap.insert(doc_id);
            }
            self.category_bitmap.insert(category.clone(), bitmap);
        }
    }

    /// Marks the index read-only. Persistence always freezes before
    /// writing; a caller building a purely in-memory index for facet
    /// filtering alone can call this directly.
    pub fn freeze(&mut self) {
        self.read_only = true;
    }
}
