//! The query evaluator: boolean-AND and phrase branches over positional
//! posting lists, merged by boost-summing union.

use crate::index::Index;
use crate::scoring::score_postings;
use crate::types::Posting;

/// Two-pointer sorted-merge intersection. Where both sides have a posting
/// for the same `doc_id`, the right-hand posting is kept and its boost is
/// increased by the left-hand posting's boost — this is how a multi-term
/// AND query accumulates a combined score instead of just picking one
/// side's.
pub fn intersect(a: Vec<Posting>, mut b: Vec<Posting>) -> Vec<Posting> {
    let (m, n) = (a.len(), b.len());
    let mut result = Vec::with_capacity(m.min(n));
    let (mut i, mut j) = (0, 0);

    while i < m && j < n {
        if a[i].doc_id < b[j].doc_id {
            i += 1;
        } else if b[j].doc_id < a[i].doc_id {
            j += 1;
        } else {
            b[j].boost += a[i].boost;
            result.push(b[j].clone());
            i += 1;
            j += 1;
        }
    }

    result
}

/// Two-pointer sorted-merge union. Matching doc ids sum their boosts (like
/// `intersect`); non-matching doc ids are carried through untouched. This
/// is what lets a phrase hit — present in both the AND branch and the
/// phrase branch — outrank a same-term AND-only hit, since its boost gets
/// counted twice.
pub fn union(a: Vec<Posting>, mut b: Vec<Posting>) -> Vec<Posting> {
    let (m, n) = (a.len(), b.len());
    let mut result = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (0, 0);

    while i < m && j < n {
        if a[i].doc_id < b[j].doc_id {
            result.push(a[i].clone());
            i += 1;
        } else if b[j].doc_id < a[i].doc_id {
            result.push(b[j].clone());
            j += 1;
        } else {
            b[j].boost += a[i].boost;
            result.push(b[j].clone());
            i += 1;
            j += 1;
        }
    }

    result.extend_from_slice(&a[i..]);
    result.extend_from_slice(&b[j..]);
    result
}

/// One step of a phrase chain: keeps only postings of `b` whose document
/// also appears in `a`, and only where some position in `b` is exactly one
/// greater than some position in `a` — i.e. `a`'s term is immediately
/// followed by `b`'s term in that document. Stop words dropped by
/// [`crate::filters::StopFilter`] are not renumbered, so a removed stop
/// word between two phrase terms breaks this adjacency check exactly the
/// way it would if the stop word were still counted as occupying a slot.
pub fn phrase_step(a: &[Posting], b: &[Posting]) -> Vec<Posting> {
    let (m, n) = (a.len(), b.len());
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < m && j < n {
        if a[i].doc_id < b[j].doc_id {
            i += 1;
        } else if b[j].doc_id < a[i].doc_id {
            j += 1;
        } else {
            let pa = &a[i].positions;
            let pb = &b[j].positions;
            let (mut i1, mut j1) = (0usize, 0usize);

            while i1 < pa.len() && j1 < pb.len() {
                if pb[j1] as i64 - pa[i1] as i64 == 1 {
                    result.push(b[j].clone());
                    break;
                } else if pa[i1] < pb[j1] {
                    i1 += 1;
                } else {
                    j1 += 1;
                }
            }

            i += 1;
            j += 1;
        }
    }

    result
}

impl Index {
    fn scored_postings_per_term(&self, query: &str) -> Vec<Vec<Posting>> {
        self.analyzer
            .analyze(query)
            .iter()
            .map(|token| {
                let mut postings = self.terms.get(&token.value).cloned().unwrap_or_default();
                score_postings(&mut postings, self.num_docs, &self.field_len, self.avg_field_len);
                postings
            })
            .collect()
    }

    /// Evaluates `query` as the union of a boolean-AND match and a full
    /// phrase match, sorted by descending boost. A query term absent from
    /// the index degrades gracefully to an empty branch rather than an
    /// error — the AND/union logic already treats an empty posting list as
    /// "no matches for this branch".
    pub fn search(&self, query: &str) -> Vec<Posting> {
        let postings = self.scored_postings_per_term(query);
        if postings.is_empty() {
            return Vec::new();
        }

        let mut and_result = postings[0].clone();
        for p in &postings[1..] {
            and_result = intersect(and_result, p.clone());
        }

        let mut result = if postings.len() > 1 {
            let mut phrase_result = postings[0].clone();
            for p in &postings[1..] {
                phrase_result = phrase_step(&phrase_result, p);
            }
            union(and_result, phrase_result)
        } else {
            and_result
        };

        result.sort_by(|a, b| b.boost.partial_cmp(&a.boost).unwrap());
        result
    }

    /// Evaluates `query` as a plain OR across all terms, summing boosts for
    /// docs matching multiple terms. Used by [`crate::highlight::SpanHighlighter`]
    /// to rank snippets of an ephemeral sub-index, where AND semantics would
    /// be too strict for short spans.
    pub fn search_or(&self, query: &str) -> Vec<Posting> {
        let postings = self.scored_postings_per_term(query);
        if postings.is_empty() {
            return Vec::new();
        }

        let mut result = postings[0].clone();
        for p in &postings[1..] {
            result = union(result, p.clone());
        }

        result.sort_by(|a, b| b.boost.partial_cmp(&a.boost).unwrap());
        result
    }
}
