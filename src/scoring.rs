//! BM25-style scoring.
//!
//! DO NOT CHANGE these constants or the formula shape — every number here
//! (1.2, 0.75 folded into the `0.25 + 0.75 * …` length-norm term, and the
//! 2.2 numerator weight) reproduces a fixed scoring function that downstream
//! ranking depends on bit-for-bit.

/// `idf(docFreq, docCount) = ln(1 + (docCount - docFreq + 0.5) / (docFreq + 0.5))`
pub fn idf(doc_freq: f64, doc_count: f64) -> f64 {
    (1.0 + (doc_count - doc_freq + 0.5) / (doc_freq + 0.5)).ln()
}

/// `tf(termFreq, fieldLen, avgFieldLen) = (termFreq * 2.2) / (termFreq + 1.2 * (0.25 + 0.75 * fieldLen / avgFieldLen))`
pub fn tf(term_freq: f64, field_len: f64, avg_field_len: f64) -> f64 {
    (term_freq * 2.2) / (term_freq + 1.2 * (0.25 + 0.75 * (field_len / avg_field_len)))
}

/// Scores every posting in place: `boost = idf(|postings|, num_docs) *
/// tf(frequency, field_len[doc_id], avg_field_len)`.
///
/// Callers must have cloned the posting list out of the index first — this
/// function overwrites `boost`, and the index's stored copy must stay
/// pristine for the next query.
pub fn score_postings(
    postings: &mut [crate::types::Posting],
    num_docs: u32,
    field_len: &[u32],
    avg_field_len: f64,
) {
    let doc_freq = postings.len() as f64;
    let idf_value = idf(doc_freq, num_docs as f64);

    for posting in postings {
        let len = field_len.get(posting.doc_id as usize).copied().unwrap_or(0) as f64;
        posting.boost = (idf_value * tf(posting.frequency as f64, len, avg_field_len)) as f32;
    }
}
