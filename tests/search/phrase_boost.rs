use super::common::build_test_index;

/// Scenario: `["brown fox jumps", "fox brown"]`, query `"brown fox"`. Both
/// docs satisfy the AND branch, but only doc 0 has the terms adjacent
/// (`brown@0 fox@1`), so its boost is counted twice via the union and it
/// outranks doc 1.
#[test]
fn adjacent_phrase_outranks_reordered_terms() {
    let idx = build_test_index(&["brown fox jumps", "fox brown"]);

    let hits = idx.search("brown fox");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, 0);
    assert!(hits[0].boost > hits[1].boost);
}
