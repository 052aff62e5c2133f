use super::common::build_test_index;

/// Scenario: `["the quick brown fox", "quick brown dog", "lazy fox"]`,
/// query `"quick fox"`. Only doc 0 has both terms, so the AND branch keeps
/// it alone; the phrase branch is empty since `quick` and `fox` are not
/// adjacent in doc 0.
#[test]
fn and_only_doc_has_both_terms() {
    let idx = build_test_index(&["the quick brown fox", "quick brown dog", "lazy fox"]);

    let hits = idx.search("quick fox");
    let doc_ids: Vec<u32> = hits.iter().map(|p| p.doc_id).collect();

    assert_eq!(doc_ids, vec![0]);
}

#[test]
fn and_query_ignores_docs_missing_either_term() {
    let idx = build_test_index(&["quick brown dog", "lazy fox", "completely unrelated text"]);

    assert!(idx.search("quick fox").is_empty());
}
