use super::common::build_test_index_with_categories;

/// Scenario: documents with categories `[["a"], ["a","b"], ["b"]]`, a query
/// matching all three, expects facet counts `[("a",2), ("b",2)]` sorted
/// descending (ties keep the HashMap's arbitrary but stable-per-run order,
/// so this only asserts the count values, not which name sorts first).
#[test]
fn facet_counts_match_category_overlap() {
    let idx = build_test_index_with_categories(&[
        ("fox one", &["a"]),
        ("fox two", &["a", "b"]),
        ("fox three", &["b"]),
    ]);

    let hits = idx.search("fox");
    let counts = idx.facet_counts(&hits);

    assert_eq!(counts.len(), 2);
    assert!(counts.iter().all(|c| c.count == 2));
    assert!(counts.iter().any(|c| c.name == "a"));
    assert!(counts.iter().any(|c| c.name == "b"));
}
