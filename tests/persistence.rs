//! Round-trip persistence: build, marshal to the three CDB files, reload,
//! and confirm search results are byte-for-byte identical.

mod common;

use turknish::analyzer::Analyzer;
use turknish::tokenizer::WordTokenizer;

#[test]
fn reload_preserves_posting_ids_and_boosts() {
    let idx = common::build_test_index_with_categories(&[
        ("brown fox jumps over lazy dog", &["animals"]),
        ("fox sighting downtown", &["animals", "news"]),
        ("market crash today", &["news"]),
    ]);

    let dir = tempfile::tempdir().unwrap();
    turknish::cdb::persist(&idx, dir.path()).unwrap();

    let reloaded = turknish::cdb::load(Analyzer::new(WordTokenizer::new()), dir.path()).unwrap();

    let before = idx.search("fox");
    let after = reloaded.search("fox");

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.doc_id, a.doc_id);
        assert!((b.boost - a.boost).abs() < 1e-6);
    }

    let before_facets = idx.facet_counts(&before);
    let after_facets = reloaded.facet_counts(&after);
    assert_eq!(before_facets, after_facets);
}
