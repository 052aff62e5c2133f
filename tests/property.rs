//! Property tests for the binary posting-list codec and index invariants.

use proptest::prelude::*;
use turknish::types::Posting;

mod common;

fn posting_strategy() -> impl Strategy<Value = Posting> {
    (0u32..10_000, prop::collection::vec(0u32..10_000, 1..20), -50.0f32..50.0f32).prop_map(
        |(doc_id, mut positions, boost)| {
            positions.sort_unstable();
            Posting {
                doc_id,
                frequency: positions.len() as u32,
                boost,
                positions,
            }
        },
    )
}

proptest! {
    /// Encoding then decoding a posting list reproduces it exactly,
    /// including the boost's bit pattern (not just its rounded value).
    #[test]
    fn posting_list_roundtrips_through_binary_codec(postings in prop::collection::vec(posting_strategy(), 1..20)) {
        let encoded = turknish::cdb::encode_postings(&postings);
        let decoded = turknish::cdb::decode_postings(&encoded).unwrap();
        prop_assert_eq!(decoded, postings);
    }

    /// `update_avg_field_len` always reports the mean token count across
    /// every added document, regardless of how many documents or how long
    /// their texts are.
    #[test]
    fn avg_field_len_matches_mean_token_count(texts in prop::collection::vec("[a-z ]{0,40}", 1..10)) {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let idx = common::build_test_index(&refs);

        let expected: f64 = if idx.num_docs() == 0 {
            0.0
        } else {
            idx.field_len().iter().map(|&l| l as u64).sum::<u64>() as f64 / idx.num_docs() as f64
        };

        prop_assert!((idx.avg_field_len() - expected).abs() < 1e-9);
    }

    /// For every indexed term, postings stay strictly increasing by
    /// `doc_id`, and `frequency` always equals `positions.len()`.
    #[test]
    fn postings_stay_sorted_and_frequency_consistent(texts in prop::collection::vec("[a-z ]{1,30}", 1..8)) {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let idx = common::build_test_index(&refs);

        for postings in idx.terms().values() {
            for window in postings.windows(2) {
                prop_assert!(window[0].doc_id < window[1].doc_id);
            }
            for p in postings {
                prop_assert_eq!(p.frequency as usize, p.positions.len());
            }
        }
    }
}
