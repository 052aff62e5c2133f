//! Category facets over roaring bitmaps: counts and filters layered on top
//! of a set of scored postings returned by [`crate::search`].

use roaring::RoaringBitmap;

use crate::index::Index;
use crate::types::{FacetCount, Posting};

impl Index {
    /// Returns a clone of `category`'s bitmap, or an empty bitmap if the
    /// category is unknown. Callers may mutate the clone freely — it shares
    /// no storage with the index's own `category_bitmap` entry.
    pub fn filter(&self, category: &str) -> RoaringBitmap {
        self.category_bitmap
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Keeps only the postings whose document belongs to `category`.
    /// Returns an empty `Vec` (not an error) for an unknown category, the
    /// same graceful-empty behavior as an unknown query term.
    pub fn facet_filter(&self, postings: &[Posting], category: &str) -> Vec<Posting> {
        let Some(bitmap) = self.category_bitmap.get(category) else {
            return Vec::new();
        };

        postings
            .iter()
            .filter(|p| bitmap.contains(p.doc_id))
            .cloned()
            .collect()
    }

    /// For each category with at least one document among `postings`,
    /// returns how many of those documents fall in that category, sorted
    /// descending by count. Categories with zero overlap are omitted.
    pub fn facet_counts(&self, postings: &[Posting]) -> Vec<FacetCount> {
        let mut doc_ids = RoaringBitmap::new();
        for p in postings {
            doc_ids.insert(p.doc_id);
        }

        let mut counts: Vec<FacetCount> = self
            .category_bitmap
            .iter()
            .filter_map(|(name, bitmap)| {
                let count = bitmap.intersection_len(&doc_ids);
                if count > 0 {
                    Some(FacetCount {
                        name: name.clone(),
                        count,
                    })
                } else {
                    None
                }
            })
            .collect();

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Total occurrence count of every term in the index, sorted
    /// descending. Useful for building a "popular searches"-style view.
    pub fn token_stats(&self) -> Vec<FacetCount> {
        let mut stats: Vec<FacetCount> = self
            .terms
            .iter()
            .map(|(term, postings)| FacetCount {
                name: term.clone(),
                count: postings.iter().map(|p| p.frequency as u64).sum(),
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::tokenizer::WordTokenizer;
    use crate::types::IndexDoc;

    fn build_index() -> Index {
        let mut idx = Index::new(Analyzer::new(WordTokenizer::new()));
        idx.add(IndexDoc::new("fox fox").with_categories(vec!["animals".into()]))
            .unwrap();
        idx.add(IndexDoc::new("fox sighting").with_categories(vec!["animals".into(), "news".into()]))
            .unwrap();
        idx.add(IndexDoc::new("fox market crash").with_categories(vec!["news".into()]))
            .unwrap();
        idx.update_avg_field_len();
        idx.build_category_bitmap();
        idx
    }

    #[test]
    fn facet_counts_reflect_overlap_with_query_results() {
        let idx = build_index();
        let hits = idx.search("fox");
        let counts = idx.facet_counts(&hits);

        let animals = counts.iter().find(|c| c.name == "animals").unwrap();
        let news = counts.iter().find(|c| c.name == "news").unwrap();
        assert_eq!(animals.count, 2);
        assert_eq!(news.count, 2);
    }

    #[test]
    fn filter_returns_clone_of_category_bitmap() {
        let idx = build_index();
        let bitmap = idx.filter("animals");
        assert_eq!(bitmap.len(), 2);
        assert!(bitmap.contains(0));
        assert!(bitmap.contains(1));
    }

    #[test]
    fn filter_unknown_category_is_empty_bitmap() {
        let idx = build_index();
        assert!(idx.filter("nonexistent").is_empty());
    }

    #[test]
    fn facet_filter_keeps_only_matching_category() {
        let idx = build_index();
        let hits = idx.search("fox");
        let filtered = idx.facet_filter(&hits, "animals");
        assert!(filtered.iter().all(|p| p.doc_id == 0 || p.doc_id == 1));
    }

    #[test]
    fn facet_filter_unknown_category_is_empty() {
        let idx = build_index();
        let hits = idx.search("fox");
        assert!(idx.facet_filter(&hits, "nonexistent").is_empty());
    }

    #[test]
    fn token_stats_sums_frequency_across_documents() {
        let idx = build_index();
        let stats = idx.token_stats();
        let fox = stats.iter().find(|c| c.name == "fox").unwrap();
        assert_eq!(fox.count, 3);
    }
}
