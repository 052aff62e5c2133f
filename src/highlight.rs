//! Highlighting: wrapping matched query terms in document text for display.

use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::index::Index;
use crate::types::IndexDoc;

/// Wraps every token in `document` that also appears (by analyzed value)
/// in `query` with `pre`/`post` markers.
///
/// Both `document` and `query` are re-analyzed with the same `Analyzer`
/// used to build the index, so stemming/accent-folding/lowercasing apply
/// identically on both sides.
///
/// Text after the last token in `document` is not copied into the output —
/// this mirrors the upstream implementation's behavior exactly rather than
/// "fixing" it, since a caller relying on this highlighter for full-text
/// display should concatenate the remainder themselves if they need it.
pub struct SimpleHighlighter<'a> {
    analyzer: &'a Analyzer,
    pre: String,
    post: String,
}

impl<'a> SimpleHighlighter<'a> {
    pub fn new(analyzer: &'a Analyzer) -> Self {
        SimpleHighlighter {
            analyzer,
            pre: "<b>".to_string(),
            post: "</b>".to_string(),
        }
    }

    pub fn with_markers(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre = pre.into();
        self.post = post.into();
        self
    }

    pub fn highlight(&self, document: &str, query: &str) -> String {
        let query_tokens = self.analyzer.analyze(query);
        let text_tokens = self.analyzer.analyze(document);

        let mut out = String::new();
        let mut cursor = 0usize;

        for tt in &text_tokens {
            out.push_str(&document[cursor..tt.start]);

            let matched = query_tokens.iter().any(|qt| qt.value == tt.value);
            if matched {
                out.push_str(&self.pre);
            }
            out.push_str(&document[tt.start..tt.end]);
            if matched {
                out.push_str(&self.post);
            }

            cursor = tt.end;
        }

        out
    }
}

/// Splits a document into snippets, ranks them with an ephemeral OR query
/// against a throwaway sub-index, and highlights the top two.
///
/// Holds the analyzer behind an `Arc` (rather than borrowing it, as
/// [`SimpleHighlighter`] does) so [`SpanHighlighter::highlight`] can hand the
/// exact same analyzer instance to its ephemeral sub-index: the sub-index
/// must tokenize/stem/fold snippets identically to how the real index
/// tokenized the document, or `search_or`'s ranking won't match what a query
/// against the real index would have scored.
pub struct SpanHighlighter {
    analyzer: Arc<Analyzer>,
    pre: String,
    post: String,
    span_delimiter: String,
    snippet_size: usize,
}

impl SpanHighlighter {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        SpanHighlighter {
            analyzer,
            pre: "<b>".to_string(),
            post: "</b>".to_string(),
            span_delimiter: "<br>".to_string(),
            snippet_size: 200,
        }
    }

    pub fn with_params(
        mut self,
        pre: impl Into<String>,
        post: impl Into<String>,
        span_delimiter: impl Into<String>,
        snippet_size: usize,
    ) -> Self {
        self.pre = pre.into();
        self.post = post.into();
        self.span_delimiter = span_delimiter.into();
        self.snippet_size = snippet_size;
        self
    }

    /// Partitions `document` into snippets of roughly `snippet_size` bytes
    /// at token boundaries, builds a one-off index over them, finds the
    /// top two snippets by OR-query relevance, and returns each one
    /// individually highlighted and joined by the span delimiter.
    pub fn highlight(&self, document: &str, query: &str) -> String {
        let tokens = self.analyzer.analyze(document);

        let mut snippets = Vec::new();
        let mut start = 0usize;
        for token in &tokens {
            if token.end - start > self.snippet_size {
                snippets.push(&document[start..token.end]);
                start = token.end;
            }
        }
        snippets.push(&document[start..]);

        let mut sub_index = Index::from_analyzer_arc(Arc::clone(&self.analyzer));
        let mut snippet_map = std::collections::HashMap::new();
        for snippet in &snippets {
            let doc_id = sub_index.add(IndexDoc::new(*snippet)).unwrap();
            snippet_map.insert(doc_id, *snippet);
        }
        sub_index.update_avg_field_len();

        let mut hits = sub_index.search_or(query);
        hits.truncate(2);

        let simple = SimpleHighlighter::new(&self.analyzer).with_markers(&self.pre, &self.post);
        let mut out = String::new();
        for hit in hits {
            if let Some(snippet) = snippet_map.get(&hit.doc_id) {
                out.push_str(&simple.highlight(snippet, query));
                out.push_str(&self.span_delimiter);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;

    #[test]
    fn simple_highlighter_wraps_matching_tokens() {
        let analyzer = Analyzer::new(WordTokenizer::new());
        let hl = SimpleHighlighter::new(&analyzer);
        let out = hl.highlight("the quick brown fox", "quick fox");
        assert_eq!(out, "the <b>quick</b> brown <b>fox</b>");
    }

    #[test]
    fn simple_highlighter_omits_text_after_last_token() {
        let analyzer = Analyzer::new(WordTokenizer::new());
        let hl = SimpleHighlighter::new(&analyzer);
        let out = hl.highlight("fox!!!", "fox");
        assert_eq!(out, "<b>fox</b>");
    }

    #[test]
    fn simple_highlighter_supports_custom_markers() {
        let analyzer = Analyzer::new(WordTokenizer::new());
        let hl = SimpleHighlighter::new(&analyzer).with_markers("[", "]");
        let out = hl.highlight("fox jumps", "fox");
        assert_eq!(out, "[fox] jumps");
    }

    #[test]
    fn span_highlighter_returns_at_most_two_snippets() {
        let analyzer = Arc::new(Analyzer::new(WordTokenizer::new()));
        let hl = SpanHighlighter::new(analyzer).with_params("<b>", "</b>", "<br>", 10);
        let doc = "the quick fox jumps over the lazy dog near the riverbank today";
        let out = hl.highlight(doc, "fox dog");
        assert!(out.contains("<b>"));
    }

    #[test]
    fn span_highlighter_ranks_snippets_using_the_shared_analyzer() {
        use crate::filters::StopFilter;

        let analyzer = Arc::new(
            Analyzer::new(WordTokenizer::new()).add_filter(StopFilter::new(["the".to_string()])),
        );
        let hl = SpanHighlighter::new(Arc::clone(&analyzer)).with_params("<b>", "</b>", "<br>", 20);
        let doc = "the the the the the the the the the the fox hunts at dawn near the river";
        let out = hl.highlight(doc, "fox");
        assert!(out.contains("<b>fox</b>"));
    }
}
