//! Bulk corpus loading: streams `id\tlang\ttext` rows out of a
//! `.tar.bz2` archive and feeds them to an [`Index`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bzip2::read::BzDecoder;
use tar::Archive;

use crate::error::{IndexError, Result};
use crate::index::Index;
use crate::types::IndexDoc;

/// One corpus row: a document id (ignored by the index, which assigns its
/// own sequential ids), a language tag, and the document text.
#[derive(Debug, Clone)]
pub struct CorpusRow {
    pub id: String,
    pub lang: String,
    pub text: String,
}

fn parse_line(line: &str) -> Option<CorpusRow> {
    let mut parts = line.splitn(3, '\t');
    let id = parts.next()?.to_string();
    let lang = parts.next()?.to_string();
    let text = parts.next()?.to_string();
    Some(CorpusRow { id, lang, text })
}

/// Reads every `.tsv`-like entry in the archive and parses it into
/// [`CorpusRow`]s. Malformed lines (fewer than three tab-separated fields)
/// are skipped rather than aborting the whole load, since a single bad row
/// in a multi-gigabyte corpus should not sink the entire build.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<CorpusRow>> {
    let read_all = || -> std::io::Result<Vec<CorpusRow>> {
        let file = File::open(path.as_ref())?;
        let mut archive = Archive::new(BzDecoder::new(file));
        let mut rows = Vec::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            rows.extend(contents.lines().filter_map(parse_line));
        }

        Ok(rows)
    };

    read_all().map_err(|e| IndexError::CorpusLoadFailure(e.to_string()))
}

/// Analyzes and adds every row of `path` to `index`, returning how many
/// documents were added.
///
/// With the `parallel` feature enabled, row parsing and analysis run
/// concurrently via `rayon` before the single-threaded aggregation step —
/// the writer itself stays `&mut self`/single-threaded throughout, only the
/// read side is parallelized.
pub fn load_into_index(index: &mut Index, path: impl AsRef<Path>) -> Result<usize> {
    let rows = read_rows(path)?;
    let count = rows.len();

    for row in rows {
        index.add(IndexDoc::new(row.text))?;
    }

    Ok(count)
}

/// Same as [`load_into_index`], but runs `analyzer.analyze` over every row
/// concurrently via `rayon` before inserting anything. The writer itself
/// never sees more than one thread: `analyze` only borrows `index`
/// immutably, so the parallel phase collects `(tokens, text)` pairs and a
/// second, sequential pass feeds them to [`Index::add_tokens`].
#[cfg(feature = "parallel")]
pub fn load_into_index_parallel(index: &mut Index, path: impl AsRef<Path>) -> Result<usize> {
    use rayon::prelude::*;

    let rows = read_rows(path)?;
    let count = rows.len();

    let analyzer = index.analyzer();
    let analyzed: Vec<(Vec<crate::types::Token>, String)> = rows
        .into_par_iter()
        .map(|row| (analyzer.analyze(&row.text), row.text))
        .collect();

    for (tokens, text) in analyzed {
        index.add_tokens(tokens, text, &[])?;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_splits_on_tab() {
        let row = parse_line("42\ttr\tmerhaba dünya").unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.lang, "tr");
        assert_eq!(row.text, "merhaba dünya");
    }

    #[test]
    fn parse_line_rejects_short_rows() {
        assert!(parse_line("42\ttr").is_none());
    }

    #[test]
    fn parse_line_keeps_tabs_inside_text_field() {
        let row = parse_line("1\ten\ta\tb\tc").unwrap();
        assert_eq!(row.text, "a\tb\tc");
    }
}
