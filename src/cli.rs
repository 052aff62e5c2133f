//! Command-line interface: `build`, `search`, and `inspect` subcommands.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::analyzer::{default_analyzer, Analyzer};
use crate::cdb;
use crate::config::AnalyzerConfig;
use crate::corpus;
use crate::filters::TurkishStemFilter;
use crate::index::Index;

const DEFAULT_MAX_TOKEN_LENGTH: usize = 64;

#[derive(Parser)]
#[command(name = "turknish", version, about = "Turkish/English inverted-index search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build an index from a bzip2-compressed TSV corpus and write it to disk.
    Build {
        /// Path to a `.tar.bz2` archive of `id\tlang\ttext` rows.
        #[arg(long)]
        corpus: PathBuf,

        /// Path to a gzip-compressed `word=>stem` Turkish stem dictionary.
        #[arg(long)]
        stems: Option<PathBuf>,

        /// Output directory for `index.cdb`/`metadata.cdb`/`categories.cdb`.
        #[arg(long)]
        out: PathBuf,

        /// Max token length in codepoints before truncation.
        #[arg(long, default_value_t = DEFAULT_MAX_TOKEN_LENGTH)]
        max_token_length: usize,

        /// Path to a JSON `AnalyzerConfig` manifest, used in place of the
        /// built-in Turkish/English filter chain when given.
        #[arg(long)]
        analyzer_config: Option<PathBuf>,
    },

    /// Run a query against a previously built index.
    Search {
        /// Directory containing `index.cdb`/`metadata.cdb`/`categories.cdb`.
        #[arg(long)]
        index: PathBuf,

        /// The query string.
        query: String,

        /// Restrict results to this category.
        #[arg(long)]
        category: Option<String>,

        /// Show highlighted snippets instead of raw postings.
        #[arg(long)]
        highlight: bool,

        /// Path to the same JSON `AnalyzerConfig` manifest the index was
        /// built with, if any.
        #[arg(long)]
        analyzer_config: Option<PathBuf>,
    },

    /// Print summary statistics for a built index.
    Inspect {
        /// Directory containing `index.cdb`/`metadata.cdb`/`categories.cdb`.
        index: PathBuf,
    },
}

pub fn run_build(
    corpus_path: PathBuf,
    stems_path: Option<PathBuf>,
    out: PathBuf,
    max_token_length: usize,
    analyzer_config: Option<PathBuf>,
) -> crate::Result<()> {
    let analyzer = match analyzer_config {
        Some(path) => AnalyzerConfig::load(&path)?.build()?,
        None => {
            let stems = match stems_path {
                Some(path) => TurkishStemFilter::load_gz(&path)?.into_dict(),
                None => HashMap::new(),
            };
            default_analyzer(stems, default_stop_words(), max_token_length)
        }
    };
    let mut index = Index::new(analyzer);

    #[cfg(feature = "parallel")]
    let count = {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_message("loading corpus...");
        let count = corpus::load_into_index_parallel(&mut index, &corpus_path)?;
        bar.finish_with_message(format!("loaded {count} documents"));
        count
    };
    #[cfg(not(feature = "parallel"))]
    let count = {
        let count = corpus::load_into_index(&mut index, &corpus_path)?;
        eprintln!("loaded {count} documents");
        count
    };

    index.update_avg_field_len();
    index.build_category_bitmap();

    std::fs::create_dir_all(&out)?;
    cdb::persist(&index, &out)?;

    eprintln!(
        "✅ build complete: {} docs, {} terms, avg field len {:.2}",
        index.num_docs(),
        count,
        index.avg_field_len()
    );

    Ok(())
}

pub fn run_search(
    index_dir: PathBuf,
    query: String,
    category: Option<String>,
    highlight: bool,
    analyzer_config: Option<PathBuf>,
) -> crate::Result<()> {
    let analyzer = load_analyzer(analyzer_config)?;
    let index = cdb::load(analyzer, &index_dir)?;

    let mut hits = index.search(&query);
    if let Some(category) = &category {
        hits = index.facet_filter(&hits, category);
    }

    for hit in hits.iter().take(10) {
        if highlight {
            if let Some(text) = index.get_text(hit.doc_id) {
                let hl = crate::highlight::SimpleHighlighter::new(index.analyzer());
                println!("{:>6} {:.4}  {}", hit.doc_id, hit.boost, hl.highlight(text, &query));
                continue;
            }
        }
        println!("{:>6} {:.4}", hit.doc_id, hit.boost);
    }

    Ok(())
}

pub fn run_inspect(index_dir: PathBuf) -> crate::Result<()> {
    let analyzer = default_analyzer(HashMap::new(), default_stop_words(), DEFAULT_MAX_TOKEN_LENGTH);
    let index = cdb::load(analyzer, &index_dir)?;

    println!("docs:          {}", index.num_docs());
    println!("avg field len: {:.2}", index.avg_field_len());
    println!("read only:     {}", index.is_read_only());

    let stats = index.token_stats();
    println!("top terms:");
    for stat in stats.iter().take(10) {
        println!("  {:>8}  {}", stat.count, stat.name);
    }

    Ok(())
}

fn load_analyzer(analyzer_config: Option<PathBuf>) -> crate::Result<Analyzer> {
    match analyzer_config {
        Some(path) => AnalyzerConfig::load(&path)?.build(),
        None => Ok(default_analyzer(
            HashMap::new(),
            default_stop_words(),
            DEFAULT_MAX_TOKEN_LENGTH,
        )),
    }
}

fn default_stop_words() -> Vec<String> {
    ["the", "a", "an", "ve", "bir", "bu"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
