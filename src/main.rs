use clap::Parser;

use turknish::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build {
            corpus,
            stems,
            out,
            max_token_length,
            analyzer_config,
        } => turknish::cli::run_build(corpus, stems, out, max_token_length, analyzer_config),
        Command::Search {
            index,
            query,
            category,
            highlight,
            analyzer_config,
        } => turknish::cli::run_search(index, query, category, highlight, analyzer_config),
        Command::Inspect { index } => turknish::cli::run_inspect(index),
    };

    if let Err(e) = result {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
