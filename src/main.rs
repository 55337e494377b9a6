#![forbid(unsafe_code)]
//! # chi_terms CLI
//!
//! Command-line front end for the `chi_terms` crate: reads a categorized
//! JSONL corpus, runs the chi-squared aggregation pipeline and prints the
//! per-category distinguishing words plus the combined word line.
//!
//! ## Example
//! ```bash
//! cargo run --release -- reviews.jsonl --stopwords stopwords.txt --stats-out CatCount.txt
//! ```
//!
//! See `--help` for all available options.

use std::path::{Path, PathBuf};
use std::process;

use chi_terms::{AnalysisOptions, analyze_path, save_report};
use clap::Parser;
use log::error;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// JSONL file or directory of .json/.jsonl files to analyze
    path: String,

    /// Optional path to a stopword file (.txt, one word per line)
    #[arg(long)]
    stopwords: Option<String>,

    /// Number of words to keep per category
    #[arg(long, default_value_t = 75)]
    top_k: usize,

    /// Name of the JSON field holding the category label
    #[arg(long, default_value = "category")]
    category_field: String,

    /// Name of the JSON field holding the document text
    #[arg(long, default_value = "reviewText")]
    text_field: String,

    /// Write the corpus statistics to this file after the counting pass
    #[arg(long)]
    stats_out: Option<String>,

    /// Read corpus statistics from this file instead of counting
    #[arg(long, conflicts_with = "stats_out")]
    stats_in: Option<String>,

    /// If set, also save the report to a timestamped file in this directory
    #[arg(long)]
    output: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = AnalysisOptions {
        top_k: cli.top_k,
        category_field: cli.category_field,
        text_field: cli.text_field,
    };

    let report = match analyze_path(
        Path::new(&cli.path),
        cli.stopwords.as_deref().map(Path::new),
        cli.stats_in.as_deref().map(Path::new),
        cli.stats_out.as_deref().map(Path::new),
        &options,
    ) {
        Ok(report) => report,
        Err(e) => {
            error!("Error: {}", e);
            process::exit(1);
        }
    };

    print!("{}", report.render());

    if let Some(dir) = cli.output {
        match save_report(&report, PathBuf::from(dir)) {
            Ok(path) => eprintln!("Report saved to {}", path.display()),
            Err(e) => {
                error!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}
