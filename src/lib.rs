//! # chi_terms
//!
//! Finds the words that most strongly distinguish each category of a corpus
//! of categorized JSONL documents, using the chi-squared statistic of
//! word/category association.
//!
//! The pipeline runs as a fixed sequence of grouped aggregation passes:
//!
//! 1. corpus statistics (total documents and documents per category),
//! 2. per-word per-category co-occurrence counts,
//! 3. chi-squared scoring of every observed (word, category) pair,
//! 4. top-K selection per category (K = 75 by default),
//! 5. the final report: one line per category plus one trailing line with
//!    the sorted union of every selected word.
//!
//! Within a pass, partitions are aggregated in parallel with explicit,
//! pure combine functions; a pass only starts once the previous pass has
//! fully materialized its output.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde_json::Value;
use walkdir::WalkDir;

pub mod chi;
pub mod cooccur;
pub mod corpus;
pub mod report;
pub mod tokenize;

pub use chi::{ChiScore, chi_squared, score_words, select_top_words};
pub use cooccur::{WordCategoryCount, aggregate_events, build_contingency};
pub use corpus::{CorpusStats, count_documents, read_corpus_stats, write_corpus_stats};
pub use report::{Report, save_report};
pub use tokenize::{load_stopwords, tokenize};

/// One categorized document after tokenization: a category label and the
/// set of distinct candidate tokens it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub category: String,
    pub tokens: HashSet<String>,
}

/// Options controlling a full pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Number of words retained per category (default 75).
    pub top_k: usize,
    /// JSON field holding the category label.
    pub category_field: String,
    /// JSON field holding the free text.
    pub text_field: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            top_k: 75,
            category_field: "category".to_string(),
            text_field: "reviewText".to_string(),
        }
    }
}

/// Collect all `.json`/`.jsonl` files under `path` (or `path` itself if it
/// is a file), sorted for deterministic processing order.
pub fn collect_files(path: &Path) -> Vec<std::path::PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json") || e.eq_ignore_ascii_case("jsonl"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Parse one JSONL line into a [`Document`].
///
/// Returns `None` for malformed records: unparseable JSON, or a missing /
/// non-string category or text field. Such records are skipped by the
/// caller and contribute to no count.
///
/// # Example
/// ```
/// use std::collections::HashSet;
/// use chi_terms::parse_line;
/// let stops = HashSet::new();
/// let doc = parse_line(
///     r#"{"category": "Books", "reviewText": "A gripping read. Gripping!"}"#,
///     "category",
///     "reviewText",
///     &stops,
/// )
/// .unwrap();
/// assert_eq!(doc.category, "Books");
/// assert!(doc.tokens.contains("gripping"));
/// assert!(parse_line("not json", "category", "reviewText", &stops).is_none());
/// ```
pub fn parse_line(
    line: &str,
    category_field: &str,
    text_field: &str,
    stopwords: &HashSet<String>,
) -> Option<Document> {
    let value: Value = serde_json::from_str(line).ok()?;
    let category = value.get(category_field)?.as_str()?.to_string();
    let text = value.get(text_field)?.as_str()?;
    Some(Document {
        category,
        tokens: tokenize(text, stopwords),
    })
}

/// Read every JSONL file in `files` into documents, skipping malformed
/// lines. Returns the documents and the number of skipped lines.
pub fn read_documents(
    files: &[std::path::PathBuf],
    stopwords: &HashSet<String>,
    options: &AnalysisOptions,
) -> Result<(Vec<Document>, usize), String> {
    let mut documents = Vec::new();
    let mut skipped = 0usize;
    for file in files {
        let content = fs::read_to_string(file)
            .map_err(|e| format!("Read input {} failed: {e}", file.display()))?;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line, &options.category_field, &options.text_field, stopwords) {
                Some(doc) => documents.push(doc),
                None => skipped += 1,
            }
        }
    }
    Ok((documents, skipped))
}

/// Run the aggregation passes over already-tokenized documents with
/// pre-computed corpus statistics, producing the final [`Report`].
pub fn analyze_documents(
    documents: &[Document],
    stats: &CorpusStats,
    top_k: usize,
) -> Result<Report, String> {
    let events = aggregate_events(documents);
    let counts = build_contingency(events);
    info!("co-occurrence pass: {} (word, category) pairs", counts.len());
    let scores = score_words(&counts, stats)?;
    let top = select_top_words(scores, top_k);
    Ok(Report::from_top_words(top))
}

/// Run the whole pipeline over a file or directory of JSONL documents.
///
/// `stats_in` substitutes a previously persisted corpus-statistics file for
/// the counting pass; `stats_out` persists the statistics after counting.
pub fn analyze_path(
    path: &Path,
    stopwords_path: Option<&Path>,
    stats_in: Option<&Path>,
    stats_out: Option<&Path>,
    options: &AnalysisOptions,
) -> Result<Report, String> {
    let files = collect_files(path);
    if files.is_empty() {
        return Err(format!("No .json/.jsonl input found at {}", path.display()));
    }

    let stopwords = match stopwords_path {
        Some(p) => load_stopwords(p)?,
        None => HashSet::new(),
    };

    let (documents, skipped) = read_documents(&files, &stopwords, options)?;
    if skipped > 0 {
        warn!("skipped {skipped} malformed input line(s)");
    }

    let stats = match stats_in {
        Some(p) => read_corpus_stats(p)?,
        None => count_documents(&documents),
    };
    if stats.total == 0 {
        return Err("Corpus statistics pass: no valid documents counted".to_string());
    }
    info!(
        "corpus statistics: {} documents across {} categories",
        stats.total,
        stats.per_category.len()
    );

    if let Some(p) = stats_out {
        write_corpus_stats(&stats, p)?;
    }

    analyze_documents(&documents, &stats, options.top_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(category: &str, tokens: &[&str]) -> Document {
        Document {
            category: category.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn parse_line_skips_malformed_records() {
        let stops = HashSet::new();
        assert!(parse_line("{broken", "category", "reviewText", &stops).is_none());
        // missing category
        assert!(parse_line(r#"{"reviewText": "x"}"#, "category", "reviewText", &stops).is_none());
        // category is not a string
        assert!(
            parse_line(
                r#"{"category": 3, "reviewText": "x"}"#,
                "category",
                "reviewText",
                &stops
            )
            .is_none()
        );
        // missing text field
        assert!(parse_line(r#"{"category": "A"}"#, "category", "reviewText", &stops).is_none());
    }

    #[test]
    fn parse_line_respects_field_names() {
        let stops = HashSet::new();
        let d = parse_line(
            r#"{"label": "Toys", "body": "great fun"}"#,
            "label",
            "body",
            &stops,
        )
        .unwrap();
        assert_eq!(d.category, "Toys");
        assert!(d.tokens.contains("great"));
        assert!(d.tokens.contains("fun"));
    }

    // The 4-document scenario, end to end through the aggregation passes.
    #[test]
    fn analyze_documents_small_corpus() {
        let documents = vec![
            doc("A", &["x", "y"]),
            doc("A", &["x"]),
            doc("B", &["y", "z"]),
            doc("B", &["z"]),
        ];
        let stats = count_documents(&documents);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.per_category["A"], 2);
        assert_eq!(stats.per_category["B"], 2);

        let report = analyze_documents(&documents, &stats, 75).unwrap();

        // x occurs only in A (2 of 2 docs): A=2 B=0 C=0 D=2
        // => chi2 = 4 * (2*2 - 0)^2 / (2*2*2*2) = 4
        let a_words = &report.categories["A"];
        assert_eq!(a_words[0], ("x".to_string(), 4.0));
        // y occurs once in each category: chi2 = 0, but still listed
        assert!(a_words.iter().any(|(w, v)| w == "y" && *v == 0.0));

        let b_words = &report.categories["B"];
        assert_eq!(b_words[0], ("z".to_string(), 4.0));

        let all: Vec<&str> = report.all_words.iter().map(|s| s.as_str()).collect();
        assert_eq!(all, vec!["x", "y", "z"]);
    }
}
