use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::prelude::*;

/// The final result: per-category top words in category order, plus the
/// union of every selected word.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub categories: BTreeMap<String, Vec<(String, f64)>>,
    pub all_words: BTreeSet<String>,
}

impl Report {
    /// Build the report from the selector output. The word union is derived
    /// from the per-category lists, so the trailing line and the lists agree
    /// by construction.
    pub fn from_top_words(categories: BTreeMap<String, Vec<(String, f64)>>) -> Report {
        let all_words = categories
            .values()
            .flat_map(|entries| entries.iter().map(|(word, _)| word.clone()))
            .collect();
        Report {
            categories,
            all_words,
        }
    }

    /// Render the report text: one `<category> word:score …` line per
    /// category (ascending by name), then one line with the sorted word
    /// union, space-delimited.
    ///
    /// Scores use the shortest round-tripping `f64` representation, so
    /// re-parsing the report preserves their ordering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (category, entries) in &self.categories {
            write!(out, "<{category}>").ok();
            for (word, value) in entries {
                write!(out, " {word}:{value}").ok();
            }
            out.push('\n');
        }
        let union: Vec<&str> = self.all_words.iter().map(|w| w.as_str()).collect();
        out.push_str(&union.join(" "));
        out.push('\n');
        out
    }
}

/// Save the rendered report under `dir` with a timestamped file name.
/// Returns the path written.
pub fn save_report(report: &Report, mut dir: PathBuf) -> Result<PathBuf, String> {
    let local: DateTime<Local> = Local::now();
    let filename: String = local
        .format("%Y_%m_%d_%H_%M_%S_distinguishing_terms.txt")
        .to_string();
    dir.push(filename);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&dir)
        .map_err(|e| format!("Open report file {} failed: {e}", dir.display()))?;
    file.write_all(report.render().as_bytes())
        .map_err(|e| format!("Write report file {} failed: {e}", dir.display()))?;
    Ok(dir)
}
