use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use rayon::prelude::*;

use crate::Document;

/// Document counts for the whole corpus: the grand total and one count per
/// category. Built once by the counting pass, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub total: u64,
    pub per_category: BTreeMap<String, u64>,
}

impl CorpusStats {
    /// Merge two partition-local accumulators. Addition is associative and
    /// commutative, so partials may combine in any order.
    fn merge(mut self, other: CorpusStats) -> CorpusStats {
        self.total += other.total;
        for (category, count) in other.per_category {
            *self.per_category.entry(category).or_insert(0) += count;
        }
        self
    }

    fn absorb(mut self, document: &Document) -> CorpusStats {
        self.total += 1;
        *self
            .per_category
            .entry(document.category.clone())
            .or_insert(0) += 1;
        self
    }
}

/// Corpus statistics pass: count documents in total and per category.
///
/// Each document contributes exactly 1 to its category and 1 to the total,
/// regardless of how many tokens it has.
pub fn count_documents(documents: &[Document]) -> CorpusStats {
    documents
        .par_iter()
        .fold(CorpusStats::default, |acc, doc| acc.absorb(doc))
        .reduce(CorpusStats::default, CorpusStats::merge)
}

/// Persist corpus statistics in the two-line interchange format:
/// line 1 the total as a decimal integer, line 2 the per-category map as a
/// JSON object.
pub fn write_corpus_stats(stats: &CorpusStats, path: &Path) -> Result<(), String> {
    let map = serde_json::to_string(&stats.per_category)
        .map_err(|e| format!("Serialize category counts failed: {e}"))?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| format!("Open stats file {} failed: {e}", path.display()))?;
    file.write_all(format!("{}\n{map}\n", stats.total).as_bytes())
        .map_err(|e| format!("Write stats file {} failed: {e}", path.display()))
}

/// Read corpus statistics back from the interchange format.
///
/// A corrupt file is a structural failure: the later passes cannot run
/// without consistent statistics, so every anomaly is an error here.
pub fn read_corpus_stats(path: &Path) -> Result<CorpusStats, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Read stats file {} failed: {e}", path.display()))?;
    let mut lines = content.lines();
    let total: u64 = lines
        .next()
        .ok_or_else(|| format!("Stats file {} is empty", path.display()))?
        .trim()
        .parse()
        .map_err(|e| format!("Stats file {}: bad total line: {e}", path.display()))?;
    let per_category: BTreeMap<String, u64> = serde_json::from_str(
        lines
            .next()
            .ok_or_else(|| format!("Stats file {}: missing category map line", path.display()))?,
    )
    .map_err(|e| format!("Stats file {}: bad category map: {e}", path.display()))?;

    let sum: u64 = per_category.values().sum();
    if sum != total {
        return Err(format!(
            "Stats file {}: total {total} does not match category sum {sum}",
            path.display()
        ));
    }
    Ok(CorpusStats {
        total,
        per_category,
    })
}
