use std::collections::BTreeMap;

use crate::cooccur::WordCategoryCount;
use crate::corpus::CorpusStats;

/// Chi-squared score of one (word, category) pair, keyed by category for
/// the selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiScore {
    pub category: String,
    pub word: String,
    pub value: f64,
}

/// Chi-squared statistic of the 2x2 independence table for word presence
/// against category membership.
///
/// `a` = documents in the category containing the word, `word_total` = a+b,
/// `cat_total` = documents in the category, `n` = documents in the corpus.
/// If any marginal sum is zero the table is degenerate and the score is
/// defined as 0.0.
pub fn chi_squared(a: u64, word_total: u64, cat_total: u64, n: u64) -> f64 {
    let n = n as f64;
    let a = a as f64;
    let b = word_total as f64 - a;
    let c = cat_total as f64 - a;
    let d = n - a - b - c;

    let denominator = (a + b) * (a + c) * (b + d) * (c + d);
    if denominator == 0.0 {
        return 0.0;
    }
    n * (a * d - b * c).powi(2) / denominator
}

/// Chi-squared scorer: score every contingency record against the corpus
/// statistics and re-key the result by category.
///
/// A category seen in co-occurrence events but absent from the statistics
/// means the corpus changed between passes; that is a fatal inconsistency,
/// as is a per-category count exceeding the category's document count.
pub fn score_words(
    counts: &[WordCategoryCount],
    stats: &CorpusStats,
) -> Result<Vec<ChiScore>, String> {
    let mut scores = Vec::with_capacity(counts.len());
    for record in counts {
        let cat_total = *stats.per_category.get(&record.category).ok_or_else(|| {
            format!(
                "Chi-squared scorer: category {:?} not present in corpus statistics",
                record.category
            )
        })?;
        if record.count > cat_total {
            return Err(format!(
                "Chi-squared scorer: word {:?} counted {} times in category {:?} of {} documents",
                record.word, record.count, record.category, cat_total
            ));
        }
        scores.push(ChiScore {
            category: record.category.clone(),
            word: record.word.clone(),
            value: chi_squared(record.count, record.word_total, cat_total, stats.total),
        });
    }
    Ok(scores)
}

/// Top-K selection: group scores by category and keep the `k` best words.
///
/// Ordering is total and deterministic: descending score, then ascending
/// word on ties.
pub fn select_top_words(
    scores: Vec<ChiScore>,
    k: usize,
) -> BTreeMap<String, Vec<(String, f64)>> {
    let mut by_category: BTreeMap<String, Vec<(String, f64)>> = BTreeMap::new();
    for score in scores {
        by_category
            .entry(score.category)
            .or_default()
            .push((score.word, score.value));
    }
    for entries in by_category.values_mut() {
        entries.sort_by(|(w1, v1), (w2, v2)| v2.total_cmp(v1).then_with(|| w1.cmp(w2)));
        entries.truncate(k);
    }
    by_category
}
