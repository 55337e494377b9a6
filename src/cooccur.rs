use std::collections::HashMap;

use rayon::prelude::*;

use crate::Document;

/// One cell of the per-word contingency data: how many documents of
/// `category` contain `word`, and how many documents contain `word` at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCategoryCount {
    pub word: String,
    pub category: String,
    /// Documents in `category` containing `word` (the A cell).
    pub count: u64,
    /// Documents in any category containing `word` (A + B).
    pub word_total: u64,
}

/// Co-occurrence aggregation: one `(word, category)` event per distinct
/// token per document, pre-combined per partition into counts before the
/// partial maps are merged.
pub fn aggregate_events(documents: &[Document]) -> HashMap<(String, String), u64> {
    documents
        .par_iter()
        .fold(HashMap::new, |mut acc: HashMap<(String, String), u64>, doc| {
            for token in &doc.tokens {
                *acc.entry((token.clone(), doc.category.clone()))
                    .or_insert(0) += 1;
            }
            acc
        })
        .reduce(HashMap::new, merge_counts)
}

fn merge_counts(
    mut left: HashMap<(String, String), u64>,
    right: HashMap<(String, String), u64>,
) -> HashMap<(String, String), u64> {
    for (key, count) in right {
        *left.entry(key).or_insert(0) += count;
    }
    left
}

/// Contingency builder: group the combined events by word and derive the
/// per-category count together with the word total in the same scope.
///
/// Emits one record per observed `(word, category)` pair; a word seen in a
/// single category therefore reports `word_total == count`.
pub fn build_contingency(events: HashMap<(String, String), u64>) -> Vec<WordCategoryCount> {
    let mut by_word: HashMap<String, Vec<(String, u64)>> = HashMap::new();
    for ((word, category), count) in events {
        by_word.entry(word).or_default().push((category, count));
    }

    let mut records = Vec::new();
    for (word, categories) in by_word {
        let word_total: u64 = categories.iter().map(|(_, c)| c).sum();
        for (category, count) in categories {
            records.push(WordCategoryCount {
                word: word.clone(),
                category,
                count,
                word_total,
            });
        }
    }
    records
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

    fn find<'a>(records: &'a [WordCategoryCount], word: &str, cat: &str) -> &'a WordCategoryCount {
        records
            .iter()
            .find(|r| r.word == word && r.category == cat)
            .unwrap()
    }

    #[test]
    fn events_count_documents_not_occurrences() {
        // tokens are a set per document, so one document = one event per word
        let docs = vec![doc("a", &["x", "y"]), doc("a", &["x"]), doc("b", &["x"])];
        let events = aggregate_events(&docs);
        assert_eq!(events[&("x".to_string(), "a".to_string())], 2);
        assert_eq!(events[&("x".to_string(), "b".to_string())], 1);
        assert_eq!(events[&("y".to_string(), "a".to_string())], 1);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn contingency_totals_sum_over_categories() {
        let docs = vec![
            doc("a", &["x", "y"]),
            doc("a", &["x"]),
            doc("b", &["x"]),
            doc("b", &["y"]),
            doc("c", &["x"]),
        ];
        let records = build_contingency(aggregate_events(&docs));

        let xa = find(&records, "x", "a");
        assert_eq!((xa.count, xa.word_total), (2, 4));
        let xb = find(&records, "x", "b");
        assert_eq!((xb.count, xb.word_total), (1, 4));
        let xc = find(&records, "x", "c");
        assert_eq!((xc.count, xc.word_total), (1, 4));

        // every word: counts across categories sum to the word total
        let mut sums: HashMap<&str, u64> = HashMap::new();
        for r in &records {
            *sums.entry(r.word.as_str()).or_insert(0) += r.count;
        }
        for r in &records {
            assert_eq!(sums[r.word.as_str()], r.word_total, "word {}", r.word);
        }
    }

    #[test]
    fn single_category_word_totals_its_own_count() {
        let docs = vec![doc("a", &["only"]), doc("a", &["only"]), doc("b", &["other"])];
        let records = build_contingency(aggregate_events(&docs));
        let only = find(&records, "only", "a");
        assert_eq!(only.count, 2);
        assert_eq!(only.word_total, 2);
    }

    #[test]
    fn merge_is_order_independent() {
        let mut left = HashMap::new();
        left.insert(("w".to_string(), "a".to_string()), 2u64);
        let mut right = HashMap::new();
        right.insert(("w".to_string(), "a".to_string()), 3u64);
        right.insert(("v".to_string(), "b".to_string()), 1u64);

        let ab = merge_counts(left.clone(), right.clone());
        let ba = merge_counts(right, left);
        assert_eq!(ab, ba);
        assert_eq!(ab[&("w".to_string(), "a".to_string())], 5);
    }
}
