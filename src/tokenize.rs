use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Characters that terminate a token, in addition to whitespace and digits.
/// This set is a fixed contract: changing it changes every downstream count.
const DELIMITERS: &[char] = &[
    '(', ')', '[', ']', '{', '}', '.', '!', '?', ',', ';', ':', '+', '=', '-', '_', '"', '`', '~',
    '#', '@', '&', '*', '%', '€', '$', '§', '/', '\\', '\'',
];

/// Split free text into the set of distinct candidate tokens.
///
/// Lowercases the text, splits on whitespace, digits and the delimiter
/// set, drops empty fragments and stop-words. The result is a set: repeated
/// words within one document count once.
///
/// # Example
/// ```
/// use std::collections::HashSet;
/// use chi_terms::tokenize;
/// let mut stops = HashSet::new();
/// stops.insert("a".to_string());
/// let tokens = tokenize("A (gripping) read -- gripping, 10/10!", &stops);
/// let expected: HashSet<String> =
///     ["gripping", "read"].iter().map(|s| s.to_string()).collect();
/// assert_eq!(tokens, expected);
/// ```
pub fn tokenize(text: &str, stopwords: &HashSet<String>) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_digit() || DELIMITERS.contains(&c))
        .filter(|w| !w.is_empty())
        .filter(|w| !stopwords.contains(*w))
        .map(String::from)
        .collect()
}

/// Load a stop-word list, one word per line. Blank lines are ignored.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Read stopwords {} failed: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}
