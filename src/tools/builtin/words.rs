//! Word frequency extraction.

use crate::error::{ChorusError, Result};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

const STOPWORDS: &[&str] = &[
    "the", "and", "a", "an", "of", "in", "on", "at", "to", "for", "with", "is", "are", "was",
    "were", "be", "by", "this", "that", "it", "from", "as", "or", "but", "if", "then", "so", "not",
];

/// The `n` most frequent non-stopwords, ties in order of first appearance.
pub fn most_common_words(text: &str, n: usize) -> Vec<String> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let lowered = text.to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !stopwords.contains(w))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Tool body for `get_n_most_common_words`.
pub fn describe_most_common_words(text: &str, n: i64) -> Result<String> {
    let count = usize::try_from(n)
        .map_err(|_| ChorusError::ToolExecution(format!("n must be non-negative, got {}", n)))?;

    Ok(format!(
        "The {} most common words are: {}",
        n,
        most_common_words(text, count).join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_common_words_skips_stopwords() {
        let text = "The budget is the budget. The plan is a plan, and the budget wins.";
        assert_eq!(most_common_words(text, 2), vec!["budget", "plan"]);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        assert_eq!(most_common_words("zeta alpha zeta alpha beta", 3), vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_describe_output() {
        assert_eq!(
            describe_most_common_words("Rust rust RUST cargo", 2).unwrap(),
            "The 2 most common words are: rust, cargo"
        );
    }

    #[test]
    fn test_negative_count_is_rejected() {
        assert!(describe_most_common_words("words", -1).is_err());
    }
}
