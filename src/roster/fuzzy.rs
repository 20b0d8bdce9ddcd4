//! Fuzzy student-name matching using strsim.
//!
//! CHANGELOG:
//! - 10/15/2026 - Accent folding for Portuguese names
//! - 10/14/2026 - Initial implementation

use strsim::{jaro_winkler, levenshtein, sorensen_dice};

/// Default threshold for fuzzy matching (0.0 - 1.0).
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Fuzzy match result.
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub score: f64,
    pub strategy: &'static str,
}

/// Match two names using multiple strategies and keep the best score.
pub fn multi_match(query: &str, target: &str) -> FuzzyMatch {
    let query_folded = fold(query);
    let target_folded = fold(target);

    let strategies: Vec<(&'static str, f64)> = vec![
        ("jaro_winkler", jaro_winkler(&query_folded, &target_folded)),
        ("sorensen_dice", sorensen_dice(&query_folded, &target_folded)),
        ("levenshtein", levenshtein_ratio(&query_folded, &target_folded)),
        ("token_sort", token_sort_ratio(&query_folded, &target_folded)),
    ];

    strategies
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(strategy, score)| FuzzyMatch { score, strategy })
        .unwrap_or(FuzzyMatch {
            score: 0.0,
            strategy: "none",
        })
}

/// Lowercase and strip the accents common in Portuguese names.
fn fold(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Levenshtein ratio (0.0 - 1.0).
fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Token sort ratio - sort words before comparing.
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut a_tokens: Vec<&str> = a.split_whitespace().collect();
    let mut b_tokens: Vec<&str> = b.split_whitespace().collect();
    a_tokens.sort();
    b_tokens.sort();

    jaro_winkler(&a_tokens.join(" "), &b_tokens.join(" "))
}
