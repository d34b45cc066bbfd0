//! String similarity scorers.
//!
//! All scorers return 0..=100 and expect inputs that went through
//! [`normalize`] first.

use report_core::StringSimilarity;

/// Lowercase and collapse runs of whitespace to a single space
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_score(similarity: f64) -> u8 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u8
}

fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split(' ').filter(|t| !t.is_empty()).collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Best similarity of the shorter string against any equally long window
/// of the longer one
fn partial_similarity(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
    let short_len = shorter.chars().count();
    if short_len == 0 {
        return 0.0;
    }
    let longer: Vec<char> = longer.chars().collect();
    longer
        .windows(short_len)
        .map(|window| {
            let window: String = window.iter().collect();
            strsim::normalized_levenshtein(shorter, &window)
        })
        .fold(0.0, f64::max)
}

/// Normalised edit distance over the whole strings
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl StringSimilarity for LevenshteinRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        to_score(levenshtein_similarity(query, candidate))
    }
}

/// Edit distance after sorting whitespace-separated tokens, so word order is ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl StringSimilarity for TokenSortRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        to_score(levenshtein_similarity(&sorted_tokens(query), &sorted_tokens(candidate)))
    }
}

/// Jaro-Winkler, favouring shared prefixes
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl StringSimilarity for JaroWinkler {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        if query.is_empty() || candidate.is_empty() {
            return 0;
        }
        to_score(strsim::jaro_winkler(query, candidate))
    }
}

/// Default scorer: the better of whole-string and token-sort ratios, and a
/// down-weighted substring match when the lengths differ by 1.5x or more
/// ("apple" against "apple inc.").
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

const PARTIAL_SCALE: f64 = 0.9;
const PARTIAL_LENGTH_RATIO: f64 = 1.5;

impl StringSimilarity for WeightedRatio {
    fn score(&self, query: &str, candidate: &str) -> u8 {
        let q_len = query.chars().count();
        let c_len = candidate.chars().count();
        if q_len == 0 || c_len == 0 {
            return 0;
        }

        let base = levenshtein_similarity(query, candidate)
            .max(levenshtein_similarity(&sorted_tokens(query), &sorted_tokens(candidate)));

        let length_ratio = q_len.max(c_len) as f64 / q_len.min(c_len) as f64;
        let best = if length_ratio < PARTIAL_LENGTH_RATIO {
            base
        } else {
            base.max(partial_similarity(query, candidate) * PARTIAL_SCALE)
        };
        to_score(best)
    }
}
