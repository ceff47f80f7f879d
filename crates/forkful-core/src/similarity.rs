// ABOUTME: Food name similarity scoring and cleanup used by every dedup site
// ABOUTME: Tiered heuristic: exact match, substring containment, then word overlap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Forkful

//! Name similarity and cleanup utilities.
//!
//! Both the aggregator and the route layer deduplicate through these
//! functions; there is deliberately a single implementation so the two sites
//! cannot drift apart.

use std::sync::OnceLock;

use regex::Regex;

/// Similarity score for substring containment in either direction
pub const CONTAINMENT_SCORE: f64 = 0.8;
/// Upper bound for the word-overlap tier; only an exact match scores 1.0
pub const WORD_OVERLAP_CAP: f64 = 0.9;

/// Fallback name when cleanup leaves nothing
const UNKNOWN_FOOD: &str = "Unknown Food";

/// Score how similar two food names are, in `[0, 1]`.
///
/// Names are lowercased and trimmed before comparison. Tiers:
/// exact match scores 1.0; substring containment in either direction scores
/// [`CONTAINMENT_SCORE`]; otherwise the word-overlap ratio
/// `2 * |common| / (|a| + |b|)`, capped at [`WORD_OVERLAP_CAP`].
#[must_use]
pub fn food_name_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SCORE;
    }

    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();
    let common = words_a.iter().filter(|word| words_b.contains(word)).count();
    if common == 0 {
        return 0.0;
    }

    let overlap = (2.0 * common as f64) / (words_a.len() + words_b.len()) as f64;
    overlap.min(WORD_OVERLAP_CAP)
}

fn code_suffix_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i),\s*(?:UPC|GTIN):\s*\d+").ok())
        .as_ref()
}

fn trailing_parenthetical_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").ok()).as_ref()
}

/// Clean a raw provider description into a presentable food name.
///
/// Strips trailing UPC/GTIN codes and one trailing parenthetical, then
/// capitalizes the first letter and lowercases the rest. Empty input yields
/// a placeholder name.
#[must_use]
pub fn clean_food_name(description: &str) -> String {
    let mut cleaned = description.to_owned();
    if let Some(re) = code_suffix_re() {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }
    if let Some(re) = trailing_parenthetical_re() {
        cleaned = re.replace(&cleaned, "").into_owned();
    }
    let cleaned = cleaned.trim();

    let mut chars = cleaned.chars();
    match chars.next() {
        None => UNKNOWN_FOOD.to_owned(),
        Some(first) => {
            let mut name: String = first.to_uppercase().collect();
            name.push_str(&chars.as_str().to_lowercase());
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_one() {
        assert!((food_name_similarity("Chicken Soup", "chicken soup") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn containment_scores_point_eight() {
        // The pair from an internal/FDC near-duplicate: containment tier.
        let score = food_name_similarity("chicken soup", "chicken soup, canned");
        assert!((score - CONTAINMENT_SCORE).abs() < f64::EPSILON);
        // Symmetric: containment is checked in both directions.
        let reversed = food_name_similarity("chicken soup, canned", "chicken soup");
        assert!((score - reversed).abs() < f64::EPSILON);
    }

    #[test]
    fn word_overlap_ratio() {
        // "chicken soup" vs "chicken broth": 1 common word of 4 total.
        let score = food_name_similarity("chicken soup", "chicken broth");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn word_overlap_never_reaches_one() {
        // All words shared but different order: capped below 1.0.
        let score = food_name_similarity("soup chicken", "chicken soup");
        assert!((score - WORD_OVERLAP_CAP).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_names_score_zero() {
        assert!(food_name_similarity("apple", "beef jerky") < f64::EPSILON);
    }

    #[test]
    fn scores_stay_in_bounds() {
        let pairs = [
            ("a", "a"),
            ("apple pie", "apple"),
            ("whole milk", "skim milk"),
            ("", "bread"),
            ("  spaced  ", "spaced"),
        ];
        for (a, b) in pairs {
            let score = food_name_similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} gave {score}");
        }
    }

    #[test]
    fn clean_strips_upc_codes() {
        assert_eq!(
            clean_food_name("CHEDDAR CHEESE, UPC: 021000615261"),
            "Cheddar cheese"
        );
        assert_eq!(
            clean_food_name("Oat cereal, GTIN: 00016000275270"),
            "Oat cereal"
        );
    }

    #[test]
    fn clean_strips_trailing_parenthetical() {
        assert_eq!(
            clean_food_name("Yogurt, plain (includes Greek-style)"),
            "Yogurt, plain"
        );
    }

    #[test]
    fn clean_capitalizes_first_letter_only() {
        assert_eq!(clean_food_name("APPLES, RAW, WITH SKIN"), "Apples, raw, with skin");
    }

    #[test]
    fn clean_empty_falls_back() {
        assert_eq!(clean_food_name(""), "Unknown Food");
        assert_eq!(clean_food_name("  (promo pack)  "), "Unknown Food");
    }
}
