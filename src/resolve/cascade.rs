//! The name-to-code resolution cascade.
//!
//! Stages run in strict order and short-circuit at the first hit; an
//! earlier stage always wins even when a later stage would score higher.
//! The cutoffs decrease down the cascade because each later stage compares
//! a narrower slice of the input (whole string, then segment, then single
//! word, then city part), so a hit there carries less confidence and must
//! clear a lower bar. The values are fixed constants, not tuning knobs.

use crate::models::{MatchStrategy, RawValue, ResolutionResult};
use crate::normalize::normalize;
use crate::resolve::MappingTable;
use crate::resolve::helpers::best_match;

/// Whole-string fuzzy cutoff.
pub const WHOLE_CUTOFF: f64 = 75.0;
/// Hyphen/comma segment cutoff.
pub const SEGMENT_CUTOFF: f64 = 65.0;
/// Single-word cutoff.
pub const WORD_CUTOFF: f64 = 60.0;
/// City-part cutoff for "<city> <two-letter token>" labels.
pub const CITY_STATE_CUTOFF: f64 = 55.0;

/// Resolve one raw value against the mapping table.
///
/// Never fails: unmatched and malformed inputs come back as the original
/// value with `matched == false`.
pub fn resolve(raw: &RawValue, mapping: &MappingTable) -> ResolutionResult {
    let text = match raw {
        // Missing values skip the cascade entirely.
        RawValue::Missing => return ResolutionResult::passthrough(RawValue::Missing),
        // Already a numeric code; returned as-is without any lookup.
        RawValue::Numeric(code) => {
            return ResolutionResult {
                value: RawValue::Numeric(*code),
                matched: true,
                strategy: MatchStrategy::ExactMatch,
                score: Some(100.0),
            };
        }
        RawValue::Text(s) => s,
    };

    let key = normalize(text);

    if let Some(code) = mapping.get(&key) {
        return hit(code, MatchStrategy::ExactMatch, 100.0);
    }

    if let Some((code, score)) = best_match(&key, mapping, WHOLE_CUTOFF) {
        return hit(code, MatchStrategy::FuzzyWhole, score);
    }

    // Multi-region labels ("Florence-Myrtle Beach SC"): try each region
    // alone, left to right; the first segment clearing the cutoff wins, not
    // the globally best one.
    for segment in key.split(['-', ',']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some((code, score)) = best_match(segment, mapping, SEGMENT_CUTOFF) {
            return hit(code, MatchStrategy::FuzzySplitSegment, score);
        }
    }

    for word in key.split_whitespace() {
        if let Some((code, score)) = best_match(word, mapping, WORD_CUTOFF) {
            return hit(code, MatchStrategy::FuzzyWord, score);
        }
    }

    if let Some(city) = city_part(&key) {
        if let Some((code, score)) = best_match(city, mapping, CITY_STATE_CUTOFF) {
            return hit(code, MatchStrategy::FuzzyCityState, score);
        }
    }

    ResolutionResult::passthrough(RawValue::Text(text.clone()))
}

fn hit(code: &str, strategy: MatchStrategy, score: f64) -> ResolutionResult {
    ResolutionResult {
        value: RawValue::Text(code.to_string()),
        matched: true,
        strategy,
        score: Some(score),
    }
}

/// Extract the city part of a "<city> <two-letter token>" label.
///
/// The cascade runs on the lowercased canonical form, so the trailing token
/// is NOT verified to be an uppercase state code: any two trailing letters
/// after a space qualify. Kept that way on purpose, since downstream data
/// may depend on the looser behavior (see the cascade tests).
fn city_part(key: &str) -> Option<&str> {
    let (city, token) = key.rsplit_once(char::is_whitespace)?;
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let city = city.trim();
    if city.is_empty()
        || !city
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        return None;
    }
    Some(city)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> MappingTable {
        MappingTable::build(pairs.iter().copied())
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_missing_passes_through() {
        let mapping = table(&[("new york", "501")]);
        let r = resolve(&RawValue::Missing, &mapping);
        assert_eq!(r.value, RawValue::Missing);
        assert!(!r.matched);
        assert_eq!(r.strategy, MatchStrategy::NoMatch);
        assert_eq!(r.score, None);
    }

    #[test]
    fn test_numeric_passes_through_without_lookup() {
        // Works even against an empty mapping: the value is never looked up.
        let mapping = table(&[]);
        let r = resolve(&RawValue::Numeric(501), &mapping);
        assert_eq!(r.value, RawValue::Numeric(501));
        assert!(r.matched);
    }

    #[test]
    fn test_exact_match_ignores_case_and_whitespace() {
        let mapping = table(&[("new york", "501")]);
        let r = resolve(&text("  New York "), &mapping);
        assert_eq!(r.value, RawValue::Text("501".into()));
        assert_eq!(r.strategy, MatchStrategy::ExactMatch);
        assert_eq!(r.score, Some(100.0));
    }

    #[test]
    fn test_whole_string_fuzzy_match() {
        let mapping = table(&[("san francisco-oakland-san jose", "807")]);
        let r = resolve(&text("San Francisco Oakland San Jose"), &mapping);
        assert_eq!(r.value, RawValue::Text("807".into()));
        assert_eq!(r.strategy, MatchStrategy::FuzzyWhole);
        assert!(r.score.unwrap() >= WHOLE_CUTOFF);
    }

    #[test]
    fn test_earlier_stage_wins_regardless_of_score() {
        // "abxxe fghij" scores ~81.8 against the first key as a whole
        // string, while its second word is a 100-point word-level match for
        // the second key. The whole-string stage still wins.
        let mapping = table(&[("abcde fghij", "W"), ("fghij", "Y")]);
        let r = resolve(&text("abxxe fghij"), &mapping);
        assert_eq!(r.value, RawValue::Text("W".into()));
        assert_eq!(r.strategy, MatchStrategy::FuzzyWhole);
    }

    #[test]
    fn test_segment_split_first_segment_wins() {
        let mapping = table(&[("florence", "559"), ("myrtle beach", "570")]);
        let r = resolve(&text("Florence-Myrtle Beach SC"), &mapping);
        assert_eq!(r.value, RawValue::Text("559".into()));
        assert_eq!(r.strategy, MatchStrategy::FuzzySplitSegment);
    }

    #[test]
    fn test_word_level_match() {
        let mapping = table(&[("sacramento", "862")]);
        // No delimiters, whole string too far off, but one word is close.
        let r = resolve(&text("around sacramneto area"), &mapping);
        assert_eq!(r.value, RawValue::Text("862".into()));
        assert_eq!(r.strategy, MatchStrategy::FuzzyWord);
    }

    #[test]
    fn test_state_suffix_token_is_not_case_checked() {
        // The trailing token has already been lowercased by normalization,
        // so "xy" triggers the city-state stage just like "XY" would; the
        // token is never validated against real state codes.
        let mapping = table(&[("myrtle beach", "570")]);
        let r = resolve(&text("Myrtel Bech XY"), &mapping);
        assert_eq!(r.value, RawValue::Text("570".into()));
        assert_eq!(r.strategy, MatchStrategy::FuzzyCityState);
        assert!(r.score.unwrap() >= CITY_STATE_CUTOFF);
    }

    #[test]
    fn test_city_part_pattern() {
        assert_eq!(city_part("myrtel bech xy"), Some("myrtel bech"));
        assert_eq!(city_part("florence sc"), Some("florence"));
        // No space, token too long, digits, or non-letter city part.
        assert_eq!(city_part("florence"), None);
        assert_eq!(city_part("florence abc"), None);
        assert_eq!(city_part("florence s1"), None);
        assert_eq!(city_part("flo-rence sc"), None);
    }

    #[test]
    fn test_no_match_returns_original_text() {
        let mapping = table(&[("new york", "501")]);
        let r = resolve(&text("Atlantis"), &mapping);
        assert_eq!(r.value, RawValue::Text("Atlantis".into()));
        assert!(!r.matched);
        assert_eq!(r.strategy, MatchStrategy::NoMatch);
        assert_eq!(r.score, None);
    }

    #[test]
    fn test_empty_mapping_never_matches_text() {
        let mapping = table(&[]);
        let r = resolve(&text("New York"), &mapping);
        assert!(!r.matched);
        assert_eq!(r.value, RawValue::Text("New York".into()));
    }
}
