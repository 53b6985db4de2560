//! Hashtag normalizer.
//!
//! Coerces raw entries into `#token` shape, filters forbidden and malformed
//! tags, deduplicates, then repairs the count into the contract band using
//! a per-platform fallback pool.

use lazy_static::lazy_static;
use regex::Regex;

use crate::contract::normalize_platform_name;
use crate::types::RunContext;

lazy_static! {
    static ref TAG_SHAPE: Regex = Regex::new(r"^#[\w.-]{2,40}$").unwrap();
    static ref INNER_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TAG_PUNCT: Regex = Regex::new(r"[._-]").unwrap();
}

/// Result of hashtag normalization.
#[derive(Debug, Clone, Default)]
pub struct HashtagOutcome {
    pub hashtags: Vec<String>,
    pub removed_count: usize,
    pub added_count: usize,
    pub used_fallback: bool,
    pub min_count: usize,
    pub max_count: usize,
    pub in_range: bool,
    pub contract_adjusted: bool,
}

/// Curated fallback pool per platform; a generic pool otherwise.
fn fallback_pool(platform: &str) -> &'static [&'static str] {
    match normalize_platform_name(platform).as_str() {
        "tiktok" => &[
            "#fyp", "#tiktoktips", "#belajarbareng", "#kontenedukasi", "#tipspraktis",
            "#serunyabelajar", "#idekonten", "#buatkamu",
        ],
        "instagram_reels" | "instagram_feed" => &[
            "#reels", "#tipsharian", "#kontenedukasi", "#inspirasiharian", "#belajarbareng",
            "#idekreatif",
        ],
        "youtube_shorts" | "youtube" => &[
            "#shorts", "#tutorial", "#tipspraktis", "#belajar", "#edukasi",
        ],
        "blogger" => &["#panduan", "#tips", "#tutorial", "#referensi", "#belajar"],
        _ => &["#tips", "#insight", "#belajar", "#konten", "#praktis"],
    }
}

fn coerce(raw: &str) -> String {
    let mut tag = INNER_WHITESPACE.replace_all(raw.trim(), "").into_owned();
    if tag.is_empty() {
        return tag;
    }
    if !tag.starts_with('#') {
        tag.insert(0, '#');
    }
    tag
}

/// True when the tag body (punctuation stripped, case-folded) contains a
/// forbidden term's folded form.
fn contains_forbidden(tag: &str, forbidden: &[String]) -> bool {
    let body = TAG_PUNCT
        .replace_all(tag.trim_start_matches('#'), "")
        .to_lowercase();
    forbidden.iter().any(|term| {
        let folded: String = term
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        !folded.is_empty() && body.contains(&folded)
    })
}

/// Normalize a raw hashtag list against the contract band.
pub fn normalize_hashtags(raw: &[String], ctx: &RunContext) -> HashtagOutcome {
    let contract = &ctx.contract;
    let mut outcome = HashtagOutcome {
        min_count: contract.hashtag_min,
        max_count: contract.hashtag_max,
        ..HashtagOutcome::default()
    };

    let mut seen: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();

    for entry in raw {
        let tag = coerce(entry);
        if tag.is_empty() {
            continue;
        }
        if !TAG_SHAPE.is_match(&tag) {
            outcome.removed_count += 1;
            continue;
        }
        if contains_forbidden(&tag, &ctx.forbidden_terms) {
            outcome.removed_count += 1;
            continue;
        }
        let folded = tag.to_lowercase();
        if seen.contains(&folded) {
            // Duplicates are dropped silently, not counted as removals.
            continue;
        }
        seen.push(folded);
        tags.push(tag);
    }

    if contract.hashtag_max == 0 {
        if !tags.is_empty() || outcome.removed_count > 0 {
            outcome.contract_adjusted = true;
        }
        outcome.removed_count += tags.len();
        outcome.hashtags = Vec::new();
        outcome.in_range = true;
        return outcome;
    }

    if tags.len() > contract.hashtag_max {
        let excess = tags.len() - contract.hashtag_max;
        tags.truncate(contract.hashtag_max);
        outcome.removed_count += excess;
        outcome.contract_adjusted = true;
    }

    if tags.len() < contract.hashtag_min {
        for candidate in fallback_pool(&ctx.platform) {
            if tags.len() >= contract.hashtag_min {
                break;
            }
            let folded = candidate.to_lowercase();
            if seen.contains(&folded) {
                continue;
            }
            seen.push(folded);
            tags.push(candidate.to_string());
            outcome.added_count += 1;
        }
        if outcome.added_count > 0 {
            outcome.contract_adjusted = true;
        }
    }

    if tags.is_empty() && contract.hashtag_min > 0 {
        tags = fallback_pool(&ctx.platform)
            .iter()
            .take(contract.hashtag_max)
            .map(|t| t.to_string())
            .collect();
        outcome.added_count = tags.len();
        outcome.used_fallback = true;
        outcome.contract_adjusted = true;
    }

    outcome.in_range =
        tags.len() >= contract.hashtag_min && tags.len() <= contract.hashtag_max;
    outcome.hashtags = tags;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{resolve_contract, resolve_mode, ContentLength, ContentLengthProfile};
    use crate::sanitizer::merge_forbidden_terms;
    use crate::types::Language;

    fn ctx(platform: &str) -> RunContext {
        RunContext {
            platform: platform.to_string(),
            language: Language::Id,
            tone: "santai".to_string(),
            topic: "sepatu".to_string(),
            forbidden_terms: merge_forbidden_terms(platform, &[]),
            keywords: vec![],
            cta_texts: vec![],
            contract: resolve_contract(platform),
            length: ContentLengthProfile::resolve(ContentLength::Short, None),
            mode: resolve_mode(platform),
        }
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_count_always_lands_in_band() {
        let ctx = ctx("tiktok");
        let inputs: Vec<Vec<String>> = vec![
            vec![],
            tags(&["#satu"]),
            tags(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]),
            tags(&["not a tag", "###", "#ok_tag", "#lain-lagi"]),
        ];
        for input in inputs {
            let out = normalize_hashtags(&input, &ctx);
            assert!(
                out.hashtags.len() >= 4 && out.hashtags.len() <= 8,
                "got {} for {input:?}",
                out.hashtags.len()
            );
            assert!(out.in_range);
        }
    }

    #[test]
    fn test_coercion_adds_prefix_and_strips_whitespace() {
        let ctx = ctx("tiktok");
        let out = normalize_hashtags(&tags(&["sepatu kulit", "#rawat"]), &ctx);
        assert!(out.hashtags.contains(&"#sepatukulit".to_string()));
        assert!(out.hashtags.contains(&"#rawat".to_string()));
    }

    #[test]
    fn test_invalid_shapes_dropped_and_counted() {
        let ctx = ctx("tiktok");
        let out = normalize_hashtags(&tags(&["#a", "#ok", "#this/that", "#fine"]), &ctx);
        // "#a" too short, "#this/that" has an invalid char.
        assert!(out.removed_count >= 2);
        assert!(!out.hashtags.iter().any(|t| t.contains('/')));
    }

    #[test]
    fn test_forbidden_tag_dropped() {
        let ctx = ctx("tiktok");
        let out = normalize_hashtags(&tags(&["#cepat-kaya", "#rawatsepatu"]), &ctx);
        assert!(!out.hashtags.iter().any(|t| t.contains("kaya")));
        assert!(out.removed_count >= 1);
    }

    #[test]
    fn test_duplicates_dropped_silently() {
        let ctx = ctx("tiktok");
        let out = normalize_hashtags(&tags(&["#Rawat", "#rawat", "#RAWAT"]), &ctx);
        let rawat = out.hashtags.iter().filter(|t| t.to_lowercase() == "#rawat").count();
        assert_eq!(rawat, 1);
    }

    #[test]
    fn test_zero_max_strips_everything() {
        let ctx = ctx("whatsapp_channel");
        let out = normalize_hashtags(&tags(&["#satu", "#dua"]), &ctx);
        assert!(out.hashtags.is_empty());
        assert!(out.contract_adjusted);
        assert!(out.in_range);
    }

    #[test]
    fn test_pool_fills_when_everything_invalid() {
        let ctx = ctx("tiktok");
        let out = normalize_hashtags(&tags(&["x", "y"]), &ctx);
        assert_eq!(out.hashtags.len(), ctx.contract.hashtag_min);
        assert_eq!(out.added_count, ctx.contract.hashtag_min);
        assert_eq!(out.removed_count, 2);
    }
}
