//! Publish-pack normalizer (blog family only).
//!
//! Slug, internal links, external references, and featured snippet must all
//! be present and well-formed before an article counts as publish-ready;
//! every field has a deterministic fallback.

use lazy_static::lazy_static;
use regex::Regex;

use crate::contract::blogger_contract;
use crate::sanitizer::{sanitize_text, Sanitized};
use crate::types::{Language, RunContext};

use super::{char_len, truncate_with_ellipsis};

lazy_static! {
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-{2,}").unwrap();
    static ref EXTERNAL_URL: Regex = Regex::new(r"(?i)^https?://\S+$").unwrap();
}

const MAX_SLUG_SEGMENTS: usize = 12;
const MAX_SLUG_CHARS: usize = 96;
const MIN_SNIPPET_CHARS: usize = 40;
const FALLBACK_SLUG: &str = "artikel-baru";

/// Fixed authoritative references used when the draft provides none.
const FALLBACK_REFERENCES: [&str; 2] = [
    "https://developers.google.com/search/docs/fundamentals/creating-helpful-content",
    "https://support.google.com/webmasters/answer/7451184",
];

/// Result of publish-pack normalization.
#[derive(Debug, Clone, Default)]
pub struct PublishPackOutcome {
    pub slug: String,
    pub internal_links: Vec<String>,
    pub external_references: Vec<String>,
    pub featured_snippet: String,
    pub slug_adjusted: bool,
    pub internal_links_adjusted: bool,
    pub external_references_adjusted: bool,
    pub featured_snippet_adjusted: bool,
    pub reasons: Vec<String>,
    pub hits: Sanitized,
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Slugify: lowercase, fold diacritics, non-alphanumerics to hyphens,
/// collapse and trim hyphens, cap segments and total length.
pub fn slugify(raw: &str) -> String {
    let lowered: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let collapsed = HYPHEN_RUNS.replace_all(&lowered, "-");
    let trimmed = collapsed.trim_matches('-');

    let mut slug: String = trimmed
        .split('-')
        .filter(|s| !s.is_empty())
        .take(MAX_SLUG_SEGMENTS)
        .collect::<Vec<_>>()
        .join("-");
    if slug.len() > MAX_SLUG_CHARS {
        slug.truncate(MAX_SLUG_CHARS);
        slug = slug.trim_matches('-').to_string();
    }
    slug
}

fn first_segment(slug: &str) -> &str {
    slug.split('-').next().unwrap_or(slug)
}

fn dedupe_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let folded = item.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            out.push(item);
        }
    }
    out
}

fn fallback_snippet(ctx: &RunContext) -> String {
    let topic = if ctx.topic.trim().is_empty() { "topik ini" } else { ctx.topic.trim() };
    match ctx.language {
        Language::Id => format!(
            "Panduan ringkas {topic}: langkah utama, kesalahan umum yang harus dihindari, dan checklist praktis untuk hasil yang konsisten."
        ),
        Language::En => format!(
            "A quick guide to {topic}: the key steps, the common mistakes to avoid, and a practical checklist for consistent results."
        ),
    }
}

/// Raw publish-pack fields as supplied by the draft.
#[derive(Debug, Clone, Default)]
pub struct RawPublishPack<'a> {
    pub slug: Option<&'a str>,
    pub internal_links: &'a [String],
    pub external_references: &'a [String],
    pub featured_snippet: Option<&'a str>,
    pub title: Option<&'a str>,
}

/// Normalize the blog publish pack.
pub fn normalize_publish_pack(raw: &RawPublishPack<'_>, ctx: &RunContext) -> PublishPackOutcome {
    let contract = blogger_contract();
    let mut outcome = PublishPackOutcome::default();

    // Slug: supplied value, then title, then topic, then the constant.
    let supplied = raw.slug.map(slugify).unwrap_or_default();
    outcome.slug = if !supplied.is_empty() {
        let original = raw.slug.unwrap_or_default().trim();
        if supplied != original {
            outcome.slug_adjusted = true;
            outcome.reasons.push("slug rewritten into canonical form".to_string());
        }
        supplied
    } else {
        outcome.slug_adjusted = true;
        outcome.reasons.push("slug derived from title or topic".to_string());
        let derived = slugify(raw.title.unwrap_or(""));
        if !derived.is_empty() {
            derived
        } else {
            let from_topic = slugify(&ctx.topic);
            if !from_topic.is_empty() { from_topic } else { FALLBACK_SLUG.to_string() }
        }
    };

    // Internal links: site-relative, deduplicated, count within band.
    let mut internal: Vec<String> = raw
        .internal_links
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| l.starts_with('/'))
        .collect();
    let dropped = raw.internal_links.len() - internal.len();
    internal = dedupe_case_insensitive(internal);
    if internal.len() < contract.internal_links_min {
        internal = vec![
            format!("/blog/{}", outcome.slug),
            format!("/topik/{}", first_segment(&outcome.slug)),
            format!("/panduan/{}-dasar", first_segment(&outcome.slug)),
        ];
        outcome.internal_links_adjusted = true;
        outcome.reasons.push("internal links replaced with defaults".to_string());
    } else if dropped > 0 {
        outcome.internal_links_adjusted = true;
        outcome.reasons.push("non-relative internal links dropped".to_string());
    }
    if internal.len() > contract.internal_links_max {
        internal.truncate(contract.internal_links_max);
        outcome.internal_links_adjusted = true;
    }
    outcome.internal_links = internal;

    // External references: absolute http(s) URLs, same repair shape.
    let mut external: Vec<String> = raw
        .external_references
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| EXTERNAL_URL.is_match(l))
        .collect();
    let dropped = raw.external_references.len() - external.len();
    external = dedupe_case_insensitive(external);
    if external.len() < contract.external_references_min {
        external = FALLBACK_REFERENCES.iter().map(|s| s.to_string()).collect();
        outcome.external_references_adjusted = true;
        outcome.reasons.push("external references replaced with defaults".to_string());
    } else if dropped > 0 {
        outcome.external_references_adjusted = true;
        outcome.reasons.push("malformed external references dropped".to_string());
    }
    if external.len() > contract.external_references_max {
        external.truncate(contract.external_references_max);
        outcome.external_references_adjusted = true;
    }
    outcome.external_references = external;

    // Featured snippet: sanitized, length-bounded, fallback when thin.
    let cleaned = sanitize_text(raw.featured_snippet.unwrap_or(""), &ctx.forbidden_terms);
    outcome.hits.absorb_counts(&cleaned);
    let mut snippet = cleaned.text;
    if char_len(&snippet) > contract.max_featured_snippet_chars {
        snippet = truncate_with_ellipsis(&snippet, contract.max_featured_snippet_chars);
        outcome.featured_snippet_adjusted = true;
        outcome.reasons.push("featured snippet truncated".to_string());
    }
    if char_len(&snippet) < MIN_SNIPPET_CHARS {
        snippet = fallback_snippet(ctx);
        outcome.featured_snippet_adjusted = true;
        outcome.reasons.push("featured snippet replaced with fallback".to_string());
    }
    outcome.featured_snippet = snippet;

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{resolve_contract, resolve_mode, ContentLength, ContentLengthProfile};
    use crate::sanitizer::merge_forbidden_terms;

    fn ctx() -> RunContext {
        RunContext {
            platform: "blogger".to_string(),
            language: Language::Id,
            tone: "informatif".to_string(),
            topic: "Merawat Sepatu Kulit".to_string(),
            forbidden_terms: merge_forbidden_terms("blogger", &[]),
            keywords: vec![],
            cta_texts: vec![],
            contract: resolve_contract("blogger"),
            length: ContentLengthProfile::resolve(ContentLength::Long, None),
            mode: resolve_mode("blogger"),
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Merawat Sepatu Kulit!"), "merawat-sepatu-kulit");
        assert_eq!(slugify("  Café  à  la  carte "), "cafe-a-la-carte");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_caps_segments_and_length() {
        let long = (0..30).map(|i| format!("kata{i}")).collect::<Vec<_>>().join(" ");
        let slug = slugify(&long);
        assert!(slug.split('-').count() <= 12);
        assert!(slug.len() <= 96);
    }

    #[test]
    fn test_slug_falls_back_to_topic() {
        let raw = RawPublishPack::default();
        let out = normalize_publish_pack(&raw, &ctx());
        assert_eq!(out.slug, "merawat-sepatu-kulit");
        assert!(out.slug_adjusted);
    }

    #[test]
    fn test_internal_links_validated_and_defaulted() {
        let links = vec!["https://other.site/a".to_string(), "/blog/a".to_string()];
        let raw = RawPublishPack { internal_links: &links, ..RawPublishPack::default() };
        let out = normalize_publish_pack(&raw, &ctx());
        // Only one survivor, below the minimum of two: replaced wholesale.
        assert_eq!(out.internal_links.len(), 3);
        assert!(out.internal_links.iter().all(|l| l.starts_with('/')));
        assert!(out.internal_links_adjusted);
    }

    #[test]
    fn test_good_links_kept_and_capped() {
        let links: Vec<String> = (0..8).map(|i| format!("/blog/post-{i}")).collect();
        let raw = RawPublishPack { internal_links: &links, ..RawPublishPack::default() };
        let out = normalize_publish_pack(&raw, &ctx());
        assert_eq!(out.internal_links.len(), 5);
        assert_eq!(out.internal_links[0], "/blog/post-0");
    }

    #[test]
    fn test_external_references_require_http() {
        let refs = vec!["ftp://x".to_string(), "bukan url".to_string()];
        let raw = RawPublishPack { external_references: &refs, ..RawPublishPack::default() };
        let out = normalize_publish_pack(&raw, &ctx());
        assert_eq!(out.external_references.len(), 2);
        assert!(out.external_references.iter().all(|r| r.starts_with("https://")));
    }

    #[test]
    fn test_snippet_bounds() {
        let raw = RawPublishPack {
            featured_snippet: Some("pendek"),
            ..RawPublishPack::default()
        };
        let out = normalize_publish_pack(&raw, &ctx());
        let len = out.featured_snippet.chars().count();
        assert!((40..=320).contains(&len));
        assert!(out.featured_snippet_adjusted);

        let long = "kalimat panjang ".repeat(40);
        let raw = RawPublishPack { featured_snippet: Some(&long), ..RawPublishPack::default() };
        let out = normalize_publish_pack(&raw, &ctx());
        assert!(out.featured_snippet.chars().count() <= 320);
    }

    #[test]
    fn test_duplicate_links_deduped() {
        let links = vec!["/Blog/A".to_string(), "/blog/a".to_string(), "/blog/b".to_string()];
        let raw = RawPublishPack { internal_links: &links, ..RawPublishPack::default() };
        let out = normalize_publish_pack(&raw, &ctx());
        assert_eq!(out.internal_links.len(), 2);
    }
}
