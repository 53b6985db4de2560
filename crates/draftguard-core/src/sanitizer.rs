//! Safety sanitizer.
//!
//! Strips forbidden terms (global + platform + caller-supplied) and three
//! independent families of risky language — spam (urgency/engagement bait),
//! scam (financial-fraud signals), suspense (clickbait/shock phrasing) —
//! counting removals per family. Idempotent: sanitizing already-clean text
//! only normalizes whitespace. Never fails on any input.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

use crate::contract::normalize_platform_name;

/// Globally forbidden terms, in both Indonesian and English.
///
/// Matched case-insensitively as literal phrases. Longer phrases are applied
/// first so that "100% pasti untung" is removed whole instead of leaving
/// "100%" behind after "pasti untung" fires.
pub const GLOBAL_FORBIDDEN_TERMS: &[&str] = &[
    "100% pasti untung",
    "pasti untung",
    "dijamin untung",
    "dijamin berhasil",
    "klik link bio",
    "klik link di bio",
    "cepat kaya",
    "tanpa modal langsung cuan",
    "judi online",
    "obat ampuh tanpa efek samping",
    "guaranteed profit",
    "get rich quick",
    "risk free returns",
    "100% guaranteed",
];

/// Per-platform additions to the forbidden list.
pub fn platform_forbidden_terms(platform: &str) -> &'static [&'static str] {
    match normalize_platform_name(platform).as_str() {
        "tiktok" => &["fyp dong", "follow balik"],
        "youtube" | "youtube_shorts" => &["sub4sub"],
        "instagram_reels" | "instagram_feed" => &["follow for follow"],
        _ => &[],
    }
}

lazy_static! {
    /// Urgency and engagement-bait phrasing.
    static ref SPAM_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(buruan|jangan sampai ketinggalan|sebelum kehabisan)\b").unwrap(),
        Regex::new(r"(?i)\b(follow\s+(back|balik)|sub4sub|like4like|spam\s+like)\b").unwrap(),
        Regex::new(r"(?i)\b(limited\s+time\s+only|act\s+now|don'?t\s+miss\s+out)\b").unwrap(),
        Regex::new(r"(?i)\bgratis\s+hari\s+ini\s+saja\b").unwrap(),
    ];

    /// Financial-fraud signals.
    static ref SCAM_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\btransfer\s+dulu\b").unwrap(),
        Regex::new(r"(?i)\bprofit\s+harian\b").unwrap(),
        Regex::new(r"(?i)\bgaransi\s+hasil\b").unwrap(),
        Regex::new(r"(?i)\b(modal\s+kecil\s+untung\s+besar|pasti\s+cuan)\b").unwrap(),
        Regex::new(r"(?i)\b(double\s+your\s+money|wire\s+(me\s+)?money|investasi\s+bodong)\b")
            .unwrap(),
    ];

    /// Clickbait and shock phrasing.
    static ref SUSPENSE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)\b(kamu\s+tidak\s+akan\s+percaya|tidak\s+disangka)\b").unwrap(),
        Regex::new(r"(?i)\byou\s+won'?t\s+believe\b").unwrap(),
        Regex::new(r"(?i)\b(rahasia\s+yang\s+disembunyikan|bikin\s+merinding)\b").unwrap(),
        Regex::new(r"(?i)\b(shocking|mind[\s-]?blowing)\b").unwrap(),
        Regex::new(r"(?i)\bsampai\s+akhir\s+video\b").unwrap(),
    ];

    static ref PUNCT_RUNS: Regex = Regex::new(r"([!?])[!?]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Sanitized text plus per-family removal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub forbidden_hits: usize,
    pub spam_hits: usize,
    pub scam_hits: usize,
    pub suspense_hits: usize,
}

impl Sanitized {
    /// Spam + suspense: manipulative but not outright fraudulent.
    pub fn risky_hits(&self) -> usize {
        self.spam_hits + self.suspense_hits
    }

    /// Forbidden + spam + suspense, the combined count the safety rubric
    /// tiers on. Scam hits are tracked separately (hard floor).
    pub fn combined_hits(&self) -> usize {
        self.forbidden_hits + self.spam_hits + self.suspense_hits
    }

    pub fn any_hits(&self) -> bool {
        self.forbidden_hits + self.spam_hits + self.scam_hits + self.suspense_hits > 0
    }

    /// Fold another result's counters into this one, ignoring its text.
    pub fn absorb_counts(&mut self, other: &Sanitized) {
        self.forbidden_hits += other.forbidden_hits;
        self.spam_hits += other.spam_hits;
        self.scam_hits += other.scam_hits;
        self.suspense_hits += other.suspense_hits;
    }
}

/// Merge the global, platform, and caller forbidden lists.
///
/// Case-folded, deduplicated, ordered longest-first so overlapping phrases
/// are removed whole.
pub fn merge_forbidden_terms(platform: &str, caller: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = GLOBAL_FORBIDDEN_TERMS
        .iter()
        .map(|t| t.to_lowercase())
        .chain(platform_forbidden_terms(platform).iter().map(|t| t.to_lowercase()))
        .chain(caller.iter().map(|t| t.trim().to_lowercase()))
        .filter(|t| !t.is_empty())
        .collect();
    terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    terms.dedup();
    terms
}

fn term_pattern(term: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

fn apply_family(text: &str, patterns: &[Regex]) -> (String, usize) {
    let mut out = text.to_string();
    let mut hits = 0;
    for pattern in patterns {
        let count = pattern.find_iter(&out).count();
        if count > 0 {
            hits += count;
            out = pattern.replace_all(&out, " ").into_owned();
        }
    }
    (out, hits)
}

// Removing a phrase can splice its neighbors into another listed one
// ("pasti judi online untung" leaves "pasti untung" behind), so the removal
// stage reruns until a full pass finds nothing. Each list is a flat phrase
// table, so one extra pass per spliced phrase suffices; 4 covers every chain
// the lists can produce.
const MAX_REMOVAL_PASSES: usize = 4;

/// Sanitize a single string.
///
/// `forbidden` should come from [`merge_forbidden_terms`] so that phrase
/// ordering is right. Absent input is the caller's concern: pass `""`.
pub fn sanitize_text(raw: &str, forbidden: &[String]) -> Sanitized {
    let mut text = raw.to_string();
    let mut result = Sanitized::default();

    for _ in 0..MAX_REMOVAL_PASSES {
        text = WHITESPACE.replace_all(&text, " ").trim().to_string();
        let mut pass_hits = 0;

        for term in forbidden {
            if let Some(pattern) = term_pattern(term) {
                let count = pattern.find_iter(&text).count();
                if count > 0 {
                    pass_hits += count;
                    result.forbidden_hits += count;
                    text = pattern.replace_all(&text, " ").into_owned();
                }
            }
        }

        let (cleaned, spam_hits) = apply_family(&text, &SPAM_PATTERNS);
        let (cleaned, scam_hits) = apply_family(&cleaned, &SCAM_PATTERNS);
        let (cleaned, suspense_hits) = apply_family(&cleaned, &SUSPENSE_PATTERNS);
        text = cleaned;
        result.spam_hits += spam_hits;
        result.scam_hits += scam_hits;
        result.suspense_hits += suspense_hits;
        pass_hits += spam_hits + scam_hits + suspense_hits;

        if pass_hits == 0 {
            break;
        }
    }

    let text = PUNCT_RUNS.replace_all(&text, "$1").into_owned();
    result.text = WHITESPACE.replace_all(&text, " ").trim().to_string();
    result
}

/// Sanitize multi-line text line by line.
///
/// Lines that become empty after sanitization are dropped; the rest are
/// rejoined with newlines.
pub fn sanitize_multiline(raw: &str, forbidden: &[String]) -> Sanitized {
    let mut total = Sanitized::default();
    let mut lines = Vec::new();

    for line in raw.lines() {
        let cleaned = sanitize_text(line, forbidden);
        total.absorb_counts(&cleaned);
        if !cleaned.text.is_empty() {
            lines.push(cleaned.text);
        }
    }

    total.text = lines.join("\n");
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_terms() -> Vec<String> {
        merge_forbidden_terms("tiktok", &[])
    }

    #[test]
    fn test_clean_text_is_untouched() {
        let result = sanitize_text("Tiga langkah merawat sepatu kulit.", &default_terms());
        assert_eq!(result.text, "Tiga langkah merawat sepatu kulit.");
        assert!(!result.any_hits());
    }

    #[test]
    fn test_sanitization_is_idempotent() {
        let first = sanitize_text(
            "Buruan beli!! 100% pasti untung, kamu tidak akan percaya hasilnya.",
            &default_terms(),
        );
        let second = sanitize_text(&first.text, &default_terms());
        assert_eq!(first.text, second.text);
        assert!(!second.any_hits());
    }

    #[test]
    fn test_removal_cannot_splice_a_new_forbidden_phrase() {
        // Dropping "judi online" would otherwise join its neighbors into
        // "pasti untung", which is itself on the list.
        let first = sanitize_text("pasti judi online untung", &default_terms());
        assert!(!first.text.to_lowercase().contains("pasti untung"));
        assert_eq!(first.forbidden_hits, 2);

        let second = sanitize_text(&first.text, &default_terms());
        assert_eq!(first.text, second.text);
        assert!(!second.any_hits());
    }

    #[test]
    fn test_scam_removal_cannot_splice_a_forbidden_phrase() {
        // Same seam through a family pattern: removing "transfer dulu"
        // must not leave "pasti untung" in the output.
        let result = sanitize_text("pasti transfer dulu untung", &default_terms());
        assert!(!result.text.to_lowercase().contains("pasti untung"));
        assert_eq!(result.scam_hits, 1);
        assert_eq!(result.forbidden_hits, 1);
    }

    #[test]
    fn test_longest_phrase_removed_whole() {
        let result = sanitize_text("Promo ini 100% pasti untung sekarang", &default_terms());
        assert!(!result.text.to_lowercase().contains("100%"));
        assert!(!result.text.to_lowercase().contains("pasti untung"));
        assert_eq!(result.forbidden_hits, 1);
    }

    #[test]
    fn test_families_counted_independently() {
        let result = sanitize_text(
            "Transfer dulu ya, profit harian menanti. Jangan sampai ketinggalan! Shocking!",
            &default_terms(),
        );
        assert_eq!(result.scam_hits, 2);
        assert_eq!(result.spam_hits, 1);
        assert_eq!(result.suspense_hits, 1);
    }

    #[test]
    fn test_punctuation_runs_collapse() {
        let result = sanitize_text("Serius?!?? Keren!!!", &default_terms());
        assert_eq!(result.text, "Serius? Keren!");
    }

    #[test]
    fn test_caller_terms_merged_and_removed() {
        let terms = merge_forbidden_terms("tiktok", &["MiracleBrand".to_string()]);
        let result = sanitize_text("Pakai miraclebrand setiap hari", &terms);
        assert!(!result.text.to_lowercase().contains("miraclebrand"));
        assert_eq!(result.forbidden_hits, 1);
    }

    #[test]
    fn test_multiline_drops_emptied_lines() {
        let raw = "Baris pertama aman\nklik link bio\nBaris ketiga aman";
        let result = sanitize_multiline(raw, &default_terms());
        assert_eq!(result.text, "Baris pertama aman\nBaris ketiga aman");
        assert_eq!(result.forbidden_hits, 1);
    }

    #[test]
    fn test_empty_input_is_safe() {
        let result = sanitize_text("", &default_terms());
        assert_eq!(result.text, "");
        assert!(!result.any_hits());
    }
}
