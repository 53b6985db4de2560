//! Field normalizers.
//!
//! One submodule per output field. Each normalizer takes the raw (possibly
//! absent or malformed) value plus the shared run context and returns a
//! contract-compliant value together with a structured record of what was
//! changed and why. Normalizers repair, they never reject.

pub mod article;
pub mod audio;
pub mod description;
pub mod hashtags;
pub mod hook;
pub mod publish_pack;
pub mod scenes;

use lazy_static::lazy_static;
use regex::Regex;

/// A normalized value plus the repair trail.
#[derive(Debug, Clone, Default)]
pub struct FieldOutcome {
    pub value: String,
    pub adjusted: bool,
    pub reasons: Vec<String>,
}

impl FieldOutcome {
    pub fn unchanged(value: impl Into<String>) -> Self {
        Self { value: value.into(), adjusted: false, reasons: Vec::new() }
    }

    pub fn note(&mut self, reason: impl Into<String>) {
        self.adjusted = true;
        self.reasons.push(reason.into());
    }
}

lazy_static! {
    /// CTA-like phrasing in Indonesian or English. Used to decide whether a
    /// description already carries a call to action, and by the potential
    /// rubric's CTA-clarity check.
    pub(crate) static ref CTA_PATTERN: Regex = Regex::new(
        r"(?i)\b(komen|komentar|bagikan|share|simpan|save|follow|ikuti|subscribe|baca selengkapnya|read more|comment|tag temanmu)\b"
    )
    .unwrap();

    static ref SENTENCE_SPLIT: Regex = Regex::new(r"[^.!?]+[.!?]*").unwrap();
}

/// Count of Unicode scalar values; all contract char bounds use this.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to at most `max` chars, marking the cut with an ellipsis.
pub(crate) fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out = out.trim_end().to_string();
    out.push('…');
    out
}

/// Split text into trimmed sentences on terminal punctuation.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_SPLIT
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_budget() {
        let out = truncate_with_ellipsis("abcdefghij", 5);
        assert_eq!(char_len(&out), 5);
        assert!(out.ends_with('…'));
        assert_eq!(truncate_with_ellipsis("abc", 5), "abc");
    }

    #[test]
    fn test_truncate_handles_multibyte() {
        let out = truncate_with_ellipsis("héllo wörld", 6);
        assert!(char_len(&out) <= 6);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("Satu. Dua! Tiga? Empat tanpa titik");
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0], "Satu.");
        assert_eq!(sentences[3], "Empat tanpa titik");
    }

    #[test]
    fn test_cta_detection() {
        assert!(CTA_PATTERN.is_match("Jangan lupa simpan video ini"));
        assert!(CTA_PATTERN.is_match("Share this with a friend"));
        assert!(!CTA_PATTERN.is_match("Tiga cara merawat sepatu"));
    }
}
