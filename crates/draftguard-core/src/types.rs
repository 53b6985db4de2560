//! Core value types for the guardrail engine.
//!
//! Everything here is an owned value object with no shared mutable state.
//! The pipeline builds a fresh `NormalizedResult` per call and never mutates
//! the caller's `RawDraft`.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::contract::{ContentLength, ContentLengthProfile, CtaStyle, PlatformMode, PlatformOutputContract};

/// Output language of normalized fallback text.
///
/// The engine is Indonesian-first: anything that does not clearly ask for
/// English gets Indonesian templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Id,
    En,
}

impl Language {
    /// Derive a language from a free-text language string.
    ///
    /// "en", "en-US", "English (US)" → `En`; everything else → `Id`.
    /// A bare substring check is not enough ("indonesian" contains "en"),
    /// so matching is anchored on word starts.
    pub fn detect(raw: Option<&str>) -> Self {
        let lower = raw.unwrap_or("").trim().to_lowercase();
        if lower == "en"
            || lower.starts_with("en-")
            || lower.starts_with("en_")
            || lower.starts_with("english")
            || lower.contains(" english")
        {
            Language::En
        } else {
            Language::Id
        }
    }

    pub fn is_en(self) -> bool {
        matches!(self, Language::En)
    }
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<StringOrSeq>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrSeq::One(s)) => vec![s],
        Some(StringOrSeq::Many(v)) => v,
    })
}

/// The untrusted draft produced by an upstream generator.
///
/// Every field is optional or defaultable: the engine treats absence and
/// garbage identically ("needs repair"), never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDraft {
    pub title: Option<String>,
    pub hook: Option<String>,
    pub narrator: Option<String>,
    pub description: Option<String>,
    pub audio_recommendation: Option<String>,
    pub hashtags: Vec<String>,

    // Blog-only publish-pack fields.
    pub slug: Option<String>,
    #[serde(deserialize_with = "string_or_seq")]
    pub internal_links: Vec<String>,
    #[serde(deserialize_with = "string_or_seq")]
    pub external_references: Vec<String>,
    pub featured_snippet: Option<String>,
}

/// Errors that can occur when loading a draft or run context.
///
/// Draft *content* never errors; only the transport layer does.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RawDraft {
    /// Parse a draft from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a draft from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Caller-supplied run context, as it arrives over the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunContextInput {
    pub platform: String,
    pub language: Option<String>,
    pub tone: Option<String>,
    pub topic: Option<String>,
    pub content_length: Option<ContentLength>,
    pub constraints_forbidden_words: Vec<String>,
    pub keywords: Vec<String>,
    pub cta_texts: Vec<String>,
    pub audio_length_sec: Option<u32>,
    /// Warnings accumulated by earlier stages; merged into the result.
    pub warnings: Vec<String>,
}

impl RunContextInput {
    /// Parse a run context from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a run context from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Resolved run context threaded through every normalizer.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub platform: String,
    pub language: Language,
    pub tone: String,
    pub topic: String,
    pub forbidden_terms: Vec<String>,
    pub keywords: Vec<String>,
    pub cta_texts: Vec<String>,
    pub contract: PlatformOutputContract,
    pub length: ContentLengthProfile,
    pub mode: PlatformMode,
}

/// Status of a single scoring line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fallback,
    Retry,
    Block,
}

/// One weighted line item in a scoring rubric.
///
/// Invariant: within a rubric, `sum(weight) == 100` and `awarded <= weight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    pub id: String,
    pub label: String,
    pub weight: u32,
    pub awarded: u32,
    pub status: CheckStatus,
    pub note: String,
}

impl Check {
    pub fn new(
        id: &str,
        label: &str,
        weight: u32,
        awarded: u32,
        status: CheckStatus,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            weight,
            awarded: awarded.min(weight),
            status,
            note: note.into(),
        }
    }
}

/// Publishing decision for a normalized draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionStatus {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "REVISE")]
    Revise,
    #[serde(rename = "BLOCK")]
    Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub status: DecisionStatus,
    pub reasons: Vec<String>,
}

/// Coarse display-only gate label derived from the decision plus repair
/// activity. Not consulted by the decision logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGate {
    Pass,
    Fallback,
    Retry,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Snapshot of the contract the draft was normalized against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub stage: u8,
    pub supported: bool,
    pub hook_range: [usize; 2],
    pub description_sentences: [usize; 2],
    pub hashtag_range: [usize; 2],
    pub require_cta_in_description: bool,
    pub cta_style: CtaStyle,
    pub article_word_range: Option<[usize; 2]>,
    pub article_target_words: Option<[usize; 2]>,
    pub meta_description_chars: Option<[usize; 2]>,
}

/// Which fields the engine forced or rewrote to satisfy the contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAdjustments {
    pub hook_adjusted: bool,
    pub description_adjusted: bool,
    pub hashtag_adjusted: bool,
    pub hashtag_removed: usize,
    pub hashtag_added: usize,
    pub slug_adjusted: bool,
    pub internal_links_adjusted: bool,
    pub external_references_adjusted: bool,
    pub featured_snippet_adjusted: bool,
}

/// Aggregated repair and sanitization counters across every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    pub forbidden_hits_removed: usize,
    pub spam_hits_removed: usize,
    pub scam_hits_removed: usize,
    pub suspense_hits_removed: usize,
    pub removed_hashtags: usize,
    pub added_hashtags: usize,
    pub audio_fallback_applied: bool,
    pub narrator_fallback_applied: bool,
    pub narrator_scene_count: usize,
    pub narrator_word_count: usize,
    pub narrator_heading_count: usize,
    pub narrator_faq_count: usize,
}

/// Blog-only publish metadata, normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloggerPublishPack {
    pub slug: String,
    pub internal_links: Vec<String>,
    pub external_references: Vec<String>,
    pub featured_snippet: String,
}

/// The diagnostic block attached to every normalized result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub platform: String,
    pub language: Language,
    pub tone: String,
    pub compliance_score: u32,
    pub compliance_checks: Vec<Check>,
    pub performance_potential_score: u32,
    pub performance_checks: Vec<Check>,
    pub performance_confidence: Confidence,
    pub ai_decision: Decision,
    pub final_score: f64,
    pub quality_gate: QualityGate,
    pub platform_contract: ContractSnapshot,
    pub platform_contract_adjustments: ContractAdjustments,
    pub quality_summary: QualitySummary,
    pub blogger_publish_pack: Option<BloggerPublishPack>,
    pub warnings: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// A fully normalized, scored, and annotated draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub title: String,
    pub hook: String,
    pub narrator: String,
    pub description: String,
    pub audio_recommendation: String,
    pub hashtags: Vec<String>,
    pub meta: Meta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(Language::detect(Some("en")), Language::En);
        assert_eq!(Language::detect(Some("en-US")), Language::En);
        assert_eq!(Language::detect(Some("English (US)")), Language::En);
        assert_eq!(Language::detect(Some("id")), Language::Id);
        assert_eq!(Language::detect(Some("Bahasa Indonesia")), Language::Id);
        // "indonesian" contains "en" but must not flip to English.
        assert_eq!(Language::detect(Some("indonesian")), Language::Id);
        assert_eq!(Language::detect(None), Language::Id);
    }

    #[test]
    fn test_draft_accepts_string_or_list_links() {
        let one: RawDraft =
            serde_json::from_str(r#"{"internalLinks": "/blog/a", "externalReferences": []}"#)
                .unwrap();
        assert_eq!(one.internal_links, vec!["/blog/a"]);
        assert!(one.external_references.is_empty());

        let many: RawDraft =
            serde_json::from_str(r#"{"internalLinks": ["/a", "/b"]}"#).unwrap();
        assert_eq!(many.internal_links.len(), 2);
    }

    #[test]
    fn test_draft_tolerates_missing_fields() {
        let draft: RawDraft = serde_json::from_str("{}").unwrap();
        assert!(draft.title.is_none());
        assert!(draft.hashtags.is_empty());
    }

    #[test]
    fn test_check_awarded_capped_at_weight() {
        let check = Check::new("x", "X", 20, 50, CheckStatus::Pass, "over-award");
        assert_eq!(check.awarded, 20);
    }

    #[test]
    fn test_decision_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&DecisionStatus::Revise).unwrap(),
            "\"REVISE\""
        );
    }
}
