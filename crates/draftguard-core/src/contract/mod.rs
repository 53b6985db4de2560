//! Platform output contracts.
//!
//! A contract is the set of numeric/boolean constraints a generated content
//! field must satisfy for a given platform. Contracts are static data,
//! resolved fresh per call and never mutated.

mod registry;

pub use registry::{
    blogger_contract, normalize_platform_name, resolve_allowed_lengths, resolve_contract,
    resolve_mode, PLATFORMS,
};

use serde::{Deserialize, Serialize};

/// Call-to-action style tag carried by a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaStyle {
    CommentShareSave,
    SaveShare,
    CommentOnly,
    FollowForMore,
    ReadMore,
    None,
}

/// Which normalization family a platform belongs to.
///
/// Resolved once per run context; every normalizer dispatches on this tag
/// instead of re-checking the platform string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMode {
    /// Timestamped scene scripts, audio cue, hashtag-driven platforms.
    Shortform,
    /// The blog family: long-form SEO article, labels, publish pack.
    Longform,
}

/// Per-platform output contract.
///
/// All numeric bounds are clamped into valid ranges at lookup time, so a
/// resolved contract is always internally consistent:
/// `hashtag_min <= hashtag_max <= 12`, `hook_min <= hook_max`,
/// `stage` is 1 or 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOutputContract {
    pub hook_min: usize,
    pub hook_max: usize,
    pub description_min_sentences: usize,
    pub description_max_sentences: usize,
    pub description_max_chars: usize,
    pub hashtag_min: usize,
    pub hashtag_max: usize,
    pub require_cta_in_description: bool,
    pub cta_style: CtaStyle,
    /// Rollout/priority tier.
    pub stage: u8,
    /// False when the platform name did not match the fixed list.
    pub supported: bool,
}

impl PlatformOutputContract {
    /// Clamp every numeric field into its valid range.
    pub(crate) fn clamped(mut self) -> Self {
        self.hashtag_min = self.hashtag_min.min(12);
        self.hashtag_max = self.hashtag_max.clamp(self.hashtag_min, 12);
        if self.hook_max < self.hook_min {
            self.hook_max = self.hook_min;
        }
        if self.description_max_sentences < self.description_min_sentences {
            self.description_max_sentences = self.description_min_sentences;
        }
        if !(1..=2).contains(&self.stage) {
            self.stage = 2;
        }
        self
    }
}

/// Requested content length, independent of platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    Medium,
    Long,
}

impl ContentLength {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentLength::Short => "short",
            ContentLength::Medium => "medium",
            ContentLength::Long => "long",
        }
    }
}

/// Scene count and total duration derived from a content length.
///
/// Used only by short-form platforms; an explicit requested audio duration
/// overrides the derived total, clamped to 15–180 seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLengthProfile {
    pub scene_count: usize,
    pub total_sec: u32,
}

impl ContentLengthProfile {
    pub fn resolve(length: ContentLength, audio_length_sec: Option<u32>) -> Self {
        let (scene_count, total_sec) = match length {
            ContentLength::Short => (3, 30),
            ContentLength::Medium => (5, 45),
            ContentLength::Long => (7, 60),
        };
        let total_sec = match audio_length_sec {
            Some(sec) => sec.clamp(15, 180),
            None => total_sec,
        };
        Self { scene_count, total_sec }
    }
}

/// The single long-form article contract used by the blog platform family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloggerArticleContract {
    pub min_words: usize,
    pub target_min_words: usize,
    pub target_max_words: usize,
    pub max_words: usize,
    pub meta_description_min_chars: usize,
    pub meta_description_max_chars: usize,
    pub min_headings: usize,
    pub min_faq_items: usize,
    pub internal_links_min: usize,
    pub internal_links_max: usize,
    pub external_references_min: usize,
    pub external_references_max: usize,
    pub max_featured_snippet_chars: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_orders_hashtag_bounds() {
        let contract = PlatformOutputContract {
            hook_min: 40,
            hook_max: 20,
            description_min_sentences: 4,
            description_max_sentences: 2,
            description_max_chars: 300,
            hashtag_min: 20,
            hashtag_max: 3,
            require_cta_in_description: false,
            cta_style: CtaStyle::None,
            stage: 9,
            supported: true,
        }
        .clamped();

        assert_eq!(contract.hashtag_min, 12);
        assert_eq!(contract.hashtag_max, 12);
        assert_eq!(contract.hook_max, contract.hook_min);
        assert_eq!(
            contract.description_max_sentences,
            contract.description_min_sentences
        );
        assert_eq!(contract.stage, 2);
    }

    #[test]
    fn test_length_profile_defaults() {
        let short = ContentLengthProfile::resolve(ContentLength::Short, None);
        assert_eq!((short.scene_count, short.total_sec), (3, 30));
        let medium = ContentLengthProfile::resolve(ContentLength::Medium, None);
        assert_eq!((medium.scene_count, medium.total_sec), (5, 45));
        let long = ContentLengthProfile::resolve(ContentLength::Long, None);
        assert_eq!((long.scene_count, long.total_sec), (7, 60));
    }

    #[test]
    fn test_length_profile_override_is_clamped() {
        let p = ContentLengthProfile::resolve(ContentLength::Short, Some(600));
        assert_eq!(p.total_sec, 180);
        let p = ContentLengthProfile::resolve(ContentLength::Short, Some(3));
        assert_eq!(p.total_sec, 15);
        let p = ContentLengthProfile::resolve(ContentLength::Medium, Some(50));
        assert_eq!(p.total_sec, 50);
    }
}
