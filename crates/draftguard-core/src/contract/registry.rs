//! Static platform registry.
//!
//! One entry per supported platform. Registry data is read-only after
//! process start; lookups clamp every numeric bound so downstream code can
//! rely on a well-formed contract even if an entry is edited carelessly.

use super::{
    BloggerArticleContract, ContentLength, CtaStyle, PlatformMode, PlatformOutputContract,
};

/// The closed set of platform names the registry knows about.
pub const PLATFORMS: &[&str] = &[
    "tiktok",
    "instagram_reels",
    "instagram_feed",
    "youtube_shorts",
    "youtube",
    "facebook_reels",
    "threads",
    "x",
    "linkedin",
    "snapchat_spotlight",
    "pinterest",
    "telegram_channel",
    "whatsapp_channel",
    "blogger",
];

/// Fold a free-text platform name onto the registry's canonical names.
///
/// Shared with the performance-benchmark registry so both sides agree on
/// what "the same platform" means.
pub fn normalize_platform_name(raw: &str) -> String {
    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' || c == '.' { '_' } else { c })
        .collect();

    match folded.as_str() {
        "twitter" => "x",
        "ig" | "instagram" => "instagram_feed",
        "reels" | "ig_reels" => "instagram_reels",
        "yt" => "youtube",
        "shorts" | "yt_shorts" => "youtube_shorts",
        "facebook" | "fb" | "fb_reels" => "facebook_reels",
        "snapchat" => "snapchat_spotlight",
        "telegram" => "telegram_channel",
        "whatsapp" => "whatsapp_channel",
        "blog" | "blogspot" => "blogger",
        other => other,
    }
    .to_string()
}

fn contract(
    hook: (usize, usize),
    sentences: (usize, usize),
    description_max_chars: usize,
    hashtags: (usize, usize),
    require_cta: bool,
    cta_style: CtaStyle,
    stage: u8,
) -> PlatformOutputContract {
    PlatformOutputContract {
        hook_min: hook.0,
        hook_max: hook.1,
        description_min_sentences: sentences.0,
        description_max_sentences: sentences.1,
        description_max_chars,
        hashtag_min: hashtags.0,
        hashtag_max: hashtags.1,
        require_cta_in_description: require_cta,
        cta_style,
        stage,
        supported: true,
    }
}

fn lookup(name: &str) -> Option<PlatformOutputContract> {
    use CtaStyle::*;
    let c = match name {
        "tiktok" => contract((20, 60), (2, 4), 300, (4, 8), true, CommentShareSave, 1),
        "instagram_reels" => contract((20, 60), (2, 4), 350, (3, 8), true, SaveShare, 1),
        "instagram_feed" => contract((24, 80), (2, 5), 500, (3, 10), true, SaveShare, 2),
        "youtube_shorts" => contract((20, 60), (2, 4), 300, (2, 5), true, CommentOnly, 1),
        "youtube" => contract((30, 90), (3, 6), 700, (2, 6), true, CommentOnly, 2),
        "facebook_reels" => contract((20, 70), (2, 4), 400, (2, 6), true, CommentShareSave, 2),
        "threads" => contract((16, 50), (1, 3), 280, (1, 4), false, CommentOnly, 2),
        "x" => contract((16, 50), (1, 2), 240, (1, 3), false, None, 2),
        "linkedin" => contract((30, 120), (3, 6), 900, (2, 5), true, CommentOnly, 2),
        "snapchat_spotlight" => contract((16, 50), (1, 3), 250, (1, 4), false, FollowForMore, 2),
        "pinterest" => contract((24, 90), (2, 4), 450, (2, 6), false, SaveShare, 2),
        "telegram_channel" => contract((24, 90), (2, 5), 600, (0, 3), false, ReadMore, 2),
        // WhatsApp channel posts carry no hashtags at all.
        "whatsapp_channel" => contract((24, 90), (2, 5), 600, (0, 0), false, ReadMore, 2),
        // Blog "description" is the meta description, bounded by chars not
        // sentences; hashtags act as post labels.
        "blogger" => contract((30, 110), (1, 3), 160, (2, 6), false, ReadMore, 1),
        _ => return Option::None,
    };
    Some(c)
}

fn default_contract() -> PlatformOutputContract {
    PlatformOutputContract {
        supported: false,
        ..contract((20, 80), (2, 4), 400, (2, 6), false, CtaStyle::CommentShareSave, 2)
    }
}

/// Resolve the output contract for a platform name.
///
/// Unknown names get the default contract with `supported = false`; the
/// engine still runs against it. Never panics.
pub fn resolve_contract(platform: &str) -> PlatformOutputContract {
    let name = normalize_platform_name(platform);
    lookup(&name).unwrap_or_else(default_contract).clamped()
}

/// Resolve which normalization family a platform belongs to.
pub fn resolve_mode(platform: &str) -> PlatformMode {
    if normalize_platform_name(platform) == "blogger" {
        PlatformMode::Longform
    } else {
        PlatformMode::Shortform
    }
}

/// Content lengths a platform accepts. All three when the platform is
/// unknown.
pub fn resolve_allowed_lengths(platform: &str) -> Vec<ContentLength> {
    use ContentLength::*;
    match normalize_platform_name(platform).as_str() {
        "tiktok" | "instagram_reels" | "facebook_reels" | "pinterest" => vec![Short, Medium],
        "youtube_shorts" | "threads" | "x" | "snapchat_spotlight" => vec![Short],
        "youtube" | "linkedin" | "telegram_channel" | "whatsapp_channel" => vec![Medium, Long],
        "blogger" => vec![Long],
        "instagram_feed" => vec![Short, Medium, Long],
        _ => vec![Short, Medium, Long],
    }
}

/// The single global long-form article contract.
pub fn blogger_contract() -> BloggerArticleContract {
    BloggerArticleContract {
        min_words: 900,
        target_min_words: 1300,
        target_max_words: 1700,
        max_words: 2200,
        meta_description_min_chars: 140,
        meta_description_max_chars: 160,
        min_headings: 4,
        min_faq_items: 3,
        internal_links_min: 2,
        internal_links_max: 5,
        external_references_min: 1,
        external_references_max: 3,
        max_featured_snippet_chars: 320,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_registered_platform_resolves_supported() {
        for name in PLATFORMS {
            let c = resolve_contract(name);
            assert!(c.supported, "{name} should be supported");
            assert!(c.hashtag_min <= c.hashtag_max);
            assert!(c.hashtag_max <= 12);
            assert!(c.hook_min <= c.hook_max);
            assert!((1..=2).contains(&c.stage));
        }
    }

    #[test]
    fn test_unknown_platform_gets_default() {
        let c = resolve_contract("myspace");
        assert!(!c.supported);
        assert!(c.hashtag_min <= c.hashtag_max);
    }

    #[test]
    fn test_name_normalization_aliases() {
        assert_eq!(normalize_platform_name("  TikTok "), "tiktok");
        assert_eq!(normalize_platform_name("Twitter"), "x");
        assert_eq!(normalize_platform_name("YT Shorts"), "youtube_shorts");
        assert_eq!(normalize_platform_name("blogspot"), "blogger");
    }

    #[test]
    fn test_tiktok_hashtag_band() {
        let c = resolve_contract("tiktok");
        assert_eq!((c.hashtag_min, c.hashtag_max), (4, 8));
    }

    #[test]
    fn test_whatsapp_forbids_hashtags() {
        let c = resolve_contract("whatsapp");
        assert_eq!((c.hashtag_min, c.hashtag_max), (0, 0));
    }

    #[test]
    fn test_mode_resolution() {
        assert_eq!(resolve_mode("blogger"), PlatformMode::Longform);
        assert_eq!(resolve_mode("blog"), PlatformMode::Longform);
        assert_eq!(resolve_mode("tiktok"), PlatformMode::Shortform);
        assert_eq!(resolve_mode("unknown"), PlatformMode::Shortform);
    }

    #[test]
    fn test_allowed_lengths() {
        assert_eq!(resolve_allowed_lengths("blogger"), vec![ContentLength::Long]);
        assert_eq!(
            resolve_allowed_lengths("unheard-of"),
            vec![ContentLength::Short, ContentLength::Medium, ContentLength::Long]
        );
    }
}
