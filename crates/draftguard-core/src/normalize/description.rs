//! Description normalizer.
//!
//! Two disjoint regimes: the blog family operates on meta-description
//! character bounds (sentence-agnostic), every other platform on sentence
//! counts plus a max character length and an optional forced CTA.

use crate::contract::{blogger_contract, CtaStyle, PlatformMode};
use crate::types::{Language, RunContext};

use super::{char_len, split_sentences, truncate_with_ellipsis, FieldOutcome, CTA_PATTERN};

fn filler_sentence(ctx: &RunContext, index: usize) -> String {
    let topic = if ctx.topic.trim().is_empty() { "topik ini" } else { ctx.topic.trim() };
    match (ctx.language, index % 2) {
        (Language::Id, 0) => {
            format!("Pembahasan {topic} ini dirangkum supaya mudah dipraktikkan.")
        }
        (Language::Id, _) => {
            format!("Poin-poin tentang {topic} dipilih dari kesalahan yang paling sering terjadi.")
        }
        (Language::En, 0) => {
            format!("This breakdown of {topic} is kept short so you can apply it today.")
        }
        (Language::En, _) => {
            format!("Each point about {topic} comes from the mistakes people make most often.")
        }
    }
}

/// CTA sentence matching the contract's style tag.
pub(crate) fn cta_sentence(style: CtaStyle, language: Language) -> &'static str {
    match (style, language) {
        (CtaStyle::CommentShareSave, Language::Id) => {
            "Tulis pendapatmu di komentar, bagikan ke teman yang butuh, dan simpan untuk nanti."
        }
        (CtaStyle::CommentShareSave, Language::En) => {
            "Drop your take in the comments, share it with a friend, and save this for later."
        }
        (CtaStyle::SaveShare, Language::Id) => {
            "Simpan dulu biar gampang dicari lagi, lalu bagikan ke yang membutuhkan."
        }
        (CtaStyle::SaveShare, Language::En) => {
            "Save this so you can find it again, then share it with someone who needs it."
        }
        (CtaStyle::CommentOnly, Language::Id) => {
            "Tulis pertanyaanmu di kolom komentar."
        }
        (CtaStyle::CommentOnly, Language::En) => {
            "Leave your question in the comments."
        }
        (CtaStyle::FollowForMore, Language::Id) => {
            "Ikuti untuk pembahasan lanjutan berikutnya."
        }
        (CtaStyle::FollowForMore, Language::En) => {
            "Follow for the next deep dive."
        }
        (CtaStyle::ReadMore, Language::Id) => {
            "Baca selengkapnya untuk langkah detailnya."
        }
        (CtaStyle::ReadMore, Language::En) => {
            "Read more for the detailed steps."
        }
        (CtaStyle::None, Language::Id) => "Semoga membantu.",
        (CtaStyle::None, Language::En) => "Hope this helps.",
    }
}

fn fallback_meta_description(ctx: &RunContext) -> String {
    let topic = if ctx.topic.trim().is_empty() { "topik ini" } else { ctx.topic.trim() };
    match ctx.language {
        Language::Id => format!(
            "Panduan praktis {topic}: langkah utama, kesalahan yang harus dihindari, dan checklist singkat."
        ),
        Language::En => format!(
            "A practical guide to {topic}: the key steps, the mistakes to avoid, and a short checklist."
        ),
    }
}

/// Blog regime: pad or trim the meta description into its char band.
fn normalize_meta_description(raw: &str, ctx: &RunContext) -> FieldOutcome {
    let contract = blogger_contract();
    let mut outcome = FieldOutcome::unchanged(raw.trim().to_string());

    if outcome.value.is_empty() {
        outcome.value = fallback_meta_description(ctx);
        outcome.note("meta description was empty, fallback used");
    }

    let mut pad_index = 0;
    while char_len(&outcome.value) < contract.meta_description_min_chars {
        outcome.value.push(' ');
        outcome.value.push_str(&filler_sentence(ctx, pad_index));
        pad_index += 1;
        if pad_index == 1 {
            outcome.note("meta description padded to minimum length");
        }
    }

    if char_len(&outcome.value) > contract.meta_description_max_chars {
        outcome.value =
            truncate_with_ellipsis(&outcome.value, contract.meta_description_max_chars);
        outcome.note("meta description truncated to maximum length");
    }

    outcome
}

/// Short-form regime: sentence-count bounds, optional forced CTA, char cap.
fn normalize_shortform_description(raw: &str, ctx: &RunContext) -> FieldOutcome {
    let contract = &ctx.contract;
    let mut outcome = FieldOutcome::unchanged(String::new());
    let mut sentences = split_sentences(raw);

    if sentences.len() > contract.description_max_sentences {
        sentences.truncate(contract.description_max_sentences);
        outcome.note("description truncated to sentence maximum");
    }

    let mut filler_index = 0;
    while sentences.len() < contract.description_min_sentences {
        sentences.push(filler_sentence(ctx, filler_index));
        filler_index += 1;
        if filler_index == 1 {
            outcome.note("description padded with filler to sentence minimum");
        }
    }

    let mut text = sentences.join(" ");

    if contract.require_cta_in_description && !CTA_PATTERN.is_match(&text) {
        text.push(' ');
        text.push_str(cta_sentence(contract.cta_style, ctx.language));
        outcome.note("call to action appended to description");
    }

    if char_len(&text) > contract.description_max_chars {
        text = truncate_with_ellipsis(&text, contract.description_max_chars);
        outcome.note("description truncated to char maximum");
    }

    outcome.value = text;
    outcome
}

/// Enforce the description contract for the platform's mode.
pub fn normalize_description(raw: &str, ctx: &RunContext) -> FieldOutcome {
    match ctx.mode {
        PlatformMode::Longform => normalize_meta_description(raw, ctx),
        PlatformMode::Shortform => normalize_shortform_description(raw, ctx),
    }
}
