//! Guardrail orchestrator.
//!
//! `apply_guardrails` is the one entry point: resolve the run context,
//! sanitize and normalize every field for the platform's mode, score the
//! result, and attach the full diagnostic block. The pipeline repairs and
//! annotates; it never errors on draft content.

use chrono::Utc;
use tracing::{debug, warn};

use crate::contract::{
    blogger_contract, normalize_platform_name, resolve_contract, resolve_mode, ContentLength,
    ContentLengthProfile, PlatformMode,
};
use crate::normalize::article::{normalize_article, ArticleOutcome};
use crate::normalize::audio::normalize_audio;
use crate::normalize::description::normalize_description;
use crate::normalize::hashtags::{normalize_hashtags, HashtagOutcome};
use crate::normalize::hook::normalize_hook;
use crate::normalize::publish_pack::{normalize_publish_pack, PublishPackOutcome, RawPublishPack};
use crate::normalize::scenes::{normalize_scenes, SceneOutcome};
use crate::sanitizer::{merge_forbidden_terms, sanitize_multiline, sanitize_text, Sanitized};
use crate::scoring::{
    compliance_rubric, decide, final_score, performance_confidence, potential_rubric, quality_gate,
    ScoreInputs,
};
use crate::types::{
    BloggerPublishPack, ContractAdjustments, ContractSnapshot, Language, Meta, NormalizedResult,
    QualitySummary, RawDraft, RunContext, RunContextInput,
};

/// Resolve the caller-supplied context into the fixed form every
/// normalizer consumes.
pub fn resolve_context(input: &RunContextInput) -> RunContext {
    let platform = normalize_platform_name(&input.platform);
    let language = Language::detect(input.language.as_deref());
    let tone = input
        .tone
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("informatif")
        .to_string();
    let topic = input.topic.as_deref().unwrap_or("").trim().to_string();
    let length = ContentLengthProfile::resolve(
        input.content_length.unwrap_or(ContentLength::Short),
        input.audio_length_sec,
    );
    RunContext {
        forbidden_terms: merge_forbidden_terms(&platform, &input.constraints_forbidden_words),
        keywords: input
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        cta_texts: input
            .cta_texts
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        contract: resolve_contract(&platform),
        mode: resolve_mode(&platform),
        length,
        language,
        tone,
        topic,
        platform,
    }
}

fn fallback_title(ctx: &RunContext) -> String {
    let topic = if ctx.topic.trim().is_empty() { "topik ini" } else { ctx.topic.trim() };
    match ctx.language {
        Language::Id => format!("Panduan Singkat {topic}"),
        Language::En => format!("A Quick Guide to {topic}"),
    }
}

fn snapshot(ctx: &RunContext) -> ContractSnapshot {
    let c = &ctx.contract;
    let article = (ctx.mode == PlatformMode::Longform).then(blogger_contract);
    ContractSnapshot {
        stage: c.stage,
        supported: c.supported,
        hook_range: [c.hook_min, c.hook_max],
        description_sentences: [c.description_min_sentences, c.description_max_sentences],
        hashtag_range: [c.hashtag_min, c.hashtag_max],
        require_cta_in_description: c.require_cta_in_description,
        cta_style: c.cta_style,
        article_word_range: article.map(|a| [a.min_words, a.max_words]),
        article_target_words: article.map(|a| [a.target_min_words, a.target_max_words]),
        meta_description_chars: article
            .map(|a| [a.meta_description_min_chars, a.meta_description_max_chars]),
    }
}

fn hashtag_warnings(out: &HashtagOutcome, warnings: &mut Vec<String>) {
    if out.removed_count > 0 {
        warnings.push(format!("{} hashtag(s) removed", out.removed_count));
    }
    if out.used_fallback {
        warnings.push("hashtag list replaced with the fallback pool".to_string());
    } else if out.added_count > 0 {
        warnings.push(format!("{} hashtag(s) added from the fallback pool", out.added_count));
    }
    if !out.in_range {
        warnings.push("hashtag count could not reach the contract minimum".to_string());
    }
}

/// Case-insensitive dedup, first occurrence wins.
fn dedupe_warnings(warnings: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for warning in warnings {
        let folded = warning.trim().to_lowercase();
        if folded.is_empty() || seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        out.push(warning);
    }
    out
}

/// Run the full guardrail pipeline over one draft.
pub fn apply_guardrails(draft: &RawDraft, input: &RunContextInput) -> NormalizedResult {
    let ctx = resolve_context(input);
    debug!(platform = %ctx.platform, mode = ?ctx.mode, "applying guardrails");

    let mut warnings: Vec<String> = input.warnings.clone();
    if !ctx.contract.supported {
        warn!(platform = %ctx.platform, "platform not in registry, default contract used");
        warnings.push(format!(
            "platform '{}' is not in the registry, default contract used",
            ctx.platform
        ));
    }

    let mut hits = Sanitized::default();

    let cleaned = sanitize_text(draft.title.as_deref().unwrap_or(""), &ctx.forbidden_terms);
    hits.absorb_counts(&cleaned);
    let title = if cleaned.text.is_empty() {
        warnings.push("title was empty or fully removed, fallback used".to_string());
        fallback_title(&ctx)
    } else {
        cleaned.text
    };

    let cleaned = sanitize_text(draft.hook.as_deref().unwrap_or(""), &ctx.forbidden_terms);
    hits.absorb_counts(&cleaned);
    let hook = normalize_hook(&cleaned.text, &ctx);
    warnings.extend(hook.reasons.iter().cloned());

    let cleaned = sanitize_text(draft.description.as_deref().unwrap_or(""), &ctx.forbidden_terms);
    hits.absorb_counts(&cleaned);
    let description = normalize_description(&cleaned.text, &ctx);
    warnings.extend(description.reasons.iter().cloned());

    let hashtags = normalize_hashtags(&draft.hashtags, &ctx);
    hashtag_warnings(&hashtags, &mut warnings);

    let audio = normalize_audio(draft.audio_recommendation.as_deref().unwrap_or(""), &ctx);
    hits.absorb_counts(&audio.hits);
    warnings.extend(audio.reasons.iter().cloned());

    let cleaned =
        sanitize_multiline(draft.narrator.as_deref().unwrap_or(""), &ctx.forbidden_terms);
    hits.absorb_counts(&cleaned);

    let mut scenes: Option<SceneOutcome> = None;
    let mut article: Option<ArticleOutcome> = None;
    let mut pack: Option<PublishPackOutcome> = None;

    let narrator = match ctx.mode {
        PlatformMode::Shortform => {
            let outcome = normalize_scenes(&cleaned.text, &ctx, &hook.value, &description.value);
            warnings.extend(outcome.reasons.iter().cloned());
            let value = outcome.value.clone();
            scenes = Some(outcome);
            value
        }
        PlatformMode::Longform => {
            let outcome = normalize_article(&cleaned.text, &ctx, &hook.value, &description.value);
            warnings.extend(outcome.reasons.iter().cloned());
            let value = outcome.value.clone();
            article = Some(outcome);

            let raw_pack = RawPublishPack {
                slug: draft.slug.as_deref(),
                internal_links: &draft.internal_links,
                external_references: &draft.external_references,
                featured_snippet: draft.featured_snippet.as_deref(),
                title: Some(&title),
            };
            let outcome = normalize_publish_pack(&raw_pack, &ctx);
            hits.absorb_counts(&outcome.hits);
            warnings.extend(outcome.reasons.iter().cloned());
            pack = Some(outcome);
            value
        }
    };

    let score_inputs = ScoreInputs {
        ctx: &ctx,
        hook: &hook.value,
        hook_adjusted: hook.adjusted,
        description: &description.value,
        description_adjusted: description.adjusted,
        narrator: &narrator,
        hits: &hits,
        hashtags: &hashtags,
        audio: (ctx.mode == PlatformMode::Shortform).then_some(&audio),
        scenes: scenes.as_ref(),
        article: article.as_ref(),
    };
    let (compliance_score, compliance_checks) = compliance_rubric(&score_inputs);
    let (potential_score, performance_checks) = potential_rubric(&score_inputs);

    let decision = decide(
        compliance_score,
        potential_score,
        hits.forbidden_hits,
        hits.scam_hits,
        hits.risky_hits(),
    );
    let score = final_score(compliance_score, potential_score, decision.status);

    let hard_fallback = (ctx.mode == PlatformMode::Shortform && audio.used_fallback)
        || scenes.as_ref().map(|s| s.used_fallback).unwrap_or(false)
        || article.as_ref().map(|a| a.used_fallback).unwrap_or(false);
    let pack_adjusted = pack
        .as_ref()
        .map(|p| {
            p.slug_adjusted
                || p.internal_links_adjusted
                || p.external_references_adjusted
                || p.featured_snippet_adjusted
        })
        .unwrap_or(false);
    let any_fallback = hard_fallback
        || hook.adjusted
        || description.adjusted
        || hashtags.contract_adjusted
        || hashtags.used_fallback
        || scenes.as_ref().map(|s| s.rewritten).unwrap_or(false)
        || pack_adjusted;

    let gate = quality_gate(decision.status, any_fallback, hits.any_hits());
    let confidence = performance_confidence(hard_fallback, any_fallback, hits.combined_hits());

    if hits.any_hits() {
        warnings.push(format!(
            "{} risky or forbidden phrase(s) removed",
            hits.forbidden_hits + hits.spam_hits + hits.scam_hits + hits.suspense_hits
        ));
    }

    let meta = Meta {
        platform: ctx.platform.clone(),
        language: ctx.language,
        tone: ctx.tone.clone(),
        compliance_score,
        compliance_checks,
        performance_potential_score: potential_score,
        performance_checks,
        performance_confidence: confidence,
        ai_decision: decision,
        final_score: score,
        quality_gate: gate,
        platform_contract: snapshot(&ctx),
        platform_contract_adjustments: ContractAdjustments {
            hook_adjusted: hook.adjusted,
            description_adjusted: description.adjusted,
            hashtag_adjusted: hashtags.contract_adjusted,
            hashtag_removed: hashtags.removed_count,
            hashtag_added: hashtags.added_count,
            slug_adjusted: pack.as_ref().map(|p| p.slug_adjusted).unwrap_or(false),
            internal_links_adjusted: pack
                .as_ref()
                .map(|p| p.internal_links_adjusted)
                .unwrap_or(false),
            external_references_adjusted: pack
                .as_ref()
                .map(|p| p.external_references_adjusted)
                .unwrap_or(false),
            featured_snippet_adjusted: pack
                .as_ref()
                .map(|p| p.featured_snippet_adjusted)
                .unwrap_or(false),
        },
        quality_summary: QualitySummary {
            forbidden_hits_removed: hits.forbidden_hits,
            spam_hits_removed: hits.spam_hits,
            scam_hits_removed: hits.scam_hits,
            suspense_hits_removed: hits.suspense_hits,
            removed_hashtags: hashtags.removed_count,
            added_hashtags: hashtags.added_count,
            audio_fallback_applied: ctx.mode == PlatformMode::Shortform && audio.used_fallback,
            narrator_fallback_applied: scenes.as_ref().map(|s| s.used_fallback).unwrap_or(false)
                || article.as_ref().map(|a| a.used_fallback).unwrap_or(false),
            narrator_scene_count: scenes.as_ref().map(|s| s.scene_count).unwrap_or(0),
            narrator_word_count: scenes
                .as_ref()
                .map(|s| s.word_count)
                .or_else(|| article.as_ref().map(|a| a.word_count))
                .unwrap_or(0),
            narrator_heading_count: article.as_ref().map(|a| a.heading_count).unwrap_or(0),
            narrator_faq_count: article.as_ref().map(|a| a.faq_count).unwrap_or(0),
        },
        blogger_publish_pack: pack.map(|p| BloggerPublishPack {
            slug: p.slug,
            internal_links: p.internal_links,
            external_references: p.external_references,
            featured_snippet: p.featured_snippet,
        }),
        warnings: dedupe_warnings(warnings),
        evaluated_at: Utc::now(),
    };

    NormalizedResult {
        title,
        hook: hook.value,
        narrator,
        description: description.value,
        audio_recommendation: audio.value,
        hashtags: hashtags.hashtags,
        meta,
    }
}
