//! Scoring engine: two independent weighted rubrics plus the decision
//! policy.
//!
//! The compliance rubric measures contract/safety adherence; the potential
//! rubric is a heuristic estimate of engagement likelihood. Each sums to
//! exactly 100 points. The decision rules are strict and ordered, not a
//! tuning surface: safety first, then thresholds, then GO.

use lazy_static::lazy_static;
use regex::Regex;

use crate::contract::{blogger_contract, PlatformMode};
use crate::normalize::article::ArticleOutcome;
use crate::normalize::audio::AudioOutcome;
use crate::normalize::hashtags::HashtagOutcome;
use crate::normalize::scenes::SceneOutcome;
use crate::normalize::CTA_PATTERN;
use crate::sanitizer::Sanitized;
use crate::types::{
    Check, CheckStatus, Confidence, Decision, DecisionStatus, QualityGate, RunContext,
};

lazy_static! {
    /// Curiosity/urgency trigger words that historically lift hook
    /// performance.
    static ref TRIGGER_WORDS: Regex = Regex::new(
        r"(?i)\b(kenapa|mengapa|rahasia|terbukti|kesalahan|stop|wajib|why|how|proven|mistake|secret|before)\b"
    )
    .unwrap();
}

/// Everything the rubrics need, gathered by the pipeline after
/// normalization.
pub struct ScoreInputs<'a> {
    pub ctx: &'a RunContext,
    pub hook: &'a str,
    pub hook_adjusted: bool,
    pub description: &'a str,
    pub description_adjusted: bool,
    pub narrator: &'a str,
    /// Aggregated sanitizer counts across every field.
    pub hits: &'a Sanitized,
    pub hashtags: &'a HashtagOutcome,
    pub audio: Option<&'a AudioOutcome>,
    pub scenes: Option<&'a SceneOutcome>,
    pub article: Option<&'a ArticleOutcome>,
}

fn sum_checks(checks: &[Check]) -> u32 {
    checks.iter().map(|c| c.awarded).sum()
}

fn safety_check(hits: &Sanitized) -> Check {
    let combined = hits.combined_hits();
    if hits.scam_hits > 0 {
        Check::new(
            "safety",
            "Safety compliance",
            25,
            0,
            CheckStatus::Block,
            format!("{} scam signal(s) removed", hits.scam_hits),
        )
    } else if combined == 0 {
        Check::new("safety", "Safety compliance", 25, 25, CheckStatus::Pass, "no risky language")
    } else if combined <= 2 {
        Check::new(
            "safety",
            "Safety compliance",
            25,
            15,
            CheckStatus::Fallback,
            format!("{combined} risky term(s) auto-cleaned"),
        )
    } else {
        Check::new(
            "safety",
            "Safety compliance",
            25,
            8,
            CheckStatus::Retry,
            format!("{combined} risky term(s) auto-cleaned"),
        )
    }
}

fn hashtag_check(id: &str, label: &str, weight: u32, hashtags: &HashtagOutcome) -> Check {
    let clean = hashtags.removed_count == 0 && hashtags.added_count == 0;
    if hashtags.in_range && clean {
        Check::new(id, label, weight, weight, CheckStatus::Pass, "in range, unmodified")
    } else if hashtags.in_range {
        Check::new(
            id,
            label,
            weight,
            weight * 3 / 5,
            CheckStatus::Fallback,
            format!(
                "repaired into range ({} removed, {} added)",
                hashtags.removed_count, hashtags.added_count
            ),
        )
    } else {
        Check::new(id, label, weight, weight / 4, CheckStatus::Retry, "count outside contract band")
    }
}

/// Compliance rubric for short-form platforms. Weights: 25/30/25/20.
fn compliance_shortform(inputs: &ScoreInputs<'_>) -> Vec<Check> {
    let mut checks = Vec::with_capacity(4);

    let audio_fallback = inputs.audio.map(|a| a.used_fallback).unwrap_or(false);
    checks.push(if audio_fallback {
        Check::new("audio", "Audio compliance", 25, 10, CheckStatus::Fallback, "audio template applied")
    } else {
        Check::new("audio", "Audio compliance", 25, 25, CheckStatus::Pass, "audio block valid")
    });

    let (script_fallback, script_rewritten) = inputs
        .scenes
        .map(|s| (s.used_fallback, s.rewritten))
        .unwrap_or((true, true));
    checks.push(if !script_fallback && !script_rewritten {
        Check::new("script", "Script compliance", 30, 30, CheckStatus::Pass, "script valid as supplied")
    } else if !script_fallback {
        Check::new("script", "Script compliance", 30, 20, CheckStatus::Fallback, "scene text repaired")
    } else {
        Check::new("script", "Script compliance", 30, 12, CheckStatus::Retry, "script regenerated")
    });

    checks.push(safety_check(inputs.hits));
    checks.push(hashtag_check("hashtags", "Hashtag compliance", 20, inputs.hashtags));
    checks
}

/// Compliance rubric for the blog family. Weights: 40/20/25/15.
fn compliance_longform(inputs: &ScoreInputs<'_>) -> Vec<Check> {
    let mut checks = Vec::with_capacity(4);

    let article_fallback = inputs.article.map(|a| a.used_fallback).unwrap_or(true);
    checks.push(if !article_fallback {
        Check::new("article", "Article compliance", 40, 40, CheckStatus::Pass, "article within word contract")
    } else {
        Check::new("article", "Article compliance", 40, 24, CheckStatus::Fallback, "article synthesized")
    });

    checks.push(if !inputs.description_adjusted {
        Check::new("meta_description", "Meta description compliance", 20, 20, CheckStatus::Pass, "within char band")
    } else {
        Check::new(
            "meta_description",
            "Meta description compliance",
            20,
            12,
            CheckStatus::Fallback,
            "repaired into char band",
        )
    });

    checks.push(safety_check(inputs.hits));
    checks.push(hashtag_check("labels", "Label compliance", 15, inputs.hashtags));
    checks
}

fn hook_strength(inputs: &ScoreInputs<'_>) -> Check {
    let base = if inputs.hook_adjusted { 14 } else { 22 };
    let bonus =
        if TRIGGER_WORDS.is_match(inputs.hook) || inputs.hook.contains('?') { 8 } else { 0 };
    let note = match (inputs.hook_adjusted, bonus > 0) {
        (false, true) => "strong length with trigger phrasing",
        (false, false) => "good length, no trigger phrasing",
        (true, true) => "rewritten, trigger phrasing present",
        (true, false) => "rewritten by contract repair",
    };
    Check::new("hook", "Hook strength", 30, base + bonus, CheckStatus::Pass, note)
}

fn trend_fit(inputs: &ScoreInputs<'_>) -> Check {
    let base = if inputs.hashtags.in_range { 12 } else { 5 };
    let bonus = 2 * inputs.ctx.keywords.len().min(4) as u32;
    Check::new(
        "trend",
        "Trend fit",
        20,
        base + bonus,
        CheckStatus::Pass,
        format!("{} keyword(s) supplied", inputs.ctx.keywords.len()),
    )
}

fn cta_clarity(inputs: &ScoreInputs<'_>) -> Check {
    let explicit = inputs
        .ctx
        .cta_texts
        .iter()
        .any(|c| c.trim().chars().count() >= 8);
    let (awarded, note) = if explicit {
        (10, "explicit CTA text supplied")
    } else if CTA_PATTERN.is_match(inputs.description) || CTA_PATTERN.is_match(inputs.narrator) {
        (8, "CTA detected in content")
    } else {
        (4, "no clear CTA")
    };
    Check::new("cta", "CTA clarity", 10, awarded, CheckStatus::Pass, note)
}

/// Potential rubric for short-form platforms. Weights: 30/25/20/15/10.
fn potential_shortform(inputs: &ScoreInputs<'_>) -> Vec<Check> {
    let mut checks = Vec::with_capacity(5);
    checks.push(hook_strength(inputs));

    let (count_ok, clean) = inputs
        .scenes
        .map(|s| (s.scene_count == inputs.ctx.length.scene_count, !s.used_fallback && !s.rewritten))
        .unwrap_or((false, false));
    let awarded = if count_ok { 15 } else { 6 } + if clean { 10 } else { 0 };
    checks.push(Check::new(
        "retention",
        "Script retention readiness",
        25,
        awarded,
        CheckStatus::Pass,
        if clean { "scene structure intact" } else { "scene structure repaired" },
    ));

    checks.push(trend_fit(inputs));

    let target = inputs.ctx.length.total_sec;
    let actual = inputs.audio.map(|a| a.length_sec).unwrap_or(target);
    let delta = target.abs_diff(actual);
    let awarded = if delta <= 5 { 15 } else if delta <= 15 { 10 } else { 6 };
    checks.push(Check::new(
        "audio_fit",
        "Audio-visual fit",
        15,
        awarded,
        CheckStatus::Pass,
        format!("audio {actual}s vs target {target}s"),
    ));

    checks.push(cta_clarity(inputs));
    checks
}

/// Potential rubric for the blog family. Weights: 30/25/20/15/10.
fn potential_longform(inputs: &ScoreInputs<'_>) -> Vec<Check> {
    let contract = blogger_contract();
    let mut checks = Vec::with_capacity(5);
    checks.push(hook_strength(inputs));

    let words = inputs.article.map(|a| a.word_count).unwrap_or(0);
    let awarded = if (contract.target_min_words..=contract.target_max_words).contains(&words) {
        25
    } else if (contract.min_words..=contract.max_words).contains(&words) {
        17
    } else {
        8
    };
    checks.push(Check::new(
        "depth",
        "Article depth readiness",
        25,
        awarded,
        CheckStatus::Pass,
        format!("{words} words vs target {}-{}", contract.target_min_words, contract.target_max_words),
    ));

    checks.push(trend_fit(inputs));

    let (headings, faqs) = inputs
        .article
        .map(|a| (a.heading_count, a.faq_count))
        .unwrap_or((0, 0));
    let headings_ok = headings >= contract.min_headings;
    let faqs_ok = faqs >= contract.min_faq_items;
    let awarded = match (headings_ok, faqs_ok) {
        (true, true) => 15,
        (true, false) | (false, true) => 9,
        (false, false) => 4,
    };
    checks.push(Check::new(
        "readability",
        "Readability structure",
        15,
        awarded,
        CheckStatus::Pass,
        format!("{headings} heading(s), {faqs} FAQ item(s)"),
    ));

    checks.push(cta_clarity(inputs));
    checks
}

/// Run the compliance rubric for the context's platform mode.
pub fn compliance_rubric(inputs: &ScoreInputs<'_>) -> (u32, Vec<Check>) {
    let checks = match inputs.ctx.mode {
        PlatformMode::Shortform => compliance_shortform(inputs),
        PlatformMode::Longform => compliance_longform(inputs),
    };
    (sum_checks(&checks), checks)
}

/// Run the performance-potential rubric for the context's platform mode.
pub fn potential_rubric(inputs: &ScoreInputs<'_>) -> (u32, Vec<Check>) {
    let checks = match inputs.ctx.mode {
        PlatformMode::Shortform => potential_shortform(inputs),
        PlatformMode::Longform => potential_longform(inputs),
    };
    (sum_checks(&checks), checks)
}

/// Map scores plus safety-hit counts to the publishing decision.
///
/// Rule order, first match wins: safety block, then score thresholds,
/// then GO.
pub fn decide(
    compliance: u32,
    potential: u32,
    forbidden_hits: usize,
    scam_hits: usize,
    risky_hits: usize,
) -> Decision {
    if scam_hits > 0 || forbidden_hits >= 3 || risky_hits >= 6 {
        return Decision {
            status: DecisionStatus::Block,
            reasons: vec!["safety risk detected".to_string()],
        };
    }
    let mut reasons = Vec::new();
    if compliance < 85 {
        reasons.push(format!("compliance score {compliance} below 85"));
    }
    if potential < 60 {
        reasons.push(format!("performance potential {potential} below 60"));
    }
    if !reasons.is_empty() {
        return Decision { status: DecisionStatus::Revise, reasons };
    }
    Decision {
        status: DecisionStatus::Go,
        reasons: vec!["all thresholds met".to_string()],
    }
}

/// Blend both scores and cap by decision: 49 on BLOCK, 79 on REVISE.
pub fn final_score(compliance: u32, potential: u32, status: DecisionStatus) -> f64 {
    let base = f64::from(compliance) * 0.6 + f64::from(potential) * 0.4;
    let capped = match status {
        DecisionStatus::Block => base.min(49.0),
        DecisionStatus::Revise => base.min(79.0),
        DecisionStatus::Go => base,
    };
    (capped * 10.0).round() / 10.0
}

/// Legacy coarse gate label; display only.
pub fn quality_gate(status: DecisionStatus, any_fallback: bool, any_hits: bool) -> QualityGate {
    match status {
        DecisionStatus::Block => QualityGate::Block,
        DecisionStatus::Revise => QualityGate::Retry,
        DecisionStatus::Go if any_fallback || any_hits => QualityGate::Fallback,
        DecisionStatus::Go => QualityGate::Pass,
    }
}

/// How much to trust the potential estimate.
pub fn performance_confidence(
    hard_fallback: bool,
    any_fallback: bool,
    combined_hits: usize,
) -> Confidence {
    if hard_fallback || combined_hits > 4 {
        Confidence::Low
    } else if any_fallback || combined_hits > 0 {
        Confidence::Medium
    } else {
        Confidence::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{resolve_contract, resolve_mode, ContentLength, ContentLengthProfile};
    use crate::types::Language;

    fn ctx(platform: &str) -> RunContext {
        RunContext {
            platform: platform.to_string(),
            language: Language::Id,
            tone: "santai".to_string(),
            topic: "sepatu kulit".to_string(),
            forbidden_terms: vec![],
            keywords: vec!["sepatu".to_string(), "kulit".to_string()],
            cta_texts: vec![],
            contract: resolve_contract(platform),
            length: ContentLengthProfile::resolve(ContentLength::Short, None),
            mode: resolve_mode(platform),
        }
    }

    fn clean_hashtags() -> HashtagOutcome {
        HashtagOutcome {
            hashtags: vec!["#a1".into(), "#b2".into(), "#c3".into(), "#d4".into()],
            min_count: 4,
            max_count: 8,
            in_range: true,
            ..HashtagOutcome::default()
        }
    }

    fn clean_inputs<'a>(
        ctx: &'a RunContext,
        hashtags: &'a HashtagOutcome,
        hits: &'a Sanitized,
        audio: &'a AudioOutcome,
        scenes: &'a SceneOutcome,
    ) -> ScoreInputs<'a> {
        ScoreInputs {
            ctx,
            hook: "Kenapa sepatu kulitmu cepat rusak?",
            hook_adjusted: false,
            description: "Rawat rutin. Simpan video ini.",
            description_adjusted: false,
            narrator: "Scene 1 (0-10s): Teks.",
            hits,
            hashtags,
            audio: Some(audio),
            scenes: Some(scenes),
            article: None,
        }
    }

    #[test]
    fn test_rubric_weights_sum_to_100() {
        let ctx_s = ctx("tiktok");
        let hashtags = clean_hashtags();
        let hits = Sanitized::default();
        let audio = AudioOutcome { length_sec: 30, ..AudioOutcome::default() };
        let scenes = SceneOutcome { scene_count: 3, ..SceneOutcome::default() };
        let inputs = clean_inputs(&ctx_s, &hashtags, &hits, &audio, &scenes);

        let (_, compliance) = compliance_rubric(&inputs);
        assert_eq!(compliance.iter().map(|c| c.weight).sum::<u32>(), 100);
        let (_, potential) = potential_rubric(&inputs);
        assert_eq!(potential.iter().map(|c| c.weight).sum::<u32>(), 100);

        let ctx_l = ctx("blogger");
        let article = ArticleOutcome { word_count: 1500, heading_count: 7, faq_count: 3, ..ArticleOutcome::default() };
        let inputs = ScoreInputs { ctx: &ctx_l, article: Some(&article), audio: None, scenes: None, ..clean_inputs(&ctx_s, &hashtags, &hits, &audio, &scenes) };
        let (_, compliance) = compliance_rubric(&inputs);
        assert_eq!(compliance.iter().map(|c| c.weight).sum::<u32>(), 100);
        let (_, potential) = potential_rubric(&inputs);
        assert_eq!(potential.iter().map(|c| c.weight).sum::<u32>(), 100);
    }

    #[test]
    fn test_clean_draft_scores_full_compliance() {
        let ctx = ctx("tiktok");
        let hashtags = clean_hashtags();
        let hits = Sanitized::default();
        let audio = AudioOutcome { length_sec: 30, ..AudioOutcome::default() };
        let scenes = SceneOutcome { scene_count: 3, ..SceneOutcome::default() };
        let inputs = clean_inputs(&ctx, &hashtags, &hits, &audio, &scenes);

        let (score, _) = compliance_rubric(&inputs);
        assert_eq!(score, 100);
        let (potential, _) = potential_rubric(&inputs);
        assert!(potential >= 60);
    }

    #[test]
    fn test_scam_hit_floors_safety() {
        let hits = Sanitized { scam_hits: 1, ..Sanitized::default() };
        let check = safety_check(&hits);
        assert_eq!(check.awarded, 0);
        assert_eq!(check.status, CheckStatus::Block);
    }

    #[test]
    fn test_decision_rule_order() {
        // Scam always blocks, even with perfect scores.
        assert_eq!(decide(100, 100, 0, 1, 0).status, DecisionStatus::Block);
        assert_eq!(decide(100, 100, 3, 0, 0).status, DecisionStatus::Block);
        assert_eq!(decide(100, 100, 0, 0, 6).status, DecisionStatus::Block);
        // Threshold failures revise.
        let revise = decide(84, 100, 0, 0, 0);
        assert_eq!(revise.status, DecisionStatus::Revise);
        assert!(revise.reasons[0].contains("compliance"));
        assert_eq!(decide(100, 59, 0, 0, 0).status, DecisionStatus::Revise);
        // Both thresholds met.
        assert_eq!(decide(85, 60, 0, 0, 0).status, DecisionStatus::Go);
    }

    #[test]
    fn test_final_score_caps() {
        assert_eq!(final_score(100, 100, DecisionStatus::Block), 49.0);
        assert_eq!(final_score(100, 100, DecisionStatus::Revise), 79.0);
        assert_eq!(final_score(100, 90, DecisionStatus::Go), 96.0);
        // One-decimal rounding.
        assert_eq!(final_score(83, 61, DecisionStatus::Revise), 74.2);
    }

    #[test]
    fn test_quality_gate_labels() {
        assert_eq!(quality_gate(DecisionStatus::Block, false, false), QualityGate::Block);
        assert_eq!(quality_gate(DecisionStatus::Revise, false, false), QualityGate::Retry);
        assert_eq!(quality_gate(DecisionStatus::Go, true, false), QualityGate::Fallback);
        assert_eq!(quality_gate(DecisionStatus::Go, false, true), QualityGate::Fallback);
        assert_eq!(quality_gate(DecisionStatus::Go, false, false), QualityGate::Pass);
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(performance_confidence(false, false, 0), Confidence::High);
        assert_eq!(performance_confidence(false, true, 0), Confidence::Medium);
        assert_eq!(performance_confidence(false, false, 2), Confidence::Medium);
        assert_eq!(performance_confidence(true, true, 0), Confidence::Low);
        assert_eq!(performance_confidence(false, false, 5), Confidence::Low);
    }
}
