//! Hook normalizer: a single attention line bounded by `hook_min..=hook_max`
//! characters.

use crate::types::{Language, RunContext};

use super::{char_len, truncate_with_ellipsis, FieldOutcome};

fn generic_hook(ctx: &RunContext) -> String {
    let topic = topic_or_default(ctx);
    match ctx.language {
        Language::Id => format!("Simak sampai habis: {topic} yang jarang dibahas."),
        Language::En => format!("Here is what nobody tells you about {topic}."),
    }
}

/// A hook that is too short is not padded: it is replaced wholesale by a
/// "why this matters now" line built from the topic.
fn relevance_hook(ctx: &RunContext) -> String {
    let topic = topic_or_default(ctx);
    match ctx.language {
        Language::Id => format!("Kenapa {topic} penting sekarang? Ini jawaban singkatnya."),
        Language::En => format!("Why {topic} matters right now, in one short answer."),
    }
}

fn topic_or_default(ctx: &RunContext) -> String {
    if ctx.topic.trim().is_empty() {
        match ctx.language {
            Language::Id => "topik ini".to_string(),
            Language::En => "this topic".to_string(),
        }
    } else {
        ctx.topic.trim().to_string()
    }
}

/// Enforce the hook contract: non-empty, within the char band.
pub fn normalize_hook(raw: &str, ctx: &RunContext) -> FieldOutcome {
    let contract = &ctx.contract;
    let mut outcome = FieldOutcome::unchanged(raw.trim().to_string());

    if outcome.value.is_empty() {
        outcome.value = generic_hook(ctx);
        outcome.note("hook was empty, generic fallback used");
    }

    if char_len(&outcome.value) > contract.hook_max {
        outcome.value = truncate_with_ellipsis(&outcome.value, contract.hook_max);
        outcome.note("hook truncated to contract maximum");
    }

    if char_len(&outcome.value) < contract.hook_min {
        outcome.value = relevance_hook(ctx);
        outcome.note("hook rewritten to meet contract minimum");
        if char_len(&outcome.value) > contract.hook_max {
            outcome.value = truncate_with_ellipsis(&outcome.value, contract.hook_max);
        }
    }

    outcome
}
