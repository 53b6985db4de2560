//! Audio-cue normalizer.
//!
//! Short-form platforms carry a strict five-line block
//! (`Style:/Mood:/Genre:/Suggestion:/Length:`). The blog family carries no
//! audio at all. Repair is a bounded two-pass loop: validate, sanitize field
//! by field, re-validate, hard-fallback if still broken.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::contract::PlatformMode;
use crate::sanitizer::{sanitize_text, Sanitized};
use crate::types::{Language, RunContext};

lazy_static! {
    static ref FIELD_LINE: Regex =
        Regex::new(r"(?i)^(style|mood|genre|suggestion|length)\s*:\s*(.+)$").unwrap();

    static ref LENGTH_VALUE: Regex = Regex::new(r"(?i)\b(\d+)\s*s(ec(ond)?s?)?\b").unwrap();

    /// Dialog/CTA phrasing that must not leak into audio metadata.
    static ref DIALOG_LEAK: Regex = Regex::new(
        r"(?i)(follow|subscribe|klik|click|link\s*(di\s*)?bio|comment|komen|share|bagikan|for\s+(the\s+)?full\s+review|review\s+lengkap)"
    )
    .unwrap();
}

const MAX_SUGGESTION_WORDS: usize = 45;

#[derive(Debug, Clone)]
struct AudioFields {
    style: String,
    mood: String,
    genre: String,
    suggestion: String,
    length: String,
}

impl AudioFields {
    fn render(&self) -> String {
        format!(
            "Style: {}\nMood: {}\nGenre: {}\nSuggestion: {}\nLength: {}",
            self.style, self.mood, self.genre, self.suggestion, self.length
        )
    }
}

/// Result of audio normalization.
#[derive(Debug, Clone, Default)]
pub struct AudioOutcome {
    pub value: String,
    pub length_sec: u32,
    pub used_fallback: bool,
    /// Whether the raw block already satisfied the schema before any repair.
    pub contract_valid: bool,
    pub reasons: Vec<String>,
    pub hits: Sanitized,
}

fn parse(raw: &str) -> Option<AudioFields> {
    let mut style = None;
    let mut mood = None;
    let mut genre = None;
    let mut suggestion = None;
    let mut length = None;

    for line in raw.lines() {
        if let Some(caps) = FIELD_LINE.captures(line.trim()) {
            let value = caps[2].trim().to_string();
            let slot = match caps[1].to_lowercase().as_str() {
                "style" => &mut style,
                "mood" => &mut mood,
                "genre" => &mut genre,
                "suggestion" => &mut suggestion,
                _ => &mut length,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
    }

    Some(AudioFields {
        style: style?,
        mood: mood?,
        genre: genre?,
        suggestion: suggestion?,
        length: length?,
    })
}

fn parse_length_sec(value: &str) -> Option<u32> {
    let caps = LENGTH_VALUE.captures(value)?;
    let sec: u32 = caps[1].parse().ok()?;
    Some(sec.clamp(5, 180))
}

/// Validate the five fields; returns the parsed length on success and the
/// first violation otherwise.
fn validate(fields: &AudioFields) -> Result<u32, String> {
    let named = [
        ("Style", &fields.style),
        ("Mood", &fields.mood),
        ("Genre", &fields.genre),
        ("Suggestion", &fields.suggestion),
        ("Length", &fields.length),
    ];
    for (name, value) in named {
        if value.trim().is_empty() {
            return Err(format!("{name} field is empty"));
        }
        if value.contains('#') {
            return Err(format!("{name} field contains hashtag leakage"));
        }
        if DIALOG_LEAK.is_match(value) {
            return Err(format!("{name} field contains dialog or CTA leakage"));
        }
    }
    if fields.suggestion.split_whitespace().count() > MAX_SUGGESTION_WORDS {
        return Err("Suggestion exceeds word limit".to_string());
    }
    parse_length_sec(&fields.length).ok_or_else(|| "Length is not a plausible duration".to_string())
}

fn fallback_fields(ctx: &RunContext) -> AudioFields {
    let topic = if ctx.topic.trim().is_empty() { "tema konten" } else { ctx.topic.trim() };
    let tone = if ctx.tone.trim().is_empty() { "netral" } else { ctx.tone.trim() };
    let (mood, suggestion) = match ctx.language {
        Language::Id => (
            format!("{tone}, optimis"),
            format!("Musik latar ringan yang mengikuti tempo narasi tentang {topic}"),
        ),
        Language::En => (
            format!("{tone}, upbeat"),
            format!("Light background track that follows the narration pace for {topic}"),
        ),
    };
    AudioFields {
        style: "Upbeat instrumental".to_string(),
        mood,
        genre: "Pop instrumental".to_string(),
        suggestion,
        length: format!("{}s", ctx.length.total_sec),
    }
}

/// Normalize the audio recommendation block.
pub fn normalize_audio(raw: &str, ctx: &RunContext) -> AudioOutcome {
    if ctx.mode == PlatformMode::Longform {
        let mut outcome = AudioOutcome { contract_valid: true, ..AudioOutcome::default() };
        if !raw.trim().is_empty() {
            outcome.reasons.push("audio suppressed for the blog platform".to_string());
        }
        return outcome;
    }

    let mut outcome = AudioOutcome::default();

    // Pass 1: structural parse and validation of the raw block.
    let mut fields = match parse(raw) {
        Some(fields) => match validate(&fields) {
            Ok(_) => {
                outcome.contract_valid = true;
                fields
            }
            Err(reason) => {
                outcome.reasons.push(format!("audio block rejected: {reason}"));
                outcome.used_fallback = true;
                fallback_fields(ctx)
            }
        },
        None => {
            outcome
                .reasons
                .push("audio block missing required fields, template used".to_string());
            outcome.used_fallback = true;
            fallback_fields(ctx)
        }
    };

    // Pass 2: sanitize each field; patch broken fields from the template.
    if !outcome.used_fallback {
        let template = fallback_fields(ctx);
        let mut patched = false;
        for (slot, fallback) in [
            (&mut fields.style, &template.style),
            (&mut fields.mood, &template.mood),
            (&mut fields.genre, &template.genre),
            (&mut fields.suggestion, &template.suggestion),
            (&mut fields.length, &template.length),
        ] {
            let cleaned = sanitize_text(slot, &ctx.forbidden_terms);
            outcome.hits.absorb_counts(&cleaned);
            if cleaned.text.is_empty() {
                *slot = fallback.clone();
                patched = true;
            } else if cleaned.text != *slot {
                *slot = cleaned.text;
            }
        }
        if patched {
            outcome.reasons.push("audio fields repaired after sanitization".to_string());
        }

        // Re-validate; a block that is still broken falls back entirely.
        if validate(&fields).is_err() {
            warn!(platform = %ctx.platform, "audio block unrecoverable, using template");
            fields = fallback_fields(ctx);
            outcome.used_fallback = true;
            outcome.reasons.push("audio block replaced by template after repair".to_string());
        }
    }

    // Canonical length comes from the validated fields; the template always
    // validates.
    outcome.length_sec = validate(&fields).unwrap_or(ctx.length.total_sec);
    outcome.value = fields.render();
    outcome
}
