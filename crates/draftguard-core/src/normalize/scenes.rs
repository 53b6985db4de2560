//! Scene-script normalizer (short-form narrator mode).
//!
//! Target shape: exactly `scene_count` lines of
//! `Scene N (start-end s): text`, with contiguous integer ranges starting
//! at 0 and summing to the profile's total duration.
//!
//! Structure and meaning are checked separately: a script can parse cleanly
//! and still carry meta-instructions ("open with hook: ...") instead of
//! narration. Instruction phrasing is stripped per scene; scenes that remain
//! instruction-like are replaced individually, and a script that cannot be
//! saved scene by scene is regenerated from scratch.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::types::{Language, RunContext};

use super::{char_len, split_sentences};

lazy_static! {
    static ref SCENE_LINE: Regex =
        Regex::new(r"(?i)^scene\s*(\d+)\s*\(\s*(\d+)\s*-\s*(\d+)\s*s?\s*\)\s*:\s*(.*)$").unwrap();

    /// Meta-instruction lead-ins that generators leave in scene text.
    static ref INSTRUCTION_PREFIX: Regex = Regex::new(
        r"(?i)^(buka dengan hook|open(ing)? with (a )?hook|state (the )?pain ?point|sebutkan (masalah|pain ?point)|close with (a )?cta|tutup dengan cta|hook|cta|intro|outro|pain ?point)\s*[:\-]\s*"
    )
    .unwrap();

    /// Whole-line instruction shapes: the scene still describes what to say
    /// rather than saying it.
    static ref INSTRUCTION_LINES: Vec<Regex> = vec![
        Regex::new(
            r"(?i)^(jelaskan|sebutkan|tampilkan|tuliskan|gunakan|explain|describe|mention|show|write|insert|add|use)\b.*\b(hook|cta|benefit|masalah|pain|narasi|script|point)\b"
        )
        .unwrap(),
        Regex::new(r"(?i)^\[.*\]$").unwrap(),
        Regex::new(r"(?i)^(voice ?over|narrator note|catatan narasi)\b").unwrap(),
    ];
}

const MIN_SCENE_CHARS: usize = 12;

/// Result of scene normalization.
#[derive(Debug, Clone, Default)]
pub struct SceneOutcome {
    pub value: String,
    /// The whole script was regenerated.
    pub used_fallback: bool,
    /// At least one scene's text was stripped or replaced.
    pub rewritten: bool,
    pub reasons: Vec<String>,
    pub scene_count: usize,
    pub word_count: usize,
}

/// Split `total` seconds into `count` contiguous integer ranges from 0.
///
/// Near-equal chunks; the remainder goes to the earliest scenes so the
/// ranges are always exactly exhaustive.
pub fn scene_ranges(count: usize, total: u32) -> Vec<(u32, u32)> {
    if count == 0 {
        return Vec::new();
    }
    let base = total / count as u32;
    let remainder = total % count as u32;
    let mut ranges = Vec::with_capacity(count);
    let mut cursor = 0;
    for index in 0..count {
        let len = base + u32::from((index as u32) < remainder);
        ranges.push((cursor, cursor + len));
        cursor += len;
    }
    ranges
}

fn strip_instruction_prefix(text: &str) -> (String, bool) {
    let stripped = INSTRUCTION_PREFIX.replace(text.trim(), "");
    let changed = stripped != text.trim();
    (stripped.trim().to_string(), changed)
}

fn is_instruction(text: &str) -> bool {
    INSTRUCTION_LINES.iter().any(|p| p.is_match(text))
}

fn semantic_ok(text: &str) -> bool {
    !text.is_empty() && char_len(text) >= MIN_SCENE_CHARS && !is_instruction(text)
}

/// Deterministic replacement line for a scene position.
fn fallback_line(
    position: usize,
    count: usize,
    ctx: &RunContext,
    hook: &str,
    description_sentences: &[String],
) -> String {
    let topic = if ctx.topic.trim().is_empty() { "topik ini" } else { ctx.topic.trim() };

    if position == 0 {
        if semantic_ok(hook) {
            return hook.to_string();
        }
        return match ctx.language {
            Language::Id => format!("Kenapa {topic} layak kamu perhatikan hari ini?"),
            Language::En => format!("Here is why {topic} deserves your attention today."),
        };
    }

    if position + 1 == count {
        if let Some(cta) = ctx.cta_texts.iter().find(|c| semantic_ok(c)) {
            return cta.clone();
        }
        return match ctx.language {
            Language::Id => "Simpan video ini dan tulis pendapatmu di kolom komentar.".to_string(),
            Language::En => "Save this video and tell me what you think in the comments.".to_string(),
        };
    }

    if position == 1 {
        return match ctx.language {
            Language::Id => {
                format!("Banyak orang mengalami masalah yang sama soal {topic} tanpa sadar penyebabnya.")
            }
            Language::En => {
                format!("Most people run into the same problem with {topic} without knowing why.")
            }
        };
    }

    // Middle scenes cycle through the description's sentences.
    let usable: Vec<&String> =
        description_sentences.iter().filter(|s| semantic_ok(s)).collect();
    if !usable.is_empty() {
        return usable[(position - 2) % usable.len()].clone();
    }
    match ctx.language {
        Language::Id => format!("Langkah ke-{} untuk {topic} dimulai dari hal paling sederhana.", position),
        Language::En => format!("Step {} for {topic} starts with the simplest habit.", position),
    }
}

fn render(texts: &[String], ranges: &[(u32, u32)]) -> String {
    texts
        .iter()
        .zip(ranges)
        .enumerate()
        .map(|(i, (text, (start, end)))| format!("Scene {} ({}-{}s): {}", i + 1, start, end, text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a raw script into per-scene texts, if structurally valid.
fn parse_structure(raw: &str, expected: usize) -> Option<Vec<String>> {
    let lines: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() != expected {
        return None;
    }
    let mut texts = Vec::with_capacity(expected);
    for (position, line) in lines.iter().enumerate() {
        let caps = SCENE_LINE.captures(line)?;
        let index: usize = caps[1].parse().ok()?;
        let start: u32 = caps[2].parse().ok()?;
        let end: u32 = caps[3].parse().ok()?;
        let text = caps[4].trim().to_string();
        if index != position + 1 || end <= start || text.is_empty() {
            return None;
        }
        texts.push(text);
    }
    Some(texts)
}

/// Normalize a narrator script for a short-form platform.
///
/// The hook and description must already be normalized; they seed the
/// per-position fallback lines.
pub fn normalize_scenes(raw: &str, ctx: &RunContext, hook: &str, description: &str) -> SceneOutcome {
    let count = ctx.length.scene_count;
    let ranges = scene_ranges(count, ctx.length.total_sec);
    let description_sentences = split_sentences(description);
    let mut outcome = SceneOutcome { scene_count: count, ..SceneOutcome::default() };

    let regenerate = |outcome: &mut SceneOutcome, reason: &str| {
        warn!(platform = %ctx.platform, reason, "regenerating scene script");
        outcome.used_fallback = true;
        outcome.rewritten = true;
        outcome.reasons.push(reason.to_string());
        (0..count)
            .map(|i| fallback_line(i, count, ctx, hook, &description_sentences))
            .collect::<Vec<_>>()
    };

    let texts = match parse_structure(raw, count) {
        Some(parsed) => {
            // Structure is fine; scrub the meaning scene by scene.
            let mut repaired = Vec::with_capacity(count);
            let mut all_ok = true;
            for (position, text) in parsed.into_iter().enumerate() {
                let (stripped, had_prefix) = strip_instruction_prefix(&text);
                if semantic_ok(&stripped) {
                    if had_prefix {
                        outcome.rewritten = true;
                        outcome
                            .reasons
                            .push(format!("scene {} instruction prefix stripped", position + 1));
                    }
                    repaired.push(stripped);
                    continue;
                }
                let replacement =
                    fallback_line(position, count, ctx, hook, &description_sentences);
                if !semantic_ok(&replacement) {
                    all_ok = false;
                    break;
                }
                outcome.rewritten = true;
                outcome
                    .reasons
                    .push(format!("scene {} text replaced with fallback", position + 1));
                repaired.push(replacement);
            }
            if all_ok {
                repaired
            } else {
                regenerate(&mut outcome, "scene text unrecoverable after per-scene repair")
            }
        }
        None => regenerate(&mut outcome, "scene script structurally invalid"),
    };

    outcome.word_count = texts.iter().map(|t| t.split_whitespace().count()).sum();
    outcome.value = render(&texts, &ranges);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{resolve_contract, resolve_mode, ContentLength, ContentLengthProfile};

    fn ctx(length: ContentLength) -> RunContext {
        RunContext {
            platform: "tiktok".to_string(),
            language: Language::Id,
            tone: "santai".to_string(),
            topic: "merawat sepatu kulit".to_string(),
            forbidden_terms: vec![],
            keywords: vec![],
            cta_texts: vec![],
            contract: resolve_contract("tiktok"),
            length: ContentLengthProfile::resolve(length, None),
            mode: resolve_mode("tiktok"),
        }
    }

    const HOOK: &str = "Tiga kesalahan merawat sepatu kulit";
    const DESC: &str = "Sepatu kulit cepat rusak kalau salah rawat. Bahan kulit butuh pelembap khusus. Simpan di tempat kering.";

    fn parse_back(value: &str) -> Vec<(usize, u32, u32, String)> {
        value
            .lines()
            .map(|l| {
                let caps = SCENE_LINE.captures(l).expect("line should parse");
                (
                    caps[1].parse().unwrap(),
                    caps[2].parse().unwrap(),
                    caps[3].parse().unwrap(),
                    caps[4].to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_ranges_are_contiguous_and_exhaustive() {
        for (count, total) in [(3usize, 30u32), (5, 45), (7, 60), (3, 31), (7, 100)] {
            let ranges = scene_ranges(count, total);
            assert_eq!(ranges.len(), count);
            assert_eq!(ranges[0].0, 0);
            for w in ranges.windows(2) {
                assert_eq!(w[0].1, w[1].0);
            }
            assert_eq!(ranges.last().unwrap().1, total);
        }
    }

    #[test]
    fn test_valid_script_keeps_text_and_canonical_ranges() {
        let ctx = ctx(ContentLength::Short);
        let raw = "Scene 1 (0-10s): Sepatu kulit kamu kusam? Ini sebabnya.\nScene 2 (10-20s): Bahan kulit butuh pelembap, bukan cuma disikat.\nScene 3 (20-30s): Mulai dari lap kering setiap habis dipakai.";
        let out = normalize_scenes(raw, &ctx, HOOK, DESC);
        assert!(!out.used_fallback);
        assert!(!out.rewritten);
        let scenes = parse_back(&out.value);
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[2].2, 30);
        assert!(scenes[0].3.contains("kusam"));
    }

    #[test]
    fn test_wrong_count_regenerates_everything() {
        let ctx = ctx(ContentLength::Medium);
        let raw = "Scene 1 (0-15s): Cuma satu scene.";
        let out = normalize_scenes(raw, &ctx, HOOK, DESC);
        assert!(out.used_fallback);
        let scenes = parse_back(&out.value);
        assert_eq!(scenes.len(), 5);
        assert_eq!(scenes[4].2, 45);
    }

    #[test]
    fn test_garbage_input_regenerates() {
        let ctx = ctx(ContentLength::Short);
        let out = normalize_scenes("bukan format scene sama sekali", &ctx, HOOK, DESC);
        assert!(out.used_fallback);
        assert_eq!(out.scene_count, 3);
        let scenes = parse_back(&out.value);
        assert_eq!(scenes[0].3, HOOK);
    }

    #[test]
    fn test_instruction_prefix_stripped() {
        let ctx = ctx(ContentLength::Short);
        let raw = "Scene 1 (0-10s): Buka dengan hook: Sepatu kulitmu kusam dan retak?\nScene 2 (10-20s): Bahan kulit butuh pelembap agar awet dipakai.\nScene 3 (20-30s): Tutup dengan CTA: Simpan dulu video ini sebelum lupa.";
        let out = normalize_scenes(raw, &ctx, HOOK, DESC);
        assert!(out.rewritten);
        assert!(!out.used_fallback);
        let scenes = parse_back(&out.value);
        assert!(!scenes[0].3.to_lowercase().contains("buka dengan hook"));
        assert!(scenes[0].3.contains("kusam"));
        assert!(!scenes[2].3.to_lowercase().contains("tutup dengan cta"));
    }

    #[test]
    fn test_instruction_only_scene_replaced() {
        let ctx = ctx(ContentLength::Short);
        let raw = "Scene 1 (0-10s): Sepatu kulit kamu kusam? Ini sebabnya.\nScene 2 (10-20s): Jelaskan benefit utama di sini\nScene 3 (20-30s): Mulai dari lap kering setiap habis dipakai.";
        let out = normalize_scenes(raw, &ctx, HOOK, DESC);
        assert!(out.rewritten);
        let scenes = parse_back(&out.value);
        assert!(!scenes[1].3.to_lowercase().contains("jelaskan"));
    }

    #[test]
    fn test_bad_timestamps_regenerate_with_canonical_ranges() {
        let ctx = ctx(ContentLength::Short);
        let raw = "Scene 1 (0-0s): Teks pertama cukup panjang di sini.\nScene 2 (5-9s): Teks kedua juga cukup panjang.\nScene 3 (9-12s): Teks ketiga juga cukup panjang.";
        let out = normalize_scenes(raw, &ctx, HOOK, DESC);
        assert!(out.used_fallback);
        let scenes = parse_back(&out.value);
        assert_eq!(scenes[0].1, 0);
        assert_eq!(scenes[2].2, 30);
    }

    #[test]
    fn test_seven_scene_regeneration_uses_description() {
        let ctx = ctx(ContentLength::Long);
        let out = normalize_scenes("", &ctx, HOOK, DESC);
        let scenes = parse_back(&out.value);
        assert_eq!(scenes.len(), 7);
        // Middle scenes draw from the description's sentences.
        assert!(scenes[2].3.contains("pelembap") || scenes[2].3.contains("rawat"));
    }
}
