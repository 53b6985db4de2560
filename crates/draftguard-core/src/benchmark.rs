//! Performance benchmark registry and real-world evaluator.
//!
//! Architecturally parallel to the guardrail scorer, not called by it: the
//! audit tooling feeds observed post metrics through `evaluate_benchmark`
//! to find content that underperforms the platform's thresholds. Shares
//! only the platform-name normalization helper with the contract registry.

use serde::{Deserialize, Serialize};

use crate::contract::normalize_platform_name;

/// Minimum acceptable real-world performance for a platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBenchmark {
    /// Minimum audience retention rate, 0.0–1.0.
    pub min_retention_rate: f64,
    /// Minimum click-through rate, 0.0–1.0.
    pub min_ctr: f64,
    /// Worst acceptable live ranking position (1 is best).
    pub max_live_ranking: u32,
}

/// Observed metrics for a published piece of content.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservedMetrics {
    pub retention_rate: f64,
    pub ctr: f64,
    pub live_ranking: u32,
}

/// Per-axis verdicts plus human-readable shortfalls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub platform: String,
    pub benchmark: PerformanceBenchmark,
    pub retention_ok: bool,
    pub ctr_ok: bool,
    pub ranking_ok: bool,
    pub passed: bool,
    pub failed_items: Vec<String>,
}

/// Resolve the performance benchmark for a platform.
///
/// Unknown platforms get a conservative default; never panics.
pub fn resolve_benchmark(platform: &str) -> PerformanceBenchmark {
    let (min_retention_rate, min_ctr, max_live_ranking) =
        match normalize_platform_name(platform).as_str() {
            "tiktok" => (0.45, 0.055, 30),
            "instagram_reels" => (0.42, 0.050, 40),
            "instagram_feed" => (0.30, 0.035, 60),
            "youtube_shorts" => (0.50, 0.045, 30),
            "youtube" => (0.40, 0.040, 50),
            "facebook_reels" => (0.35, 0.040, 60),
            "threads" => (0.25, 0.030, 80),
            "x" => (0.25, 0.030, 80),
            "linkedin" => (0.30, 0.035, 60),
            "snapchat_spotlight" => (0.40, 0.040, 50),
            "pinterest" => (0.25, 0.045, 60),
            "telegram_channel" => (0.30, 0.030, 80),
            "whatsapp_channel" => (0.30, 0.030, 80),
            "blogger" => (0.35, 0.025, 20),
            _ => (0.30, 0.030, 60),
        };
    PerformanceBenchmark { min_retention_rate, min_ctr, max_live_ranking }
}

/// Compare observed metrics against a platform's benchmark.
pub fn evaluate_benchmark(platform: &str, observed: ObservedMetrics) -> BenchmarkReport {
    let name = normalize_platform_name(platform);
    let benchmark = resolve_benchmark(&name);

    let retention_ok = observed.retention_rate >= benchmark.min_retention_rate;
    let ctr_ok = observed.ctr >= benchmark.min_ctr;
    // A ranking of 0 means "not ranked yet" and is treated as a failure.
    let ranking_ok = observed.live_ranking >= 1 && observed.live_ranking <= benchmark.max_live_ranking;

    let mut failed_items = Vec::new();
    if !retention_ok {
        failed_items.push(format!(
            "retention {:.1}% below minimum {:.1}%",
            observed.retention_rate * 100.0,
            benchmark.min_retention_rate * 100.0
        ));
    }
    if !ctr_ok {
        failed_items.push(format!(
            "CTR {:.2}% below minimum {:.2}%",
            observed.ctr * 100.0,
            benchmark.min_ctr * 100.0
        ));
    }
    if !ranking_ok {
        failed_items.push(format!(
            "live ranking {} outside top {}",
            observed.live_ranking, benchmark.max_live_ranking
        ));
    }

    BenchmarkReport {
        platform: name,
        benchmark,
        retention_ok,
        ctr_ok,
        ranking_ok,
        passed: failed_items.is_empty(),
        failed_items,
    }
}
