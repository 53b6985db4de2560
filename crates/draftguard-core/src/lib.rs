//! # draftguard-core
//!
//! Deterministic content-generation guardrail and scoring engine.
//!
//! This crate takes an untrusted generated draft plus a run context and
//! answers:
//! - Does this draft satisfy the target platform's output contract?
//! - What had to be repaired, removed, or regenerated to get there?
//! - Should it be published as-is, revised, or blocked?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same draft and context always produce the same
//!    normalized output and scores
//! 2. **No LLM calls**: All repair and scoring is rule-based
//! 3. **Repair, never reject**: Malformed or missing fields fall back to
//!    deterministic templates instead of erroring
//! 4. **Traceable**: Every adjustment is recorded in the result's meta
//!    block, every BLOCK cites its reasons
//!
//! ## Example
//!
//! ```rust,ignore
//! use draftguard_core::{apply_guardrails, RawDraft, RunContextInput};
//!
//! let draft: RawDraft = serde_json::from_str(&raw_json)?;
//! let input = RunContextInput {
//!     platform: "tiktok".to_string(),
//!     topic: Some("merawat sepatu kulit".to_string()),
//!     ..RunContextInput::default()
//! };
//! let result = apply_guardrails(&draft, &input);
//!
//! match result.meta.ai_decision.status {
//!     DecisionStatus::Go => publish(&result),
//!     DecisionStatus::Revise => queue_for_review(&result),
//!     DecisionStatus::Block => reject(&result.meta.ai_decision.reasons),
//! }
//! ```

pub mod benchmark;
pub mod contract;
pub mod normalize;
pub mod pipeline;
pub mod sanitizer;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use benchmark::{
    evaluate_benchmark, resolve_benchmark, BenchmarkReport, ObservedMetrics, PerformanceBenchmark,
};
pub use contract::{
    blogger_contract, normalize_platform_name, resolve_allowed_lengths, resolve_contract,
    resolve_mode, BloggerArticleContract, ContentLength, ContentLengthProfile, CtaStyle,
    PlatformMode, PlatformOutputContract, PLATFORMS,
};
pub use pipeline::{apply_guardrails, resolve_context};
pub use sanitizer::{merge_forbidden_terms, sanitize_multiline, sanitize_text, Sanitized};
pub use types::{
    BloggerPublishPack, Check, CheckStatus, Confidence, ContractAdjustments, ContractSnapshot,
    Decision, DecisionStatus, InputError, Language, Meta, NormalizedResult, QualityGate,
    QualitySummary, RawDraft, RunContext, RunContextInput,
};
