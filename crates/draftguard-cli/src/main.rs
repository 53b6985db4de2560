//! draftguard command-line interface.
//!
//! Thin wrapper over `draftguard-core`: load a draft and run context from
//! disk, run the guardrail pipeline, print the result as JSON. Also exposes
//! the contract registry and the performance-benchmark evaluator for
//! inspection and audit tooling.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use draftguard_core::{
    apply_guardrails, evaluate_benchmark, normalize_platform_name, resolve_allowed_lengths,
    resolve_contract, ObservedMetrics, RawDraft, RunContextInput, PLATFORMS,
};

/// Deterministic guardrails and scoring for generated content drafts.
#[derive(Parser, Debug)]
#[command(name = "draftguard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the guardrail pipeline over a draft file
    Check {
        /// Draft file (JSON, or YAML by extension)
        draft: PathBuf,

        /// Run context file (JSON or YAML)
        #[arg(long, short)]
        context: Option<PathBuf>,

        /// Target platform (overrides the context file)
        #[arg(long, short)]
        platform: Option<String>,

        /// Print the full normalized result instead of only the meta block
        #[arg(long)]
        full: bool,
    },

    /// Print the output contract for a platform
    Contract {
        /// Platform name or alias (e.g. "tiktok", "twitter", "blog")
        platform: String,
    },

    /// List every platform in the registry
    Platforms,

    /// Compare observed post metrics against a platform's benchmark
    Benchmark {
        /// Platform name or alias
        platform: String,

        /// Observed audience retention rate, 0.0-1.0
        #[arg(long)]
        retention: f64,

        /// Observed click-through rate, 0.0-1.0
        #[arg(long)]
        ctr: f64,

        /// Observed live ranking position (0 = not ranked)
        #[arg(long)]
        ranking: u32,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load a JSON or YAML file into any deserializable type, picking the
/// parser by extension.
fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Check { draft, context, platform, full } => {
            let draft: RawDraft = load(&draft)?;
            let mut input: RunContextInput = match context {
                Some(path) => load(&path)?,
                None => RunContextInput::default(),
            };
            if let Some(platform) = platform {
                input.platform = platform;
            }
            if input.platform.trim().is_empty() {
                bail!("no platform given: pass --platform or set it in the context file");
            }
            let result = apply_guardrails(&draft, &input);
            if full {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&result.meta)?);
            }
        }

        Command::Contract { platform } => {
            let name = normalize_platform_name(&platform);
            let contract = resolve_contract(&name);
            if !contract.supported {
                tracing::warn!(platform = %name, "platform not in registry, showing default contract");
            }
            let lengths: Vec<&str> = resolve_allowed_lengths(&name)
                .into_iter()
                .map(|l| l.as_str())
                .collect();
            let view = serde_json::json!({
                "platform": name,
                "contract": contract,
                "allowedLengths": lengths,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        Command::Platforms => {
            for name in PLATFORMS {
                println!("{name}");
            }
        }

        Command::Benchmark { platform, retention, ctr, ranking } => {
            let report = evaluate_benchmark(
                &platform,
                ObservedMetrics { retention_rate: retention, ctr, live_ranking: ranking },
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.passed {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
