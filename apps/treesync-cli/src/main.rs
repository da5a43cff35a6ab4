//! TreeSync command-line tool.
//!
//! Subcommands:
//! - `compare`: run the wave comparison between two GEDCOM files and emit
//!   the JSON comparison document;
//! - `inspect`: load one GEDCOM file and print its shape.
//!
//! Exit status is non-zero only for input errors (unreadable or invalid
//! file, anchor missing). A run that maps zero persons but completes
//! without anomalies is a successful zero-result run.

mod config;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use treesync_gedcom::import_tree;
use treesync_match::{
    CompareOptions, ThresholdStrategy, WaveEngine, build_document, build_report,
};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "treesync", about = "Genealogical tree reconciliation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two GEDCOM trees starting from an anchor pair.
    Compare {
        /// Source GEDCOM file.
        source: PathBuf,
        /// Destination GEDCOM file.
        destination: PathBuf,
        /// Anchor pair as SOURCE_ID=DESTINATION_ID (GEDCOM xrefs).
        #[arg(long)]
        anchor: String,
        /// Maximum BFS depth from the anchor.
        #[arg(long)]
        max_level: Option<u32>,
        /// Threshold strategy.
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Base threshold used verbatim by the fixed strategy.
        #[arg(long)]
        base_threshold: Option<u8>,
        /// High-confidence cutoff for update/add proposals.
        #[arg(long)]
        confidence: Option<u8>,
        /// Write the JSON document here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Keep per-candidate matcher traces in the output.
        #[arg(long)]
        detailed: bool,
    },
    /// Load a GEDCOM file and print its shape.
    Inspect {
        /// GEDCOM file.
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Fixed,
    Adaptive,
    Aggressive,
    Conservative,
}

impl From<StrategyArg> for ThresholdStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fixed => Self::Fixed,
            StrategyArg::Adaptive => Self::Adaptive,
            StrategyArg::Aggressive => Self::Aggressive,
            StrategyArg::Conservative => Self::Conservative,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = CliConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    match run(cli.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, cfg: &CliConfig) -> anyhow::Result<()> {
    match command {
        Command::Compare {
            source,
            destination,
            anchor,
            max_level,
            strategy,
            base_threshold,
            confidence,
            output,
            detailed,
        } => {
            let (anchor_source, anchor_destination) = parse_anchor(&anchor)?;
            let options = CompareOptions {
                max_level: max_level.unwrap_or(cfg.max_level),
                threshold_strategy: strategy
                    .map(Into::into)
                    .unwrap_or_else(|| cfg.threshold_strategy()),
                base_threshold: base_threshold.unwrap_or(cfg.base_threshold),
            };
            let confidence = confidence.unwrap_or(cfg.confidence);
            compare_command(
                &source,
                &destination,
                &anchor_source,
                &anchor_destination,
                options,
                confidence,
                output.as_deref(),
                detailed,
            )
        }
        Command::Inspect { file } => inspect_command(&file),
    }
}

#[allow(clippy::too_many_arguments)]
fn compare_command(
    source_path: &std::path::Path,
    destination_path: &std::path::Path,
    anchor_source: &str,
    anchor_destination: &str,
    options: CompareOptions,
    confidence: u8,
    output: Option<&std::path::Path>,
    detailed: bool,
) -> anyhow::Result<()> {
    let source = load(source_path)?;
    let destination = load(destination_path)?;

    let engine = WaveEngine::new(options);
    let mut result = engine
        .compare(
            &source.tree,
            &destination.tree,
            anchor_source,
            anchor_destination,
        )
        .context("comparison failed")?;
    result.set_files(
        source_path.display().to_string(),
        destination_path.display().to_string(),
    );
    if !detailed {
        result.detailed_log.clear();
    }

    info!(
        mappings = result.mappings.len(),
        unmatched_source = result.unmatched_source.len(),
        unmatched_destination = result.unmatched_destination.len(),
        "comparison complete"
    );

    let report = build_report(&result, &source.tree, &destination.tree, confidence);
    let document = build_document(result, report, confidence);
    let json = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn inspect_command(path: &std::path::Path) -> anyhow::Result<()> {
    let loaded = load(path)?;
    let tree = &loaded.tree;

    println!("{}", path.display());
    println!("  persons:  {}", tree.person_count());
    println!("  families: {}", tree.family_count());

    let with_birth_year = tree.persons().filter(|p| p.birth_year().is_some()).count();
    println!("  persons with birth year: {with_birth_year}");

    if !loaded.warnings.is_empty() {
        println!("  warnings: {}", loaded.warnings.len());
        for warning in &loaded.warnings {
            println!("    - {warning}");
        }
    }
    if !tree.issues().is_empty() {
        println!("  index issues: {}", tree.issues().len());
    }
    Ok(())
}

fn load(path: &std::path::Path) -> anyhow::Result<treesync_gedcom::LoadedTree> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let loaded =
        import_tree(&text).with_context(|| format!("parsing {}", path.display()))?;
    for warning in &loaded.warnings {
        warn!(file = %path.display(), "{warning}");
    }
    Ok(loaded)
}

/// Parse an anchor argument of the form `SOURCE_ID=DESTINATION_ID`.
fn parse_anchor(anchor: &str) -> anyhow::Result<(String, String)> {
    let Some((source, destination)) = anchor.split_once('=') else {
        bail!("anchor must have the form SOURCE_ID=DESTINATION_ID, got {anchor:?}");
    };
    if source.is_empty() || destination.is_empty() {
        bail!("anchor must have the form SOURCE_ID=DESTINATION_ID, got {anchor:?}");
    }
    Ok((source.to_string(), destination.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_anchor() {
        assert_eq!(
            parse_anchor("@I1@=@X9@").unwrap(),
            ("@I1@".to_string(), "@X9@".to_string())
        );
        assert!(parse_anchor("@I1@").is_err());
        assert!(parse_anchor("=@X9@").is_err());
    }

    #[test]
    fn test_cli_parses_compare() {
        let cli = Cli::try_parse_from([
            "treesync",
            "compare",
            "a.ged",
            "b.ged",
            "--anchor",
            "@I1@=@X1@",
            "--max-level",
            "3",
            "--strategy",
            "conservative",
        ])
        .unwrap();
        match cli.command {
            Command::Compare {
                max_level,
                strategy,
                ..
            } => {
                assert_eq!(max_level, Some(3));
                assert!(matches!(strategy, Some(StrategyArg::Conservative)));
            }
            Command::Inspect { .. } => panic!("wrong subcommand"),
        }
    }
}
