//! Batch entry point: classify a file of place records.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse CLI arguments.
//! 3. Load [`AppConfig`] (default on first run, or `--config PATH`).
//! 4. Build the [`TypeClassifier`] (AI stage only when a key resolves).
//! 5. With `--write-config`, save the settings and stop.
//! 6. Read records from `INPUT` or stdin and print one JSON line each.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use campsite_classifier::{
    classifier::{ClassificationSource, TypeClassifier},
    config::AppConfig,
    place::{GooglePlace, PlaceCandidate},
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// Google Places "place details" records (snake_case).
    Places,
    /// `PlaceCandidate` records (camelCase).
    Candidates,
}

#[derive(Parser, Debug)]
#[command(name = "campsite-classifier", version, about = "Classify campsite records by accommodation type")]
struct Cli {
    /// JSON file with one record or an array of records; stdin when omitted.
    input: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never call the AI provider.
    #[arg(long)]
    heuristic_only: bool,

    /// Record shape of the input.
    #[arg(long, value_enum, default_value_t = InputFormat::Places)]
    format: InputFormat,

    /// Write the effective settings (defaults filled in) and exit.
    #[arg(long)]
    write_config: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputLine<'a> {
    name: &'a str,
    type_id: u8,
    type_name: &'static str,
    confidence: f64,
    source: &'static str,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Accept either a single object or an array of objects.
fn parse_records(raw: &str, format: InputFormat) -> Result<Vec<PlaceCandidate>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("input is not valid JSON")?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let place = match format {
                InputFormat::Places => serde_json::from_value::<GooglePlace>(item)
                    .map(PlaceCandidate::from),
                InputFormat::Candidates => serde_json::from_value::<PlaceCandidate>(item),
            };
            place.with_context(|| format!("record {i} is not a valid place"))
        })
        .collect()
}

fn source_label(source: &ClassificationSource) -> &'static str {
    match source {
        ClassificationSource::Heuristic => "heuristic",
        ClassificationSource::Ai => "ai",
        ClassificationSource::HeuristicFallback { .. } => "heuristic_fallback",
    }
}

fn write_config(config: &AppConfig, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => config
            .save_to(p)
            .with_context(|| format!("failed to write {}", p.display()))?,
        None => config.save().context("failed to write settings")?,
    }
    log::info!("settings written");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Arguments
    let cli = Cli::parse();

    // 3. Configuration
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    if cli.heuristic_only {
        config.ai.enabled = false;
    }
    if cli.write_config {
        return write_config(&config, cli.config.as_deref());
    }

    // 4. Classifier
    let classifier = TypeClassifier::from_config(&config);

    // 6. Records
    let raw = read_input(cli.input.as_ref())?;
    let places = parse_records(&raw, cli.format)?;
    log::info!("classifying {} record(s)", places.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for place in &places {
        let c = classifier.classify(place).await;
        let line = OutputLine {
            name: &place.name,
            type_id: c.result.type_id(),
            type_name: c.result.type_name(),
            confidence: c.result.confidence(),
            source: source_label(&c.source),
        };
        writeln!(out, "{}", serde_json::to_string(&line)?)?;
    }

    Ok(())
}
