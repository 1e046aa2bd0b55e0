//! `news-checkr`: classify a news passage as fake or real and cross-check it.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialize logging.
//! 2. Load config ([`config::load_config`]).
//! 3. Load the vectorizer and classifier artifacts ([`model`]).
//! 4. Read the passage (argument, `--file`, or stdin) into the [`models::Session`].
//! 5. Classify it ([`predict`]) and gather evidence ([`evidence`]) via [`analysis::Analyzer`].
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0` when a verdict was produced, `1` otherwise.

mod analysis;
mod cli;
mod config;
mod evidence;
mod model;
mod models;
mod predict;
mod report;
mod text;

use std::io::{BufRead, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use analysis::Analyzer;
use cli::{Cli, ReportFormat};
use config::{load_config, Config};
use evidence::EvidenceAggregator;
use model::load_artifacts;
use models::{AnalysisReport, Session};
use predict::PredictionService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workdir = std::env::current_dir()?;
    let config = load_config(&workdir, cli.config.as_deref())?;

    let predictor = load_predictor(&config);
    let evidence = if cli.offline {
        EvidenceAggregator::new(&config)
    } else {
        EvidenceAggregator::from_config(&config)?
    };
    let analyzer = Analyzer::new(predictor, config.model.min_tokens, evidence);

    let mut session = Session::default();

    if cli.interactive {
        let mut all_ok = true;
        for passage in Passages::new(std::io::stdin().lock()) {
            let passage = passage?;
            if let Some(text) = session.submit(&passage) {
                all_ok &= run_once(&analyzer, text, &cli).await?;
            }
        }
        if !all_ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let input = read_input(&cli)?;
    let ok = match session.submit(&input) {
        Some(text) => run_once(&analyzer, text, &cli).await?,
        None => {
            warn!("no input text");
            eprintln!("Please enter some text to analyze.");
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "news_checkr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Model load failures are kept as the reason string so evidence lookups still run.
fn load_predictor(config: &Config) -> Result<PredictionService, String> {
    load_artifacts(&config.model.vectorizer, &config.model.classifier)
        .map(|artifacts| PredictionService::new(artifacts, config.model.min_tokens))
        .map_err(|e| {
            error!(error = %e, "failed to load model artifacts");
            e.to_string()
        })
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }

    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Passages from a line stream, separated by one or more blank lines.
///
/// Each passage is yielded as soon as the blank line closing it is read, so
/// a terminal user gets a verdict without waiting for EOF.
struct Passages<R> {
    lines: std::io::Lines<R>,
    current: Vec<String>,
    done: bool,
}

impl<R: BufRead> Passages<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            current: Vec::new(),
            done: false,
        }
    }

    fn take_current(&mut self) -> Option<String> {
        if self.current.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.current).join("\n"))
    }
}

impl<R: BufRead> Iterator for Passages<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.lines.next() {
                Some(Ok(line)) if line.trim().is_empty() => {
                    if let Some(passage) = self.take_current() {
                        return Some(Ok(passage));
                    }
                }
                Some(Ok(line)) => self.current.push(line),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return self.take_current().map(Ok);
                }
            }
        }
        None
    }
}

/// Analyze one passage and print it. Returns whether a verdict was produced.
async fn run_once(analyzer: &Analyzer, text: &str, cli: &Cli) -> Result<bool> {
    let show_spinner = cli.report == ReportFormat::Terminal && !cli.quiet && !cli.offline;

    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message("Checking sources...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let report: AnalysisReport = analyzer.analyze(text).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&report, cli.verbose, cli.quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.has_verdict())
}
