use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "news-checkr",
    about = "Classify a news passage as fake or real and cross-check it against outside sources",
    version
)]
pub struct Cli {
    /// Passage to analyze; read from --file or stdin when omitted
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the passage from a file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Config file [default: ./.news-checkr/config.toml, fallback ~/.config/news-checkr/config.toml].
    /// Relative model paths in it resolve against its directory; without a file
    /// the models are read from ./models/
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Skip the news and encyclopedia lookups
    #[arg(long)]
    pub offline: bool,

    /// Analyze passages from stdin one after another (separated by a blank line)
    #[arg(short, long, conflicts_with_all = ["text", "file"])]
    pub interactive: bool,

    /// Show debug logging and the full probability table
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the verdict line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
