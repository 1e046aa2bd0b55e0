use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AnalysisReport, EvidenceBundle, Label, Outcome, Verdict};

const FACT_CHECK_TIPS: &str =
    "Search the main names and claims together with \"fact check\" on a search engine.";
const NEWS_TIPS: &[&str] = &[
    "Look for the same story on established outlets (Reuters, AP, BBC).",
    "Check the publication date and whether the story is being recycled.",
    "Be wary of sensational headlines and anonymous sources.",
];
const ENCYCLOPEDIA_TIPS: &str =
    "Look up the people, places and organizations mentioned to confirm they exist as described.";

/// Render a colored terminal report.
pub fn render(report: &AnalysisReport, verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        println!("{}", outcome_line(&report.outcome));
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "news-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" {}\n", outcome_line(&report.outcome));

    if let Outcome::Verdict(verdict) = &report.outcome {
        render_probabilities(verdict, verbose);
        println!();
    }

    render_evidence(&report.evidence);
    Ok(())
}

/// One-line summary of the classification outcome.
pub fn outcome_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Verdict(v) => match v.label {
            Label::Fake => format!(
                "{} Fake news detected ({:.1}% confidence)",
                "✗".red(),
                v.confidence()
            )
            .red()
            .bold()
            .to_string(),
            Label::Real => format!(
                "{} This news looks real ({:.1}% confidence)",
                "✓".green(),
                v.confidence()
            )
            .green()
            .bold()
            .to_string(),
        },
        Outcome::InsufficientInput { tokens, required } => format!(
            "{} Please enter more text: got {} word(s), need at least {}.",
            "⚠".yellow(),
            tokens,
            required
        ),
        Outcome::ModelUnavailable { reason } => {
            format!("{} Model unavailable: {}", "✗".red(), reason)
        }
    }
}

fn render_probabilities(verdict: &Verdict, verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Class").add_attribute(Attribute::Bold),
            Cell::new("Probability").add_attribute(Attribute::Bold),
        ]);

    let rows = [
        (Label::Real, verdict.real_probability, Color::Green),
        (Label::Fake, verdict.fake_probability, Color::Red),
    ];
    for (label, probability, color) in rows {
        if !verbose && label != verdict.label {
            continue;
        }
        table.add_row(vec![
            Cell::new(label.to_string()).fg(color),
            Cell::new(format!("{:.1}%", probability)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_evidence(evidence: &EvidenceBundle) {
    println!(" {}\n", "[FACT CHECK]".cyan().bold());
    match &evidence.fact_check {
        Some(q) => {
            println!("   Keywords: {}", q.keywords);
            println!("   {}\n", q.link.underline());
        }
        None => println!("   {}\n", FACT_CHECK_TIPS.dimmed()),
    }

    println!(" {}\n", "[RELATED NEWS]".cyan().bold());
    match &evidence.articles {
        Some(articles) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Title").add_attribute(Attribute::Bold),
                    Cell::new("Source").add_attribute(Attribute::Bold),
                    Cell::new("Credibility").add_attribute(Attribute::Bold),
                    Cell::new("URL").add_attribute(Attribute::Bold),
                ]);
            for article in articles {
                table.add_row(vec![
                    Cell::new(&article.title),
                    Cell::new(&article.source),
                    Cell::new(&article.credibility).fg(Color::Green),
                    Cell::new(&article.url),
                ]);
            }
            println!("{}\n", table);
        }
        None => {
            println!("   No related articles from trusted sources.");
            for tip in NEWS_TIPS {
                println!("   • {}", tip.dimmed());
            }
            println!();
        }
    }

    println!(" {}\n", "[ENCYCLOPEDIA]".cyan().bold());
    match &evidence.encyclopedia {
        Some(context) => {
            println!("   {}", context.summary);
            if !context.suggestions.is_empty() {
                println!("\n   Related topics: {}", context.suggestions.join(", "));
            }
            println!();
        }
        None => println!("   {}\n", ENCYCLOPEDIA_TIPS.dimmed()),
    }
}
