use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::{RunRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    aggregates: &'a [StrategyAggregate],
    runs: &'a [RunRecord],
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Automated Play Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;
    writeln!(out, "Runs: {}", records.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in aggregates {
        writeln!(out, "{}", aggregate.strategy.label().bold())?;
        writeln!(
            out,
            "   Eco points: {:.1} ± {:.1} (best {}, worst {})",
            aggregate.mean_eco_points,
            aggregate.std_eco_points,
            aggregate.best_eco_points.to_string().green(),
            aggregate.worst_eco_points.to_string().red()
        )?;
        writeln!(
            out,
            "   Sustainability: {:.1} ± {:.1}",
            aggregate.mean_sustainability, aggregate.std_sustainability
        )?;
        writeln!(
            out,
            "   Actions per run: {:.1}, exhaustions per run: {:.1}",
            aggregate.mean_actions, aggregate.mean_exhaustions
        )?;
        writeln!(
            out,
            "   Remarkable finishes: {:.1}%",
            aggregate.remarkable_rate * 100.0
        )?;
        writeln!(out)?;
    }

    if !records.is_empty() {
        writeln!(out, "{}", "🏅 Individual Runs".bright_yellow().bold())?;
        writeln!(out, "{}", "=================".yellow())?;
        for record in records {
            let summary = &record.summary;
            writeln!(
                out,
                "{:<13} seed {:<8} {:>6} pts  {:>5.1} sustainability  {}",
                record.strategy.label(),
                record.seed,
                summary.eco_points,
                summary.sustainability_level,
                summary.eco_rank
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        aggregates,
        runs: records,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Sustainability Challenge Automated Play\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(out, "## Strategies\n")?;
    writeln!(
        out,
        "| Strategy | Runs | Mean eco points | Std | Mean sustainability | Remarkable |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {:.1} | {:.1} | {:.1} | {:.0}% |",
            aggregate.strategy.label(),
            aggregate.runs,
            aggregate.mean_eco_points,
            aggregate.std_eco_points,
            aggregate.mean_sustainability,
            aggregate.remarkable_rate * 100.0
        )?;
    }

    writeln!(out, "\n## Runs\n")?;
    for record in records {
        let summary = &record.summary;
        writeln!(
            out,
            "- **{}** seed {}: {} eco points, sustainability {:.1}, {}",
            record.strategy.label(),
            record.seed,
            summary.eco_points,
            summary.sustainability_level,
            summary.eco_rank
        )?;
    }
    Ok(())
}
