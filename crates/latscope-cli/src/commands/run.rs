use crate::OutputFormat;
use anyhow::Result;
use latscope_core::{Config, RunOutcome};

pub fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    tracing::info!("Building report from logs in {}", config.log_dir.display());

    let outcome = latscope_core::run(config)?;

    match format {
        OutputFormat::Json => output_json(&outcome)?,
        OutputFormat::Pretty => output_pretty(&outcome),
    }

    Ok(())
}

fn output_pretty(outcome: &RunOutcome) {
    use console::style;

    match outcome {
        RunOutcome::Written {
            path,
            log,
            rows,
            totals,
        } => {
            println!("\n{}", style("Report Written").bold().green());
            println!("{}", style("==============").green());
            println!("  Log File:         {}", log.name);
            println!("  Report:           {}", path.display());
            println!("  URLs Reported:    {}", rows);
            println!("  Parsed Lines:     {}", totals.processed_count);
            println!("  Failed Lines:     {}", totals.failed_count);
            if totals.skipped_count > 0 {
                println!("  Filtered Lines:   {}", totals.skipped_count);
            }
            println!("  Total Time:       {:.3} s", totals.total_latency);
            println!();
        }
        RunOutcome::NoCandidate => {
            println!("{}", style("No log file found, nothing to do").yellow());
        }
        RunOutcome::AlreadyExists { path, log } => {
            println!(
                "{} {} (from {})",
                style("Report already exists:").yellow(),
                path.display(),
                log.name
            );
        }
    }
}

fn output_json(outcome: &RunOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{}", json);
    Ok(())
}
