use crate::OutputFormat;
use anyhow::Result;
use latscope_core::Config;
use latscope_core::log::{LogDescriptor, LogLocator};
use latscope_core::pipeline::report_path;

/// Find the log `run` would process, without reading it
pub fn locate_log(config: &Config) -> Result<Option<LogDescriptor>> {
    let locator = LogLocator::new(&config.log_prefix)?;
    Ok(locator.locate(&config.log_dir)?)
}

pub fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    let log = locate_log(config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        OutputFormat::Pretty => {
            use console::style;

            let Some(log) = log else {
                println!("{}", style("No log file found").yellow());
                return Ok(());
            };
            let report = report_path(config, &log);

            println!("\n{}", style("Newest Log").bold().cyan());
            println!("{}", style("==========").cyan());
            println!("  File:        {}", log.name);
            println!("  Date:        {}", log.date);
            println!("  Compression: {:?}", log.compression);
            println!(
                "  Report:      {}{}",
                report.display(),
                if report.exists() { " (exists)" } else { "" }
            );
            println!();
        }
    }

    Ok(())
}
