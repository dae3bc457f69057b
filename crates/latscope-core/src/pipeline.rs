use crate::analysis::{Aggregator, ReportBuilder, RunTotals};
use crate::config::Config;
use crate::log::{LogDescriptor, LogLocator, LogStream};
use crate::report::{ReportWriter, WriteOutcome};
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A fresh report was published
    Written {
        path: PathBuf,
        log: LogDescriptor,
        rows: usize,
        totals: RunTotals,
    },
    /// The log directory held no usable log
    NoCandidate,
    /// The report for the newest log already exists
    AlreadyExists { path: PathBuf, log: LogDescriptor },
}

/// Where the report for `log` goes under `config`.
pub fn report_path(config: &Config, log: &LogDescriptor) -> PathBuf {
    let name = match &config.http_code_series {
        Some(series) => format!("report-{}-{}.html", log.report_date(), series),
        None => format!("report-{}.html", log.report_date()),
    };
    config.report_dir.join(name)
}

/// Produce the report for the newest log in `config.log_dir`.
pub fn run(config: &Config) -> Result<RunOutcome> {
    let locator = LogLocator::new(&config.log_prefix)?;
    let Some(log) = locator.locate(&config.log_dir)? else {
        return Ok(RunOutcome::NoCandidate);
    };

    let output = report_path(config, &log);
    if output.exists() {
        tracing::info!("Report {} already exists, nothing to do", output.display());
        return Ok(RunOutcome::AlreadyExists { path: output, log });
    }

    tracing::info!("Processing {}", log.name);
    let mut aggregator = Aggregator::from_config(config)?;
    aggregator.consume(LogStream::open(&config.log_dir, &log)?)?;
    let aggregation = aggregator.finish()?;

    let rows = ReportBuilder::new(config.report_size).build(&aggregation);

    fs::create_dir_all(&config.report_dir)?;
    match ReportWriter::new(&config.report_template).write(&rows, &output)? {
        WriteOutcome::Written(path) => Ok(RunOutcome::Written {
            path,
            log,
            rows: rows.len(),
            totals: aggregation.totals,
        }),
        WriteOutcome::AlreadyExists(path) => Ok(RunOutcome::AlreadyExists { path, log }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Compression;
    use chrono::NaiveDate;

    fn log() -> LogDescriptor {
        LogDescriptor {
            name: "nginx-access-ui.log-20170630.gz".to_string(),
            date: NaiveDate::from_ymd_opt(2017, 6, 30).unwrap(),
            compression: Compression::Gzip,
        }
    }

    #[test]
    fn test_report_path() {
        let config = Config {
            report_dir: PathBuf::from("/srv/reports"),
            ..Config::default()
        };
        assert_eq!(
            report_path(&config, &log()),
            PathBuf::from("/srv/reports/report-2017.06.30.html")
        );
    }

    #[test]
    fn test_report_path_with_status_series() {
        let config = Config {
            report_dir: PathBuf::from("/srv/reports"),
            http_code_series: Some("5".to_string()),
            ..Config::default()
        };
        assert_eq!(
            report_path(&config, &log()),
            PathBuf::from("/srv/reports/report-2017.06.30-5.html")
        );
    }
}
