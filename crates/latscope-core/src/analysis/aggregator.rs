use super::{Aggregation, RunTotals, UrlAggregate};
use crate::config::Config;
use crate::filter::StatusFilter;
use crate::parse::{ParsedRecord, parse_line, parse_status};
use crate::{Error, Result};
use indexmap::IndexMap;

/// Accumulates per-URL latency samples from a stream of raw log lines.
pub struct Aggregator {
    /// Failure percentage at which the input is rejected
    total_fails: u8,
    status: Option<StatusFilter>,
    urls: IndexMap<String, UrlAggregate>,
    totals: RunTotals,
}

impl Aggregator {
    pub fn new(total_fails: u8, status: Option<StatusFilter>) -> Self {
        Self {
            total_fails,
            status,
            urls: IndexMap::new(),
            totals: RunTotals::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.total_fails, config.status_filter()?))
    }

    /// Parse one raw line and fold it into the running state.
    ///
    /// With a status filter, the status is read first: lines outside the
    /// series are skipped before their URL and latency are looked at.
    pub fn push(&mut self, line: &[u8]) {
        if let Some(filter) = &self.status {
            match parse_status(line) {
                Some(status) if filter.matches(status) => {}
                Some(_) => {
                    self.totals.skipped_count += 1;
                    return;
                }
                None => {
                    self.totals.failed_count += 1;
                    return;
                }
            }
        }

        match parse_line(line) {
            Ok(record) => self.record(record),
            Err(failure) => {
                tracing::trace!("Unparsed line: {}", failure);
                self.totals.failed_count += 1;
            }
        }
    }

    fn record(&mut self, record: ParsedRecord) {
        self.totals.processed_count += 1;
        self.totals.total_latency += record.latency;

        let entry = self.urls.entry(record.url).or_default();
        entry.latencies.push(record.latency);
        entry.cumulative_latency += record.latency;
    }

    /// Fold every line of `lines` in order; a read error aborts the pass.
    pub fn consume<I>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Vec<u8>>>,
    {
        for line in lines {
            self.push(&line?);
        }
        Ok(())
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    /// Close the pass, rejecting input that yielded no records or too many
    /// failures.
    pub fn finish(self) -> Result<Aggregation> {
        let totals = self.totals;

        if totals.processed_count == 0 {
            return Err(Error::NoRecordsParsed);
        }

        if let Some(ratio) = totals.failure_ratio()
            && ratio >= f64::from(self.total_fails)
        {
            return Err(Error::FailureRatioExceeded {
                ratio,
                threshold: self.total_fails,
            });
        }

        tracing::info!(
            "Parsed {} records for {} URLs ({} failed, {} skipped)",
            totals.processed_count,
            self.urls.len(),
            totals.failed_count,
            totals.skipped_count
        );

        Ok(Aggregation {
            urls: self.urls,
            totals,
        })
    }
}
