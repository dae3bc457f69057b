mod aggregator;
mod ranking;

pub use aggregator::Aggregator;
pub use ranking::{ReportBuilder, median};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Latency samples collected for one URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlAggregate {
    /// Samples in the order they were read
    pub latencies: Vec<f64>,
    pub cumulative_latency: f64,
}

/// Counters kept across the whole parsing pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub processed_count: u64,
    pub failed_count: u64,
    /// Lines dropped by the status filter; not part of either ratio
    pub skipped_count: u64,
    pub total_latency: f64,
}

impl RunTotals {
    /// Lines that were parsed or failed to parse
    pub fn attempted(&self) -> u64 {
        self.processed_count + self.failed_count
    }

    /// Percentage of attempted lines that failed, if any were attempted
    pub fn failure_ratio(&self) -> Option<f64> {
        match self.attempted() {
            0 => None,
            attempted => Some(self.failed_count as f64 * 100.0 / attempted as f64),
        }
    }
}

/// Final state of a parsing pass, keyed by URL in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub urls: IndexMap<String, UrlAggregate>,
    pub totals: RunTotals,
}

/// One line of the rendered report.
///
/// Serialized field order is the column order of the report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub url: String,
    pub count: usize,
    #[serde(rename = "count_perc")]
    pub count_pct: f64,
    pub time_sum: f64,
    #[serde(rename = "time_perc")]
    pub time_pct: f64,
    pub time_avg: f64,
    pub time_max: f64,
    pub time_med: f64,
}
