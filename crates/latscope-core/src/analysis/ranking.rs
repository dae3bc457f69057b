use super::{Aggregation, ReportRow, UrlAggregate};

/// Ranks URLs by cumulative latency and computes their report columns.
pub struct ReportBuilder {
    report_size: usize,
}

impl ReportBuilder {
    pub fn new(report_size: usize) -> Self {
        Self { report_size }
    }

    /// Build at most `report_size` rows, slowest URL first.
    ///
    /// Sorting is stable, so URLs with equal cumulative latency keep the
    /// order in which they were first seen.
    pub fn build(&self, aggregation: &Aggregation) -> Vec<ReportRow> {
        tracing::debug!(
            "Ranking {} URLs, keeping the top {}",
            aggregation.urls.len(),
            self.report_size
        );

        let mut ranked: Vec<(&String, &UrlAggregate)> = aggregation.urls.iter().collect();
        ranked.sort_by(|a, b| b.1.cumulative_latency.total_cmp(&a.1.cumulative_latency));
        ranked.truncate(self.report_size);

        let totals = &aggregation.totals;
        let attempted = totals.attempted() as f64;

        let rows: Vec<ReportRow> = ranked
            .into_iter()
            .map(|(url, aggregate)| {
                let samples = &aggregate.latencies;
                let count = samples.len();

                let time_pct = if totals.total_latency > 0.0 {
                    aggregate.cumulative_latency * 100.0 / totals.total_latency
                } else {
                    0.0
                };

                ReportRow {
                    url: url.clone(),
                    count,
                    count_pct: round3(count as f64 * 100.0 / attempted),
                    time_sum: round3(aggregate.cumulative_latency),
                    time_pct: round3(time_pct),
                    time_avg: round3(aggregate.cumulative_latency / count as f64),
                    time_max: round3(samples.iter().copied().fold(0.0, f64::max)),
                    time_med: round3(median(samples).unwrap_or(0.0)),
                }
            })
            .collect();

        tracing::info!("Report rows built: {}", rows.len());
        rows
    }
}

/// Median of the samples: the middle value, or the mean of the two middle
/// values for an even count.
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to 3 decimal places, halves away from zero.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
