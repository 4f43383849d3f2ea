use crate::types::{FetchMetric, MetricsSummary};
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Retained fetch-history length.
const HISTORY_CAP: usize = 500;
/// How many entries `recent_fetches` exposes to external consumers.
const RECENT_LIMIT: usize = 50;

/// Append-only bounded history of fetch outcomes. The full capped history
/// backs the running summary; external consumers only see the recent slice.
pub struct MetricsLog {
    history: RwLock<VecDeque<FetchMetric>>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self {
            history: RwLock::new(VecDeque::with_capacity(HISTORY_CAP)),
        }
    }

    pub fn record(&self, metric: FetchMetric) {
        let mut history = self.history.write();
        if history.len() == HISTORY_CAP {
            history.pop_front();
        }
        history.push_back(metric);
    }

    /// Most recent entries first, capped at 50.
    pub fn recent_fetches(&self) -> Vec<FetchMetric> {
        self.history
            .read()
            .iter()
            .rev()
            .take(RECENT_LIMIT)
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> MetricsSummary {
        let history = self.history.read();
        let total_fetches = history.len();
        let mut summary = MetricsSummary {
            total_fetches,
            ..Default::default()
        };
        let mut total_duration_ms: u64 = 0;
        for metric in history.iter() {
            summary.total_articles_added += metric.articles_added;
            if metric.error.is_some() {
                summary.total_failures += 1;
            }
            if metric.not_modified {
                summary.total_not_modified += 1;
            }
            total_duration_ms += metric.duration_ms;
        }
        if total_fetches > 0 {
            summary.avg_duration_ms = total_duration_ms as f64 / total_fetches as f64;
        }
        summary
    }

    pub fn retained_len(&self) -> usize {
        self.history.read().len()
    }
}

impl Default for MetricsLog {
    fn default() -> Self {
        Self::new()
    }
}
