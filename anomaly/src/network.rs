use crate::{
    scorer::{AnomalyScorer, push_logged, recent_window},
    stats,
};
use echotrace_core::{
    NetworkSample, RollingHistory, history::DEFAULT_HISTORY_CAPACITY,
};

/// Scores network traffic by the coefficient of variation of total throughput, so bursty
/// traffic is anomalous regardless of its absolute volume.
#[derive(Debug, Clone)]
pub struct NetworkScorer {
    history: RollingHistory<NetworkSample>,
}

impl NetworkScorer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RollingHistory::with_capacity(capacity),
        }
    }

    pub fn history(&self) -> &RollingHistory<NetworkSample> {
        &self.history
    }
}

impl Default for NetworkScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyScorer for NetworkScorer {
    type Sample = NetworkSample;

    fn observe(&mut self, sample: NetworkSample) -> f64 {
        push_logged(&mut self.history, sample, "network");
        self.anomaly_score()
    }

    fn anomaly_score(&self) -> f64 {
        recent_window(&self.history, NetworkSample::total_bytes_rate)
            .map_or(0.0, |values| stats::coefficient_of_variation(&values))
    }

    fn len(&self) -> usize {
        self.history.len()
    }
}
