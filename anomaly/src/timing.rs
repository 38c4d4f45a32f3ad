use crate::{
    scorer::{AnomalyScorer, push_logged, recent_window},
    stats::{self, clamp_01},
};
use echotrace_core::{
    RollingHistory, TimingSample, history::DEFAULT_HISTORY_CAPACITY,
};

/// Mean jitter, in seconds, at which the score saturates.
pub const JITTER_SATURATION_S: f64 = 1.0;

/// Scores the sampling loop itself: a host under pressure wakes the loop late and unevenly.
#[derive(Debug, Clone)]
pub struct TimingScorer {
    history: RollingHistory<TimingSample>,
}

impl TimingScorer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RollingHistory::with_capacity(capacity),
        }
    }

    pub fn history(&self) -> &RollingHistory<TimingSample> {
        &self.history
    }
}

impl Default for TimingScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyScorer for TimingScorer {
    type Sample = TimingSample;

    fn observe(&mut self, sample: TimingSample) -> f64 {
        push_logged(&mut self.history, sample, "timing");
        self.anomaly_score()
    }

    fn anomaly_score(&self) -> f64 {
        recent_window(&self.history, |s| s.jitter).map_or(0.0, |jitter| {
            clamp_01(stats::mean(&jitter) / JITTER_SATURATION_S)
        })
    }

    fn len(&self) -> usize {
        self.history.len()
    }
}
