use crate::{
    scorer::{AnomalyScorer, push_logged, recent_window},
    stats::{self, clamp_01},
};
use echotrace_core::{
    RollingHistory, SensorSample, history::DEFAULT_HISTORY_CAPACITY,
};

pub const MEMORY_WEIGHT: f64 = 0.5;
pub const DISK_WEIGHT: f64 = 0.5;

/// Scores memory and disk readings. Unlike the other families the memory half of the score is
/// the absolute memory level rather than its variation, so sustained memory pressure counts as
/// anomalous on its own. The disk half is the coefficient of variation of combined disk I/O.
#[derive(Debug, Clone)]
pub struct SensorScorer {
    history: RollingHistory<SensorSample>,
}

impl SensorScorer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RollingHistory::with_capacity(capacity),
        }
    }

    pub fn history(&self) -> &RollingHistory<SensorSample> {
        &self.history
    }
}

impl Default for SensorScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyScorer for SensorScorer {
    type Sample = SensorSample;

    fn observe(&mut self, sample: SensorSample) -> f64 {
        push_logged(&mut self.history, sample, "sensor");
        self.anomaly_score()
    }

    fn anomaly_score(&self) -> f64 {
        let (Some(memory), Some(disk)) = (
            recent_window(&self.history, |s| s.memory_percent),
            recent_window(&self.history, SensorSample::disk_total_rate),
        ) else {
            return 0.0;
        };
        let memory_score = stats::mean(&memory) / 100.0;
        let disk_score = stats::coefficient_of_variation(&disk);
        clamp_01(memory_score * MEMORY_WEIGHT + disk_score * DISK_WEIGHT)
    }

    fn len(&self) -> usize {
        self.history.len()
    }
}
