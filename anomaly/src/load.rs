use crate::{
    scorer::{AnomalyScorer, push_logged, recent_window},
    stats::{self, clamp_01},
};
use echotrace_core::{LoadSample, RollingHistory, history::DEFAULT_HISTORY_CAPACITY};

/// Standard deviation of CPU percent at which the score saturates.
pub const CPU_STD_DEV_SATURATION: f64 = 50.0;

/// Scores processor load by how much the busy percentage has been jumping around.
#[derive(Debug, Clone)]
pub struct LoadScorer {
    history: RollingHistory<LoadSample>,
}

impl LoadScorer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RollingHistory::with_capacity(capacity),
        }
    }

    pub fn history(&self) -> &RollingHistory<LoadSample> {
        &self.history
    }
}

impl Default for LoadScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyScorer for LoadScorer {
    type Sample = LoadSample;

    fn observe(&mut self, sample: LoadSample) -> f64 {
        push_logged(&mut self.history, sample, "load");
        self.anomaly_score()
    }

    fn anomaly_score(&self) -> f64 {
        let Some(values) = recent_window(&self.history, |s| s.cpu_percent)
        else {
            return 0.0;
        };
        let mean = stats::mean(&values);
        clamp_01(stats::std_dev(&values, mean) / CPU_STD_DEV_SATURATION)
    }

    fn len(&self) -> usize {
        self.history.len()
    }
}
