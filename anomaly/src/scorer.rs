use crate::stats::WINDOW;
use echotrace_core::RollingHistory;

/// A rolling anomaly estimator for one metric family.
///
/// Scores are in the range 0..=1 and are exactly 0 until `WINDOW` samples have been observed.
/// Scorers mutate their history in place so concurrent callers must serialize access.
pub trait AnomalyScorer {
    type Sample;

    /// Records `sample` (evicting the oldest sample when the history is full) and returns the
    /// updated score.
    fn observe(&mut self, sample: Self::Sample) -> f64;

    /// Score of the current history.
    fn anomaly_score(&self) -> f64;

    /// Number of samples currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether enough samples have been observed to produce a non-zero score.
    fn is_warm(&self) -> bool {
        self.len() >= WINDOW
    }
}

/// Extracts `f` from the last `WINDOW` samples, or `None` during warm-up.
pub(crate) fn recent_window<T>(
    history: &RollingHistory<T>,
    f: impl Fn(&T) -> f64,
) -> Option<Vec<f64>> {
    if history.len() < WINDOW {
        return None;
    }
    Some(history.latest(WINDOW).map(f).collect())
}

pub(crate) fn push_logged<T>(
    history: &mut RollingHistory<T>,
    sample: T,
    family: &str,
) {
    history.push(sample);
    if history.len() == WINDOW {
        log::debug!("{} scorer warmed up after {} samples", family, WINDOW);
    }
}
