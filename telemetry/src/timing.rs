use chrono::Utc;
use echotrace_core::{
    RollingHistory, TimingSample, history::DEFAULT_INTERVAL_HISTORY_CAPACITY,
};
use std::time::Instant;

/// Measures the sampling loop: how long each tick took to come around and how unevenly.
#[derive(Debug, Clone)]
pub struct TimingTracker {
    intervals: RollingHistory<f64>,
    start: Instant,
    last_tick: Instant,
}

impl TimingTracker {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INTERVAL_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let now = Instant::now();
        Self {
            intervals: RollingHistory::with_capacity(capacity),
            start: now,
            last_tick: now,
        }
    }

    /// Measures the time since the previous tick (or since construction, for the first tick).
    pub fn tick(&mut self) -> TimingSample {
        let now = Instant::now();
        let interval = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        let uptime = now.duration_since(self.start).as_secs_f64();
        self.record(interval, uptime)
    }

    /// Records an externally measured interval. Jitter is the mean absolute deviation of the
    /// recorded intervals, and 0 until there are at least two.
    pub fn record(&mut self, interval: f64, uptime: f64) -> TimingSample {
        self.intervals.push(interval);
        let (avg_interval, jitter) = if self.intervals.len() > 1 {
            let n = self.intervals.len() as f64;
            let avg = self.intervals.iter().sum::<f64>() / n;
            let jitter =
                self.intervals.iter().map(|i| (i - avg).abs()).sum::<f64>() / n;
            (avg, jitter)
        } else {
            (interval, 0.0)
        };
        TimingSample {
            interval,
            avg_interval,
            jitter,
            uptime,
            timestamp: Utc::now(),
        }
    }
}

impl Default for TimingTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_interval_has_no_jitter() {
        let mut tracker = TimingTracker::new();
        let sample = tracker.record(0.1, 0.1);
        assert_eq!(sample.jitter, 0.0);
        assert_eq!(sample.avg_interval, 0.1);
    }

    #[test]
    fn jitter_is_mean_absolute_deviation() {
        let mut tracker = TimingTracker::new();
        tracker.record(0.1, 0.1);
        tracker.record(0.3, 0.4);
        let sample = tracker.record(0.2, 0.6);
        assert!((sample.avg_interval - 0.2).abs() < 1e-12);
        // deviations 0.1, 0.1, 0.0
        assert!((sample.jitter - 0.2 / 3.0).abs() < 1e-12);
        assert_eq!(sample.uptime, 0.6);
    }

    #[test]
    fn interval_window_is_bounded() {
        let mut tracker = TimingTracker::with_capacity(2);
        tracker.record(10.0, 10.0);
        tracker.record(1.0, 11.0);
        let sample = tracker.record(1.0, 12.0);
        // the 10s outlier has been evicted
        assert_eq!(sample.jitter, 0.0);
        assert_eq!(sample.avg_interval, 1.0);
    }

    #[test]
    fn tick_measures_elapsed_time() {
        let mut tracker = TimingTracker::new();
        let sample = tracker.tick();
        assert!(sample.interval >= 0.0);
        assert!(sample.uptime >= sample.interval);
    }
}
