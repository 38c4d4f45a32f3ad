use crate::config::MonitorConfig;
use echotrace_anomaly::{
    AnomalyScorer, LoadScorer, NetworkScorer, ScoreAggregator, SensorScorer,
    TimingScorer,
};
use echotrace_core::{
    CombinedMetricsRecord, FamilyScores, HostSample, RecordDetails,
    history::DEFAULT_HISTORY_CAPACITY,
};

/// Owns one scorer per metric family and turns each tick's telemetry into a record for the
/// synthesizer.
#[derive(Debug, Clone)]
pub struct SystemMonitor {
    load: LoadScorer,
    network: NetworkScorer,
    sensor: SensorScorer,
    timing: TimingScorer,
    aggregator: ScoreAggregator,
}

impl SystemMonitor {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(history_capacity: usize) -> Self {
        Self {
            load: LoadScorer::with_capacity(history_capacity),
            network: NetworkScorer::with_capacity(history_capacity),
            sensor: SensorScorer::with_capacity(history_capacity),
            timing: TimingScorer::with_capacity(history_capacity),
            aggregator: ScoreAggregator,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::with_capacity(config.history_capacity)
    }

    pub fn observe(&mut self, sample: HostSample) -> CombinedMetricsRecord {
        let HostSample {
            load,
            network,
            sensor,
            timing,
        } = sample;
        let scores = self.aggregator.combine_scores(
            self.load.observe(load.clone()),
            self.network.observe(network.clone()),
            self.sensor.observe(sensor.clone()),
            self.timing.observe(timing.clone()),
        );
        CombinedMetricsRecord {
            cpu_percent: load.cpu_percent,
            network_rate: network.total_bytes_rate(),
            memory_percent: sensor.memory_percent,
            anomaly_score: scores.overall,
            timestamp: load.timestamp,
            details: Some(Box::new(RecordDetails {
                load,
                network,
                sensor,
                timing,
                scores,
            })),
        }
    }

    /// Current scores without observing anything new.
    pub fn scores(&self) -> FamilyScores {
        self.aggregator.combine_scores(
            self.load.anomaly_score(),
            self.network.anomaly_score(),
            self.sensor.anomaly_score(),
            self.timing.anomaly_score(),
        )
    }

    pub fn samples_observed(&self) -> usize {
        self.load.len()
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use echotrace_telemetry::{MetricsProvider, SimulatedMetricsProvider};

    #[test]
    fn cold_start_scores_zero() {
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        for _ in 0..9 {
            let record = monitor.observe(provider.collect().unwrap());
            assert_eq!(record.anomaly_score, 0.0);
        }
        assert_eq!(monitor.samples_observed(), 9);
    }

    #[test]
    fn record_carries_raw_metrics_and_details() {
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        let mut record = None;
        for _ in 0..30 {
            record = Some(monitor.observe(provider.collect().unwrap()));
        }
        let record = record.unwrap();
        let details = record.details.as_ref().unwrap();
        assert_eq!(record.cpu_percent, details.load.cpu_percent);
        assert_eq!(record.network_rate, details.network.total_bytes_rate());
        assert_eq!(record.memory_percent, details.sensor.memory_percent);
        assert_eq!(record.anomaly_score, details.scores.overall);
        assert_eq!(details.scores, monitor.scores());
        assert!((0.0..=1.0).contains(&record.anomaly_score));
        // tick 30 is a cpu spike in the simulation
        assert!(details.scores.load > 0.0);
    }

    #[test]
    fn history_capacity_is_applied() {
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::with_capacity(12);
        for _ in 0..40 {
            monitor.observe(provider.collect().unwrap());
        }
        assert_eq!(monitor.samples_observed(), 12);
    }
}
