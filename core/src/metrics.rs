use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
    pub cpu_percent: f64,
    pub per_core: Vec<f64>,
    pub cpu_count: usize,
    /// 1-minute load average, or `cpu_percent / 100` where the platform has none.
    pub load_avg_1m: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSample {
    pub bytes_sent_rate: f64,
    pub bytes_recv_rate: f64,
    pub packets_sent_rate: f64,
    pub packets_recv_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl NetworkSample {
    /// Bytes per second in both directions.
    pub fn total_bytes_rate(&self) -> f64 {
        self.bytes_sent_rate + self.bytes_recv_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Readings in degrees Celsius keyed by sensor label. Empty when the host exposes none.
    pub temperatures: BTreeMap<String, Vec<f64>>,
    pub disk_read_rate: f64,
    pub disk_write_rate: f64,
    pub memory_percent: f64,
    pub memory_available: u64,
    pub timestamp: DateTime<Utc>,
}

impl SensorSample {
    pub fn disk_total_rate(&self) -> f64 {
        self.disk_read_rate + self.disk_write_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSample {
    /// Seconds since the previous tick.
    pub interval: f64,
    pub avg_interval: f64,
    /// Mean absolute deviation of recent intervals, in seconds.
    pub jitter: f64,
    pub uptime: f64,
    pub timestamp: DateTime<Utc>,
}

/// Everything the telemetry layer produces in one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSample {
    pub load: LoadSample,
    pub network: NetworkSample,
    pub sensor: SensorSample,
    pub timing: TimingSample,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyScores {
    pub load: f64,
    pub network: f64,
    pub sensor: f64,
    pub timing: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDetails {
    pub load: LoadSample,
    pub network: NetworkSample,
    pub sensor: SensorSample,
    pub timing: TimingSample,
    pub scores: FamilyScores,
}

/// The per-tick input to the synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedMetricsRecord {
    pub cpu_percent: f64,
    /// Bytes per second.
    pub network_rate: f64,
    pub memory_percent: f64,
    pub anomaly_score: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<RecordDetails>>,
}

impl CombinedMetricsRecord {
    pub fn new(
        cpu_percent: f64,
        network_rate: f64,
        memory_percent: f64,
        anomaly_score: f64,
    ) -> Self {
        Self {
            cpu_percent,
            network_rate,
            memory_percent,
            anomaly_score,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Checks that the fields the synthesizer reads are finite and non-negative. Records built
    /// by the monitor always pass; this is for records that arrive from outside the process.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("cpu_percent", self.cpu_percent),
            ("network_rate", self.network_rate),
            ("memory_percent", self.memory_percent),
            ("anomaly_score", self.anomaly_score),
        ] {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "{} must be finite and non-negative (got {})",
                name,
                value
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validate_rejects_bad_fields() {
        assert!(CombinedMetricsRecord::new(50.0, 1e6, 60.0, 0.3)
            .validate()
            .is_ok());
        assert!(CombinedMetricsRecord::new(f64::NAN, 0.0, 0.0, 0.0)
            .validate()
            .is_err());
        assert!(CombinedMetricsRecord::new(0.0, -1.0, 0.0, 0.0)
            .validate()
            .is_err());
        assert!(CombinedMetricsRecord::new(0.0, 0.0, 0.0, f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn record_json_omits_missing_details() {
        let record = CombinedMetricsRecord::new(10.0, 0.0, 20.0, 0.0);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("details"));
        let parsed: CombinedMetricsRecord =
            serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
