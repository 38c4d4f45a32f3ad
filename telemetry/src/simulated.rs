use crate::{provider::MetricsProvider, timing::TimingTracker};
use chrono::Utc;
use echotrace_core::{
    HostSample, LoadSample, NetworkSample, SensorSample,
};
use std::collections::BTreeMap;

const SIMULATED_CORES: usize = 4;
const SIMULATED_MEMORY_BYTES: f64 = 16.0 * 1024.0 * 1024.0 * 1024.0;
pub const DEFAULT_SIMULATED_INTERVAL_S: f64 = 0.1;

/// Deterministic synthetic host: smooth periodic load with spikes on fixed ticks. Useful for
/// demonstrations and for hosts where live readings are unavailable.
pub struct SimulatedMetricsProvider {
    tick: u64,
    interval_s: f64,
    uptime_s: f64,
    timing: TimingTracker,
}

impl SimulatedMetricsProvider {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_SIMULATED_INTERVAL_S)
    }

    /// `interval_s` is the nominal time between simulated ticks.
    pub fn with_interval(interval_s: f64) -> Self {
        Self::with_timing(interval_s, TimingTracker::new())
    }

    pub fn with_timing(interval_s: f64, timing: TimingTracker) -> Self {
        Self {
            tick: 0,
            interval_s: interval_s.max(0.0),
            uptime_s: 0.0,
            timing,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl Default for SimulatedMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for SimulatedMetricsProvider {
    fn collect(&mut self) -> anyhow::Result<HostSample> {
        self.tick = self.tick.saturating_add(1);
        let timestamp = Utc::now();
        let phase = self.tick as f64 / 8.0;

        let mut cpu = 45.0 + phase.sin() * 20.0;
        if self.tick % 30 == 0 {
            cpu = 95.0;
        }
        let per_core = (0..SIMULATED_CORES)
            .map(|i| (cpu + (phase + i as f64).cos() * 5.0).clamp(0.0, 100.0))
            .collect::<Vec<_>>();
        let cpu = cpu.clamp(0.0, 100.0);

        let mut bytes_recv = 50_000.0 + (phase * 0.5).sin() * 20_000.0;
        let mut bytes_sent = 20_000.0 + (phase * 0.3).cos() * 8_000.0;
        if self.tick % 37 == 0 {
            bytes_recv *= 20.0;
            bytes_sent *= 20.0;
        }

        let mut memory = 55.0 + (phase * 0.7).sin() * 12.0;
        if self.tick % 47 == 0 {
            memory = 93.0;
        }
        let memory = memory.clamp(0.0, 100.0);

        let mut disk = 1_000_000.0 + (phase * 0.2).sin() * 200_000.0;
        if self.tick % 83 == 0 {
            disk = 50_000_000.0;
        }

        let mut interval = self.interval_s;
        if self.tick % 23 == 0 {
            interval += 0.25;
        }
        self.uptime_s += interval;

        let mut temperatures = BTreeMap::new();
        temperatures.insert(
            "cpu".to_string(),
            vec![50.0 + phase.sin() * 10.0, 48.0 + phase.cos() * 8.0],
        );

        Ok(HostSample {
            load: LoadSample {
                cpu_percent: cpu,
                per_core,
                cpu_count: SIMULATED_CORES,
                load_avg_1m: cpu / 100.0 * SIMULATED_CORES as f64,
                timestamp,
            },
            network: NetworkSample {
                bytes_sent_rate: bytes_sent,
                bytes_recv_rate: bytes_recv,
                packets_sent_rate: bytes_sent / 1000.0,
                packets_recv_rate: bytes_recv / 1000.0,
                timestamp,
            },
            sensor: SensorSample {
                temperatures,
                disk_read_rate: disk * 0.6,
                disk_write_rate: disk * 0.4,
                memory_percent: memory,
                memory_available: (SIMULATED_MEMORY_BYTES
                    * (1.0 - memory / 100.0))
                    as u64,
                timestamp,
            },
            timing: self.timing.record(interval, self.uptime_s),
        })
    }
}
