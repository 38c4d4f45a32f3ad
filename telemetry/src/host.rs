use crate::{diskstats, provider::MetricsProvider, timing::TimingTracker};
use chrono::{DateTime, Utc};
use echotrace_core::{
    HostSample, LoadSample, NetworkSample, SensorSample, TimingSample,
    history::DEFAULT_INTERVAL_HISTORY_CAPACITY,
};
use std::{collections::BTreeMap, time::Instant};
use sysinfo::{Components, Networks, System};

/// Cumulative counters sampled at a point in time. Rates are the difference between two of
/// these divided by the time between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Counters {
    bytes_sent: u64,
    bytes_recv: u64,
    packets_sent: u64,
    packets_recv: u64,
    disk_read: u64,
    disk_written: u64,
}

fn rate(current: u64, previous: u64, elapsed_s: f64) -> f64 {
    if elapsed_s <= 0.0 {
        return 0.0;
    }
    // counters can go backwards when an interface disappears
    current.saturating_sub(previous) as f64 / elapsed_s
}

/// Reads the live host through `sysinfo`. Disk throughput comes from `/proc/diskstats` and
/// reads as 0 on platforms without it.
pub struct HostMetricsProvider {
    system: System,
    previous: Counters,
    previous_at: Instant,
    disk_stats_available: bool,
    timing: TimingTracker,
}

impl HostMetricsProvider {
    pub fn new() -> Self {
        Self::with_interval_history(DEFAULT_INTERVAL_HISTORY_CAPACITY)
    }

    /// `capacity` bounds the number of tick intervals used for jitter.
    pub fn with_interval_history(capacity: usize) -> Self {
        let mut system = System::new();
        // cpu usage is computed between two refreshes so prime it here
        system.refresh_cpu_usage();
        system.refresh_memory();
        let (previous, disk_stats_available) = Self::read_counters();
        if !disk_stats_available {
            log::info!("disk counters unavailable; disk rates will read as 0");
        }
        Self {
            system,
            previous,
            previous_at: Instant::now(),
            disk_stats_available,
            timing: TimingTracker::with_capacity(capacity),
        }
    }

    fn read_counters() -> (Counters, bool) {
        let networks = Networks::new_with_refreshed_list();
        let mut counters = Counters::default();
        for data in networks.list().values() {
            counters.bytes_sent += data.total_transmitted();
            counters.bytes_recv += data.total_received();
            counters.packets_sent += data.total_packets_transmitted();
            counters.packets_recv += data.total_packets_received();
        }
        let disk_stats_available = match diskstats::read_disk_totals() {
            Some((read, written)) => {
                counters.disk_read = read;
                counters.disk_written = written;
                true
            }
            None => false,
        };
        (counters, disk_stats_available)
    }

    fn load_sample(&mut self, timestamp: DateTime<Utc>) -> LoadSample {
        self.system.refresh_cpu_usage();
        let cpu_percent = self.system.global_cpu_usage() as f64;
        let per_core = self
            .system
            .cpus()
            .iter()
            .map(|cpu| cpu.cpu_usage() as f64)
            .collect::<Vec<_>>();
        let load_avg = System::load_average().one;
        LoadSample {
            cpu_percent,
            cpu_count: per_core.len(),
            per_core,
            load_avg_1m: if load_avg.is_finite() && load_avg >= 0.0 {
                load_avg
            } else {
                cpu_percent / 100.0
            },
            timestamp,
        }
    }

    fn temperatures() -> BTreeMap<String, Vec<f64>> {
        let components = Components::new_with_refreshed_list();
        let mut temperatures = BTreeMap::<String, Vec<f64>>::new();
        for component in components.list() {
            if let Some(celsius) = component.temperature() {
                if celsius.is_finite() {
                    temperatures
                        .entry(component.label().to_string())
                        .or_default()
                        .push(celsius as f64);
                }
            }
        }
        temperatures
    }

    fn sensor_sample(
        &mut self,
        disk_read_rate: f64,
        disk_write_rate: f64,
        timestamp: DateTime<Utc>,
    ) -> SensorSample {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        let available = self.system.available_memory();
        let memory_percent = if total > 0 {
            (total.saturating_sub(available) as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        SensorSample {
            temperatures: Self::temperatures(),
            disk_read_rate,
            disk_write_rate,
            memory_percent,
            memory_available: available,
            timestamp,
        }
    }
}

impl Default for HostMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for HostMetricsProvider {
    fn collect(&mut self) -> anyhow::Result<HostSample> {
        let timestamp = Utc::now();
        let now = Instant::now();
        let elapsed_s = now.duration_since(self.previous_at).as_secs_f64();
        let (current, disk_stats_available) = Self::read_counters();
        if disk_stats_available != self.disk_stats_available {
            log::warn!("disk counters became {}", if disk_stats_available {
                "available"
            } else {
                "unavailable"
            });
            self.disk_stats_available = disk_stats_available;
        }
        let previous = std::mem::replace(&mut self.previous, current);
        self.previous_at = now;

        let network = NetworkSample {
            bytes_sent_rate: rate(current.bytes_sent, previous.bytes_sent, elapsed_s),
            bytes_recv_rate: rate(current.bytes_recv, previous.bytes_recv, elapsed_s),
            packets_sent_rate: rate(
                current.packets_sent,
                previous.packets_sent,
                elapsed_s,
            ),
            packets_recv_rate: rate(
                current.packets_recv,
                previous.packets_recv,
                elapsed_s,
            ),
            timestamp,
        };
        let (disk_read_rate, disk_write_rate) = if disk_stats_available {
            (
                rate(current.disk_read, previous.disk_read, elapsed_s),
                rate(current.disk_written, previous.disk_written, elapsed_s),
            )
        } else {
            (0.0, 0.0)
        };
        let load = self.load_sample(timestamp);
        let sensor =
            self.sensor_sample(disk_read_rate, disk_write_rate, timestamp);
        let timing = TimingSample {
            timestamp,
            ..self.timing.tick()
        };
        Ok(HostSample {
            load,
            network,
            sensor,
            timing,
        })
    }
}
