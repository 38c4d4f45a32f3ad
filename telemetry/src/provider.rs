use crate::{
    host::HostMetricsProvider, simulated::SimulatedMetricsProvider,
    timing::TimingTracker,
};
use echotrace_core::HostSample;

/// A source of one telemetry sample per tick.
pub trait MetricsProvider {
    fn collect(&mut self) -> anyhow::Result<HostSample>;
}

/// Either the live host or the simulated one, chosen at startup.
pub enum ActiveMetricsProvider {
    Host(Box<HostMetricsProvider>),
    Simulated(SimulatedMetricsProvider),
}

impl ActiveMetricsProvider {
    pub fn new(simulate: bool) -> Self {
        if simulate {
            Self::Simulated(SimulatedMetricsProvider::new())
        } else {
            Self::Host(Box::new(HostMetricsProvider::new()))
        }
    }

    /// `interval_s` is only used by the simulated provider, which doesn't wait in real time.
    pub fn with_options(
        simulate: bool,
        interval_s: f64,
        interval_history_capacity: usize,
    ) -> Self {
        if simulate {
            Self::Simulated(SimulatedMetricsProvider::with_timing(
                interval_s,
                TimingTracker::with_capacity(interval_history_capacity),
            ))
        } else {
            Self::Host(Box::new(HostMetricsProvider::with_interval_history(
                interval_history_capacity,
            )))
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }
}

impl MetricsProvider for ActiveMetricsProvider {
    fn collect(&mut self) -> anyhow::Result<HostSample> {
        match self {
            Self::Host(provider) => provider.collect(),
            Self::Simulated(provider) => provider.collect(),
        }
    }
}
