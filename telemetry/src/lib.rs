pub mod provider;
pub use provider::{ActiveMetricsProvider, MetricsProvider};

pub mod host;
pub use host::HostMetricsProvider;

pub mod simulated;
pub use simulated::SimulatedMetricsProvider;

pub mod timing;
pub use timing::TimingTracker;

pub mod diskstats;
