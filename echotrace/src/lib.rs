pub use echotrace_anomaly as anomaly;
pub use echotrace_audio_file as audio_file;
pub use echotrace_core::{history, metrics, sig, sig_ops, waveform};
pub use echotrace_modules as modules;
pub use echotrace_patches as patches;
pub use echotrace_telemetry as telemetry;

pub mod config;
pub mod metrics_log;
pub mod monitor;
pub mod session;
pub mod status;

pub mod prelude {
    pub use crate::config::{Config, MonitorConfig};
    pub use crate::metrics_log::{MetricsLog, read_metrics_log};
    pub use crate::monitor::SystemMonitor;
    pub use crate::session::{Session, SessionSummary, replay};
    pub use echotrace_anomaly::{AnomalyScorer, ScoreAggregator};
    pub use echotrace_audio_file::{encode, read_wav_mono, write_wav};
    pub use echotrace_core::{
        CombinedMetricsRecord, FamilyScores, HostSample, WaveformBuffer,
    };
    pub use echotrace_patches::{SoundSynthesizer, SynthConfig};
    pub use echotrace_telemetry::{
        ActiveMetricsProvider, HostMetricsProvider, MetricsProvider,
        SimulatedMetricsProvider,
    };
}
