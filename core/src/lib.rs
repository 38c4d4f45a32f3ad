pub mod sig;
pub use sig::{Buf, ConstBuf, Sig, SigCtx, SigT};
pub mod sig_ops;
pub mod waveform;
pub use waveform::{WaveformBuffer, num_samples};
pub mod history;
pub use history::RollingHistory;
pub mod metrics;
pub use metrics::{
    CombinedMetricsRecord, FamilyScores, HostSample, LoadSample,
    NetworkSample, RecordDetails, SensorSample, TimingSample,
};
