use anyhow::Context;
use echotrace_core::history::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_INTERVAL_HISTORY_CAPACITY,
};
use echotrace_patches::SynthConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Samples kept per scorer. default: 100
    pub history_capacity: usize,
    /// Tick intervals kept for jitter. default: 50
    pub interval_history_capacity: usize,
    /// Seconds between ticks. default: 0.1
    pub sample_interval_s: f64,
    /// Seconds of audio rendered per tick. default: 0.1
    pub sound_duration_s: f64,
    /// Log a status line every this many ticks; 0 disables it. default: 10
    pub status_every: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            interval_history_capacity: DEFAULT_INTERVAL_HISTORY_CAPACITY,
            sample_interval_s: 0.1,
            sound_duration_s: 0.1,
            status_every: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub synth: SynthConfig,
    pub monitor: MonitorConfig,
}

impl Config {
    /// Reads a JSON config. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json_string = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json_string)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.synth.sample_rate_hz > 0,
            "sample rate must be positive"
        );
        anyhow::ensure!(self.synth.channels > 0, "channel count must be positive");
        anyhow::ensure!(
            self.monitor.sample_interval_s.is_finite()
                && self.monitor.sample_interval_s >= 0.0,
            "sample interval must be a non-negative number of seconds (got {})",
            self.monitor.sample_interval_s
        );
        anyhow::ensure!(
            self.monitor.sound_duration_s.is_finite()
                && self.monitor.sound_duration_s > 0.0,
            "sound duration must be a positive number of seconds (got {})",
            self.monitor.sound_duration_s
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"monitor": {{"status_every": 3}}}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.monitor.status_every, 3);
        assert_eq!(config.monitor.history_capacity, 100);
        assert_eq!(config.synth.sample_rate_hz, 22050);
        assert_eq!(config.synth.channels, 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"synth": {{"sample_rate_hz": 0}}}}"#).unwrap();
        assert!(Config::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(file.path()).is_err());

        assert!(Config::load("/nonexistent/echotrace.json").is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        let mut config = Config::default();
        config.monitor.sound_duration_s = 0.0;
        assert!(config.validate().is_err());
    }
}
