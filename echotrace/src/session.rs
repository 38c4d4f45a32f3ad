use crate::{
    config::MonitorConfig, metrics_log::MetricsLog, monitor::SystemMonitor,
    status,
};
use anyhow::Context;
use echotrace_core::{CombinedMetricsRecord, WaveformBuffer};
use echotrace_patches::SoundSynthesizer;
use echotrace_telemetry::MetricsProvider;
use std::path::{Path, PathBuf};

/// What a finished session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub sample_count: u64,
    pub captured_buffers: usize,
    pub captured_s: f64,
    /// Set when captured audio was written to a file.
    pub output: Option<PathBuf>,
}

/// State carried between ticks of the sampling loop.
pub struct Session {
    sample_count: u64,
    sound_duration_s: f64,
    status_every: u64,
    capture: Option<Vec<WaveformBuffer>>,
    metrics_log: Option<MetricsLog>,
}

impl Session {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            sample_count: 0,
            sound_duration_s: config.sound_duration_s,
            status_every: config.status_every,
            capture: None,
            metrics_log: None,
        }
    }

    /// Keep every rendered buffer so it can be written out by `finish`.
    pub fn capturing(mut self) -> Self {
        self.capture = Some(Vec::new());
        self
    }

    pub fn with_metrics_log(mut self, metrics_log: MetricsLog) -> Self {
        self.metrics_log = Some(metrics_log);
        self
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    /// Collects one sample, scores it, renders it, then captures it and appends it to the metrics
    /// log when those are enabled.
    pub fn tick(
        &mut self,
        provider: &mut impl MetricsProvider,
        monitor: &mut SystemMonitor,
        synth: &SoundSynthesizer,
    ) -> anyhow::Result<CombinedMetricsRecord> {
        let sample = provider.collect().context("collecting telemetry")?;
        let record = monitor.observe(sample);
        self.sample_count += 1;
        let sound = synth.render(&record, self.sound_duration_s);
        if let Some(capture) = self.capture.as_mut() {
            capture.push(sound);
        }
        if let Some(metrics_log) = self.metrics_log.as_mut() {
            metrics_log.append(&record)?;
        }
        Ok(record)
    }

    /// The status line for `record` when the latest tick falls on the status cadence.
    pub fn status(&self, record: &CombinedMetricsRecord) -> Option<String> {
        (self.status_every > 0
            && self.sample_count > 0
            && self.sample_count % self.status_every == 0)
            .then(|| status::status_line(self.sample_count, record))
    }

    /// All captured buffers in tick order.
    pub fn captured(&self) -> WaveformBuffer {
        match self.capture.as_ref() {
            Some(capture) => WaveformBuffer::concat(capture),
            None => WaveformBuffer::new(),
        }
    }

    /// Flushes the metrics log and, if anything was captured and `output` is given, writes the
    /// captured audio as a WAV file.
    pub fn finish(
        mut self,
        output: Option<&Path>,
        synth: &SoundSynthesizer,
    ) -> anyhow::Result<SessionSummary> {
        if let Some(metrics_log) = self.metrics_log.as_mut() {
            metrics_log.flush()?;
            log::info!(
                "logged {} records to {}",
                metrics_log.records_written(),
                metrics_log.path().display()
            );
        }
        let captured_buffers = self.capture.as_ref().map_or(0, Vec::len);
        let audio = self.captured();
        let output = match output {
            Some(path) if captured_buffers > 0 => {
                echotrace_audio_file::write_wav(
                    path,
                    &audio,
                    synth.sample_rate_hz(),
                    synth.channels(),
                )?;
                Some(path.to_path_buf())
            }
            _ => None,
        };
        Ok(SessionSummary {
            sample_count: self.sample_count,
            captured_buffers,
            captured_s: audio.duration_s(synth.sample_rate_hz()),
            output,
        })
    }
}

/// Renders previously logged records. Every record is validated first so a bad log fails before
/// any audio is produced.
pub fn replay(
    records: &[CombinedMetricsRecord],
    synth: &SoundSynthesizer,
    duration_per_record_s: f64,
) -> anyhow::Result<WaveformBuffer> {
    for (i, record) in records.iter().enumerate() {
        record
            .validate()
            .with_context(|| format!("invalid record {}", i + 1))?;
    }
    Ok(synth.soundscape(records, duration_per_record_s))
}

#[cfg(test)]
mod test {
    use super::*;
    use echotrace_patches::SynthConfig;
    use echotrace_telemetry::SimulatedMetricsProvider;

    fn synth() -> SoundSynthesizer {
        SoundSynthesizer::new(SynthConfig::default())
    }

    #[test]
    fn capturing_session_writes_wav() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.wav");
        let synth = synth();
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        let mut session = Session::new(&MonitorConfig::default()).capturing();
        for _ in 0..12 {
            session.tick(&mut provider, &mut monitor, &synth).unwrap();
        }
        assert_eq!(session.sample_count(), 12);
        let summary = session.finish(Some(&output), &synth).unwrap();
        assert_eq!(summary.captured_buffers, 12);
        assert_eq!(summary.output.as_deref(), Some(output.as_path()));
        assert!((summary.captured_s - 1.2).abs() < 1e-9);

        let (spec, audio) = echotrace_audio_file::read_wav_mono(&output).unwrap();
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(audio.len(), 12 * 2205);
    }

    #[test]
    fn session_without_capture_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.wav");
        let synth = synth();
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        let mut session = Session::new(&MonitorConfig::default());
        session.tick(&mut provider, &mut monitor, &synth).unwrap();
        assert!(session.captured().is_empty());
        let summary = session.finish(Some(&output), &synth).unwrap();
        assert_eq!(summary.output, None);
        assert_eq!(summary.sample_count, 1);
        assert!(!output.exists());
    }

    #[test]
    fn session_logs_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("metrics.jsonl");
        let synth = synth();
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        let mut session = Session::new(&MonitorConfig::default())
            .with_metrics_log(MetricsLog::create(&log_path).unwrap());
        let mut records = Vec::new();
        for _ in 0..5 {
            records.push(session.tick(&mut provider, &mut monitor, &synth).unwrap());
        }
        session.finish(None, &synth).unwrap();
        let logged = crate::metrics_log::read_metrics_log(&log_path).unwrap();
        assert_eq!(logged, records);
    }

    #[test]
    fn replay_renders_each_record() {
        let records = vec![
            CombinedMetricsRecord::new(20.0, 50.0, 30.0, 0.1),
            CombinedMetricsRecord::new(90.0, 1e6, 85.0, 0.8),
        ];
        let audio = replay(&records, &synth(), 0.1).unwrap();
        assert_eq!(audio.len(), 2 * 2205);
        assert!(audio.peak() <= 1.0);
    }

    #[test]
    fn status_follows_cadence() {
        let synth = synth();
        let mut provider = SimulatedMetricsProvider::new();
        let mut monitor = SystemMonitor::new();
        let config = MonitorConfig {
            status_every: 3,
            ..MonitorConfig::default()
        };
        let mut session = Session::new(&config);
        let due = (1..=6)
            .map(|_| {
                let record =
                    session.tick(&mut provider, &mut monitor, &synth).unwrap();
                session.status(&record).is_some()
            })
            .collect::<Vec<_>>();
        assert_eq!(due, vec![false, false, true, false, false, true]);

        let silent = Session::new(&MonitorConfig {
            status_every: 0,
            ..MonitorConfig::default()
        });
        let record = CombinedMetricsRecord::new(1.0, 1.0, 1.0, 0.0);
        assert_eq!(silent.status(&record), None);
    }

    #[test]
    fn replay_of_huge_values_stays_in_range() {
        let records = vec![CombinedMetricsRecord::new(1e40, 0.0, 50.0, 0.0)];
        let audio = replay(&records, &synth(), 0.1).unwrap();
        assert_eq!(audio.len(), 2205);
        assert!(audio.iter().all(|x| x.is_finite() && x.abs() <= 1.0));
    }

    #[test]
    fn replay_rejects_invalid_records() {
        let records = vec![
            CombinedMetricsRecord::new(20.0, 50.0, 30.0, 0.1),
            CombinedMetricsRecord::new(20.0, -5.0, 30.0, 0.1),
        ];
        let err = replay(&records, &synth(), 0.1).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid record 2"));
    }
}
