use echotrace_core::{CombinedMetricsRecord, WaveformBuffer, num_samples};
use echotrace_modules::{Sine, fade_in_out, noise, oscillator};
use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;

/// Length of the fade at each end of a tone.
pub const FADE_S: f64 = 0.01;

/// Major triad.
pub const DEFAULT_CHORD_RATIOS: [f32; 3] = [1.0, 1.25, 1.5];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// default: 22050
    pub sample_rate_hz: u32,
    /// default: 1
    pub channels: u16,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 22050,
            channels: 1,
        }
    }
}

/// Largest frequency or amplitude a parameter can take. Leaves headroom so the tritone and the
/// sum of all layers stay finite in `f32`.
const PARAM_CEILING: f64 = f32::MAX as f64 / 4.0;

/// Narrows to `f32` without overflowing to infinity.
fn saturate(x: f64) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, PARAM_CEILING) as f32
    }
}

/// Acoustic parameters derived from one metrics record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundParams {
    /// 200Hz at 0% CPU up to 800Hz at 100% CPU.
    pub base_frequency_hz: f32,
    /// 1Hz with no traffic up to 10Hz at 10MB/s and above.
    pub pulse_rate_hz: f32,
    /// 0.1 at 0% memory up to 0.5 at 100% memory.
    pub amplitude: f32,
    /// Whether there is enough network activity to pulse rather than hold a steady tone.
    pub pulsing: bool,
    /// Amplitude of the tritone above the base frequency, if the anomaly score calls for one.
    pub dissonance_amplitude: Option<f32>,
    /// Amplitude of the white noise layer, if the anomaly score calls for one.
    pub noise_amplitude: Option<f32>,
}

impl SoundParams {
    pub const MIN_FREQUENCY_HZ: f64 = 200.0;
    pub const FREQUENCY_SPAN_HZ: f64 = 600.0;
    /// Network rate treated as maximum activity, in bytes per second.
    pub const NETWORK_FULL_SCALE: f64 = 10_000_000.0;
    /// Network rate above which the sound pulses, in bytes per second.
    pub const PULSE_THRESHOLD: f64 = 100.0;
    pub const DISSONANCE_THRESHOLD: f64 = 0.3;
    pub const NOISE_THRESHOLD: f64 = 0.6;

    pub fn from_record(record: &CombinedMetricsRecord) -> Self {
        let base_frequency_hz = Self::MIN_FREQUENCY_HZ
            + (record.cpu_percent / 100.0) * Self::FREQUENCY_SPAN_HZ;
        let network_normalized =
            (record.network_rate / Self::NETWORK_FULL_SCALE).min(1.0);
        let pulse_rate_hz = 1.0 + network_normalized * 9.0;
        let amplitude = 0.1 + (record.memory_percent / 100.0) * 0.4;
        let anomaly = record.anomaly_score;
        Self {
            base_frequency_hz: saturate(base_frequency_hz),
            pulse_rate_hz: saturate(pulse_rate_hz),
            amplitude: saturate(amplitude),
            pulsing: record.network_rate > Self::PULSE_THRESHOLD,
            dissonance_amplitude: (anomaly > Self::DISSONANCE_THRESHOLD)
                .then(|| saturate(amplitude * anomaly * 0.5)),
            noise_amplitude: (anomaly > Self::NOISE_THRESHOLD)
                .then(|| saturate(amplitude * anomaly * 0.3)),
        }
    }
}

/// Renders metrics records as audio. All operations are pure functions of their arguments except
/// that noise is drawn from an OS-seeded random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundSynthesizer {
    config: SynthConfig,
}

impl SoundSynthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.config.sample_rate_hz
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn num_samples(&self, duration_s: f64) -> usize {
        num_samples(self.config.sample_rate_hz, duration_s)
    }

    fn fade_samples(&self) -> usize {
        (self.config.sample_rate_hz as f64 * FADE_S) as usize
    }

    /// A sine wave with a short linear fade at each end to avoid clicks.
    pub fn tone(
        &self,
        frequency_hz: f32,
        duration_s: f64,
        amplitude: f32,
    ) -> WaveformBuffer {
        let n = self.num_samples(duration_s);
        let sig = oscillator(Sine, frequency_hz)
            * fade_in_out(n, self.fade_samples())
            * amplitude;
        sig.render(self.config.sample_rate_hz as f32, n)
    }

    /// Sum of tones at `base_frequency_hz` times each ratio, sharing `amplitude` equally.
    pub fn chord(
        &self,
        base_frequency_hz: f32,
        duration_s: f64,
        interval_ratios: &[f32],
        amplitude: f32,
    ) -> WaveformBuffer {
        let mut out = WaveformBuffer::silence(self.num_samples(duration_s));
        if interval_ratios.is_empty() {
            return out;
        }
        let voice_amplitude = amplitude / interval_ratios.len() as f32;
        for &ratio in interval_ratios {
            out.mix(&self.tone(
                base_frequency_hz * ratio,
                duration_s,
                voice_amplitude,
            ));
        }
        out
    }

    /// A sine carrier whose volume rises and falls `pulse_rate_hz` times per second.
    pub fn pulse(
        &self,
        frequency_hz: f32,
        pulse_rate_hz: f32,
        duration_s: f64,
        amplitude: f32,
    ) -> WaveformBuffer {
        let n = self.num_samples(duration_s);
        let modulator = oscillator(Sine, pulse_rate_hz).signed_to_01();
        let sig = oscillator(Sine, frequency_hz) * modulator * amplitude;
        sig.render(self.config.sample_rate_hz as f32, n)
    }

    /// Uniform white noise in the range -amplitude..amplitude.
    pub fn noise(&self, duration_s: f64, amplitude: f32) -> WaveformBuffer {
        let n = self.num_samples(duration_s);
        (noise::white() * amplitude).render(self.config.sample_rate_hz as f32, n)
    }

    /// Renders one metrics record. The result never exceeds 1.0 in absolute value.
    pub fn render(
        &self,
        record: &CombinedMetricsRecord,
        duration_s: f64,
    ) -> WaveformBuffer {
        let params = SoundParams::from_record(record);
        let mut sound = if params.pulsing {
            self.pulse(
                params.base_frequency_hz,
                params.pulse_rate_hz,
                duration_s,
                params.amplitude,
            )
        } else {
            self.tone(params.base_frequency_hz, duration_s, params.amplitude)
        };
        if let Some(amplitude) = params.dissonance_amplitude {
            sound.mix(&self.tone(
                params.base_frequency_hz * SQRT_2,
                duration_s,
                amplitude,
            ));
        }
        if let Some(amplitude) = params.noise_amplitude {
            sound.mix(&self.noise(duration_s, amplitude));
        }
        sound.normalize_peak();
        sound
    }

    /// Renders each record in turn and concatenates the results.
    pub fn soundscape(
        &self,
        records: &[CombinedMetricsRecord],
        duration_per_sample_s: f64,
    ) -> WaveformBuffer {
        let mut out = WaveformBuffer::new();
        for record in records {
            out.append(&self.render(record, duration_per_sample_s));
        }
        log::debug!(
            "rendered soundscape of {} records ({} samples)",
            records.len(),
            out.len()
        );
        out
    }
}
