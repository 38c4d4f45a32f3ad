/// Number of samples in a waveform of the given duration, rounded to the nearest sample.
pub fn num_samples(sample_rate_hz: u32, duration_s: f64) -> usize {
    if duration_s <= 0.0 || !duration_s.is_finite() {
        return 0;
    }
    (sample_rate_hz as f64 * duration_s).round() as usize
}

/// A fixed-length sequence of mono samples, nominally in the range -1..1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformBuffer {
    samples: Vec<f32>,
}

impl WaveformBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn silence(num_samples: usize) -> Self {
        Self {
            samples: vec![0.0; num_samples],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.samples.iter()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.samples
    }

    pub fn duration_s(&self, sample_rate_hz: u32) -> f64 {
        if sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / sample_rate_hz as f64
    }

    /// The largest absolute sample value, or 0 for an empty buffer. NaN samples count as
    /// infinitely loud.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |acc: f32, x| {
            if x.is_nan() {
                f32::INFINITY
            } else {
                acc.max(x.abs())
            }
        })
    }

    /// Adds `other` sample-wise into `self`. If `other` is longer, the extra samples are appended.
    pub fn mix(&mut self, other: &WaveformBuffer) {
        for (out, x) in self.samples.iter_mut().zip(other.samples.iter()) {
            *out += x;
        }
        if other.samples.len() > self.samples.len() {
            self.samples
                .extend_from_slice(&other.samples[self.samples.len()..]);
        }
    }

    /// Scales the buffer down so its peak is exactly 1.0 when the peak exceeds 1.0. Quieter
    /// buffers, including silence, are left unchanged. NaN samples become 0 and infinite
    /// samples are treated as the largest finite value.
    pub fn normalize_peak(&mut self) {
        for x in self.samples.iter_mut() {
            if x.is_nan() {
                *x = 0.0;
            } else if x.is_infinite() {
                *x = f32::MAX.copysign(*x);
            }
        }
        let peak = self.peak();
        if peak > 1.0 {
            for x in self.samples.iter_mut() {
                *x /= peak;
            }
        }
    }

    /// Appends `other` to the end of `self`.
    pub fn append(&mut self, other: &WaveformBuffer) {
        self.samples.extend_from_slice(&other.samples);
    }

    pub fn concat<'a>(
        buffers: impl IntoIterator<Item = &'a WaveformBuffer>,
    ) -> Self {
        let mut out = Self::new();
        for buffer in buffers {
            out.append(buffer);
        }
        out
    }
}

impl From<Vec<f32>> for WaveformBuffer {
    fn from(samples: Vec<f32>) -> Self {
        Self { samples }
    }
}

impl FromIterator<f32> for WaveformBuffer {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn num_samples_rounds() {
        assert_eq!(num_samples(22050, 0.1), 2205);
        assert_eq!(num_samples(22050, 0.2), 4410);
        assert_eq!(num_samples(22050, 0.0), 0);
        assert_eq!(num_samples(22050, -1.0), 0);
    }

    #[test]
    fn normalize_only_when_clipping() {
        let mut quiet = WaveformBuffer::from(vec![0.5, -0.25]);
        quiet.normalize_peak();
        assert_eq!(quiet.as_slice(), &[0.5, -0.25]);

        let mut loud = WaveformBuffer::from(vec![2.0, -4.0, 1.0]);
        loud.normalize_peak();
        assert_eq!(loud.as_slice(), &[0.5, -1.0, 0.25]);
        assert_eq!(loud.peak(), 1.0);

        let mut silence = WaveformBuffer::silence(3);
        silence.normalize_peak();
        assert_eq!(silence.as_slice(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn non_finite_samples_are_visible_and_normalized() {
        let buf = WaveformBuffer::from(vec![0.1, f32::NAN]);
        assert_eq!(buf.peak(), f32::INFINITY);

        let mut buf =
            WaveformBuffer::from(vec![f32::NAN, f32::NEG_INFINITY, 0.0, 2.0]);
        buf.normalize_peak();
        assert!(buf.iter().all(|x| x.is_finite() && x.abs() <= 1.0));
        assert_eq!(buf.as_slice()[0], 0.0);
        assert_eq!(buf.as_slice()[1], -1.0);
    }

    #[test]
    fn mix_adds_samples() {
        let mut a = WaveformBuffer::from(vec![0.1, 0.2]);
        a.mix(&WaveformBuffer::from(vec![0.1, 0.1, 0.5]));
        assert_eq!(a.len(), 3);
        assert!((a.as_slice()[0] - 0.2).abs() < 1e-6);
        assert!((a.as_slice()[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn concat_preserves_order() {
        let a = WaveformBuffer::from(vec![1.0]);
        let b = WaveformBuffer::from(vec![2.0, 3.0]);
        let c = WaveformBuffer::concat([&a, &b]);
        assert_eq!(c.as_slice(), &[1.0, 2.0, 3.0]);
        assert!(WaveformBuffer::concat(Vec::<&WaveformBuffer>::new()).is_empty());
    }
}
