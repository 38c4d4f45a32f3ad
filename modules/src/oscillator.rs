use echotrace_core::{Buf, Sig, SigCtx, SigT};

pub mod waveform {
    use std::f32::consts::PI;

    pub trait Waveform: Copy {
        fn sample(&self, state_01: f32) -> f32;
    }

    #[derive(Clone, Copy)]
    pub struct Sine;
    impl Waveform for Sine {
        fn sample(&self, state_01: f32) -> f32 {
            (state_01 * PI * 2.0).sin()
        }
    }
}

pub use waveform::{Sine, Waveform};

pub struct Oscillator<W, F>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    first_frame: bool,
    state_01: f32,
    waveform: W,
    freq_hz: F,
    buf: Vec<f32>,
}

impl<W, F> SigT for Oscillator<W, F>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        let buf_freq_hz = self.freq_hz.sample(ctx);
        self.buf.clear();
        for freq_hz in buf_freq_hz.iter() {
            if self.first_frame {
                self.first_frame = false;
                self.state_01 = 0.0;
            } else {
                let state_delta = freq_hz / ctx.sample_rate_hz;
                self.state_01 += state_delta;
                // keep the phase small so precision doesn't degrade over long renders
                self.state_01 = self.state_01 - (self.state_01 - 0.5).round();
            }
            self.buf.push(self.waveform.sample(self.state_01));
        }
        &self.buf
    }
}

/// A signal which oscillates with a given waveform at a given frequency, starting at phase 0.
pub fn oscillator<W, F>(waveform: W, freq_hz: F) -> Sig<Oscillator<W, F>>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    Sig(Oscillator {
        first_frame: true,
        state_01: 0.0,
        waveform,
        freq_hz,
        buf: Vec::new(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn sine_matches_closed_form() {
        let sample_rate_hz = 1000.0;
        let freq_hz = 3.0;
        let buf = oscillator(Sine, freq_hz).render(sample_rate_hz, 500);
        for (i, &x) in buf.iter().enumerate() {
            let t = i as f32 / sample_rate_hz;
            let expected = (2.0 * PI * freq_hz * t).sin();
            assert!((x - expected).abs() < 1e-3, "sample {}: {} vs {}", i, x, expected);
        }
    }

    #[test]
    fn sine_stays_in_range() {
        let buf = oscillator(Sine, 440.0).render(22050.0, 22050);
        assert!(buf.peak() <= 1.0);
        assert_eq!(buf.as_slice()[0], 0.0);
    }
}
