use echotrace_core::{Sig, SigCtx, SigT};

/// Gain signal for a waveform of `num_samples` samples which ramps linearly from 0 to 1 over the
/// first `fade_samples` samples and from 1 to 0 over the last `fade_samples` samples. Both ramps
/// include their end points. The envelope is flat at 1 unless the waveform is longer than two
/// fades.
pub fn fade_in_out(
    num_samples: usize,
    fade_samples: usize,
) -> Sig<impl SigT<Item = f32>> {
    let apply = fade_samples > 0 && num_samples > 2 * fade_samples;
    let step = if fade_samples > 1 {
        1.0 / (fade_samples - 1) as f32
    } else {
        0.0
    };
    let mut index = 0;
    Sig::from_fn(move |_: &SigCtx| {
        let i = index;
        index += 1;
        if !apply {
            1.0
        } else if i < fade_samples {
            i as f32 * step
        } else if i >= num_samples - fade_samples {
            (num_samples - 1 - i) as f32 * step
        } else {
            1.0
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ramps_at_both_ends() {
        let buf = fade_in_out(10, 3).render(100.0, 10);
        assert_eq!(
            buf.as_slice(),
            &[0.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.0]
        );
    }

    #[test]
    fn flat_when_too_short() {
        let buf = fade_in_out(6, 3).render(100.0, 6);
        assert!(buf.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn never_amplifies() {
        let buf = fade_in_out(2205, 220).render(22050.0, 2205);
        assert!(buf.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }
}
