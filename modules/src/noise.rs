use echotrace_core::{Sig, SigT};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Uniform white noise in the range -1..1 seeded from the operating system.
pub fn white() -> Sig<impl SigT<Item = f32>> {
    white_with_rng(StdRng::from_os_rng())
}

/// Like `white` but reproducible.
pub fn white_seeded(seed: u64) -> Sig<impl SigT<Item = f32>> {
    white_with_rng(StdRng::seed_from_u64(seed))
}

fn white_with_rng(mut rng: StdRng) -> Sig<impl SigT<Item = f32>> {
    Sig::from_fn(move |_| rng.random::<f32>() * 2. - 1.)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn white_stays_in_range() {
        let buf = white().render(22050.0, 10_000);
        assert!(buf.iter().all(|&x| (-1.0..=1.0).contains(&x)));
        assert!(buf.peak() > 0.0);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let a = white_seeded(7).render(22050.0, 64);
        let b = white_seeded(7).render(22050.0, 64);
        assert_eq!(a, b);
    }
}
