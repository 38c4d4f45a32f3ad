use crate::synth::SoundSynthesizer;
use echotrace_core::{CombinedMetricsRecord, WaveformBuffer};
use rand::Rng;

pub const DEMO_HEALTHY_RECORDS: usize = 10;
pub const DEMO_TRANSITION_RECORDS: usize = 10;
pub const DEMO_SEGMENT_S: f64 = 0.2;

/// A scripted system that runs healthy for a while and then degrades: CPU climbs from 30% to
/// 90%, traffic grows six-fold, memory fills from 40% to 90% and the anomaly score rises to 0.8.
pub fn demo_records(rng: &mut impl Rng) -> Vec<CombinedMetricsRecord> {
    let mut records =
        Vec::with_capacity(DEMO_HEALTHY_RECORDS + DEMO_TRANSITION_RECORDS);
    for _ in 0..DEMO_HEALTHY_RECORDS {
        records.push(CombinedMetricsRecord::new(
            30.0 + rng.random_range(-5.0..5.0_f64),
            1_000_000.0,
            40.0 + rng.random_range(-3.0..3.0_f64),
            0.1,
        ));
    }
    for i in 0..DEMO_TRANSITION_RECORDS {
        let progress = i as f64 / DEMO_TRANSITION_RECORDS as f64;
        records.push(CombinedMetricsRecord::new(
            30.0 + progress * 60.0 + rng.random_range(-10.0..10.0_f64),
            1_000_000.0 * (1.0 + progress * 5.0),
            40.0 + progress * 50.0,
            progress * 0.8,
        ));
    }
    records
}

impl SoundSynthesizer {
    /// Renders the demo script with a fresh random source.
    pub fn demo_sequence(&self) -> WaveformBuffer {
        self.demo_sequence_with_rng(&mut rand::rng())
    }

    pub fn demo_sequence_with_rng(&self, rng: &mut impl Rng) -> WaveformBuffer {
        self.soundscape(&demo_records(rng), DEMO_SEGMENT_S)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn demo_has_twenty_segments() {
        let synth = SoundSynthesizer::default();
        let buf = synth.demo_sequence();
        assert_eq!(buf.len(), 20 * 4410);
        assert_eq!(buf.len(), 88200);
        assert!(buf.peak() <= 1.0);
    }

    #[test]
    fn demo_script_degrades() {
        let records = demo_records(&mut StdRng::seed_from_u64(1));
        assert_eq!(records.len(), 20);
        for record in &records[..10] {
            assert!((25.0..35.0).contains(&record.cpu_percent));
            assert!((37.0..43.0).contains(&record.memory_percent));
            assert_eq!(record.anomaly_score, 0.1);
            assert_eq!(record.network_rate, 1_000_000.0);
        }
        let last = &records[19];
        assert!((last.anomaly_score - 0.72).abs() < 1e-9);
        assert!((last.memory_percent - 85.0).abs() < 1e-9);
        assert!((last.network_rate - 5_500_000.0).abs() < 1e-6);
        assert!(records[10].anomaly_score == 0.0);
    }

    #[test]
    fn seeded_demo_records_are_reproducible() {
        let a = demo_records(&mut StdRng::seed_from_u64(9));
        let b = demo_records(&mut StdRng::seed_from_u64(9));
        assert_eq!(
            a.iter().map(|r| r.cpu_percent).collect::<Vec<_>>(),
            b.iter().map(|r| r.cpu_percent).collect::<Vec<_>>()
        );
    }
}
