use echotrace_core::FamilyScores;

pub const LOAD_WEIGHT: f64 = 0.3;
pub const NETWORK_WEIGHT: f64 = 0.2;
pub const SENSOR_WEIGHT: f64 = 0.3;
pub const TIMING_WEIGHT: f64 = 0.2;

/// Combines the four family scores with fixed weights. The weights sum to 1 so inputs in 0..=1
/// produce an output in 0..=1. All four inputs are required; there is no renormalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn combine(
        &self,
        load: f64,
        network: f64,
        sensor: f64,
        timing: f64,
    ) -> f64 {
        load * LOAD_WEIGHT
            + network * NETWORK_WEIGHT
            + sensor * SENSOR_WEIGHT
            + timing * TIMING_WEIGHT
    }

    pub fn combine_scores(
        &self,
        load: f64,
        network: f64,
        sensor: f64,
        timing: f64,
    ) -> FamilyScores {
        FamilyScores {
            load,
            network,
            sensor,
            timing,
            overall: self.combine(load, network, sensor, timing),
        }
    }
}
