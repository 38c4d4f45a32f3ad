pub mod stats;

pub mod scorer;
pub use scorer::AnomalyScorer;

pub mod load;
pub use load::LoadScorer;

pub mod network;
pub use network::NetworkScorer;

pub mod sensor;
pub use sensor::SensorScorer;

pub mod timing;
pub use timing::TimingScorer;

pub mod aggregate;
pub use aggregate::ScoreAggregator;
