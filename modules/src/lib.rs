pub mod oscillator;
pub use oscillator::*;

pub mod envelope;
pub use envelope::fade_in_out;

pub mod noise;
