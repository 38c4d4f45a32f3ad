pub mod synth;
pub use synth::{
    DEFAULT_CHORD_RATIOS, SoundParams, SoundSynthesizer, SynthConfig,
};

pub mod demo;
pub use demo::{DEMO_SEGMENT_S, demo_records};
