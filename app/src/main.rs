use clap::Parser;
use echotrace::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tokio::time::sleep;

const DEFAULT_DEMO_OUTPUT: &str = "echotrace_demo.wav";
const DEFAULT_REPLAY_OUTPUT: &str = "echotrace_replay.wav";

#[derive(Parser)]
#[command(about = "Listen to your system's behaviour")]
struct Args {
    /// Seconds between samples
    #[arg(long, short)]
    interval: Option<f64>,
    /// Stop after this many seconds (runs until interrupted otherwise)
    #[arg(long, short)]
    duration: Option<f64>,
    /// Write captured audio to this WAV file
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Render the healthy-to-anomalous demo sequence and exit
    #[arg(long)]
    demo: bool,
    /// Use synthetic telemetry instead of reading the host
    #[arg(long)]
    simulate: bool,
    /// Render a previously written metrics log instead of sampling
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Append each scored sample to this file as a line of JSON
    #[arg(long)]
    metrics_log: Option<PathBuf>,
    /// Seconds of audio per sample
    #[arg(long)]
    sound_duration: Option<f64>,
    /// JSON config file
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Seed for the demo's random variation
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config.as_ref() {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(interval) = self.interval {
            config.monitor.sample_interval_s = interval;
        }
        if let Some(sound_duration) = self.sound_duration {
            config.monitor.sound_duration_s = sound_duration;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_demo(args: &Args, synth: &SoundSynthesizer) -> anyhow::Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DEMO_OUTPUT));
    println!("Generating demo audio...");
    let audio = match args.seed {
        Some(seed) => {
            synth.demo_sequence_with_rng(&mut StdRng::seed_from_u64(seed))
        }
        None => synth.demo_sequence(),
    };
    write_wav(&output, &audio, synth.sample_rate_hz(), synth.channels())?;
    println!("Demo audio saved to {}", output.display());
    println!("Listen for the shift from a steady tone to pulsing, dissonance and noise.");
    Ok(())
}

fn run_replay(
    path: &Path,
    args: &Args,
    config: &Config,
    synth: &SoundSynthesizer,
) -> anyhow::Result<()> {
    let records = read_metrics_log(path)?;
    let audio = replay(&records, synth, config.monitor.sound_duration_s)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPLAY_OUTPUT));
    write_wav(&output, &audio, synth.sample_rate_hz(), synth.channels())?;
    println!(
        "Replayed {} records ({:.1}s) to {}",
        records.len(),
        audio.duration_s(synth.sample_rate_hz()),
        output.display()
    );
    Ok(())
}

async fn run_monitor(
    args: &Args,
    config: &Config,
    synth: &SoundSynthesizer,
) -> anyhow::Result<()> {
    let monitor_config = &config.monitor;
    let mut provider = ActiveMetricsProvider::with_options(
        args.simulate,
        monitor_config.sample_interval_s,
        monitor_config.interval_history_capacity,
    );
    if provider.is_simulated() {
        log::warn!("simulation mode enabled; telemetry is synthetic");
    }
    let mut monitor = SystemMonitor::from_config(monitor_config);
    let mut session = Session::new(monitor_config);
    if args.output.is_some() {
        session = session.capturing();
    }
    if let Some(path) = args.metrics_log.as_ref() {
        session = session.with_metrics_log(MetricsLog::create(path)?);
    }

    println!("EchoTrace starting...");
    println!("Sampling interval: {}s", monitor_config.sample_interval_s);
    println!("Sound duration: {}s", monitor_config.sound_duration_s);
    if let Some(output) = args.output.as_ref() {
        println!("Output file: {}", output.display());
    }
    println!("Press Ctrl+C to stop");

    let interval = Duration::from_secs_f64(monitor_config.sample_interval_s);
    let start = Instant::now();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        if let Some(duration) = args.duration {
            if start.elapsed().as_secs_f64() >= duration {
                break;
            }
        }
        match session.tick(&mut provider, &mut monitor, synth) {
            Ok(record) => {
                if let Some(status) = session.status(&record) {
                    println!("{}", status);
                }
            }
            Err(e) => {
                log::error!("stopping after failed tick: {:#}", e);
                break;
            }
        }
        tokio::select! {
            _ = sleep(interval) => {}
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    log::warn!("failed to listen for ctrl-c: {}", e);
                }
                println!("Stopping EchoTrace...");
                break;
            }
        }
    }

    let summary = session.finish(args.output.as_deref(), synth)?;
    if let Some(output) = summary.output.as_ref() {
        println!(
            "Saved {} samples ({:.1}s) to {}",
            summary.captured_buffers,
            summary.captured_s,
            output.display()
        );
    }
    println!("Total samples collected: {}", summary.sample_count);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.load_config()?;
    let synth = SoundSynthesizer::new(config.synth);
    if args.demo {
        return run_demo(&args, &synth);
    }
    if let Some(path) = args.replay.as_ref() {
        return run_replay(path, &args, &config, &synth);
    }
    run_monitor(&args, &config, &synth).await
}
