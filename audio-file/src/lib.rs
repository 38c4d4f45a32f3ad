use anyhow::Context;
use echotrace_core::WaveformBuffer;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{
    fs,
    io::{Cursor, Seek, Write},
    path::Path,
};

pub const BITS_PER_SAMPLE: u16 = 16;

pub fn wav_spec(sample_rate_hz: u32, channels: u16) -> WavSpec {
    WavSpec {
        channels,
        sample_rate: sample_rate_hz,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Converts a sample in -1..1 to a signed 16-bit value, truncating toward zero. Out of range
/// samples are clamped first.
pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn write_frames<W: Write + Seek>(
    writer: W,
    buffer: &WaveformBuffer,
    sample_rate_hz: u32,
    channels: u16,
) -> anyhow::Result<()> {
    anyhow::ensure!(channels > 0, "channel count must be at least 1");
    let mut writer = WavWriter::new(writer, wav_spec(sample_rate_hz, channels))?;
    for &sample in buffer.iter() {
        let value = to_i16(sample);
        // mono source, so every channel of a frame carries the same value
        for _ in 0..channels {
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

/// Encodes the whole buffer as a 16-bit PCM WAV file in memory.
pub fn encode(
    buffer: &WaveformBuffer,
    sample_rate_hz: u32,
    channels: u16,
) -> anyhow::Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_frames(&mut cursor, buffer, sample_rate_hz, channels)?;
    Ok(cursor.into_inner())
}

pub fn write_wav(
    path: impl AsRef<Path>,
    buffer: &WaveformBuffer,
    sample_rate_hz: u32,
    channels: u16,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let bytes = encode(buffer, sample_rate_hz, channels)?;
    fs::write(path, bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "wrote {} samples ({:.1}s) to {}",
        buffer.len(),
        buffer.duration_s(sample_rate_hz),
        path.display()
    );
    Ok(())
}

/// Decodes an integer PCM WAV into mono samples in -1..1, averaging the channels of each frame.
pub fn decode_mono(bytes: &[u8]) -> anyhow::Result<(WavSpec, WaveformBuffer)> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    anyhow::ensure!(
        spec.sample_format == SampleFormat::Int,
        "only integer PCM is supported"
    );
    let max_value = (1_i64 << (spec.bits_per_sample - 1)) as f32;
    let data_int = reader
        .samples::<i32>()
        .collect::<Result<Vec<_>, _>>()?;
    let samples = data_int
        .chunks(spec.channels.max(1) as usize)
        .map(|chunk| {
            let channel_mean = chunk.iter().map(|&x| x as i64).sum::<i64>()
                / chunk.len() as i64;
            channel_mean as f32 / max_value
        })
        .collect();
    Ok((spec, samples))
}

pub fn read_wav_mono(
    path: impl AsRef<Path>,
) -> anyhow::Result<(WavSpec, WaveformBuffer)> {
    let path = path.as_ref();
    let raw =
        fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_mono(&raw)
}
