//! 16-bit PCM WAV encoding of the final dialogue buffer.

use crate::error::{RadioError, Result};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::{debug, instrument, warn};

/// Sample rate of every file Radiohost writes.
pub const OUTPUT_SAMPLE_RATE: u32 = 44_100;

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Convert a float sample in [-1, 1] to 16-bit PCM, clipping out-of-range values.
pub fn to_pcm16(sample: f32) -> i16 {
    let clamped = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
    (clamped * i16::MAX as f32).round() as i16
}

/// Encode mono samples as a WAV stream into any seekable writer.
pub fn encode_wav<W: Write + Seek>(writer: W, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut wav = hound::WavWriter::new(writer, wav_spec(sample_rate))
        .map_err(|e| RadioError::AudioEncode(e.to_string()))?;

    for &sample in samples {
        wav.write_sample(to_pcm16(sample))
            .map_err(|e| RadioError::AudioEncode(e.to_string()))?;
    }

    wav.finalize()
        .map_err(|e| RadioError::AudioEncode(e.to_string()))
}

/// Encode mono samples to a WAV file on disk.
///
/// The file is encoded in memory first; if writing it fails the partial file
/// is removed.
#[instrument(skip(samples), fields(path = %path.display(), samples = samples.len()))]
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut encoded = Cursor::new(Vec::new());
    encode_wav(&mut encoded, samples, sample_rate)?;

    let mut file = std::fs::File::create(path).map_err(|e| {
        RadioError::AudioEncode(format!("Cannot create {}: {}", path.display(), e))
    })?;

    if let Err(e) = file.write_all(encoded.get_ref()).and_then(|_| file.sync_all()) {
        drop(file);
        if let Err(remove) = std::fs::remove_file(path) {
            warn!("Failed to remove partial file {}: {}", path.display(), remove);
        }
        return Err(RadioError::AudioEncode(format!(
            "Cannot write {}: {}",
            path.display(),
            e
        )));
    }

    debug!("Wrote WAV file");
    Ok(())
}
