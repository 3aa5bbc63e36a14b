//! Canonicalization of decoded audio into mono sample buffers.

use tracing::debug;

/// Decoded sample data in whatever shape the decoder produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleArray {
    /// A lone value with no sample axis.
    Scalar(f32),
    /// A one-dimensional buffer.
    Flat(Vec<f32>),
    /// Interleaved frames, `channels` samples per frame.
    Frames { channels: usize, samples: Vec<f32> },
    /// Data of higher rank, flattened in order.
    Nested(Vec<Vec<f32>>),
}

/// Produce a mono buffer from decoded audio, or `None` if it is unusable.
///
/// Multi-channel frames are collapsed by averaging the channels of each frame.
/// Scalars, malformed frame layouts and empty results yield `None`.
pub fn sanitize(input: Option<SampleArray>) -> Option<Vec<f32>> {
    let samples = match input? {
        SampleArray::Scalar(_) => {
            debug!("Rejecting scalar audio payload");
            return None;
        }
        SampleArray::Flat(samples) => samples,
        SampleArray::Frames { channels, samples } => downmix(channels, &samples)?,
        SampleArray::Nested(rows) => rows.into_iter().flatten().collect(),
    };

    if samples.is_empty() {
        return None;
    }

    Some(samples)
}

/// Average interleaved channels into a single channel.
fn downmix(channels: usize, samples: &[f32]) -> Option<Vec<f32>> {
    if channels == 0 || samples.len() % channels != 0 {
        debug!(
            channels,
            len = samples.len(),
            "Rejecting malformed interleaved audio"
        );
        return None;
    }

    if channels == 1 {
        return Some(samples.to_vec());
    }

    Some(
        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect(),
    )
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || from_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}
