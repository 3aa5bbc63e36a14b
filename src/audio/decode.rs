//! Decoding of synthesized audio payloads.
//!
//! TTS providers answer with a complete container (MP3 or WAV). The payload is
//! probed with symphonia and decoded into interleaved `f32` samples.

use super::SampleArray;
use crate::error::{RadioError, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Decoded samples plus the rate they were encoded at.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: SampleArray,
    pub sample_rate: u32,
}

/// Decode an in-memory audio file.
pub fn decode_audio(bytes: &[u8]) -> Result<DecodedAudio> {
    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| RadioError::AudioDecode(format!("Unrecognized audio payload: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| RadioError::AudioDecode("No supported audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| RadioError::AudioDecode(format!("Unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(RadioError::AudioDecode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // A corrupt frame is dropped; the rest of the stream is still usable.
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(RadioError::AudioDecode(e.to_string())),
        }
    }

    let samples = if channels > 1 {
        SampleArray::Frames { channels, samples }
    } else {
        SampleArray::Flat(samples)
    };

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}
