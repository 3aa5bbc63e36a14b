//! Audio handling: decoding synthesized speech, canonicalizing it, and writing
//! the assembled dialogue.

mod assembler;
mod decode;
mod encode;
mod normalize;

pub use assembler::{AssemblyReport, AudioAssembler, SkippedLine};
pub use decode::{decode_audio, DecodedAudio};
pub use encode::{encode_wav, to_pcm16, write_wav, OUTPUT_SAMPLE_RATE};
pub use normalize::{resample, sanitize, SampleArray};
