//! Audio payload types and the PCM codec

pub mod frame;
pub mod pcm;

pub use frame::{AudioAsset, AudioSpec, CanonicalAsset, CANONICAL_FORMAT, CANONICAL_SAMPLE_RATE};
pub use pcm::{PcmDecoder, PcmEncoder};
