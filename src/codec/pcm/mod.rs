//! PCM (Pulse Code Modulation) codec
//!
//! Converts between raw interleaved PCM bytes in any supported integer width
//! and signed 16-bit samples, the working format of the normalizer.

pub mod decoder;
pub mod encoder;

pub use decoder::PcmDecoder;
pub use encoder::PcmEncoder;
