//! PCM encoder implementation

use crate::codec::frame::{AudioAsset, AudioSpec};
use crate::error::Result;
use crate::util::SampleFormat;

/// Encodes signed 16-bit samples as little-endian PCM bytes
pub struct PcmEncoder {
    sample_rate: u32,
    channels: u16,
}

impl PcmEncoder {
    /// Create a new PCM encoder
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        PcmEncoder {
            sample_rate,
            channels,
        }
    }

    /// Encode samples to raw bytes
    pub fn encode(samples: &[i16]) -> Vec<u8> {
        let mut output = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            output.extend_from_slice(&sample.to_le_bytes());
        }
        output
    }

    /// Encode samples into a 16-bit asset
    pub fn encode_asset(&self, samples: &[i16]) -> Result<AudioAsset> {
        let spec = AudioSpec::new(self.sample_rate, self.channels, SampleFormat::I16);
        AudioAsset::new(spec, Self::encode(samples))
    }
}
