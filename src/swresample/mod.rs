//! Audio normalization to the kit device format
//!
//! Every sample entering a kit passes through the same three stages, in this
//! order, each skipped when the asset already matches:
//!
//! 1. bit depth to signed 16-bit ([`PcmDecoder`])
//! 2. channel count to mono or stereo ([`channels`])
//! 3. sample rate to 48 kHz ([`AudioResampler`])

pub mod channels;
pub mod resample;

pub use resample::AudioResampler;

use crate::codec::{AudioAsset, CanonicalAsset, PcmDecoder, PcmEncoder, CANONICAL_SAMPLE_RATE};
use crate::error::{Error, Result};
use tracing::debug;

/// Resampler context converting arbitrary PCM assets to device format
#[derive(Debug, Clone, Copy)]
pub struct ResamplerContext {
    dst_sample_rate: u32,
    dst_channels: u16,
}

impl ResamplerContext {
    /// Create a context targeting 48 kHz / 16-bit with 1 or 2 channels
    pub fn new(dst_channels: u16) -> Result<Self> {
        if !matches!(dst_channels, 1 | 2) {
            return Err(Error::invalid_input(format!(
                "Target channel count must be 1 or 2, got {}",
                dst_channels
            )));
        }

        Ok(ResamplerContext {
            dst_sample_rate: CANONICAL_SAMPLE_RATE,
            dst_channels,
        })
    }

    /// Target channel count
    pub fn channels(&self) -> u16 {
        self.dst_channels
    }

    /// Convert an asset
    pub fn process(&self, src: &AudioAsset) -> Result<CanonicalAsset> {
        let spec = src.spec();

        if spec.is_canonical(self.dst_channels) {
            return Ok(CanonicalAsset::new_unchecked(src.clone()));
        }

        let samples = PcmDecoder::decode_asset(src);
        let samples = channels::convert(
            &samples,
            spec.channels as usize,
            self.dst_channels as usize,
        );
        let samples = AudioResampler::new(spec.sample_rate, self.dst_sample_rate)
            .process(&samples, self.dst_channels as usize);

        let asset = PcmEncoder::new(self.dst_sample_rate, self.dst_channels).encode_asset(&samples)?;

        debug!(
            "Normalized {} Hz / {} / {} ch ({} frames) -> {} Hz / s16 / {} ch ({} frames)",
            spec.sample_rate,
            spec.format,
            spec.channels,
            src.frame_count(),
            self.dst_sample_rate,
            self.dst_channels,
            asset.frame_count()
        );

        Ok(CanonicalAsset::new_unchecked(asset))
    }
}

/// Normalize an asset to 48 kHz, signed 16-bit, `channels` channels
pub fn normalize(asset: &AudioAsset, channels: u16) -> Result<CanonicalAsset> {
    ResamplerContext::new(channels)?.process(asset)
}
