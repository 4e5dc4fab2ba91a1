//! Decoded audio assets
//!
//! An [`AudioAsset`] is one clip of interleaved PCM plus the format needed to
//! interpret it. A [`CanonicalAsset`] is an asset already in the one format the
//! kit device accepts: 48 kHz, signed 16-bit, mono or stereo.

use crate::error::{Error, Result};
use crate::format::wav::WavMuxer;
use crate::util::SampleFormat;
use bytes::Bytes;

/// Sample rate every kit sample must use
pub const CANONICAL_SAMPLE_RATE: u32 = 48_000;

/// Sample format every kit sample must use
pub const CANONICAL_FORMAT: SampleFormat = SampleFormat::I16;

/// Format of an interleaved PCM payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSpec {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Sample format
    pub format: SampleFormat,
}

impl AudioSpec {
    /// Create a new audio spec
    pub fn new(sample_rate: u32, channels: u16, format: SampleFormat) -> Self {
        AudioSpec {
            sample_rate,
            channels,
            format,
        }
    }

    /// Bytes per frame (one sample for every channel)
    pub fn block_align(&self) -> usize {
        self.format.sample_size() * self.channels as usize
    }

    /// Whether this spec is the device format for the given channel count
    pub fn is_canonical(&self, channels: u16) -> bool {
        self.sample_rate == CANONICAL_SAMPLE_RATE
            && self.format == CANONICAL_FORMAT
            && self.channels == channels
    }
}

/// Immutable interleaved PCM clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    spec: AudioSpec,
    frame_count: u32,
    data: Bytes,
}

impl AudioAsset {
    /// Create an asset from raw interleaved samples
    ///
    /// `data` must hold a whole number of frames.
    pub fn new(spec: AudioSpec, data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();

        if spec.channels == 0 {
            return Err(Error::invalid_input("Invalid channel count: 0"));
        }
        if spec.sample_rate == 0 {
            return Err(Error::invalid_input("Invalid sample rate: 0"));
        }

        let block_align = spec.block_align();
        if data.len() % block_align != 0 {
            return Err(Error::invalid_input(format!(
                "Payload of {} bytes is not a whole number of {}-byte frames",
                data.len(),
                block_align
            )));
        }

        let frame_count = u32::try_from(data.len() / block_align)
            .map_err(|_| Error::invalid_input("Too many frames for a WAV payload"))?;

        Ok(AudioAsset {
            spec,
            frame_count,
            data,
        })
    }

    /// Format of the payload
    pub fn spec(&self) -> AudioSpec {
        self.spec
    }

    /// Number of frames
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Raw interleaved sample bytes
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.spec.sample_rate as f64
    }
}

/// An asset guaranteed to be 48 kHz, signed 16-bit, mono or stereo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalAsset(AudioAsset);

impl CanonicalAsset {
    pub(crate) fn new_unchecked(asset: AudioAsset) -> Self {
        CanonicalAsset(asset)
    }

    /// Accept an asset that is already in device format
    pub fn try_from_asset(asset: AudioAsset) -> Result<Self> {
        let spec = asset.spec();
        if !matches!(spec.channels, 1 | 2) || !spec.is_canonical(spec.channels) {
            return Err(Error::invalid_input(format!(
                "Asset is {} Hz / {} / {} ch, not canonical",
                spec.sample_rate, spec.format, spec.channels
            )));
        }
        Ok(CanonicalAsset(asset))
    }

    /// The underlying asset
    pub fn asset(&self) -> &AudioAsset {
        &self.0
    }

    /// Channel count (1 or 2)
    pub fn channels(&self) -> u16 {
        self.0.spec().channels
    }

    /// Encode as a minimal WAV file (`fmt ` + `data`)
    pub fn to_wav_bytes(&self) -> Vec<u8> {
        WavMuxer::new().mux(&self.0)
    }

    /// Encode as the WAV layout the device writes into kits
    /// (`fmt `, `cue `, `LIST`, `data`)
    pub fn to_kit_wav_bytes(&self) -> Vec<u8> {
        WavMuxer::with_kit_chunks().mux(&self.0)
    }
}
