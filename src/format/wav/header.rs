//! WAV file header structures and parsing

use super::{ChunkHeader, ChunkIter, DATA_CHUNK, FMT_CHUNK};
use crate::codec::AudioSpec;
use crate::error::{Error, Result};
use crate::util::SampleFormat;

/// WAV format tag identifying the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// PCM (uncompressed)
    Pcm,
    /// IEEE Float
    IeeeFloat,
    /// A-Law
    ALaw,
    /// Mu-Law
    MuLaw,
    /// Extensible format
    Extensible,
    /// Unknown format
    Unknown(u16),
}

impl From<u16> for FormatTag {
    fn from(val: u16) -> Self {
        match val {
            0x0001 => FormatTag::Pcm,
            0x0003 => FormatTag::IeeeFloat,
            0x0006 => FormatTag::ALaw,
            0x0007 => FormatTag::MuLaw,
            0xFFFE => FormatTag::Extensible,
            other => FormatTag::Unknown(other),
        }
    }
}

impl From<FormatTag> for u16 {
    fn from(tag: FormatTag) -> Self {
        match tag {
            FormatTag::Pcm => 0x0001,
            FormatTag::IeeeFloat => 0x0003,
            FormatTag::ALaw => 0x0006,
            FormatTag::MuLaw => 0x0007,
            FormatTag::Extensible => 0xFFFE,
            FormatTag::Unknown(val) => val,
        }
    }
}

/// WAV format chunk data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavFormat {
    /// Format tag (codec ID)
    pub format_tag: FormatTag,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Average bytes per second
    pub byte_rate: u32,
    /// Block alignment
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Extension size (for extensible format)
    pub extension_size: Option<u16>,
    /// Leading tag of the sub-format GUID (extensible format only)
    pub sub_format: Option<u16>,
}

impl WavFormat {
    /// Build a plain PCM format description for a spec
    pub fn pcm(spec: AudioSpec) -> Self {
        let block_align = spec.block_align() as u16;
        WavFormat {
            format_tag: FormatTag::Pcm,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            byte_rate: spec.sample_rate * block_align as u32,
            block_align,
            bits_per_sample: spec.format.bits(),
            extension_size: None,
            sub_format: None,
        }
    }

    /// Parse WAV format chunk from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 16 {
            return Err(Error::format("WAV format chunk too small"));
        }

        let format_tag = u16::from_le_bytes([data[0], data[1]]).into();
        let channels = u16::from_le_bytes([data[2], data[3]]);
        let sample_rate = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let byte_rate = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
        let block_align = u16::from_le_bytes([data[12], data[13]]);
        let bits_per_sample = u16::from_le_bytes([data[14], data[15]]);

        let extension_size = if data.len() >= 18 {
            Some(u16::from_le_bytes([data[16], data[17]]))
        } else {
            None
        };

        // cbSize(2) + valid bits(2) + channel mask(4), then the GUID
        let sub_format = if format_tag == FormatTag::Extensible && data.len() >= 26 {
            Some(u16::from_le_bytes([data[24], data[25]]))
        } else {
            None
        };

        Ok(WavFormat {
            format_tag,
            channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample,
            extension_size,
            sub_format,
        })
    }

    /// Convert to bytes for writing
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(18);

        bytes.extend_from_slice(&u16::from(self.format_tag).to_le_bytes());
        bytes.extend_from_slice(&self.channels.to_le_bytes());
        bytes.extend_from_slice(&self.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&self.byte_rate.to_le_bytes());
        bytes.extend_from_slice(&self.block_align.to_le_bytes());
        bytes.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        if let Some(ext_size) = self.extension_size {
            bytes.extend_from_slice(&ext_size.to_le_bytes());
        }

        bytes
    }

    /// Format tag after resolving the extensible sub-format
    pub fn effective_tag(&self) -> FormatTag {
        match (self.format_tag, self.sub_format) {
            (FormatTag::Extensible, Some(sub)) => FormatTag::from(sub),
            (tag, _) => tag,
        }
    }

    /// Sample format, if this is integer PCM of a supported width
    pub fn pcm_sample_format(&self) -> Result<SampleFormat> {
        let tag = self.effective_tag();
        if tag != FormatTag::Pcm {
            return Err(Error::unsupported_encoding(format!(
                "format tag 0x{:04X} ({:?}) is not linear PCM",
                u16::from(tag),
                tag
            )));
        }

        SampleFormat::from_bits(self.bits_per_sample).ok_or_else(|| {
            Error::unsupported_encoding(format!(
                "{}-bit PCM is not supported",
                self.bits_per_sample
            ))
        })
    }

    /// Calculate expected byte rate
    pub fn calculate_byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(self.block_align as u32)
    }

    /// Calculate expected block alignment
    pub fn calculate_block_align(&self) -> u32 {
        self.channels as u32 * (self.bits_per_sample / 8) as u32
    }

    /// Validate format parameters
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(Error::format("Invalid channel count: 0"));
        }

        if self.sample_rate == 0 {
            return Err(Error::format("Invalid sample rate: 0"));
        }

        if self.bits_per_sample == 0 || self.bits_per_sample % 8 != 0 {
            return Err(Error::format(format!(
                "Invalid bits per sample: {}",
                self.bits_per_sample
            )));
        }

        let expected_block_align = self.calculate_block_align();
        if self.block_align as u32 != expected_block_align {
            return Err(Error::format(format!(
                "Block align mismatch: expected {}, got {}",
                expected_block_align, self.block_align
            )));
        }

        Ok(())
    }
}

/// Parsed WAV layout: format plus where the samples live
#[derive(Debug, Clone)]
pub struct WavHeader {
    /// Declared RIFF size (bytes following the size field)
    pub riff_size: u32,
    /// WAV format information
    pub format: WavFormat,
    /// Data chunk size in bytes
    pub data_size: u32,
    /// Offset of the first sample byte
    pub data_start: usize,
}

impl WavHeader {
    /// Locate and decode the `fmt ` and `data` chunks of a RIFF/WAVE buffer
    ///
    /// Chunks are found by tag-and-length scanning from offset 12. `fmt `
    /// must appear before `data`; anything else is skipped. The encoding is
    /// checked before the format fields are validated, so compressed
    /// sources report `UnsupportedEncoding` rather than a layout error.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let chunks = ChunkIter::new(data)?;
        let riff_size = chunks.riff_size();
        let mut format: Option<WavFormat> = None;

        for chunk in chunks {
            let chunk = chunk?;

            if &chunk.header.id == FMT_CHUNK {
                let parsed = WavFormat::from_bytes(chunk.body)?;
                parsed.pcm_sample_format()?;
                parsed.validate()?;
                format = Some(parsed);
            } else if &chunk.header.id == DATA_CHUNK {
                let format =
                    format.ok_or_else(|| Error::format("data chunk before fmt chunk"))?;
                return Ok(WavHeader {
                    riff_size,
                    format,
                    data_size: chunk.header.size,
                    data_start: chunk.offset + ChunkHeader::SIZE,
                });
            }
        }

        match format {
            Some(_) => Err(Error::format("data chunk not found")),
            None => Err(Error::format("fmt chunk not found")),
        }
    }

    /// Get total number of frames
    pub fn num_samples(&self) -> u64 {
        self.data_size as u64 / self.format.block_align as u64
    }

    /// Get duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples() as f64 / self.format.sample_rate as f64
    }
}
