//! Audio sample format definitions

use std::fmt;

/// Interleaved integer PCM sample format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Unsigned 8-bit (offset binary, silence at 128)
    U8,
    /// Signed 16-bit little-endian
    I16,
    /// Signed 24-bit little-endian, packed in 3 bytes
    I24,
    /// Signed 32-bit little-endian
    I32,
}

impl SampleFormat {
    /// Map a WAV `bits_per_sample` value to a sample format
    pub fn from_bits(bits_per_sample: u16) -> Option<Self> {
        match bits_per_sample {
            8 => Some(SampleFormat::U8),
            16 => Some(SampleFormat::I16),
            24 => Some(SampleFormat::I24),
            32 => Some(SampleFormat::I32),
            _ => None,
        }
    }

    /// Get the size in bytes of one sample
    pub fn sample_size(&self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::I16 => 2,
            SampleFormat::I24 => 3,
            SampleFormat::I32 => 4,
        }
    }

    /// Bits per sample as written in a `fmt ` chunk
    pub fn bits(&self) -> u16 {
        self.sample_size() as u16 * 8
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::U8 => "u8",
            SampleFormat::I16 => "s16",
            SampleFormat::I24 => "s24",
            SampleFormat::I32 => "s32",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        assert_eq!(SampleFormat::from_bits(8), Some(SampleFormat::U8));
        assert_eq!(SampleFormat::from_bits(24), Some(SampleFormat::I24));
        assert_eq!(SampleFormat::from_bits(12), None);
        assert_eq!(SampleFormat::from_bits(64), None);
    }

    #[test]
    fn test_sizes() {
        assert_eq!(SampleFormat::I24.sample_size(), 3);
        assert_eq!(SampleFormat::I32.bits(), 32);
        assert_eq!(SampleFormat::I16.to_string(), "s16");
    }
}
