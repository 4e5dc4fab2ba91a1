//! PCM decoder implementation

use crate::codec::frame::AudioAsset;
use crate::util::SampleFormat;

/// Decodes interleaved PCM of any supported width to signed 16-bit
///
/// Rescaling is linear and undithered: 8-bit input is re-centred and shifted
/// up, wider input keeps its 16 most significant bits.
pub struct PcmDecoder {
    format: SampleFormat,
}

impl PcmDecoder {
    /// Create a new PCM decoder
    pub fn new(format: SampleFormat) -> Self {
        PcmDecoder { format }
    }

    /// Decode every sample of an asset
    pub fn decode_asset(asset: &AudioAsset) -> Vec<i16> {
        PcmDecoder::new(asset.spec().format).decode(asset.data())
    }

    /// Decode raw bytes to interleaved i16 samples
    ///
    /// A trailing partial sample is ignored.
    pub fn decode(&self, data: &[u8]) -> Vec<i16> {
        let size = self.format.sample_size();
        data.chunks_exact(size)
            .map(|s| match self.format {
                SampleFormat::U8 => ((s[0] as i16) - 128) << 8,
                SampleFormat::I16 => i16::from_le_bytes([s[0], s[1]]),
                SampleFormat::I24 => i16::from_le_bytes([s[1], s[2]]),
                SampleFormat::I32 => i16::from_le_bytes([s[2], s[3]]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_decoder_u8() {
        let decoder = PcmDecoder::new(SampleFormat::U8);
        let samples = decoder.decode(&[0, 128, 255, 129]);
        assert_eq!(samples, vec![-32768, 0, 32512, 256]);
    }

    #[test]
    fn test_pcm_decoder_i16_passthrough() {
        let decoder = PcmDecoder::new(SampleFormat::I16);
        let data = [0x00, 0x80, 0xFF, 0x7F, 0x01, 0x00];
        assert_eq!(decoder.decode(&data), vec![i16::MIN, i16::MAX, 1]);
    }

    #[test]
    fn test_pcm_decoder_i24_keeps_top_bits() {
        let decoder = PcmDecoder::new(SampleFormat::I24);
        // 0x123456 and -1 (0xFFFFFF)
        let data = [0x56, 0x34, 0x12, 0xFF, 0xFF, 0xFF];
        assert_eq!(decoder.decode(&data), vec![0x1234, -1]);
    }

    #[test]
    fn test_pcm_decoder_i32_keeps_top_bits() {
        let decoder = PcmDecoder::new(SampleFormat::I32);
        let data = (-65536i32 * 3).to_le_bytes();
        assert_eq!(decoder.decode(&data), vec![-3]);
    }

    #[test]
    fn test_pcm_decoder_ignores_partial_sample() {
        let decoder = PcmDecoder::new(SampleFormat::I16);
        assert_eq!(decoder.decode(&[1, 0, 7]), vec![1]);
    }
}
