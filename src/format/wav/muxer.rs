//! WAV file muxer implementation

use super::header::WavFormat;
use super::{ChunkHeader, CUE_CHUNK, DATA_CHUNK, FMT_CHUNK, LIST_CHUNK, RIFF_MAGIC, WAVE_MAGIC};
use crate::codec::AudioAsset;
use crate::format::stk::layout::{KIT_CUE_BODY, KIT_LIST_BODY};

/// Serializes an [`AudioAsset`] as a RIFF/WAVE buffer
///
/// Auxiliary chunks are written between `fmt ` and `data` in the order they
/// were added. The RIFF size field is summed from the chunks actually
/// written.
#[derive(Debug, Clone, Default)]
pub struct WavMuxer {
    aux_chunks: Vec<([u8; 4], &'static [u8])>,
}

impl WavMuxer {
    /// Create a muxer that writes only `fmt ` and `data`
    pub fn new() -> Self {
        WavMuxer {
            aux_chunks: Vec::new(),
        }
    }

    /// Create a muxer that also writes the `cue ` marker and `LIST` tempo
    /// label found in device-written kit samples
    pub fn with_kit_chunks() -> Self {
        WavMuxer::new()
            .with_chunk(*CUE_CHUNK, KIT_CUE_BODY)
            .with_chunk(*LIST_CHUNK, KIT_LIST_BODY)
    }

    /// Add an auxiliary chunk
    pub fn with_chunk(mut self, id: [u8; 4], body: &'static [u8]) -> Self {
        self.aux_chunks.push((id, body));
        self
    }

    /// Encode an asset
    pub fn mux(&self, asset: &AudioAsset) -> Vec<u8> {
        let fmt_data = WavFormat::pcm(asset.spec()).to_bytes();
        let samples = asset.data();

        let mut chunks: Vec<([u8; 4], &[u8])> = Vec::with_capacity(self.aux_chunks.len() + 2);
        chunks.push((*FMT_CHUNK, fmt_data.as_slice()));
        chunks.extend(self.aux_chunks.iter().map(|(id, body)| (*id, *body)));
        chunks.push((*DATA_CHUNK, samples.as_ref()));

        // RIFF size = 4 (WAVE) + every chunk header, body and pad byte
        let riff_size: usize = WAVE_MAGIC.len()
            + chunks
                .iter()
                .map(|(_, body)| ChunkHeader::SIZE + body.len() + (body.len() & 1))
                .sum::<usize>();

        let mut out = Vec::with_capacity(riff_size + 8);
        out.extend_from_slice(RIFF_MAGIC);
        out.extend_from_slice(&(riff_size as u32).to_le_bytes());
        out.extend_from_slice(WAVE_MAGIC);

        for (id, body) in chunks {
            let header = ChunkHeader {
                id,
                size: body.len() as u32,
            };
            out.extend_from_slice(&header.to_bytes());
            out.extend_from_slice(body);
            if body.len() % 2 != 0 {
                out.push(0);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::AudioSpec;
    use crate::format::wav::{ChunkIter, WavDemuxer};
    use crate::util::SampleFormat;

    fn asset(channels: u16, frames: usize) -> AudioAsset {
        let spec = AudioSpec::new(48000, channels, SampleFormat::I16);
        AudioAsset::new(spec, vec![7u8; frames * spec.block_align()]).unwrap()
    }

    #[test]
    fn test_minimal_layout() {
        let out = WavMuxer::new().mux(&asset(1, 10));
        assert_eq!(out.len(), 44 + 20);
        assert_eq!(&out[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([out[4], out[5], out[6], out[7]]) as usize, out.len() - 8);
        assert_eq!(&out[36..40], b"data");
    }

    #[test]
    fn test_kit_chunk_layout() {
        let out = WavMuxer::with_kit_chunks().mux(&asset(2, 5));
        assert_eq!(out.len(), 44 + 74 + 20);
        assert_eq!(u32::from_le_bytes([out[4], out[5], out[6], out[7]]) as usize, out.len() - 8);

        let ids: Vec<[u8; 4]> = ChunkIter::new(&out)
            .unwrap()
            .map(|c| c.unwrap().header.id)
            .collect();
        assert_eq!(ids, vec![*b"fmt ", *b"cue ", *b"LIST", *b"data"]);
    }

    #[test]
    fn test_mux_then_demux() {
        let source = asset(2, 3);
        let out = WavMuxer::with_kit_chunks().mux(&source);
        assert_eq!(WavDemuxer::demux(&out).unwrap(), source);
    }

    #[test]
    fn test_odd_aux_chunk_is_padded() {
        let out = WavMuxer::new().with_chunk(*b"note", b"abc").mux(&asset(1, 1));
        assert_eq!(out.len(), 44 + 12 + 2);
        assert_eq!(u32::from_le_bytes([out[4], out[5], out[6], out[7]]) as usize, out.len() - 8);
    }
}
