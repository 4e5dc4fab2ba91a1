//! WAV audio format support
//!
//! This module implements RIFF/WAV file format parsing and writing.
//! Only uncompressed integer PCM is decoded; everything else is reported
//! as an unsupported encoding.

pub mod demuxer;
pub mod header;
pub mod muxer;

pub use demuxer::WavDemuxer;
pub use header::{FormatTag, WavFormat, WavHeader};
pub use muxer::WavMuxer;

use crate::error::{Error, Result};

/// WAV format magic numbers
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_MAGIC: &[u8; 4] = b"WAVE";
pub const FMT_CHUNK: &[u8; 4] = b"fmt ";
pub const DATA_CHUNK: &[u8; 4] = b"data";
pub const CUE_CHUNK: &[u8; 4] = b"cue ";
pub const LIST_CHUNK: &[u8; 4] = b"LIST";

/// Length of the `RIFF` + size + `WAVE` preamble
pub const RIFF_HEADER_SIZE: usize = 12;

/// Chunk header (4 byte ID + 4 byte size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    /// Size of an encoded chunk header
    pub const SIZE: usize = 8;

    /// Read a chunk header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }

        let mut id = [0u8; 4];
        id.copy_from_slice(&bytes[0..4]);

        let size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Some(ChunkHeader { id, size })
    }

    /// Convert chunk header to bytes
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(&self.id);
        bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    /// Chunk ID as printable text
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// One sub-chunk located inside a RIFF buffer
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Header as read from the buffer
    pub header: ChunkHeader,
    /// Offset of the header from the start of the buffer
    pub offset: usize,
    /// Chunk body, exactly `header.size` bytes
    pub body: &'a [u8],
}

/// Walks the sub-chunks of a RIFF/WAVE buffer by tag and length
///
/// Iteration starts right after the 12-byte preamble. A chunk whose declared
/// size runs past the end of the buffer yields `TruncatedInput` and ends the
/// walk. Fewer than eight trailing bytes are ignored.
pub struct ChunkIter<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ChunkIter<'a> {
    /// Validate the RIFF/WAVE preamble and start walking
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < RIFF_HEADER_SIZE {
            return Err(Error::truncated("RIFF header", RIFF_HEADER_SIZE, data.len()));
        }
        if &data[0..4] != RIFF_MAGIC {
            return Err(Error::format("Not a valid RIFF file"));
        }
        if &data[8..12] != WAVE_MAGIC {
            return Err(Error::format("Not a valid WAVE file"));
        }

        Ok(ChunkIter {
            data,
            pos: RIFF_HEADER_SIZE,
            done: false,
        })
    }

    /// Declared RIFF size (bytes following the size field)
    pub fn riff_size(&self) -> u32 {
        u32::from_le_bytes([self.data[4], self.data[5], self.data[6], self.data[7]])
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let header = match ChunkHeader::from_bytes(&self.data[self.pos..]) {
            Some(header) => header,
            None => {
                self.done = true;
                return None;
            }
        };

        let body_start = self.pos + ChunkHeader::SIZE;
        let available = self.data.len() - body_start;
        let size = header.size as usize;
        if size > available {
            self.done = true;
            return Some(Err(Error::truncated(
                format!("'{}' chunk", header.id_str()),
                size,
                available,
            )));
        }

        let chunk = Chunk {
            header,
            offset: self.pos,
            body: &self.data[body_start..body_start + size],
        };

        // WAV chunks are word-aligned
        self.pos = (body_start + size + (size & 1)).min(self.data.len());

        Some(Ok(chunk))
    }
}
