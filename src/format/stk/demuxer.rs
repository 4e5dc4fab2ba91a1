//! STK kit demuxer
//!
//! Samples are recovered by scanning the payload region for RIFF signatures
//! rather than by walking block headers, so kits with unknown block padding
//! or stray bytes between blocks still yield their samples.

use super::layout::{KitProfile, RIFF_SPAN_MIN, SLOT_COUNT};
use super::slot::SlotTable;
use crate::error::{Error, Result};
use crate::format::wav::RIFF_MAGIC;
use byteorder::{ByteOrder, LittleEndian};

/// One WAV file found inside a kit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedSample<'a> {
    /// Position among the samples found so far
    pub index: usize,
    /// Offset of the `RIFF` signature from the start of the kit
    pub offset: usize,
    /// The complete RIFF file, signature and length field included
    pub data: &'a [u8],
}

/// Position of the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for the next `RIFF` signature
    SeekSignature,
    /// Signature found at the cursor; length field next
    ReadLength,
    /// Length read; the span starting at the cursor is next
    EmitSpan {
        /// RIFF length field, excluding the 8 leading bytes
        declared: u32,
    },
    /// No more samples
    Done,
}

/// Kit demuxer over an in-memory kit image
pub struct StkDemuxer<'a> {
    data: &'a [u8],
    profile: KitProfile,
}

impl<'a> StkDemuxer<'a> {
    /// Create a demuxer for a kit image
    pub fn new(data: &'a [u8], profile: KitProfile) -> Self {
        StkDemuxer { data, profile }
    }

    /// Layout profile
    pub fn profile(&self) -> KitProfile {
        self.profile
    }

    /// Decode the slot table (paths and parameters)
    pub fn slot_table(&self) -> Result<SlotTable> {
        SlotTable::parse(self.data, self.profile)
    }

    /// Scan the payload region for embedded WAV files
    pub fn scan(&self) -> KitScanner<'a> {
        KitScanner::new(self.data, self.profile.first_payload_offset())
    }
}

/// Iterator over the WAV files of a kit
///
/// Yields at most 15 samples. A span whose declared length runs past the end
/// yields a `TruncatedInput` error and scanning resumes one byte after its
/// signature.
pub struct KitScanner<'a> {
    data: &'a [u8],
    pos: usize,
    state: ScanState,
    emitted: usize,
}

impl<'a> KitScanner<'a> {
    fn new(data: &'a [u8], start: usize) -> Self {
        let state = if data.len() < start {
            ScanState::Done
        } else {
            ScanState::SeekSignature
        };

        KitScanner {
            data,
            pos: start,
            state,
            emitted: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current byte offset into the kit
    pub fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Advance the state machine by one transition
    ///
    /// Returns an item whenever a span is emitted or rejected.
    fn step(&mut self) -> Option<Result<ExtractedSample<'a>>> {
        match self.state {
            ScanState::Done => None,
            ScanState::SeekSignature => {
                if self.emitted >= SLOT_COUNT || self.remaining() < RIFF_SPAN_MIN {
                    self.state = ScanState::Done;
                } else if &self.data[self.pos..self.pos + 4] == RIFF_MAGIC {
                    self.state = ScanState::ReadLength;
                } else {
                    self.pos += 1;
                }
                None
            }
            ScanState::ReadLength => {
                let declared = LittleEndian::read_u32(&self.data[self.pos + 4..self.pos + 8]);
                self.state = ScanState::EmitSpan { declared };
                None
            }
            ScanState::EmitSpan { declared } => {
                self.state = ScanState::SeekSignature;
                let span = (declared as usize).checked_add(RIFF_SPAN_MIN);

                match span.filter(|&span| span <= self.remaining()) {
                    Some(span) => {
                        let sample = ExtractedSample {
                            index: self.emitted,
                            offset: self.pos,
                            data: &self.data[self.pos..self.pos + span],
                        };
                        self.emitted += 1;
                        self.pos += span;
                        Some(Ok(sample))
                    }
                    None => {
                        let err = Error::truncated(
                            format!("RIFF span at {:#x}", self.pos),
                            (declared as usize).saturating_add(RIFF_SPAN_MIN),
                            self.remaining(),
                        );
                        self.pos += 1;
                        Some(Err(err))
                    }
                }
            }
        }
    }
}

impl<'a> Iterator for KitScanner<'a> {
    type Item = Result<ExtractedSample<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != ScanState::Done {
            if let Some(item) = self.step() {
                return Some(item);
            }
        }
        None
    }
}
