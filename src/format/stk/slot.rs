//! Slot table: virtual paths and per-slot playback parameters

use super::block::BlockHeader;
use super::kit::KitEntry;
use super::layout::{
    KitProfile, FOOTER, HEADER_SIZE, KTDT_TAG, MAGIC, PARAM_RECORD_SIZE, PATH_FIELD_SIZE,
    SLOT_COUNT, VIRTUAL_ROOT,
};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::ops::RangeInclusive;
use tracing::warn;

/// Accepted volume range
pub const VOLUME_RANGE: RangeInclusive<i32> = 0..=100;
/// Accepted pan range
pub const PAN_RANGE: RangeInclusive<i32> = -64..=63;
/// Accepted FX send range
pub const FX_SEND_RANGE: RangeInclusive<i32> = 0..=127;
/// Accepted pitch range in cents
pub const PITCH_RANGE: RangeInclusive<i32> = -1200..=1200;

/// Playback parameters of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    /// Volume, 0 to 100
    pub volume: u8,
    /// Pan, -64 (left) to 63 (right)
    pub pan: i8,
    /// Effect send, 0 to 127
    pub fx_send: u8,
    /// Pitch in cents, -1200 to 1200
    pub pitch: i16,
}

impl Default for SlotParams {
    fn default() -> Self {
        SlotParams {
            volume: 100,
            pan: 0,
            fx_send: 0,
            pitch: 0,
        }
    }
}

fn check(name: &str, value: i32, range: &RangeInclusive<i32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "{} {} out of range {}..={}",
            name,
            value,
            range.start(),
            range.end()
        )))
    }
}

impl SlotParams {
    /// Build parameters, rejecting out-of-range values
    pub fn new(volume: i32, pitch: i32, pan: i32, fx_send: i32) -> Result<Self> {
        check("Volume", volume, &VOLUME_RANGE)?;
        check("Pitch", pitch, &PITCH_RANGE)?;
        check("Pan", pan, &PAN_RANGE)?;
        check("FX send", fx_send, &FX_SEND_RANGE)?;

        Ok(SlotParams {
            volume: volume as u8,
            pan: pan as i8,
            fx_send: fx_send as u8,
            pitch: pitch as i16,
        })
    }

    /// Check the ranges of parameters built by hand
    pub fn validate(&self) -> Result<()> {
        Self::new(
            self.volume as i32,
            self.pitch as i32,
            self.pan as i32,
            self.fx_send as i32,
        )
        .map(|_| ())
    }

    /// Pitch in 1/256-semitone units: `round(cents * 256 / 100)`
    pub fn pitch_units(&self) -> i16 {
        (self.pitch as f64 * 256.0 / 100.0).round() as i16
    }

    /// Encode into a parameter region of `size` bytes
    ///
    /// Byte 0 volume, byte 1 pan, byte 16 FX send, bytes 17..19 pitch
    /// units; everything else is reserved zero. Sizes below 24 are widened
    /// to 24.
    pub fn to_bytes(&self, size: usize) -> Vec<u8> {
        let mut region = vec![0u8; size.max(PARAM_RECORD_SIZE)];
        region[0] = self.volume;
        region[1] = self.pan as u8;
        region[16] = self.fx_send;
        LittleEndian::write_i16(&mut region[17..19], self.pitch_units());
        region
    }

    /// Decode a parameter region of at least 24 bytes
    pub fn from_bytes(region: &[u8]) -> Result<Self> {
        if region.len() < PARAM_RECORD_SIZE {
            return Err(Error::truncated(
                "slot parameters",
                PARAM_RECORD_SIZE,
                region.len(),
            ));
        }

        let units = LittleEndian::read_i16(&region[17..19]);
        Ok(SlotParams {
            volume: region[0],
            pan: region[1] as i8,
            fx_send: region[16],
            pitch: (units as f64 * 100.0 / 256.0).round() as i16,
        })
    }
}

/// Device-side virtual path of a slot, e.g.
/// `SmplTrek/Pool/Audio/Drum/<title>/<name>.wav`
pub fn virtual_path(title: &str, name: &str) -> String {
    format!("{}/{}/{}.wav", VIRTUAL_ROOT, title, name)
}

/// One slot record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    path: Vec<u8>,
    params: SlotParams,
    path_truncated: bool,
}

impl SlotEntry {
    /// Build the entry for sample `name` of kit `title`
    ///
    /// A path that does not fit the 256-byte region with its terminator is
    /// cut to 255 bytes. The cut is lossy and may split a UTF-8 sequence;
    /// it is logged, not rejected.
    pub fn new(title: &str, name: &str, params: SlotParams) -> Self {
        let full = virtual_path(title, name);
        let mut path = full.into_bytes();
        let path_truncated = path.len() >= PATH_FIELD_SIZE;

        if path_truncated {
            warn!(
                "Virtual path for '{}' is {} bytes, truncating to {}",
                name,
                path.len() + 1,
                PATH_FIELD_SIZE - 1
            );
            path.truncate(PATH_FIELD_SIZE - 1);
        }

        SlotEntry {
            path,
            params,
            path_truncated,
        }
    }

    /// Path bytes without the terminator
    pub fn path_bytes(&self) -> &[u8] {
        &self.path
    }

    /// Path as text
    pub fn path(&self) -> String {
        String::from_utf8_lossy(&self.path).into_owned()
    }

    /// Playback parameters
    pub fn params(&self) -> SlotParams {
        self.params
    }

    /// Whether the path was cut to fit
    pub fn path_truncated(&self) -> bool {
        self.path_truncated
    }

    /// Encode as one `profile.entry_size` record
    pub fn to_bytes(&self, profile: &KitProfile) -> Vec<u8> {
        let mut record = Vec::with_capacity(profile.entry_size);
        record.extend_from_slice(&self.path);
        record.resize(PATH_FIELD_SIZE, 0);
        record.extend_from_slice(&self.params.to_bytes(profile.param_region_size()));
        record
    }

    /// Decode one record
    ///
    /// Whether the original name was cut cannot be recovered from the bytes,
    /// so decoded entries never report truncation.
    pub fn from_bytes(record: &[u8]) -> Result<Self> {
        let needed = PATH_FIELD_SIZE + PARAM_RECORD_SIZE;
        if record.len() < needed {
            return Err(Error::truncated("slot record", needed, record.len()));
        }

        let path_field = &record[..PATH_FIELD_SIZE];
        let end = path_field.iter().position(|&b| b == 0).unwrap_or(PATH_FIELD_SIZE);
        Ok(SlotEntry {
            path: path_field[..end].to_vec(),
            params: SlotParams::from_bytes(&record[PATH_FIELD_SIZE..])?,
            path_truncated: false,
        })
    }
}

/// The 15 slot records plus footer and first block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    profile: KitProfile,
    entries: Vec<SlotEntry>,
    first_block: BlockHeader,
}

impl SlotTable {
    /// Build the table for exactly 15 kit entries
    pub fn build(title: &str, entries: &[KitEntry], profile: KitProfile) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::NoAssetsProvided);
        }
        if entries.len() != SLOT_COUNT {
            return Err(Error::invalid_input(format!(
                "Slot table needs {} entries, got {}",
                SLOT_COUNT,
                entries.len()
            )));
        }

        let slots = entries
            .iter()
            .map(|e| SlotEntry::new(title, &e.name, e.params))
            .collect();
        let first_block = BlockHeader::for_payload(0, entries[0].wav.len())?;

        Ok(SlotTable {
            profile,
            entries: slots,
            first_block,
        })
    }

    /// Read the table back from a whole kit file
    pub fn parse(data: &[u8], profile: KitProfile) -> Result<Self> {
        let end = profile.first_payload_offset();
        if data.len() < end {
            return Err(Error::truncated("kit header", end, data.len()));
        }
        if &data[0..8] != MAGIC {
            return Err(Error::format("Not an STK kit file"));
        }
        if &data[0x10..0x14] != KTDT_TAG {
            return Err(Error::format("KTDT tag not found"));
        }
        let declared = LittleEndian::read_u32(&data[0x14..0x18]) as usize;
        if declared != profile.ktdt_size() {
            return Err(Error::format(format!(
                "KTDT size {} does not match profile '{}' ({})",
                declared,
                profile,
                profile.ktdt_size()
            )));
        }

        let entries = data[HEADER_SIZE..profile.footer_offset()]
            .chunks_exact(profile.entry_size)
            .map(SlotEntry::from_bytes)
            .collect::<Result<Vec<_>>>()?;
        let first_block = BlockHeader::from_bytes(&data[profile.first_block_offset()..end])?;

        Ok(SlotTable {
            profile,
            entries,
            first_block,
        })
    }

    /// Layout profile
    pub fn profile(&self) -> KitProfile {
        self.profile
    }

    /// Slot records, always 15
    pub fn entries(&self) -> &[SlotEntry] {
        &self.entries
    }

    /// Header of the first payload, stored inside the table region
    pub fn first_block(&self) -> BlockHeader {
        self.first_block
    }

    /// Encode entries, footer and first block header (`ktdt_size` bytes)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.profile.ktdt_size());
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_bytes(&self.profile));
        }
        out.extend_from_slice(&FOOTER);
        out.extend_from_slice(&self.first_block.to_bytes());
        out
    }
}
