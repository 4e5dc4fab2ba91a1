//! STK kit muxer

use super::block::BlockHeader;
use super::kit::KitEntry;
use super::layout::{
    KitProfile, BLOCK_HEADER_SIZE, KTDT_TAG, KTDT_TAG_OFFSET, MAGIC, SLOT_COUNT, TERMINATOR,
    VERSION_MARKER,
};
use super::slot::SlotTable;
use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes kit files from a slot table and its 15 entries
pub struct StkMuxer {
    profile: KitProfile,
}

impl StkMuxer {
    /// Create a muxer for a layout profile
    pub fn new(profile: KitProfile) -> Self {
        StkMuxer { profile }
    }

    /// Layout profile
    pub fn profile(&self) -> KitProfile {
        self.profile
    }

    fn check(&self, table: &SlotTable, entries: &[KitEntry]) -> Result<()> {
        if entries.is_empty() {
            return Err(Error::NoAssetsProvided);
        }
        if entries.len() != SLOT_COUNT {
            return Err(Error::invalid_input(format!(
                "A kit holds exactly {} samples, got {}",
                SLOT_COUNT,
                entries.len()
            )));
        }
        if table.profile() != self.profile {
            return Err(Error::invalid_input(format!(
                "Slot table built for profile '{}', muxer uses '{}'",
                table.profile(),
                self.profile
            )));
        }
        if table.first_block() != BlockHeader::for_payload(0, entries[0].wav.len())? {
            return Err(Error::invalid_input(
                "Slot table does not describe the first sample",
            ));
        }
        Ok(())
    }

    fn write_header<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(KTDT_TAG_OFFSET)?;
        writer.write_all(KTDT_TAG)?;
        writer.write_u32::<LittleEndian>(self.profile.ktdt_size() as u32)?;
        writer.write_u32::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(VERSION_MARKER)?;
        Ok(())
    }

    /// Write a complete kit, returning the number of bytes written
    ///
    /// Layout: header, slot table (ending with the first block header), the
    /// first payload, then for every later payload `block_padding` zero
    /// bytes, its block header and the payload, and finally the terminator.
    pub fn write<W: Write>(
        &self,
        table: &SlotTable,
        entries: &[KitEntry],
        writer: &mut W,
    ) -> Result<u64> {
        self.check(table, entries)?;

        let padding = vec![0u8; self.profile.block_padding];
        let table_bytes = table.to_bytes();

        self.write_header(writer)?;
        writer.write_all(&table_bytes)?;
        writer.write_all(&entries[0].wav)?;

        let mut written = (self.profile.first_payload_offset() + entries[0].wav.len()) as u64;

        for (index, entry) in entries.iter().enumerate().skip(1) {
            let header = BlockHeader::for_payload(index, entry.wav.len())?;
            writer.write_all(&padding)?;
            header.write_to(writer)?;
            writer.write_all(&entry.wav)?;
            written += (padding.len() + BLOCK_HEADER_SIZE + entry.wav.len()) as u64;
        }

        writer.write_all(&TERMINATOR)?;
        written += TERMINATOR.len() as u64;
        writer.flush()?;

        debug!(
            "Wrote kit with {} samples ({} bytes, profile {})",
            entries.len(),
            written,
            self.profile
        );

        Ok(written)
    }

    /// Encode a complete kit to memory
    pub fn mux(&self, table: &SlotTable, entries: &[KitEntry]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(Self::expected_size(&self.profile, entries));
        self.write(table, entries, &mut out)?;
        Ok(out)
    }

    /// Write a kit to `path`
    ///
    /// The kit goes to a temporary file in the destination directory which
    /// replaces `path` only once every byte is written, so a failed write
    /// never leaves a partial kit behind.
    pub fn write_file<P: AsRef<Path>>(
        &self,
        path: P,
        table: &SlotTable,
        entries: &[KitEntry],
    ) -> Result<u64> {
        let path = path.as_ref();
        self.check(table, entries)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(tmp);
        let written = self.write(table, entries, &mut writer)?;
        let tmp = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        Ok(written)
    }

    /// Size in bytes of the kit `entries` encode to
    pub fn expected_size(profile: &KitProfile, entries: &[KitEntry]) -> usize {
        let payloads: usize = entries.iter().map(|e| e.wav.len()).sum();
        let later_blocks = entries.len().saturating_sub(1);
        profile.first_payload_offset()
            + payloads
            + later_blocks * (profile.block_padding + BLOCK_HEADER_SIZE)
            + TERMINATOR.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::stk::layout::{FOOTER, HEADER_SIZE};
    use crate::format::stk::slot::SlotParams;
    use bytes::Bytes;

    fn entries(sizes: &[usize]) -> Vec<KitEntry> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &len)| KitEntry {
                name: format!("s{}", i),
                wav: Bytes::from(vec![i as u8 + 1; len]),
                params: SlotParams::default(),
            })
            .collect()
    }

    fn kit(profile: KitProfile, sizes: &[usize]) -> (Vec<KitEntry>, Vec<u8>) {
        let entries = entries(sizes);
        let table = SlotTable::build("Kit", &entries, profile).unwrap();
        let bytes = StkMuxer::new(profile).mux(&table, &entries).unwrap();
        (entries, bytes)
    }

    #[test]
    fn test_header_bytes() {
        let (_, bytes) = kit(KitProfile::SMPLTREK, &[40; 15]);
        assert_eq!(&bytes[0..8], b"VDK0PR \x00");
        assert_eq!(&bytes[8..12], &[0, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[0x10, 0, 0, 0]);
        assert_eq!(&bytes[16..20], b"KTDT");
        assert_eq!(&bytes[20..24], &[0x84, 0x10, 0, 0]);
        assert_eq!(&bytes[24..28], &[0, 0, 0, 0]);
        assert_eq!(&bytes[28..32], &[1, 0, 0, 0]);
        assert_eq!(&bytes[0x1088..0x1094], &FOOTER);
    }

    #[test]
    fn test_block_placement() {
        let sizes: Vec<usize> = (0..15).map(|i| 50 + i * 3).collect();
        let (entries, bytes) = kit(KitProfile::SMPLTREK, &sizes);

        let mut offset = 0x1094;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                assert_eq!(&bytes[offset..offset + 2], &[0, 0]);
                offset += 2;
            }
            let header = BlockHeader::from_bytes(&bytes[offset..]).unwrap();
            assert_eq!(header.index as usize, i);
            assert_eq!(header.size as usize, entry.wav.len() + 18);
            offset += BLOCK_HEADER_SIZE;
            assert_eq!(&bytes[offset..offset + entry.wav.len()], &entry.wav[..]);
            offset += entry.wav.len();
        }

        assert_eq!(&bytes[offset..], &TERMINATOR);
        assert_eq!(bytes.len(), StkMuxer::expected_size(&KitProfile::SMPLTREK, &entries));
    }

    #[test]
    fn test_legacy_has_no_padding() {
        let (entries, bytes) = kit(KitProfile::LEGACY, &[20; 15]);
        let second = KitProfile::LEGACY.first_payload_offset() + 20;
        assert_eq!(&bytes[second..second + 4], b"ISDT");
        assert_eq!(bytes.len(), StkMuxer::expected_size(&KitProfile::LEGACY, &entries));
        assert_eq!(bytes.len(), HEADER_SIZE + 15 * 281 + 28 + 15 * 20 + 14 * 16 + 2);
        assert_eq!(&bytes[bytes.len() - 2..], &TERMINATOR);
    }

    #[test]
    fn test_rejects_wrong_count() {
        let full = entries(&[10; 15]);
        let table = SlotTable::build("Kit", &full, KitProfile::SMPLTREK).unwrap();
        let muxer = StkMuxer::new(KitProfile::SMPLTREK);

        assert!(matches!(muxer.mux(&table, &[]), Err(Error::NoAssetsProvided)));
        assert!(matches!(
            muxer.mux(&table, &full[..3]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_table() {
        let full = entries(&[10; 15]);
        let table = SlotTable::build("Kit", &full, KitProfile::SMPLTREK).unwrap();
        let other = entries(&[11; 15]);
        assert!(StkMuxer::new(KitProfile::SMPLTREK).mux(&table, &other).is_err());
        assert!(StkMuxer::new(KitProfile::LEGACY).mux(&table, &full).is_err());
    }

    #[test]
    fn test_write_file_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kit.stk");
        std::fs::write(&path, b"old").unwrap();

        let full = entries(&[10; 15]);
        let table = SlotTable::build("Kit", &full, KitProfile::SMPLTREK).unwrap();
        let muxer = StkMuxer::new(KitProfile::SMPLTREK);
        let written = muxer.write_file(&path, &table, &full).unwrap();

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(on_disk.len() as u64, written);
        assert_eq!(on_disk, muxer.mux(&table, &full).unwrap());
    }
}
