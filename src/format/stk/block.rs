//! Sample block headers (`ISDT`)

use super::layout::{BLOCK_HEADER_SIZE, BLOCK_SIGNATURE, BLOCK_SIZE_OFFSET, BLOCK_TRAILER};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Header announcing one embedded sample payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Payload length plus [`BLOCK_SIZE_OFFSET`]
    pub size: u32,
    /// Zero-based slot position of the payload
    pub index: u32,
    /// Opaque trailer, always [`BLOCK_TRAILER`] in known files
    pub trailer: u32,
}

impl BlockHeader {
    /// Header for the payload at `index` with `payload_len` bytes
    pub fn for_payload(index: usize, payload_len: usize) -> Result<Self> {
        let size = u32::try_from(payload_len)
            .ok()
            .and_then(|len| len.checked_add(BLOCK_SIZE_OFFSET))
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "Sample {} is too large for a kit ({} bytes)",
                    index, payload_len
                ))
            })?;
        let index = u32::try_from(index)
            .map_err(|_| Error::invalid_input(format!("Block index {} out of range", index)))?;

        Ok(BlockHeader {
            size,
            index,
            trailer: BLOCK_TRAILER,
        })
    }

    /// Payload length implied by the size field
    pub fn payload_len(&self) -> Option<usize> {
        self.size.checked_sub(BLOCK_SIZE_OFFSET).map(|len| len as usize)
    }

    /// Write the 16 header bytes
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(BLOCK_SIGNATURE)?;
        writer.write_u32::<LittleEndian>(self.size)?;
        writer.write_u32::<LittleEndian>(self.index)?;
        writer.write_u32::<LittleEndian>(self.trailer)?;
        Ok(())
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> [u8; BLOCK_HEADER_SIZE] {
        let mut bytes = [0u8; BLOCK_HEADER_SIZE];
        bytes[0..4].copy_from_slice(BLOCK_SIGNATURE);
        bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.index.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.trailer.to_le_bytes());
        bytes
    }

    /// Decode a header from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < BLOCK_HEADER_SIZE {
            return Err(Error::truncated("block header", BLOCK_HEADER_SIZE, data.len()));
        }

        let mut reader = Cursor::new(data);
        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        if &signature != BLOCK_SIGNATURE {
            return Err(Error::format(format!(
                "Expected block signature {:?}, found {:?}",
                String::from_utf8_lossy(BLOCK_SIGNATURE),
                String::from_utf8_lossy(&signature)
            )));
        }

        Ok(BlockHeader {
            size: reader.read_u32::<LittleEndian>()?,
            index: reader.read_u32::<LittleEndian>()?,
            trailer: reader.read_u32::<LittleEndian>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_payload() {
        let header = BlockHeader::for_payload(3, 1000).unwrap();
        assert_eq!(header.size, 1018);
        assert_eq!(header.index, 3);
        assert_eq!(header.trailer, 1);
        assert_eq!(header.payload_len(), Some(1000));
    }

    #[test]
    fn test_bytes_match_writer() {
        let header = BlockHeader::for_payload(1, 44).unwrap();
        let mut written = Vec::new();
        header.write_to(&mut written).unwrap();
        assert_eq!(written, header.to_bytes());
        assert_eq!(&written, b"ISDT\x3e\x00\x00\x00\x01\x00\x00\x00\x01\x00\x00\x00");
        assert_eq!(BlockHeader::from_bytes(&written).unwrap(), header);
    }

    #[test]
    fn test_from_bytes_errors() {
        assert!(matches!(
            BlockHeader::from_bytes(b"ISDT\x00"),
            Err(Error::TruncatedInput { .. })
        ));
        assert!(matches!(
            BlockHeader::from_bytes(&[0u8; 16]),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_oversized_payload() {
        assert!(BlockHeader::for_payload(0, u32::MAX as usize).is_err());
    }

    #[test]
    fn test_size_below_offset() {
        let header = BlockHeader {
            size: 4,
            index: 0,
            trailer: 1,
        };
        assert_eq!(header.payload_len(), None);
    }
}
