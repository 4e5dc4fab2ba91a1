//! Container format handling
//!
//! `wav` reads and writes individual samples, `stk` reads and writes kits.

pub mod stk;
pub mod wav;

use std::path::Path;

/// Containers this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// RIFF/WAVE sample
    Wav,
    /// STK drum kit
    Stk,
}

impl ContainerKind {
    /// Short name
    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Wav => "wav",
            ContainerKind::Stk => "stk",
        }
    }
}

/// Detect format from file extension (case-insensitive)
pub fn detect_format_from_extension<P: AsRef<Path>>(path: P) -> Option<ContainerKind> {
    let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "wav" | "wave" => Some(ContainerKind::Wav),
        "stk" => Some(ContainerKind::Stk),
        _ => None,
    }
}

/// Detect format from the leading bytes of a file
pub fn detect_format_from_magic(data: &[u8]) -> Option<ContainerKind> {
    if data.starts_with(stk::layout::MAGIC) {
        Some(ContainerKind::Stk)
    } else if data.len() >= wav::RIFF_HEADER_SIZE
        && &data[0..4] == wav::RIFF_MAGIC
        && &data[8..12] == wav::WAVE_MAGIC
    {
        Some(ContainerKind::Wav)
    } else {
        None
    }
}
