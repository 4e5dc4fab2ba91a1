//! STK drum kit container
//!
//! A kit file bundles exactly 15 WAV samples behind a fixed-size header and
//! slot table:
//!
//! ```text
//! 0x0000  header       magic, KTDT tag, KTDT size, version marker
//! 0x0020  slot table   15 entries (virtual path + playback parameters)
//!         footer       12 opaque bytes
//!         ISDT #0      block header of the first sample
//!         payload #0   kit WAV bytes
//!         [padding] ISDT #i payload #i   for i in 1..15
//!         terminator   2 zero bytes
//! ```
//!
//! Offsets depend on the [`KitProfile`]; see [`layout`].

pub mod block;
pub mod demuxer;
pub mod kit;
pub mod layout;
pub mod muxer;
pub mod slot;

pub use block::BlockHeader;
pub use demuxer::{ExtractedSample, KitScanner, ScanState, StkDemuxer};
pub use kit::{
    pack, pad_entries, prepare_entries, unpack, unpack_with_profile, KitEntry, PackInput,
    PackOptions,
};
pub use layout::KitProfile;
pub use muxer::StkMuxer;
pub use slot::{virtual_path, SlotEntry, SlotParams, SlotTable};
