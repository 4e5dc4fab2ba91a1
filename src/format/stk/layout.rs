//! Fixed layout of STK kit files
//!
//! Every offset, tag and opaque constant of the kit format lives here and is
//! shared by the writer and the parser. The meaning of several constants
//! (footer bytes, version marker, block trailer) is inferred from working
//! device files; they are written verbatim.

/// File magic at offset 0
pub const MAGIC: &[u8; 8] = b"VDK0PR \x00";

/// Offset of the metadata tag, stored at 0x0C
pub const KTDT_TAG_OFFSET: u32 = 0x10;

/// Metadata (kit data) tag at 0x10
pub const KTDT_TAG: &[u8; 4] = b"KTDT";

/// Version/marker field at 0x1C
pub const VERSION_MARKER: u32 = 1;

/// Bytes before the slot table (magic through version marker)
pub const HEADER_SIZE: usize = 0x20;

/// Number of slots in every kit
pub const SLOT_COUNT: usize = 15;

/// Path region of a slot entry, including the NUL terminator
pub const PATH_FIELD_SIZE: usize = 256;

/// Parameter record written after the path region
pub const PARAM_RECORD_SIZE: usize = 24;

/// Footer after the slot entries; `0x64` at +8 looks like a kit volume
pub const FOOTER: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0x64, 0, 0, 0];

/// Signature opening every sample block header
pub const BLOCK_SIGNATURE: &[u8; 4] = b"ISDT";

/// Block header: signature, size, index, trailer
pub const BLOCK_HEADER_SIZE: usize = 16;

/// Added to the payload length to form a block header's size field
pub const BLOCK_SIZE_OFFSET: u32 = 18;

/// Last field of every block header
pub const BLOCK_TRAILER: u32 = 1;

/// Zero bytes after the final payload
pub const TERMINATOR: [u8; 2] = [0, 0];

/// Root of the device-side virtual path of every slot
pub const VIRTUAL_ROOT: &str = "SmplTrek/Pool/Audio/Drum";

/// Smallest span the extractor will consider: `RIFF` plus its length field
pub const RIFF_SPAN_MIN: usize = 8;

/// Body of the `cue ` chunk found in device-written samples:
/// one cue point, id 1, at sample 0 of the `data` chunk
pub const KIT_CUE_BODY: &[u8] = b"\x01\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00\x00\
data\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";

/// Body of the `LIST` chunk found in device-written samples:
/// an `adtl` list holding a `labl` for cue 1 reading "Tempo: 000.0"
pub const KIT_LIST_BODY: &[u8] = b"adtllabl\x12\x00\x00\x00\x01\x00\x00\x00Tempo: 000.0\x00\x00";

/// Named revision of the kit layout
///
/// Revisions differ in slot entry width, in the zero padding written before
/// each non-first block header, and in the channel layout their tools
/// produced by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KitProfile {
    /// Profile name as accepted on the command line
    pub name: &'static str,
    /// Bytes per slot entry (path region + parameter region)
    pub entry_size: usize,
    /// Zero bytes written before every non-first block header
    pub block_padding: usize,
    /// Channel count used when the caller does not choose one
    pub default_channels: u16,
}

impl KitProfile {
    /// Current SmplTrek layout: 280-byte entries, stereo samples
    pub const SMPLTREK: KitProfile = KitProfile {
        name: "smpltrek",
        entry_size: PATH_FIELD_SIZE + PARAM_RECORD_SIZE,
        block_padding: 2,
        default_channels: 2,
    };

    /// Earlier layout: 281-byte entries, no inter-block padding, mono samples
    pub const LEGACY: KitProfile = KitProfile {
        name: "legacy",
        entry_size: PATH_FIELD_SIZE + PARAM_RECORD_SIZE + 1,
        block_padding: 0,
        default_channels: 1,
    };

    /// All known profiles
    pub const ALL: [KitProfile; 2] = [KitProfile::SMPLTREK, KitProfile::LEGACY];

    /// Look up a profile by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<KitProfile> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Bytes of the parameter region of one entry
    pub fn param_region_size(&self) -> usize {
        self.entry_size - PATH_FIELD_SIZE
    }

    /// Bytes of all slot entries
    pub fn entries_size(&self) -> usize {
        SLOT_COUNT * self.entry_size
    }

    /// Declared size of the KTDT region: entries, footer, first block header
    pub fn ktdt_size(&self) -> usize {
        self.entries_size() + FOOTER.len() + BLOCK_HEADER_SIZE
    }

    /// Offset of the footer from the start of the file
    pub fn footer_offset(&self) -> usize {
        HEADER_SIZE + self.entries_size()
    }

    /// Offset of the first block header from the start of the file
    pub fn first_block_offset(&self) -> usize {
        self.footer_offset() + FOOTER.len()
    }

    /// Offset of the first sample payload; also the extractor's skip region
    pub fn first_payload_offset(&self) -> usize {
        HEADER_SIZE + self.ktdt_size()
    }
}

impl Default for KitProfile {
    fn default() -> Self {
        KitProfile::SMPLTREK
    }
}

impl std::fmt::Display for KitProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
