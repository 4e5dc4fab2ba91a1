//! WAV file demuxer implementation

use super::header::WavHeader;
use crate::codec::{AudioAsset, AudioSpec};
use crate::error::Result;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// Decodes a RIFF/WAVE buffer into an [`AudioAsset`]
pub struct WavDemuxer;

impl WavDemuxer {
    /// Read and decode a WAV file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<AudioAsset> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Self::demux(&data)
    }

    /// Decode a WAV buffer
    ///
    /// Fails with `UnsupportedEncoding` for anything but integer PCM and with
    /// `TruncatedInput` when a chunk declares more bytes than remain. A
    /// trailing partial frame in the `data` chunk is dropped.
    pub fn demux(data: &[u8]) -> Result<AudioAsset> {
        let header = WavHeader::parse(data)?;
        let format = header.format.pcm_sample_format()?;
        let spec = AudioSpec::new(header.format.sample_rate, header.format.channels, format);

        let whole_frames = header.num_samples() as usize * spec.block_align();
        let start = header.data_start;
        let samples = Bytes::copy_from_slice(&data[start..start + whole_frames]);

        debug!(
            "Demuxed WAV: {} Hz, {} ch, {}, {} frames ({:.3}s)",
            spec.sample_rate,
            spec.channels,
            spec.format,
            header.num_samples(),
            header.duration_seconds()
        );

        AudioAsset::new(spec, samples)
    }
}
