//! Pack and unpack whole kits

use super::demuxer::StkDemuxer;
use super::layout::{KitProfile, SLOT_COUNT};
use super::muxer::StkMuxer;
use super::slot::{SlotParams, SlotTable};
use crate::codec::{AudioAsset, CanonicalAsset};
use crate::error::{Error, Result};
use crate::swresample::ResamplerContext;
use bytes::Bytes;
use tracing::{debug, info, warn};

/// One of the 15 sample positions of a kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitEntry {
    /// Display name, used for the slot's virtual path
    pub name: String,
    /// Kit WAV encoding of a canonical asset
    pub wav: Bytes,
    /// Playback parameters
    pub params: SlotParams,
}

impl KitEntry {
    /// Build an entry from a canonical asset
    pub fn new<S: Into<String>>(name: S, asset: &CanonicalAsset, params: SlotParams) -> Self {
        KitEntry {
            name: name.into(),
            wav: Bytes::from(asset.to_kit_wav_bytes()),
            params,
        }
    }
}

/// One source sample handed to [`pack`]
#[derive(Debug, Clone)]
pub struct PackInput {
    /// Display name, usually the source file stem
    pub name: String,
    /// Decoded source audio in any supported PCM format
    pub asset: AudioAsset,
    /// Playback parameters; defaults when absent
    pub params: Option<SlotParams>,
}

impl PackInput {
    /// Create an input with default parameters
    pub fn new<S: Into<String>>(name: S, asset: AudioAsset) -> Self {
        PackInput {
            name: name.into(),
            asset,
            params: None,
        }
    }

    /// Set playback parameters
    pub fn with_params(mut self, params: SlotParams) -> Self {
        self.params = Some(params);
        self
    }
}

/// Packing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackOptions {
    /// Output channel count, 1 or 2
    pub channels: u16,
    /// Layout revision to write
    pub profile: KitProfile,
}

impl PackOptions {
    /// Options for a profile with its default channel layout
    pub fn for_profile(profile: KitProfile) -> Self {
        PackOptions {
            channels: profile.default_channels,
            profile,
        }
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self::for_profile(KitProfile::default())
    }
}

/// Normalize every input into a kit entry
///
/// A failure names the input that caused it; entries already converted are
/// not affected.
pub fn prepare_entries(inputs: &[PackInput], channels: u16) -> Result<Vec<KitEntry>> {
    let context = ResamplerContext::new(channels)?;

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let params = input.params.unwrap_or_default();
            params
                .validate()
                .and_then(|_| context.process(&input.asset))
                .map(|canonical| KitEntry::new(input.name.clone(), &canonical, params))
                .map_err(|e| e.for_asset(index, input.name.clone()))
        })
        .collect()
}

/// Fill a kit up to 15 entries
///
/// The smallest entry by encoded length (first one on ties) is chosen once
/// and appended until 15 entries exist. Each copy is named
/// `<source>_pad<slot number>` and keeps the source's parameters. Inputs past
/// the 15th are dropped.
pub fn pad_entries(mut entries: Vec<KitEntry>) -> Result<Vec<KitEntry>> {
    if entries.is_empty() {
        return Err(Error::NoAssetsProvided);
    }

    if entries.len() > SLOT_COUNT {
        warn!(
            "{} samples given, keeping the first {}",
            entries.len(),
            SLOT_COUNT
        );
        entries.truncate(SLOT_COUNT);
    }

    let smallest = entries
        .iter()
        .min_by_key(|e| e.wav.len())
        .cloned()
        .ok_or(Error::NoAssetsProvided)?;

    if entries.len() < SLOT_COUNT {
        debug!(
            "Padding {} entries with copies of '{}' ({} bytes)",
            SLOT_COUNT - entries.len(),
            smallest.name,
            smallest.wav.len()
        );
    }

    while entries.len() < SLOT_COUNT {
        let name = format!("{}_pad{}", smallest.name, entries.len() + 1);
        entries.push(KitEntry {
            name,
            ..smallest.clone()
        });
    }

    Ok(entries)
}

/// Pack source samples into a kit file image
pub fn pack(inputs: &[PackInput], title: &str, options: &PackOptions) -> Result<Vec<u8>> {
    if inputs.is_empty() {
        return Err(Error::NoAssetsProvided);
    }

    let inputs = if inputs.len() > SLOT_COUNT {
        warn!(
            "{} samples given, keeping the first {}",
            inputs.len(),
            SLOT_COUNT
        );
        &inputs[..SLOT_COUNT]
    } else {
        inputs
    };

    let entries = pad_entries(prepare_entries(inputs, options.channels)?)?;
    let table = SlotTable::build(title, &entries, options.profile)?;
    let kit = StkMuxer::new(options.profile).mux(&table, &entries)?;

    info!(
        "Packed {} samples into kit '{}' ({} bytes, profile {})",
        inputs.len(),
        title,
        kit.len(),
        options.profile
    );

    Ok(kit)
}

/// Extract every embedded WAV file from a kit image (default profile)
///
/// Scanning is lenient: unknown bytes are skipped and a span whose declared
/// length runs past the end is logged and skipped. A buffer shorter than the
/// kit header yields no samples.
pub fn unpack(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    unpack_with_profile(data, KitProfile::default())
}

/// Extract every embedded WAV file using the layout of `profile`
pub fn unpack_with_profile(data: &[u8], profile: KitProfile) -> Result<Vec<Vec<u8>>> {
    let mut samples = Vec::new();

    let mut scanner = StkDemuxer::new(data, profile).scan();
    while let Some(item) = scanner.next() {
        match item {
            Ok(sample) => {
                debug!(
                    "Found sample {} at offset {:#x} ({} bytes)",
                    sample.index,
                    sample.offset,
                    sample.data.len()
                );
                samples.push(sample.data.to_vec());
            }
            Err(e) => warn!(
                "Skipping malformed sample span, resuming at {:#x}: {}",
                scanner.position(),
                e
            ),
        }
    }

    Ok(samples)
}
