//! Common test utilities for stkit integration tests
//!
//! Helpers for synthesizing WAV files in any supported PCM layout and for
//! walking the block structure of packed kits.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use stkit_lib::format::wav::WavDemuxer;
use stkit_lib::AudioAsset;

// ============================================================================
// WAV Synthesis
// ============================================================================

/// Build a RIFF/WAVE buffer around raw sample bytes
pub fn build_wav(format_tag: u16, channels: u16, sample_rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
    let block_align = channels * (bits / 8);
    let byte_rate = sample_rate * block_align as u32;

    let mut out = Vec::with_capacity(44 + data.len());

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&format_tag.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);

    out
}

/// Sine wave sample bytes in the given integer PCM width
pub fn sine_data(sample_rate: u32, channels: u16, bits: u16, frames: usize, frequency: f32) -> Vec<u8> {
    let mut data = Vec::with_capacity(frames * channels as usize * (bits / 8) as usize);

    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = 0.5 * (2.0 * PI * frequency * t).sin();
        for _ in 0..channels {
            match bits {
                8 => data.push((128.0 + value * 127.0) as u8),
                16 => data.extend_from_slice(&((value * 32767.0) as i16).to_le_bytes()),
                24 => data.extend_from_slice(&((value * 8_388_607.0) as i32).to_le_bytes()[..3]),
                32 => data.extend_from_slice(&((value * 2_147_483_647.0) as i32).to_le_bytes()),
                other => panic!("unsupported test bit depth {}", other),
            }
        }
    }

    data
}

/// Integer PCM WAV holding a 440 Hz sine
pub fn sine_wav(sample_rate: u32, channels: u16, bits: u16, frames: usize) -> Vec<u8> {
    build_wav(1, channels, sample_rate, bits, &sine_data(sample_rate, channels, bits, frames, 440.0))
}

/// Decoded sine asset
pub fn sine_asset(sample_rate: u32, channels: u16, bits: u16, frames: usize) -> AudioAsset {
    WavDemuxer::demux(&sine_wav(sample_rate, channels, bits, frames)).expect("valid test WAV")
}

/// Write a buffer into `dir` and return its path
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write test file");
    path
}

/// Create random-looking data for fuzzing-style tests
pub fn create_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        // LCG, reproducible across runs
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((state >> 56) as u8);
    }
    data
}

// ============================================================================
// Kit Inspection
// ============================================================================

/// Size of the kit WAV encoding of a canonical asset with `data_len` sample bytes
///
/// RIFF preamble (12) + fmt (8 + 16) + cue (8 + 28) + LIST (8 + 30) + data header (8)
pub fn kit_wav_len(data_len: usize) -> usize {
    118 + data_len
}

/// Block headers of a SMPLTREK kit as `(offset, size, index, trailer)`
pub fn block_headers(kit: &[u8], payload_lens: &[usize]) -> Vec<(usize, u32, u32, u32)> {
    let read = |at: usize| u32::from_le_bytes([kit[at], kit[at + 1], kit[at + 2], kit[at + 3]]);
    let mut headers = Vec::new();
    let mut offset = 0x1094;

    for (i, len) in payload_lens.iter().enumerate() {
        if i > 0 {
            offset += 2;
        }
        assert_eq!(&kit[offset..offset + 4], b"ISDT", "block {} signature", i);
        headers.push((offset, read(offset + 4), read(offset + 8), read(offset + 12)));
        offset += 16 + len;
    }

    headers
}

// ============================================================================
// Test Constants
// ============================================================================

/// Standard source sample rates
pub const TEST_SAMPLE_RATES: &[u32] = &[8000, 11025, 22050, 44100, 48000, 96000];

/// Supported integer PCM widths
pub const TEST_BIT_DEPTHS: &[u16] = &[8, 16, 24, 32];
