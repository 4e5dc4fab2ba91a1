//! stkit - build and take apart Sonicware SmplTrek drum kits
//!
//! A kit (`.stk`) bundles exactly 15 WAV samples with a slot table of
//! device-side paths and playback parameters. Packing normalizes every
//! source sample to 48 kHz signed 16-bit PCM, pads the kit to 15 samples and
//! serializes it; extraction recovers the embedded WAV files.
//!
//! # Architecture
//!
//! - `format`: WAV parsing and writing, STK kit layout, writer and scanner
//! - `codec`: PCM sample decoding/encoding and the in-memory audio asset
//! - `swresample`: bit depth, channel and sample rate normalization
//! - `util`: sample formats
//!
//! ```no_run
//! use stkit_lib::{format::wav::WavDemuxer, pack, PackInput, PackOptions};
//!
//! let asset = WavDemuxer::open("kick.wav")?;
//! let kit = pack(&[PackInput::new("kick", asset)], "MyKit", &PackOptions::default())?;
//! std::fs::write("MyKit.stk", kit)?;
//! # Ok::<(), stkit_lib::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod swresample;
pub mod util;

pub use codec::{AudioAsset, AudioSpec, CanonicalAsset};
pub use error::{Error, Result};
pub use format::stk::{pack, unpack, KitProfile, PackInput, PackOptions, SlotParams};
pub use swresample::normalize;

/// stkit version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the stkit library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize logging with the given configuration
///
/// `RUST_LOG` overrides the level chosen by the flags. Without either flag
/// and without `RUST_LOG` only warnings are printed.
pub fn init(config: Config) -> Result<()> {
    let level = if config.debug {
        "debug"
    } else if config.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Init(format!("Failed to initialize logging: {}", e)))
}
