//! stkit CLI - SmplTrek kit packer
//!
//! A command-line tool for building and inspecting STK drum kits

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use sha2::{Digest, Sha256};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use stkit_lib::format::stk::{
    pad_entries, prepare_entries, KitEntry, SlotTable, StkDemuxer, StkMuxer,
};
use stkit_lib::format::wav::{ChunkIter, WavDemuxer, WavFormat, FMT_CHUNK};
use stkit_lib::format::{detect_format_from_extension, detect_format_from_magic, ContainerKind};
use stkit_lib::{init, Config, KitProfile, PackInput, PackOptions, SlotParams};
use tracing::{info, warn};

/// Most samples a kit holds
const MAX_SAMPLES: usize = 15;

#[derive(Parser)]
#[command(name = "stkit")]
#[command(about = "Pack WAV samples into SmplTrek .stk kits", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack up to 15 WAV files into a kit
    Pack(PackArgs),

    /// Extract the embedded WAV files of a kit
    Extract {
        /// Input .stk file
        input: PathBuf,

        /// Directory receiving sample_00.wav, sample_01.wav, ...
        output_dir: PathBuf,

        /// Kit layout profile (smpltrek, legacy)
        #[arg(long, default_value = "smpltrek")]
        profile: String,
    },

    /// List the RIFF chunks of a WAV file
    Chunks {
        /// Input .wav file
        input: PathBuf,
    },

    /// Compare two files by SHA-256
    Compare {
        /// First file
        a: PathBuf,

        /// Second file
        b: PathBuf,
    },
}

#[derive(Args)]
struct PackArgs {
    /// Kit title (shown on the device and used in sample paths)
    #[arg(long)]
    title: String,

    /// Folder to scan for WAVs (first 15 alphabetically)
    #[arg(long, conflicts_with = "files")]
    folder: Option<PathBuf>,

    /// Individual WAV files (up to 15)
    files: Vec<PathBuf>,

    /// Output .stk path; defaults to <YYYYmmdd_HHMMSS>_kit.stk
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert samples to mono
    #[arg(long, conflicts_with = "stereo")]
    mono: bool,

    /// Convert samples to stereo
    #[arg(long)]
    stereo: bool,

    /// Kit layout profile (smpltrek, legacy)
    #[arg(long, default_value = "smpltrek")]
    profile: String,

    /// Prompt for volume, pitch, pan and FX send of every slot
    #[arg(long)]
    customize: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize the library
    let config = Config {
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    info!("stkit v{}", stkit_lib::VERSION);

    match cli.command {
        Commands::Pack(args) => cmd_pack(args)?,
        Commands::Extract {
            input,
            output_dir,
            profile,
        } => {
            info!("Extracting {} -> {}", input.display(), output_dir.display());
            cmd_extract(&input, &output_dir, &profile)?;
        }
        Commands::Chunks { input } => cmd_chunks(&input)?,
        Commands::Compare { a, b } => cmd_compare(&a, &b)?,
    }

    Ok(())
}

fn parse_profile(name: &str) -> anyhow::Result<KitProfile> {
    KitProfile::by_name(name).with_context(|| {
        let known: Vec<_> = KitProfile::ALL.iter().map(|p| p.name).collect();
        format!("Unknown profile '{}' (known: {})", name, known.join(", "))
    })
}

/// Source files in slot order
fn select_sources(folder: Option<&Path>, files: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut selected = match folder {
        Some(folder) => {
            if !folder.is_dir() {
                bail!("Not a folder: {}", folder.display());
            }
            let mut wavs = Vec::new();
            for entry in std::fs::read_dir(folder)
                .with_context(|| format!("Failed to read folder {}", folder.display()))?
            {
                let path = entry?.path();
                if path.is_file() && detect_format_from_extension(&path) == Some(ContainerKind::Wav)
                {
                    wavs.push(path);
                }
            }
            wavs.sort();
            wavs
        }
        None => files.to_vec(),
    };

    if selected.is_empty() {
        bail!("Provide a --folder containing WAV files or at least one WAV file");
    }
    if selected.len() > MAX_SAMPLES {
        warn!(
            "{} WAV files found, using the first {}",
            selected.len(),
            MAX_SAMPLES
        );
        selected.truncate(MAX_SAMPLES);
    }

    Ok(selected)
}

/// Output path with a `.stk` extension, timestamped when not given
fn output_path(output: Option<PathBuf>) -> PathBuf {
    match output {
        Some(path) => {
            let is_stk = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("stk"))
                .unwrap_or(false);
            if is_stk {
                path
            } else {
                path.with_extension("stk")
            }
        }
        None => {
            let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("{}_kit.stk", ts))
        }
    }
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let profile = parse_profile(&args.profile)?;
    let mut options = PackOptions::for_profile(profile);
    if args.mono {
        options.channels = 1;
    } else if args.stereo {
        options.channels = 2;
    }

    let sources = select_sources(args.folder.as_deref(), &args.files)?;

    let mut inputs = Vec::with_capacity(sources.len());
    for path in &sources {
        let asset = WavDemuxer::open(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_string());
        info!(
            "Loaded {} ({} Hz, {} ch, {})",
            path.display(),
            asset.spec().sample_rate,
            asset.spec().channels,
            asset.spec().format
        );
        inputs.push(PackInput::new(name, asset));
    }

    let entries = prepare_entries(&inputs, options.channels).context("Error preparing samples")?;
    let mut entries = pad_entries(entries)?;

    if args.customize {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        customize(&mut entries, &mut stdin.lock(), &mut stdout.lock())
            .context("Customization cancelled")?;
    }

    let table = SlotTable::build(&args.title, &entries, profile)?;
    let truncated = table.entries().iter().filter(|e| e.path_truncated()).count();
    if truncated > 0 {
        warn!("{} sample paths were truncated to fit the slot table", truncated);
    }

    let out_path = output_path(args.output);
    let written = StkMuxer::new(profile)
        .write_file(&out_path, &table, &entries)
        .with_context(|| format!("Error writing {}", out_path.display()))?;

    println!("Wrote {} ({} bytes)", out_path.display(), written);
    println!(
        "First RIFF begins at {:#x}; KTDT size = {:#x}; entries = {}",
        profile.first_payload_offset(),
        profile.ktdt_size(),
        entries.len()
    );

    Ok(())
}

/// Answer to one parameter prompt
enum Reply {
    Value(i32),
    Preview,
}

/// Ask for an integer until a valid one, the default or `p` is entered
fn prompt_value<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    default: i32,
    range: std::ops::RangeInclusive<i32>,
) -> anyhow::Result<Reply> {
    loop {
        write!(
            out,
            "  {} (default {}, {} to {}, 'p' to preview): ",
            label,
            default,
            range.start(),
            range.end()
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("end of input");
        }
        let answer = line.trim().to_lowercase();

        if answer == "p" {
            return Ok(Reply::Preview);
        }
        if answer.is_empty() {
            return Ok(Reply::Value(default));
        }
        match answer.parse::<i32>() {
            Ok(value) if range.contains(&value) => return Ok(Reply::Value(value)),
            Ok(_) => writeln!(
                out,
                "  Value must be between {} and {}.",
                range.start(),
                range.end()
            )?,
            Err(_) => writeln!(out, "  Invalid input.")?,
        }
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    entry: &KitEntry,
    label: &str,
    default: i32,
    range: std::ops::RangeInclusive<i32>,
) -> anyhow::Result<i32> {
    loop {
        match prompt_value(input, out, label, default, range.clone())? {
            Reply::Value(value) => return Ok(value),
            Reply::Preview => preview(&entry.wav),
        }
    }
}

/// Prompt for the playback parameters of every slot
fn customize<R: BufRead, W: Write>(
    entries: &mut [KitEntry],
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    use stkit_lib::format::stk::slot::{FX_SEND_RANGE, PAN_RANGE, PITCH_RANGE, VOLUME_RANGE};

    writeln!(out, "\n--- Sample Customization ---")?;
    writeln!(out, "For each sample, enter values or press Enter for default.")?;
    writeln!(out, "Press 'p' + Enter at any prompt to preview the sound.")?;

    let total = entries.len();
    for (i, entry) in entries.iter_mut().enumerate() {
        writeln!(out, "\nSample {}/{}: {}", i + 1, total, entry.name)?;
        let current = entry.params;

        let volume = ask(input, out, entry, "Volume", current.volume as i32, VOLUME_RANGE)?;
        let pitch = ask(input, out, entry, "Pitch", current.pitch as i32, PITCH_RANGE)?;
        let pan = ask(input, out, entry, "Pan", current.pan as i32, PAN_RANGE)?;
        let fx_send = ask(input, out, entry, "FX Send", current.fx_send as i32, FX_SEND_RANGE)?;

        entry.params = SlotParams::new(volume, pitch, pan, fx_send)?;
    }

    Ok(())
}

/// Play a sample through the first available system player
fn preview(wav: &[u8]) {
    let played = (|| -> anyhow::Result<bool> {
        let mut file = tempfile::Builder::new().suffix(".wav").tempfile()?;
        file.write_all(wav)?;
        file.flush()?;

        for player in ["afplay", "aplay", "play"] {
            let status = Command::new(player)
                .arg(file.path())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
            if matches!(status, Ok(s) if s.success()) {
                return Ok(true);
            }
        }
        Ok(false)
    })();

    match played {
        Ok(true) => {}
        Ok(false) => println!("Could not find a working audio player (afplay, aplay, or play)."),
        Err(e) => println!("Preview error: {}", e),
    }
}

fn cmd_extract(input: &Path, output_dir: &Path, profile: &str) -> anyhow::Result<()> {
    let profile = parse_profile(profile)?;
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    match detect_format_from_magic(&data) {
        Some(ContainerKind::Stk) => {}
        Some(kind) => warn!(
            "{} is a {} file, not a kit; scanning anyway",
            input.display(),
            kind.name()
        ),
        None => warn!("{} has no kit header; scanning anyway", input.display()),
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let demuxer = StkDemuxer::new(&data, profile);
    let table = match demuxer.slot_table() {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Slot table unreadable, extracting samples only: {}", e);
            None
        }
    };

    let mut count = 0;
    for item in demuxer.scan() {
        let sample = match item {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Skipping malformed sample span: {}", e);
                continue;
            }
        };

        let out_file = output_dir.join(format!("sample_{:02}.wav", sample.index));
        std::fs::write(&out_file, sample.data)
            .with_context(|| format!("Failed to write {}", out_file.display()))?;

        let slot = table
            .as_ref()
            .and_then(|t| t.entries().get(sample.index))
            .map(|e| format!(" [{}]", e.path()))
            .unwrap_or_default();
        println!(
            "Extracted {} ({} bytes){}",
            out_file.display(),
            sample.data.len(),
            slot
        );
        count += 1;
    }

    println!("Extracted {} samples.", count);
    Ok(())
}

fn cmd_chunks(input: &Path) -> anyhow::Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    println!("--- {} ---", input.display());
    let chunks = ChunkIter::new(&data)?;
    println!("RIFF size: {}", chunks.riff_size());

    for chunk in chunks {
        let chunk = chunk?;
        println!(
            "Chunk: {} at {:x}, size: {}",
            chunk.header.id_str(),
            chunk.offset,
            chunk.header.size
        );

        if &chunk.header.id == FMT_CHUNK {
            match WavFormat::from_bytes(chunk.body) {
                Ok(fmt) => {
                    println!(
                        "  fmt: tag={:?}, channels={}, sample_rate={}, bits_per_sample={}, byte_rate={}",
                        fmt.effective_tag(),
                        fmt.channels,
                        fmt.sample_rate,
                        fmt.bits_per_sample,
                        fmt.byte_rate
                    );
                    if fmt.byte_rate != fmt.calculate_byte_rate() {
                        warn!(
                            "Declared byte rate {} differs from the computed {}",
                            fmt.byte_rate,
                            fmt.calculate_byte_rate()
                        );
                    }
                }
                Err(e) => println!("  fmt: unreadable ({})", e),
            }
        }
    }

    Ok(())
}

fn sha256_file(path: &Path) -> anyhow::Result<String> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(hex::encode(Sha256::digest(&data)))
}

fn cmd_compare(a: &Path, b: &Path) -> anyhow::Result<()> {
    let sha_a = sha256_file(a)?;
    let sha_b = sha256_file(b)?;

    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    println!("SHA256 ({}): {}", name(a), sha_a);
    println!("SHA256 ({}): {}", name(b), sha_b);

    if sha_a == sha_b {
        println!("MATCH: Files are identical.");
    } else {
        println!("MISMATCH: Files are different.");
    }

    Ok(())
}
