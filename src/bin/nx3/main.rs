//! NX3 CLI - Tool for inspecting and assembling NX3 archives.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use nx3::archive::{self, ArchivePayload, GlbHeader, UnpackedArchive};
use nx3::metadata::{MetadataRecord, Properties};
use nx3::ops::normalize_path;
use nx3::settings::Settings;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("NX3_BUILD_DATE"), ")");

#[derive(Parser)]
#[command(name = "nx3")]
#[command(about = "Inspect and assemble NX3 archives", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Show debug output (-vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show entries, model header and metadata summary
    #[command(alias = "i")]
    Info {
        file: PathBuf,
    },
    /// Print the metadata record
    #[command(alias = "m")]
    Meta {
        file: PathBuf,
    },
    /// Extract the model, metadata and weights entries
    #[command(alias = "u")]
    Unpack {
        file: PathBuf,
        /// Output directory (created if missing)
        dir: PathBuf,
    },
    /// Build an archive from files
    #[command(alias = "p")]
    Pack {
        /// Output archive (.nx3 appended if missing)
        output: PathBuf,
        /// Binary glTF model
        #[arg(long)]
        model: PathBuf,
        /// Metadata record (defaults to an empty record)
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Weights blob (defaults to empty)
        #[arg(long)]
        weights: Option<PathBuf>,
    },
    /// Show or reset persistent settings
    Config {
        /// Overwrite the settings file with defaults
        #[arg(long)]
        reset: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Info { file } => cmd_info(&file),
        Command::Meta { file } => cmd_meta(&file),
        Command::Unpack { file, dir } => cmd_unpack(&file, &dir),
        Command::Pack {
            output,
            model,
            metadata,
            weights,
        } => cmd_pack(&output, &model, metadata.as_deref(), weights.as_deref()),
        Command::Config { reset } => cmd_config(reset),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_info(file: &Path) -> Result<()> {
    let archive = open(file)?;

    println!("File: {}", file.display());
    println!();
    println!("Entries:");
    for entry in archive.entries() {
        let role = entry.role.map(|r| r.label()).unwrap_or("-");
        println!("  {:<24} {:>12} bytes  {}", entry.name, entry.size, role);
    }

    println!();
    match archive.read_model() {
        Ok(model) => match GlbHeader::parse(&model) {
            Some(h) => {
                println!("Model: glTF binary v{}, {} bytes", h.version, h.length);
                if let Some(json) = h.json_length {
                    println!("  JSON chunk: {json} bytes");
                }
                if !h.matches_len(model.len()) {
                    println!("  Warning: payload is {} bytes", model.len());
                }
            }
            None => println!("Model: {} bytes (not glTF binary)", model.len()),
        },
        Err(e) => println!("Model: {e}"),
    }

    match read_record(&archive) {
        Ok(Some(record)) => {
            println!("Metadata: v{} ({})", record.version, record.kind);
            println!(
                "  Properties: {} {} entries",
                record.properties.len(),
                record.properties.shape().label()
            );
            if let Some(name) = record.geometry_name() {
                println!("  Geometry: {name}");
            }
        }
        Ok(None) => println!("Metadata: none"),
        Err(e) => println!("Metadata: {e}"),
    }

    match archive.weights() {
        Some(w) => println!("Weights: {} bytes", w.size),
        None => println!("Weights: none"),
    }
    Ok(())
}

fn cmd_meta(file: &Path) -> Result<()> {
    let archive = open(file)?;
    let Some(record) = read_record(&archive)? else {
        bail!("{} has no metadata entry", file.display());
    };
    let text = record.serialize()?;
    println!("{}", String::from_utf8_lossy(&text));
    Ok(())
}

fn cmd_unpack(file: &Path, dir: &Path) -> Result<()> {
    let archive = open(file)?;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let roles = [archive.model(), archive.metadata(), archive.weights()];
    let mut written = 0;
    for entry in roles.into_iter().flatten() {
        let Some(role) = entry.role else { continue };
        let dest = dir.join(role.canonical_name());
        fs::copy(&entry.path, &dest)
            .with_context(|| format!("writing {}", dest.display()))?;
        tracing::info!("{} -> {}", entry.name, dest.display());
        written += 1;
    }
    if archive.model().is_none() {
        tracing::warn!("Archive has no model entry");
    }
    println!("Extracted {written} files to {}", dir.display());
    Ok(())
}

fn cmd_pack(
    output: &Path,
    model: &Path,
    metadata: Option<&Path>,
    weights: Option<&Path>,
) -> Result<()> {
    let output = normalize_path(output);
    let model_bytes = fs::read(model).with_context(|| format!("reading {}", model.display()))?;
    if GlbHeader::parse(&model_bytes).is_none() {
        tracing::warn!("{} is not a glTF binary", model.display());
    }

    let metadata_bytes = match metadata {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            MetadataRecord::parse(&bytes)
                .with_context(|| format!("validating {}", path.display()))?;
            bytes
        }
        None => {
            let base = output
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            MetadataRecord::build(&base, Properties::default()).serialize()?
        }
    };
    let weights_bytes = match weights {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => Vec::new(),
    };

    archive::pack(
        &output,
        &ArchivePayload {
            model: &model_bytes,
            metadata: &metadata_bytes,
            weights: &weights_bytes,
        },
    )?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn cmd_config(reset: bool) -> Result<()> {
    if reset {
        let path = Settings::default().save()?;
        println!("Reset {}", path.display());
        return Ok(());
    }
    match Settings::path() {
        Some(path) => println!("Settings: {}", path.display()),
        None => println!("Settings: no config directory"),
    }
    println!("{}", serde_json::to_string_pretty(&Settings::load())?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn open(file: &Path) -> Result<UnpackedArchive> {
    archive::unpack(file).with_context(|| format!("opening {}", file.display()))
}

fn read_record(archive: &UnpackedArchive) -> nx3::Result<Option<MetadataRecord>> {
    archive
        .read_metadata()?
        .map(|bytes| MetadataRecord::parse(&bytes))
        .transpose()
}
