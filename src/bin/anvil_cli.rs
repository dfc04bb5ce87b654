use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anvil::nbt::{self, io::print_tag};
use anvil::region::{self, Region};
use anvil::{CompressionType, RegionOptions};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(name = "anvil-cli", version, about = "NBT and region file tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the location table of a region file
    Inspect { region_path: PathBuf },
    /// Print a standalone NBT file
    Dump {
        nbt_path: PathBuf,
        #[arg(long, default_value_t = 2)]
        indent: usize,
        /// Print array elements instead of eliding them
        #[arg(long)]
        arrays: bool,
    },
    /// Print one chunk of a region file
    Chunk {
        region_path: PathBuf,
        x: i32,
        z: i32,
        #[arg(long)]
        arrays: bool,
    },
    /// Load every chunk and write the region back out
    Repack {
        region_path: PathBuf,
        /// Output path (default: overwrite the input)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Recompress every chunk: gzip, zlib or none
        #[arg(long, value_parser = parse_compression)]
        compression: Option<CompressionType>,
        /// JSON file with region options
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut out = io::BufWriter::new(io::stdout());
    match cli.command {
        Commands::Inspect { region_path } => cmd_inspect(&region_path, &mut out)?,
        Commands::Dump {
            nbt_path,
            indent,
            arrays,
        } => cmd_dump(&nbt_path, indent, arrays, &mut out)?,
        Commands::Chunk {
            region_path,
            x,
            z,
            arrays,
        } => cmd_chunk(&region_path, x, z, arrays, &mut out)?,
        Commands::Repack {
            region_path,
            out: out_path,
            compression,
            config,
        } => cmd_repack(&region_path, out_path, compression, config, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn parse_compression(value: &str) -> Result<CompressionType, String> {
    match value {
        "gzip" => Ok(CompressionType::Gzip),
        "zlib" => Ok(CompressionType::Zlib),
        "none" | "uncompressed" => Ok(CompressionType::Uncompressed),
        other => Err(format!("unknown compression {other:?} (gzip, zlib, none)")),
    }
}

fn load_options(path: Option<&Path>) -> Result<RegionOptions> {
    let Some(path) = path else {
        return Ok(RegionOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn cmd_inspect(region_path: &Path, out: &mut dyn Write) -> Result<()> {
    let region =
        Region::open(region_path).with_context(|| format!("open {}", region_path.display()))?;
    let Some(table) = region.location_table() else {
        return Ok(());
    };
    writeln!(out, "region={}", region_path.display())?;
    writeln!(
        out,
        "x={} z={} chunks={}",
        region.x(),
        region.z(),
        table.chunk_count()
    )?;
    for index in (0..region::SLOT_COUNT).filter(|&index| region.is_chunk_loadable(index)) {
        let coord = region::from_index(index)?;
        writeln!(
            out,
            "slot={} x={} z={} sector={} sectors={} timestamp={}",
            index,
            coord.x,
            coord.z,
            table.offset(index),
            table.sector_count(index),
            table.timestamp(index)
        )?;
    }
    Ok(())
}

fn cmd_dump(nbt_path: &Path, indent: usize, arrays: bool, out: &mut dyn Write) -> Result<()> {
    let (tag, compression) =
        nbt::read_file(nbt_path).with_context(|| format!("read {}", nbt_path.display()))?;
    writeln!(out, "compression={compression}")?;
    write!(out, "{}", print_tag(&tag, indent, arrays))?;
    Ok(())
}

fn cmd_chunk(region_path: &Path, x: i32, z: i32, arrays: bool, out: &mut dyn Write) -> Result<()> {
    let mut region =
        Region::open(region_path).with_context(|| format!("open {}", region_path.display()))?;
    region
        .load_chunk_at_xz(x, z)
        .with_context(|| format!("load chunk ({x}, {z})"))?;
    match region.chunk_at_xz(x, z)?.root_tag() {
        Some(root) => write!(out, "{}", print_tag(root, 2, arrays))?,
        None => writeln!(out, "chunk ({x}, {z}) is empty")?,
    }
    Ok(())
}

fn cmd_repack(
    region_path: &Path,
    out_path: Option<PathBuf>,
    compression: Option<CompressionType>,
    config: Option<PathBuf>,
    out: &mut dyn Write,
) -> Result<()> {
    let options = load_options(config.as_deref())?;
    let mut region = Region::open_with_options(region_path, options)
        .with_context(|| format!("open {}", region_path.display()))?;
    region
        .load_all_chunks()
        .with_context(|| format!("load chunks of {}", region_path.display()))?;
    if let Some(kind) = compression {
        region.set_compression_all(kind);
    }

    let dest = out_path.unwrap_or_else(|| region_path.to_path_buf());
    region
        .save_to_file(&dest)
        .with_context(|| format!("save {}", dest.display()))?;
    info!("repacked {} into {}", region_path.display(), dest.display());
    writeln!(
        out,
        "repacked chunks={} dest={}",
        region.chunk_count(),
        dest.display()
    )?;
    Ok(())
}
