//! Anvil region files: 1024 chunk slots behind an 8 KiB location table.
//!
//! A [`Region`] is loaded in two steps. [`Region::load_partially_from_file`]
//! reads only the location table; chunks are decoded on demand with
//! [`Region::load_chunk_at`] or all at once with [`Region::load_all_chunks`].
//! Saving always re-packs every populated slot into a fresh file.

pub mod chunk;
pub mod coords;
pub mod header;

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::compression::{self, CompressionType};
use crate::config::RegionOptions;
use crate::error::{Error, Result};
use crate::nbt;

pub use chunk::Chunk;
pub use coords::{
    chunk_region_to_world, chunk_world_to_region, from_index, parse_region_filename,
    region_filename, region_of_chunk, region_path, to_index, ChunkCoord, REGION_WIDTH,
};
pub use header::{sectors_for, LocationTable, HEADER_SIZE, SECTOR_SIZE, SLOT_COUNT};

/// Length prefix plus compression byte.
const RECORD_PREFIX: usize = 5;

#[derive(Clone)]
pub struct Region {
    x: i32,
    z: i32,
    path: Option<PathBuf>,
    table: Option<LocationTable>,
    chunks: Vec<Chunk>,
    loaded: Vec<bool>,
    compression: Vec<CompressionType>,
    options: RegionOptions,
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("x", &self.x)
            .field("z", &self.z)
            .field("path", &self.path)
            .field("table", &self.table)
            .field("chunk_count", &self.chunk_count())
            .field("options", &self.options)
            .finish()
    }
}

impl Region {
    /// An empty region at `(0, 0)` with no backing file.
    pub fn new() -> Self {
        Self::with_options(RegionOptions::default())
    }

    pub fn with_options(options: RegionOptions) -> Self {
        let default_compression = options.default_compression;
        Self {
            x: 0,
            z: 0,
            path: None,
            table: None,
            chunks: vec![Chunk::default(); SLOT_COUNT],
            loaded: vec![false; SLOT_COUNT],
            compression: vec![default_compression; SLOT_COUNT],
            options,
        }
    }

    /// Opens `path` and reads its location table only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut region = Self::new();
        region.load_partially_from_file(path)?;
        Ok(region)
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: RegionOptions) -> Result<Self> {
        let mut region = Self::with_options(options);
        region.load_partially_from_file(path)?;
        Ok(region)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn xz(&self) -> (i32, i32) {
        (self.x, self.z)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn location_table(&self) -> Option<&LocationTable> {
        self.table.as_ref()
    }

    pub fn options(&self) -> &RegionOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: RegionOptions) {
        self.options = options;
    }

    /// Validates the file name, then reads the location table of `path`.
    ///
    /// Every slot is reset to unloaded. On error the region is unchanged.
    pub fn load_partially_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (x, z) = coords::region_xz(path)?;
        let file = File::open(path)?;
        let table = LocationTable::load(file)?;
        debug!(
            "loaded region header {} ({} chunks)",
            path.display(),
            table.chunk_count()
        );

        self.x = x;
        self.z = z;
        self.path = Some(path.to_path_buf());
        self.table = Some(table);
        self.reset_slots();
        Ok(())
    }

    /// Reads the location table and every chunk of `path`.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_partially_from_file(path)?;
        self.load_all_chunks()
    }

    /// Decodes the chunk in slot `index` from the backing file.
    ///
    /// A no-op when the slot is already loaded or the table marks it absent.
    /// On error the slot stays unloaded.
    pub fn load_chunk_at(&mut self, index: usize) -> Result<()> {
        check_index(index)?;
        if self.loaded[index] || !self.is_chunk_loadable(index) {
            return Ok(());
        }
        let path = self.path.as_deref().ok_or(Error::NoRegionFile)?;
        let mut file = File::open(path)?;
        self.read_chunk(&mut file, index)
    }

    pub fn load_chunk_at_xz(&mut self, x: i32, z: i32) -> Result<()> {
        self.load_chunk_at(to_index(x, z)?)
    }

    /// Loads every present, not yet loaded slot through one file handle.
    pub fn load_all_chunks(&mut self) -> Result<()> {
        let pending: Vec<usize> = (0..SLOT_COUNT)
            .filter(|&index| !self.loaded[index] && self.is_chunk_loadable(index))
            .collect();
        self.load_slots(&pending)
    }

    fn load_slots(&mut self, slots: &[usize]) -> Result<()> {
        if slots.is_empty() {
            return Ok(());
        }
        let path = self.path.as_deref().ok_or(Error::NoRegionFile)?;
        let mut file = File::open(path)?;
        for &index in slots {
            self.read_chunk(&mut file, index)?;
        }
        Ok(())
    }

    fn read_chunk<R: Read + Seek>(&mut self, source: &mut R, index: usize) -> Result<()> {
        let table = self.table.as_ref().ok_or(Error::NoRegionFile)?;
        let offset = table.byte_offset(index);
        let allocated = table.byte_size(index);

        source.seek(SeekFrom::Start(offset))?;
        let mut prefix = [0u8; RECORD_PREFIX];
        source
            .read_exact(&mut prefix)
            .map_err(|err| truncated(err, index))?;
        let length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        if length == 0 {
            return Err(Error::Corrupt("zero-length chunk record"));
        }
        let kind =
            CompressionType::from_u8(prefix[4]).ok_or(Error::UnknownCompression(prefix[4]))?;
        if 4 + length > allocated {
            warn!(
                "chunk {index} record of {} bytes overruns its {allocated} byte allocation",
                4 + length
            );
        }

        let payload_len = length - 1;
        let mut payload = Vec::with_capacity(payload_len.min(allocated));
        source
            .by_ref()
            .take(payload_len as u64)
            .read_to_end(&mut payload)?;
        if payload.len() != payload_len {
            return Err(Error::TruncatedChunk { index });
        }

        let raw = compression::inflate(&payload, kind)?;
        let root = nbt::decode(&raw)?;
        self.chunks[index].set_root_tag(root)?;
        self.compression[index] = kind;
        self.loaded[index] = true;
        trace!("loaded chunk {index} ({kind}, {} bytes)", raw.len());
        Ok(())
    }

    pub fn is_chunk_loaded(&self, index: usize) -> bool {
        self.loaded.get(index).copied().unwrap_or(false)
    }

    /// True when the location table marks slot `index` as present.
    pub fn is_chunk_loadable(&self, index: usize) -> bool {
        index < SLOT_COUNT
            && self
                .table
                .as_ref()
                .is_some_and(|table| !table.is_empty(index))
    }

    /// Number of slots holding a chunk in memory.
    pub fn chunk_count(&self) -> usize {
        self.chunks.iter().filter(|chunk| !chunk.is_empty()).count()
    }

    pub fn chunk_at(&self, index: usize) -> Result<&Chunk> {
        check_index(index)?;
        Ok(&self.chunks[index])
    }

    pub fn chunk_at_mut(&mut self, index: usize) -> Result<&mut Chunk> {
        check_index(index)?;
        Ok(&mut self.chunks[index])
    }

    pub fn chunk_at_xz(&self, x: i32, z: i32) -> Result<&Chunk> {
        self.chunk_at(to_index(x, z)?)
    }

    pub fn chunk_at_xz_mut(&mut self, x: i32, z: i32) -> Result<&mut Chunk> {
        self.chunk_at_mut(to_index(x, z)?)
    }

    pub fn chunk_at_coord(&self, coord: ChunkCoord) -> Result<&Chunk> {
        self.chunk_at(coord.index()?)
    }

    pub fn chunk_at_coord_mut(&mut self, coord: ChunkCoord) -> Result<&mut Chunk> {
        self.chunk_at_mut(coord.index()?)
    }

    /// Populated slots in index order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(index, chunk)| {
                let index = index as i32;
                (
                    ChunkCoord::new(index % REGION_WIDTH, index / REGION_WIDTH),
                    chunk,
                )
            })
    }

    /// Compression used when slot `index` was read, or the configured
    /// default for slots never read from disk.
    pub fn compression_at(&self, index: usize) -> Result<CompressionType> {
        check_index(index)?;
        Ok(self.compression[index])
    }

    pub fn set_compression_at(&mut self, index: usize, kind: CompressionType) -> Result<()> {
        check_index(index)?;
        self.compression[index] = kind;
        Ok(())
    }

    /// Applies `kind` to every slot for the next save.
    pub fn set_compression_all(&mut self, kind: CompressionType) {
        self.compression.fill(kind);
    }

    /// Saves to the file last loaded from or saved to.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(Error::NoRegionFile)?;
        self.save_to_file(path)
    }

    /// Re-packs every populated slot into `path`.
    ///
    /// With `load_before_save`, empty slots the current table marks present
    /// are loaded first so they survive the re-pack. The file is written to a
    /// sibling `.tmp` file and renamed into place.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if self.options.load_before_save {
            let pending: Vec<usize> = (0..SLOT_COUNT)
                .filter(|&index| {
                    !self.loaded[index]
                        && self.chunks[index].is_empty()
                        && self.is_chunk_loadable(index)
                })
                .collect();
            self.load_slots(&pending)?;
        }

        let (table, bytes) = self.pack()?;
        write_atomically(path, &bytes)?;
        debug!(
            "saved region {} ({} chunks, {} bytes)",
            path.display(),
            table.chunk_count(),
            bytes.len()
        );

        if let Some((x, z)) = parse_region_filename(path) {
            self.x = x;
            self.z = z;
        }
        self.path = Some(path.to_path_buf());
        self.table = Some(table);
        for (loaded, chunk) in self.loaded.iter_mut().zip(&self.chunks) {
            *loaded = !chunk.is_empty();
        }
        Ok(())
    }

    /// Lays out the header and one sector-aligned record per populated slot.
    fn pack(&self) -> Result<(LocationTable, Vec<u8>)> {
        let mut table = LocationTable::new();
        let mut out = vec![0u8; HEADER_SIZE];
        let mut sector = HEADER_SIZE / SECTOR_SIZE;

        for (index, chunk) in self.chunks.iter().enumerate() {
            let Some(raw) = chunk.encode_root()? else {
                continue;
            };
            let kind = self.compression[index];
            let payload = compression::deflate(&raw, kind, self.options.compression_level)?;

            let length = payload.len() + 1;
            let sectors = sectors_for(4 + length);
            if !header::fits_location(sector, sectors) {
                return Err(Error::ChunkTooLarge { index, sectors });
            }
            out.extend_from_slice(&(length as u32).to_be_bytes());
            out.push(kind.as_u8());
            out.extend_from_slice(&payload);
            out.resize((sector + sectors) * SECTOR_SIZE, 0);

            table.set_chunk_data(index, sector, sectors, 0);
            sector += sectors;
        }

        out[..HEADER_SIZE].copy_from_slice(table.as_bytes());
        Ok((table, out))
    }

    fn reset_slots(&mut self) {
        for chunk in &mut self.chunks {
            chunk.clear();
        }
        self.loaded.fill(false);
        self.compression.fill(self.options.default_compression);
    }
}

fn check_index(index: usize) -> Result<()> {
    if index >= SLOT_COUNT {
        return Err(Error::IndexOutOfRange {
            index,
            len: SLOT_COUNT,
        });
    }
    Ok(())
}

fn truncated(err: std::io::Error, index: usize) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::TruncatedChunk { index }
    } else {
        Error::Io(err)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::InvalidRegionFilename(path.display().to_string()))?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!("{name}.tmp"));

    let written = (|| -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    })();
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    written
}
