//! Chunk slot addressing and region file naming.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Chunks per region edge.
pub const REGION_WIDTH: i32 = 32;

/// Chunk position inside one region, `0 <= x, z < 32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn is_valid(self) -> bool {
        (0..REGION_WIDTH).contains(&self.x) && (0..REGION_WIDTH).contains(&self.z)
    }

    pub fn index(self) -> Result<usize> {
        to_index(self.x, self.z)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

/// Slot index of `(x, z)`: `z * 32 + x`.
pub fn to_index(x: i32, z: i32) -> Result<usize> {
    let coord = ChunkCoord::new(x, z);
    if !coord.is_valid() {
        return Err(Error::CoordOutOfRange { x, z });
    }
    Ok((z * REGION_WIDTH + x) as usize)
}

/// Inverse of [`to_index`].
pub fn from_index(index: usize) -> Result<ChunkCoord> {
    let slots = (REGION_WIDTH * REGION_WIDTH) as usize;
    if index >= slots {
        return Err(Error::IndexOutOfRange { index, len: slots });
    }
    let index = index as i32;
    Ok(ChunkCoord::new(index % REGION_WIDTH, index / REGION_WIDTH))
}

/// World chunk coordinate of region-local `chunk` inside region `region`.
pub fn chunk_region_to_world(chunk: i32, region: i32) -> i32 {
    region * REGION_WIDTH + chunk
}

/// Region-local coordinate (0..32) of world chunk coordinate `world`.
pub fn chunk_world_to_region(world: i32) -> i32 {
    world.rem_euclid(REGION_WIDTH)
}

/// Region coordinate that contains world chunk coordinate `world`.
pub fn region_of_chunk(world: i32) -> i32 {
    world.div_euclid(REGION_WIDTH)
}

pub fn region_filename(x: i32, z: i32) -> String {
    format!("r.{x}.{z}.mca")
}

pub fn region_path(dir: impl AsRef<Path>, x: i32, z: i32) -> PathBuf {
    dir.as_ref().join(region_filename(x, z))
}

/// Parses `r.<x>.<z>.mca` from the final path component.
///
/// Components are signed decimals without leading zeros; `0` is the only
/// component allowed to start with `0`, and `-0` is rejected.
pub fn parse_region_filename(path: &Path) -> Option<(i32, i32)> {
    let name = path.file_name()?.to_str()?;
    let body = name.strip_prefix("r.")?.strip_suffix(".mca")?;
    let (x, z) = body.split_once('.')?;
    Some((parse_component(x)?, parse_component(z)?))
}

pub(crate) fn region_xz(path: &Path) -> Result<(i32, i32)> {
    parse_region_filename(path)
        .ok_or_else(|| Error::InvalidRegionFilename(path.display().to_string()))
}

fn parse_component(text: &str) -> Option<i32> {
    if text == "0" {
        return Some(0);
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut chars = digits.chars();
    match chars.next() {
        Some('1'..='9') => {}
        _ => return None,
    }
    if !chars.all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
