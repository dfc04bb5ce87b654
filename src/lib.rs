//! Reading and writing NBT documents and Anvil region files.
//!
//! [`nbt`] holds the tag tree and its big-endian wire codec; [`region`]
//! maps the 32x32 chunk grid of an `r.<x>.<z>.mca` file onto those trees.

pub mod compression;
pub mod config;
pub mod error;
pub mod nbt;
pub mod region;

pub use compression::CompressionType;
pub use config::RegionOptions;
pub use error::{Error, Result};
pub use nbt::{Compound, List, NbtString, Tag, TagType, Value};
pub use region::{Chunk, ChunkCoord, LocationTable, Region};
