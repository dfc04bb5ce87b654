//! Region save/load options.

use serde::{Deserialize, Serialize};

use crate::compression::{CompressionType, DEFAULT_LEVEL};

/// Options applied by a [`Region`](crate::region::Region).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Compression remembered for slots that were never read from disk.
    /// Default: uncompressed
    pub default_compression: CompressionType,

    /// Deflate level (0-9) used when saving gzip/zlib chunks.
    /// Default: 6
    pub compression_level: u32,

    /// Load every loadable slot before a save re-packs the file, so a
    /// partially loaded region keeps its unread chunks.
    /// Default: true
    pub load_before_save: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            default_compression: CompressionType::Uncompressed,
            compression_level: DEFAULT_LEVEL,
            load_before_save: true,
        }
    }
}

impl RegionOptions {
    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.default_compression = compression;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }
}
