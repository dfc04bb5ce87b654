//! Compression adapter over `flate2`.
//!
//! Callers hand in an already isolated payload; this module knows nothing
//! about region records or NBT framing.

use std::fmt;
use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_LEVEL: u32 = 6;
pub const MAX_LEVEL: u32 = 9;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const ZLIB_CMF: u8 = 0x78;
const ZLIB_FLG: [u8; 4] = [0x01, 0x5E, 0x9C, 0xDA];

/// Compression scheme byte used in region chunk records.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    Gzip = 1,
    Zlib = 2,
    #[default]
    #[serde(alias = "none")]
    Uncompressed = 3,
}

impl CompressionType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(CompressionType::Gzip),
            2 => Some(CompressionType::Zlib),
            3 => Some(CompressionType::Uncompressed),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Sniffs the two-byte magic of `data`.
    pub fn detect(data: &[u8]) -> Self {
        match data {
            [a, b, ..] if [*a, *b] == GZIP_MAGIC => CompressionType::Gzip,
            [ZLIB_CMF, flg, ..] if ZLIB_FLG.contains(flg) => CompressionType::Zlib,
            _ => CompressionType::Uncompressed,
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressionType::Gzip => "gzip",
            CompressionType::Zlib => "zlib",
            CompressionType::Uncompressed => "uncompressed",
        };
        f.write_str(name)
    }
}

pub fn inflate(data: &[u8], kind: CompressionType) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len().saturating_mul(4));
    match kind {
        CompressionType::Gzip => {
            GzDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(Error::Compression)?;
        }
        CompressionType::Zlib => {
            ZlibDecoder::new(data)
                .read_to_end(&mut out)
                .map_err(Error::Compression)?;
        }
        CompressionType::Uncompressed => out.extend_from_slice(data),
    }
    Ok(out)
}

/// Compresses `data`; `level` is clamped to 0..=9.
pub fn deflate(data: &[u8], kind: CompressionType, level: u32) -> Result<Vec<u8>> {
    let level = Compression::new(level.min(MAX_LEVEL));
    match kind {
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), level);
            encoder.write_all(data).map_err(Error::Compression)?;
            encoder.finish().map_err(Error::Compression)
        }
        CompressionType::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), level);
            encoder.write_all(data).map_err(Error::Compression)?;
            encoder.finish().map_err(Error::Compression)
        }
        CompressionType::Uncompressed => Ok(data.to_vec()),
    }
}
