use std::io::Read;

use crate::error::{Error, Result};

pub const SECTOR_SIZE: usize = 4096;
pub const SLOT_COUNT: usize = 1024;
pub const HEADER_SIZE: usize = 2 * SECTOR_SIZE;

pub const LOCATIONS_OFFSET: usize = 0;
pub const TIMESTAMPS_OFFSET: usize = SECTOR_SIZE;

const MAX_SECTOR_OFFSET: usize = 0x00FF_FFFF;
const MAX_SECTOR_COUNT: usize = 0xFF;

/// The 8 KiB table at the start of a region file.
///
/// Bytes `[0, 4096)` hold one big-endian location word per slot,
/// `sector_offset << 8 | sector_count`; bytes `[4096, 8192)` hold one
/// big-endian timestamp per slot. An offset of zero marks an absent chunk.
///
/// # Panics
///
/// The per-slot accessors panic when `index >= SLOT_COUNT`.
#[derive(Clone, PartialEq, Eq)]
pub struct LocationTable {
    data: Box<[u8; HEADER_SIZE]>,
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationTable")
            .field("chunk_count", &self.chunk_count())
            .finish()
    }
}

impl LocationTable {
    pub fn new() -> Self {
        Self {
            data: Box::new([0u8; HEADER_SIZE]),
        }
    }

    /// Reads exactly [`HEADER_SIZE`] bytes; a short read is an error.
    pub fn load(mut reader: impl Read) -> Result<Self> {
        let mut table = Self::new();
        let mut filled = 0;
        while filled < HEADER_SIZE {
            match reader.read(&mut table.data[filled..]) {
                Ok(0) => return Err(Error::TruncatedHeader { read: filled }),
                Ok(n) => filled += n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::Io(err)),
            }
        }
        Ok(table)
    }

    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            data: Box::new(*bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.data
    }

    fn word(&self, base: usize, index: usize) -> u32 {
        let at = base + index * 4;
        u32::from_be_bytes([
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ])
    }

    fn set_word(&mut self, base: usize, index: usize, value: u32) {
        let at = base + index * 4;
        self.data[at..at + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Number of slots with a non-zero sector count.
    pub fn chunk_count(&self) -> usize {
        (0..SLOT_COUNT)
            .filter(|&index| self.sector_count(index) > 0)
            .count()
    }

    pub fn is_empty(&self, index: usize) -> bool {
        self.offset(index) == 0
    }

    /// Sector offset of the slot's record.
    pub fn offset(&self, index: usize) -> usize {
        (self.word(LOCATIONS_OFFSET, index) >> 8) as usize
    }

    pub fn byte_offset(&self, index: usize) -> u64 {
        self.offset(index) as u64 * SECTOR_SIZE as u64
    }

    /// Number of sectors allocated to the slot.
    pub fn sector_count(&self, index: usize) -> usize {
        (self.word(LOCATIONS_OFFSET, index) & 0xFF) as usize
    }

    pub fn byte_size(&self, index: usize) -> usize {
        self.sector_count(index) * SECTOR_SIZE
    }

    pub fn timestamp(&self, index: usize) -> u32 {
        self.word(TIMESTAMPS_OFFSET, index)
    }

    /// Packs and stores both words for `index`. Offsets wider than 24 bits
    /// and counts wider than 8 bits are masked.
    ///
    /// # Panics
    ///
    /// Panics if `index >= SLOT_COUNT`.
    pub fn set_chunk_data(
        &mut self,
        index: usize,
        offset: usize,
        sector_count: usize,
        timestamp: u32,
    ) {
        let offset = (offset & MAX_SECTOR_OFFSET) as u32;
        let location = (offset << 8) | (sector_count & MAX_SECTOR_COUNT) as u32;
        self.set_word(LOCATIONS_OFFSET, index, location);
        self.set_word(TIMESTAMPS_OFFSET, index, timestamp);
    }

    pub fn clear_slot(&mut self, index: usize) {
        self.set_chunk_data(index, 0, 0, 0);
    }
}

/// Sectors needed to hold `len` bytes.
pub fn sectors_for(len: usize) -> usize {
    len.div_ceil(SECTOR_SIZE)
}

pub(crate) fn fits_location(offset: usize, sector_count: usize) -> bool {
    offset <= MAX_SECTOR_OFFSET && sector_count <= MAX_SECTOR_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_offset_and_count_big_endian() {
        let mut table = LocationTable::new();
        table.set_chunk_data(1, 0x0102_03, 0x04, 0xAABB_CCDD);
        let bytes = table.as_bytes();
        assert_eq!(&bytes[4..8], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[4096 + 4..4096 + 8], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(table.offset(1), 0x0102_03);
        assert_eq!(table.sector_count(1), 4);
        assert_eq!(table.byte_offset(1), 0x0102_03 * 4096);
        assert_eq!(table.byte_size(1), 4 * 4096);
        assert_eq!(table.timestamp(1), 0xAABB_CCDD);
        assert!(!table.is_empty(1));
        assert!(table.is_empty(0));
    }

    #[test]
    fn cleared_slot_is_empty() {
        let mut table = LocationTable::new();
        table.set_chunk_data(7, 2, 1, 99);
        assert_eq!(table.chunk_count(), 1);
        table.set_chunk_data(7, 0, 0, 0);
        assert!(table.is_empty(7));
        assert_eq!(table.byte_offset(7), 0);
        assert_eq!(table.chunk_count(), 0);
    }

    #[test]
    fn load_requires_full_header() {
        let short = vec![0u8; HEADER_SIZE - 1];
        let err = LocationTable::load(short.as_slice()).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader { read } if read == HEADER_SIZE - 1));

        let mut bytes = vec![0u8; HEADER_SIZE + 10];
        bytes[0..4].copy_from_slice(&[0, 0, 2, 1]);
        let table = LocationTable::load(bytes.as_slice()).unwrap();
        assert_eq!(table.offset(0), 2);
        assert_eq!(table.sector_count(0), 1);
        assert_eq!(LocationTable::from_bytes(table.as_bytes()), table);
    }

    #[test]
    fn sector_rounding() {
        assert_eq!(sectors_for(1), 1);
        assert_eq!(sectors_for(4096), 1);
        assert_eq!(sectors_for(4097), 2);
        for k in 1..5 {
            assert_eq!(sectors_for(4096 * k), k);
            assert_eq!(sectors_for(4096 * k + 1), k + 1);
        }
    }

    #[test]
    #[should_panic]
    fn slot_past_the_table_panics() {
        LocationTable::new().offset(SLOT_COUNT);
    }

    #[test]
    fn last_slot_is_addressable() {
        let mut table = LocationTable::new();
        table.set_chunk_data(SLOT_COUNT - 1, 9, 2, 5);
        assert_eq!(table.offset(SLOT_COUNT - 1), 9);
        assert_eq!(table.timestamp(SLOT_COUNT - 1), 5);
        assert_eq!(&table.as_bytes()[4092..4096], &[0, 0, 9, 2]);
    }

    #[test]
    fn location_limits() {
        assert!(fits_location(0xFF_FFFF, 255));
        assert!(!fits_location(0x100_0000, 1));
        assert!(!fits_location(2, 256));
    }
}
