use thiserror::Error;

use crate::nbt::TagType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("compression error: {0}")]
    Compression(#[source] std::io::Error),
    #[error("unexpected end of stream: needed {needed} bytes at offset {offset}")]
    UnexpectedEof { offset: usize, needed: usize },
    #[error("invalid tag type byte: {0:#04x}")]
    InvalidTagType(u8),
    #[error("root tag must be a compound, found {0}")]
    RootType(TagType),
    #[error("unknown compression type: {0}")]
    UnknownCompression(u8),
    #[error("corrupt data: {0}")]
    Corrupt(&'static str),
    #[error("invalid region filename: {0}")]
    InvalidRegionFilename(String),
    #[error("truncated region header: read {read} of 8192 bytes")]
    TruncatedHeader { read: usize },
    #[error("truncated chunk record at slot {index}")]
    TruncatedChunk { index: usize },
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("chunk coordinate ({x}, {z}) out of range")]
    CoordOutOfRange { x: i32, z: i32 },
    #[error("list of {expected} cannot hold {found}")]
    ListTypeMismatch { expected: TagType, found: TagType },
    #[error("string of {0} bytes exceeds u16 length prefix")]
    StringTooLong(usize),
    #[error("array of {0} elements exceeds i32 length prefix")]
    ArrayTooLong(usize),
    #[error("chunk at slot {index} needs {sectors} sectors")]
    ChunkTooLarge { index: usize, sectors: usize },
    #[error("region has no backing file")]
    NoRegionFile,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn io_error_converts_and_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn display_mentions_offending_values() {
        let err = Error::UnexpectedEof {
            offset: 12,
            needed: 4,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of stream: needed 4 bytes at offset 12"
        );
        assert_eq!(
            Error::InvalidTagType(0x2a).to_string(),
            "invalid tag type byte: 0x2a"
        );
    }
}
