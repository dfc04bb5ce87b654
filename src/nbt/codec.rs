//! Big-endian primitive reader and writer.
//!
//! Every multi-byte value is encoded big-endian regardless of host order.
//! Strings carry a `u16` length prefix and arrays an `i32` element count.

use crate::error::{Error, Result};
use crate::nbt::{NbtString, TagType};

/// Fixed-width value with a big-endian wire form.
pub trait Primitive: Sized + Copy {
    const SIZE: usize;

    fn from_be_slice(bytes: &[u8]) -> Self;
    fn put_be(self, out: &mut Vec<u8>);
}

macro_rules! impl_primitive {
    ($($ty:ty),*) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_be_bytes(raw)
                }

                #[inline]
                fn put_be(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

impl_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// Cursor over an immutable byte buffer.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Borrows the next `len` bytes and advances past them.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                needed: len,
            });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    pub fn read<T: Primitive>(&mut self) -> Result<T> {
        let bytes = self.take(T::SIZE)?;
        Ok(T::from_be_slice(bytes))
    }

    /// Reads a type byte. Bytes outside the known range are rejected.
    pub fn read_tag_type(&mut self) -> Result<TagType> {
        let byte: u8 = self.read()?;
        match TagType::from_u8(byte) {
            TagType::Unknown => Err(Error::InvalidTagType(byte)),
            ty => Ok(ty),
        }
    }

    pub fn read_string(&mut self) -> Result<NbtString> {
        let len: u16 = self.read()?;
        let bytes = self.take(len as usize)?;
        Ok(NbtString::from_bytes(bytes))
    }

    /// Reads an `i32` element count followed by that many elements.
    pub fn read_array<T: Primitive>(&mut self) -> Result<Vec<T>> {
        let len = self.read_len()?;
        let byte_len = len
            .checked_mul(T::SIZE)
            .ok_or(Error::Corrupt("array length overflow"))?;
        let bytes = self.take(byte_len)?;
        Ok(bytes.chunks_exact(T::SIZE).map(T::from_be_slice).collect())
    }

    /// Reads an `i32` count; negative counts are corrupt.
    pub fn read_len(&mut self) -> Result<usize> {
        let len: i32 = self.read()?;
        usize::try_from(len).map_err(|_| Error::Corrupt("negative length prefix"))
    }
}

/// Growable big-endian output buffer.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write<T: Primitive>(&mut self, value: T) {
        value.put_be(&mut self.buf);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_tag_type(&mut self, ty: TagType) {
        self.buf.push(ty.as_u8());
    }

    pub fn write_string(&mut self, value: &NbtString) -> Result<()> {
        let len = u16::try_from(value.len()).map_err(|_| Error::StringTooLong(value.len()))?;
        self.write(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len).map_err(|_| Error::ArrayTooLong(len))?;
        self.write(len);
        Ok(())
    }

    pub fn write_array<T: Primitive>(&mut self, values: &[T]) -> Result<()> {
        self.write_len(values.len())?;
        self.buf.reserve(values.len() * T::SIZE);
        for value in values {
            value.put_be(&mut self.buf);
        }
        Ok(())
    }
}
