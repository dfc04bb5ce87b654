//! Whole-document encode/decode and standalone NBT files.
//!
//! Wire layout of one named tag:
//!
//! ```text
//! u8 type | u16 name_len | name bytes | payload
//! ```
//!
//! `End` is a lone type byte. A compound payload is its children followed by
//! `End`; a list payload is `u8 element_type | i32 count | count payloads`
//! with no per-item type byte or name.

use std::fmt::Write as _;
use std::path::Path;

use crate::compression::{deflate, inflate, CompressionType};
use crate::error::{Error, Result};
use crate::nbt::codec::{ByteReader, ByteWriter};
use crate::nbt::{Compound, List, Tag, TagType, Value};

/// Nesting limit for lists and compounds while decoding.
pub const MAX_DEPTH: usize = 512;

/// Decodes a document. The first tag must be a compound.
///
/// Bytes after the root compound's terminator are ignored.
pub fn decode(bytes: &[u8]) -> Result<Tag> {
    let mut reader = ByteReader::new(bytes);
    let ty = reader.read_tag_type()?;
    if ty != TagType::Compound {
        return Err(Error::RootType(ty));
    }
    let name = reader.read_string()?;
    let root = read_compound(&mut reader, 0)?;
    Ok(Tag::new(name, root))
}

fn read_payload(reader: &mut ByteReader<'_>, ty: TagType, depth: usize) -> Result<Value> {
    let value = match ty {
        TagType::End => Value::End,
        TagType::Byte => Value::Byte(reader.read()?),
        TagType::Short => Value::Short(reader.read()?),
        TagType::Int => Value::Int(reader.read()?),
        TagType::Long => Value::Long(reader.read()?),
        TagType::Float => Value::Float(reader.read()?),
        TagType::Double => Value::Double(reader.read()?),
        TagType::ByteArray => Value::ByteArray(reader.read_array()?),
        TagType::String => Value::String(reader.read_string()?),
        TagType::List => Value::List(read_list(reader, depth + 1)?),
        TagType::Compound => Value::Compound(read_compound(reader, depth + 1)?),
        TagType::IntArray => Value::IntArray(reader.read_array()?),
        TagType::LongArray => Value::LongArray(reader.read_array()?),
        TagType::Unknown => return Err(Error::InvalidTagType(ty.as_u8())),
    };
    Ok(value)
}

fn read_compound(reader: &mut ByteReader<'_>, depth: usize) -> Result<Compound> {
    if depth > MAX_DEPTH {
        return Err(Error::Corrupt("tag nesting too deep"));
    }
    let mut compound = Compound::new();
    loop {
        let ty = reader.read_tag_type()?;
        if ty == TagType::End {
            return Ok(compound);
        }
        let name = reader.read_string()?;
        let value = read_payload(reader, ty, depth)?;
        compound.push_unchecked(Tag::new(name, value));
    }
}

fn read_list(reader: &mut ByteReader<'_>, depth: usize) -> Result<List> {
    if depth > MAX_DEPTH {
        return Err(Error::Corrupt("tag nesting too deep"));
    }
    let element = reader.read_tag_type()?;
    let count = reader.read_len()?;
    if element == TagType::End && count > 0 {
        return Err(Error::Corrupt("non-empty list of end tags"));
    }
    // Every element occupies at least one byte, so a count beyond the
    // remaining input is bounded here rather than trusted for allocation.
    let mut list = List::with_type(element, count.min(reader.remaining()));
    for _ in 0..count {
        list.push_unchecked(read_payload(reader, element, depth)?);
    }
    Ok(list)
}

/// Encodes `tag` with its type byte and name.
pub fn encode(tag: &Tag) -> Result<Vec<u8>> {
    let mut writer = ByteWriter::with_capacity(256);
    encode_into(&mut writer, tag)?;
    Ok(writer.into_inner())
}

pub fn encode_into(writer: &mut ByteWriter, tag: &Tag) -> Result<()> {
    let ty = tag.tag_type();
    writer.write_tag_type(ty);
    if ty == TagType::End {
        return Ok(());
    }
    writer.write_string(tag.name())?;
    write_payload(writer, tag.value())
}

fn write_payload(writer: &mut ByteWriter, value: &Value) -> Result<()> {
    match value {
        Value::End => {}
        Value::Byte(v) => writer.write(*v),
        Value::Short(v) => writer.write(*v),
        Value::Int(v) => writer.write(*v),
        Value::Long(v) => writer.write(*v),
        Value::Float(v) => writer.write(*v),
        Value::Double(v) => writer.write(*v),
        Value::ByteArray(v) => writer.write_array(v)?,
        Value::String(v) => writer.write_string(v)?,
        Value::List(list) => {
            let expected = list.declared_type();
            writer.write_tag_type(expected);
            writer.write_len(list.len())?;
            for item in list {
                let found = item.tag_type();
                if found != expected {
                    return Err(Error::ListTypeMismatch { expected, found });
                }
                write_payload(writer, item)?;
            }
        }
        Value::Compound(compound) => {
            for child in compound {
                encode_into(writer, child)?;
            }
            writer.write_tag_type(TagType::End);
        }
        Value::IntArray(v) => writer.write_array(v)?,
        Value::LongArray(v) => writer.write_array(v)?,
    }
    Ok(())
}

/// Renders `tag` as an indented tree for diagnostics.
///
/// Array contents are elided unless `print_array_content` is set.
pub fn print_tag(tag: &Tag, indent: usize, print_array_content: bool) -> String {
    let mut out = String::new();
    if tag.tag_type() != TagType::End {
        print_entry(
            &mut out,
            Some(tag),
            tag.value(),
            indent,
            0,
            print_array_content,
        );
    }
    out
}

fn print_entry(
    out: &mut String,
    named: Option<&Tag>,
    value: &Value,
    indent: usize,
    current: usize,
    print_array_content: bool,
) {
    let ty = value.tag_type();
    if ty == TagType::End {
        return;
    }
    let pad = " ".repeat(current);
    match named {
        Some(tag) => {
            let _ = write!(out, "{pad}TAG_{}(\"{}\"): ", ty.type_name(), tag.name());
        }
        None => {
            let _ = write!(out, "{pad}TAG_{}: ", ty.type_name());
        }
    }

    match value {
        Value::End => {}
        Value::Byte(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::Short(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::Int(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::Long(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::Float(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::Double(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::String(v) => {
            let _ = writeln!(out, "{v}");
        }
        Value::ByteArray(v) => print_array(out, &pad, v, print_array_content),
        Value::IntArray(v) => print_array(out, &pad, v, print_array_content),
        Value::LongArray(v) => print_array(out, &pad, v, print_array_content),
        Value::List(list) => {
            let _ = writeln!(
                out,
                "{} entries of type {}\n{pad}{{",
                list.len(),
                list.list_type().type_name()
            );
            for item in list {
                print_entry(out, None, item, indent, current + indent, print_array_content);
            }
            let _ = writeln!(out, "{pad}}}");
        }
        Value::Compound(compound) => {
            let _ = writeln!(out, "{} entries\n{pad}{{", compound.len());
            for child in compound {
                print_entry(
                    out,
                    Some(child),
                    child.value(),
                    indent,
                    current + indent,
                    print_array_content,
                );
            }
            let _ = writeln!(out, "{pad}}}");
        }
    }
}

fn print_array<T: std::fmt::Display>(out: &mut String, pad: &str, values: &[T], content: bool) {
    let _ = writeln!(out, "{} entries\n{pad}[", values.len());
    if content {
        let _ = write!(out, "{pad}");
        for v in values {
            let _ = write!(out, " {v}");
        }
        out.push('\n');
    } else {
        let _ = writeln!(out, "{pad}  ...");
    }
    let _ = writeln!(out, "{pad}]");
}

/// Reads a standalone NBT file, inflating it if it starts with a gzip or
/// zlib header. Returns the root tag and the compression that was found.
pub fn read_file(path: impl AsRef<Path>) -> Result<(Tag, CompressionType)> {
    let raw = std::fs::read(path.as_ref())?;
    let compression = CompressionType::detect(&raw);
    let data = inflate(&raw, compression)?;
    let tag = decode(&data)?;
    Ok((tag, compression))
}

pub fn write_file(
    path: impl AsRef<Path>,
    tag: &Tag,
    compression: CompressionType,
    level: u32,
) -> Result<()> {
    let data = encode(tag)?;
    let out = deflate(&data, compression, level)?;
    std::fs::write(path.as_ref(), out)?;
    Ok(())
}

/// Cheap check that `path` holds an NBT document: the (possibly
/// decompressed) content must start with a compound type byte.
pub fn is_nbt_file(path: impl AsRef<Path>) -> bool {
    let Ok(raw) = std::fs::read(path.as_ref()) else {
        return false;
    };
    if raw.len() < 2 {
        return false;
    }
    match inflate(&raw, CompressionType::detect(&raw)) {
        Ok(data) => data.first() == Some(&TagType::Compound.as_u8()),
        Err(_) => false,
    }
}
