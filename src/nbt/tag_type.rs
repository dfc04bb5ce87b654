use std::fmt;

/// Type byte of a tag as it appears on disk.
///
/// `Unknown` is never persisted; it is what [`TagType::from_u8`] yields for any
/// byte above 12 so callers can reject it before parsing further.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
    Unknown = 255,
}

const TYPE_NAMES: [&str; 13] = [
    "End",
    "Byte",
    "Short",
    "Int",
    "Long",
    "Float",
    "Double",
    "ByteArray",
    "String",
    "List",
    "Compound",
    "IntArray",
    "LongArray",
];

impl TagType {
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            _ => TagType::Unknown,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short name, e.g. `"Int"`.
    pub fn type_name(self) -> &'static str {
        TYPE_NAMES.get(self as usize).copied().unwrap_or("Unknown")
    }

    /// Class-style name, e.g. `"IntTag"`.
    pub fn tag_name(self) -> &'static str {
        match self {
            TagType::End => "EndTag",
            TagType::Byte => "ByteTag",
            TagType::Short => "ShortTag",
            TagType::Int => "IntTag",
            TagType::Long => "LongTag",
            TagType::Float => "FloatTag",
            TagType::Double => "DoubleTag",
            TagType::ByteArray => "ByteArrayTag",
            TagType::String => "StringTag",
            TagType::List => "ListTag",
            TagType::Compound => "CompoundTag",
            TagType::IntArray => "IntArrayTag",
            TagType::LongArray => "LongArrayTag",
            TagType::Unknown => "UnknownTag",
        }
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            TagType::Byte
                | TagType::Short
                | TagType::Int
                | TagType::Long
                | TagType::Float
                | TagType::Double
                | TagType::String
        )
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            TagType::ByteArray | TagType::IntArray | TagType::LongArray
        )
    }

    pub fn is_container(self) -> bool {
        matches!(self, TagType::List | TagType::Compound)
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
