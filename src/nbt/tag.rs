//! In-memory tag tree.
//!
//! A [`Value`] is the payload of one node. Nodes that live inside a
//! [`Compound`] are wrapped in a [`Tag`] which adds the name; [`List`] items
//! are bare values, so a list item cannot carry a name by construction.
//! Containers own their children outright, and `Clone` copies the whole
//! subtree.

use std::fmt;

use crate::error::{Error, Result};
use crate::nbt::float::{almost_equal_f32, almost_equal_f64};
use crate::nbt::{NbtString, TagType};

#[derive(Debug, Clone)]
pub enum Value {
    /// Compound terminator. Only ever seen transiently while decoding.
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(NbtString),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

macro_rules! scalar_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Value::$variant(v) => Some(*v),
                _ => None,
            }
        }
    };
}

macro_rules! ref_accessor {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty, $ty_mut:ty) => {
        pub fn $name(&self) -> Option<$ty> {
            match self {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }

        pub fn $name_mut(&mut self) -> Option<$ty_mut> {
            match self {
                Value::$variant(v) => Some(v),
                _ => None,
            }
        }
    };
}

impl Value {
    pub fn tag_type(&self) -> TagType {
        match self {
            Value::End => TagType::End,
            Value::Byte(_) => TagType::Byte,
            Value::Short(_) => TagType::Short,
            Value::Int(_) => TagType::Int,
            Value::Long(_) => TagType::Long,
            Value::Float(_) => TagType::Float,
            Value::Double(_) => TagType::Double,
            Value::ByteArray(_) => TagType::ByteArray,
            Value::String(_) => TagType::String,
            Value::List(_) => TagType::List,
            Value::Compound(_) => TagType::Compound,
            Value::IntArray(_) => TagType::IntArray,
            Value::LongArray(_) => TagType::LongArray,
        }
    }

    scalar_accessor!(as_byte, Byte, i8);
    scalar_accessor!(as_short, Short, i16);
    scalar_accessor!(as_int, Int, i32);
    scalar_accessor!(as_long, Long, i64);
    scalar_accessor!(as_float, Float, f32);
    scalar_accessor!(as_double, Double, f64);

    ref_accessor!(as_string, as_string_mut, String, &NbtString, &mut NbtString);
    ref_accessor!(as_byte_array, as_byte_array_mut, ByteArray, &Vec<i8>, &mut Vec<i8>);
    ref_accessor!(as_int_array, as_int_array_mut, IntArray, &Vec<i32>, &mut Vec<i32>);
    ref_accessor!(as_long_array, as_long_array_mut, LongArray, &Vec<i64>, &mut Vec<i64>);
    ref_accessor!(as_list, as_list_mut, List, &List, &mut List);
    ref_accessor!(as_compound, as_compound_mut, Compound, &Compound, &mut Compound);
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::End, Value::End) => true,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => almost_equal_f32(*a, *b),
            (Value::Double(a), Value::Double(b)) => almost_equal_f64(*a, *b),
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Compound(a), Value::Compound(b)) => a == b,
            (Value::IntArray(a), Value::IntArray(b)) => a == b,
            (Value::LongArray(a), Value::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.into())
    }
}

impl From<NbtString> for Value {
    fn from(v: NbtString) -> Self {
        Value::String(v)
    }
}

impl From<Vec<i8>> for Value {
    fn from(v: Vec<i8>) -> Self {
        Value::ByteArray(v)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::IntArray(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::LongArray(v)
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Value::List(v)
    }
}

impl From<Compound> for Value {
    fn from(v: Compound) -> Self {
        Value::Compound(v)
    }
}

/// A named value: the unit stored in a compound and at the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: NbtString,
    value: Value,
}

impl Tag {
    pub fn new(name: impl Into<NbtString>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn end() -> Self {
        Self {
            name: NbtString::new(),
            value: Value::End,
        }
    }

    pub fn name(&self) -> &NbtString {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<NbtString>) {
        self.name = name.into();
    }

    pub fn tag_type(&self) -> TagType {
        self.value.tag_type()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (NbtString, Value) {
        (self.name, self.value)
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        self.value.as_compound()
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        self.value.as_compound_mut()
    }

    pub fn as_list(&self) -> Option<&List> {
        self.value.as_list()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::nbt::io::print_tag(self, 2, false))
    }
}

/// Homogeneous sequence of unnamed values.
///
/// The element type is fixed by the first push into an empty list; later
/// pushes of another type are refused. An empty list reports `TagType::End`.
#[derive(Debug, Clone)]
pub struct List {
    list_type: TagType,
    items: Vec<Value>,
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl List {
    pub fn new() -> Self {
        Self {
            list_type: TagType::End,
            items: Vec::new(),
        }
    }

    /// Builds a list from values. Fails if any value's type differs from
    /// the first one's.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut list = Self::new();
        for value in values {
            let value = value.into();
            let found = value.tag_type();
            if !list.push(value) {
                return Err(Error::ListTypeMismatch {
                    expected: list.list_type(),
                    found,
                });
            }
        }
        Ok(list)
    }

    pub(crate) fn with_type(list_type: TagType, capacity: usize) -> Self {
        Self {
            list_type,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Items pushed here must already match `list_type`; used by the decoder.
    pub(crate) fn push_unchecked(&mut self, value: Value) {
        debug_assert_eq!(value.tag_type(), self.list_type);
        self.items.push(value);
    }

    pub fn list_type(&self) -> TagType {
        if self.items.is_empty() {
            TagType::End
        } else {
            self.list_type
        }
    }

    /// Raw element type as it would be written, which may be non-End for an
    /// empty list decoded from disk.
    pub(crate) fn declared_type(&self) -> TagType {
        self.list_type
    }

    /// Appends `value` if it matches the list's element type.
    ///
    /// Returns `false` and leaves the list untouched on a type mismatch or
    /// for an `End` value.
    pub fn push(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        let ty = value.tag_type();
        if ty == TagType::End {
            return false;
        }
        if self.items.is_empty() {
            self.list_type = ty;
        }
        if ty != self.list_type {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Mutable access to one item. Replacing it with a value of another
    /// type makes the list fail to encode.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Items must keep the list's element type; see [`List::get_mut`].
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Removes and returns the item at `index`.
    pub fn take_at(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn erase_at(&mut self, index: usize) -> Result<()> {
        self.take_at(index).map(|_| ())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.list_type = TagType::End;
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.list_type() == other.list_type() && self.items == other.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Ordered sequence of named tags.
///
/// Names are not required to be unique. Lookups by name return the first
/// match in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    children: Vec<Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child. `End` tags are refused.
    pub fn push(&mut self, tag: Tag) -> bool {
        if tag.tag_type() == TagType::End {
            return false;
        }
        self.children.push(tag);
        true
    }

    pub(crate) fn push_unchecked(&mut self, tag: Tag) {
        debug_assert_ne!(tag.tag_type(), TagType::End);
        self.children.push(tag);
    }

    /// Builder-style push of a named value. An `End` value is dropped.
    pub fn with(mut self, name: impl Into<NbtString>, value: impl Into<Value>) -> Self {
        self.push(Tag::new(name, value));
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn child(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find(|tag| tag.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.children.iter_mut().find(|tag| tag.name() == name)
    }

    /// Value of the first child called `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.child(name).map(Tag::value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.child_mut(name).map(Tag::value_mut)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|tag| tag.name() == name)
    }

    pub fn at(&self, index: usize) -> Option<&Tag> {
        self.children.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.children.iter_mut()
    }

    pub fn take_at(&mut self, index: usize) -> Result<Tag> {
        if index >= self.children.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        Ok(self.children.remove(index))
    }

    pub fn erase_at(&mut self, index: usize) -> Result<()> {
        self.take_at(index).map(|_| ())
    }

    /// Removes and returns the first child called `name`.
    pub fn take(&mut self, name: &str) -> Option<Tag> {
        let index = self.position(name)?;
        Some(self.children.remove(index))
    }

    pub fn erase(&mut self, name: &str) -> bool {
        self.take(name).is_some()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl IntoIterator for Compound {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

/// `End` tags in the input are dropped.
impl FromIterator<Tag> for Compound {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for tag in iter {
            compound.push(tag);
        }
        compound
    }
}
