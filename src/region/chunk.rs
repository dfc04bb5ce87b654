use crate::error::{Error, Result};
use crate::nbt::{self, Compound, NbtString, Tag, TagType};

/// One region slot: an optional compound root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    root: Option<Tag>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `root`; it must be a compound.
    pub fn with_root(root: Tag) -> Result<Self> {
        let mut chunk = Self::new();
        chunk.set_root_tag(root)?;
        Ok(chunk)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    pub fn root_tag(&self) -> Option<&Tag> {
        self.root.as_ref()
    }

    pub fn root_compound(&self) -> Option<&Compound> {
        self.root.as_ref().and_then(Tag::as_compound)
    }

    pub fn root_compound_mut(&mut self) -> Option<&mut Compound> {
        self.root.as_mut().and_then(Tag::as_compound_mut)
    }

    /// Renames the root; returns `false` for an empty chunk.
    pub fn set_root_name(&mut self, name: impl Into<NbtString>) -> bool {
        match self.root.as_mut() {
            Some(root) => {
                root.set_name(name);
                true
            }
            None => false,
        }
    }

    /// Replaces the root. Non-compound roots are refused and the chunk is
    /// left unchanged.
    pub fn set_root_tag(&mut self, root: Tag) -> Result<()> {
        if root.tag_type() != TagType::Compound {
            return Err(Error::RootType(root.tag_type()));
        }
        self.root = Some(root);
        Ok(())
    }

    pub fn take_root_tag(&mut self) -> Option<Tag> {
        self.root.take()
    }

    /// Encodes the root document, or `None` for an empty chunk.
    pub(crate) fn encode_root(&self) -> Result<Option<Vec<u8>>> {
        let Some(root) = self.root.as_ref() else {
            return Ok(None);
        };
        if root.tag_type() != TagType::Compound {
            return Err(Error::RootType(root.tag_type()));
        }
        nbt::encode(root).map(Some)
    }
}
