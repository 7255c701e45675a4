use std::borrow::Cow;

use crate::{GitObject, ObjectError, ObjectType};

/// A git blob: raw file content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Parse blob content. A blob is simply its raw bytes.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self {
            data: content.to_vec(),
        })
    }
}

impl GitObject for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn serialize_content(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.data)
    }
}
