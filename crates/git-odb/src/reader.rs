//! The storage-engine boundary and id resolution.

use std::sync::Arc;

use git_hash::ObjectId;
use git_object::{GitObject, Kind, Object, ObjectType, TypedId};
use tracing::{debug, trace};

use crate::OdbError;

/// An object as a storage engine hands it back: kind plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub obj_type: ObjectType,
    pub data: Vec<u8>,
}

impl RawObject {
    pub fn new(obj_type: ObjectType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            obj_type,
            data: data.into(),
        }
    }

    /// The id this payload hashes to.
    pub fn compute_id(&self) -> ObjectId {
        git_hash::hasher::Hasher::hash_object(self.obj_type.as_str(), &self.data)
    }
}

impl<T: GitObject + ?Sized> From<&T> for RawObject {
    fn from(obj: &T) -> Self {
        Self::new(obj.object_type(), obj.serialize_content().into_owned())
    }
}

/// A storage engine objects can be resolved from.
///
/// Only [`read_raw`](ObjectReader::read_raw) is required. `Ok(None)` means
/// the engine does not have the object; `Err` is reserved for engine
/// failures.
pub trait ObjectReader: Send + Sync {
    /// Fetch the kind and payload stored under `oid`.
    fn read_raw(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError>;

    /// Check if an object exists.
    fn contains(&self, oid: &ObjectId) -> bool {
        matches!(self.read_raw(oid), Ok(Some(_)))
    }

    /// Fetch and parse the object stored under `oid`.
    fn read_object(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        match self.read_raw(oid)? {
            Some(raw) => parse_raw(oid, &raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Parse a raw payload, reporting undecodable data as corruption of `oid`.
pub(crate) fn parse_raw(oid: &ObjectId, raw: &RawObject) -> Result<Object, OdbError> {
    Object::parse_content(raw.obj_type, &raw.data).map_err(|e| {
        debug!(%oid, kind = %raw.obj_type, error = %e, "stored object does not parse");
        OdbError::Corrupt {
            oid: *oid,
            reason: e.to_string(),
        }
    })
}

impl<R: ObjectReader + ?Sized> ObjectReader for &R {
    fn read_raw(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        (**self).read_raw(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        (**self).contains(oid)
    }

    fn read_object(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        (**self).read_object(oid)
    }
}

impl<R: ObjectReader + ?Sized> ObjectReader for Arc<R> {
    fn read_raw(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        (**self).read_raw(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        (**self).contains(oid)
    }

    fn read_object(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        (**self).read_object(oid)
    }
}

/// Resolve an id against a storage engine.
///
/// The store is always an argument; ids carry no back-reference to where
/// they came from, so the same id can be read from any engine.
pub trait ReadObject {
    /// What a successful read produces.
    type Output;

    fn read<R: ObjectReader + ?Sized>(&self, odb: &R) -> Result<Self::Output, OdbError>;
}

impl ReadObject for ObjectId {
    type Output = Object;

    /// Absent objects are [`OdbError::NotFound`]; engine failures are
    /// passed through unchanged.
    fn read<R: ObjectReader + ?Sized>(&self, odb: &R) -> Result<Object, OdbError> {
        trace!(oid = %self, "resolving object");
        match odb.read_object(self)? {
            Some(obj) => Ok(obj),
            None => {
                debug!(oid = %self, "object not found");
                Err(OdbError::NotFound(*self))
            }
        }
    }
}

impl<K: Kind> ReadObject for TypedId<K> {
    type Output = K::Object;

    /// Resolves like an untyped id, then requires the stored kind to be
    /// `K`. A different kind is [`OdbError::TypeMismatch`].
    fn read<R: ObjectReader + ?Sized>(&self, odb: &R) -> Result<K::Object, OdbError> {
        let oid = self.oid();
        let obj = oid.read(odb)?;
        K::narrow(obj).map_err(|other| {
            let actual = other.object_type();
            debug!(%oid, expected = %K::TYPE, %actual, "object kind mismatch");
            OdbError::TypeMismatch {
                oid,
                expected: K::TYPE,
                actual,
            }
        })
    }
}
