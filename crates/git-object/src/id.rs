//! Object ids annotated with the kind of object they are expected to name.
//!
//! A [`TypedId`] is the same 20-byte value as an [`ObjectId`]; the kind
//! parameter only decides what a read through it returns. Equality,
//! ordering and hashing ignore the kind entirely, so a `CommitId` and a
//! plain `ObjectId` with the same bytes are equal and find the same map
//! entries.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::Deref;
use std::str::FromStr;

use git_hash::{HashError, ObjectId};

use crate::{Blob, Commit, Object, ObjectType, Tag, Tree};

mod sealed {
    pub trait Sealed {}
}

/// An object kind that a [`TypedId`] can expect.
pub trait Kind: sealed::Sealed + 'static {
    /// The object type this kind stands for.
    const TYPE: ObjectType;
    /// Name used in `Debug` output.
    const ID_NAME: &'static str;
    /// The concrete object a successful read produces.
    type Object;

    /// Unwrap `obj` if it is of this kind, otherwise hand it back.
    fn narrow(obj: Object) -> Result<Self::Object, Object>;
}

macro_rules! kinds {
    ($($(#[$doc:meta])* $kind:ident => $variant:ident, $alias:ident;)*) => {$(
        $(#[$doc])*
        #[derive(Debug)]
        pub enum $kind {}

        impl sealed::Sealed for $kind {}

        impl Kind for $kind {
            const TYPE: ObjectType = ObjectType::$variant;
            const ID_NAME: &'static str = stringify!($alias);
            type Object = $variant;

            fn narrow(obj: Object) -> Result<$variant, Object> {
                match obj {
                    Object::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }

        #[doc = concat!("An object id expected to name a ", stringify!($variant), ".")]
        pub type $alias = TypedId<$kind>;
    )*};
}

kinds! {
    /// Marker for commit objects.
    CommitKind => Commit, CommitId;
    /// Marker for tree objects.
    TreeKind => Tree, TreeId;
    /// Marker for blob objects.
    BlobKind => Blob, BlobId;
    /// Marker for annotated tag objects.
    TagKind => Tag, TagId;
}

/// An [`ObjectId`] tagged with the kind of object it should resolve to.
pub struct TypedId<K: Kind> {
    oid: ObjectId,
    kind: PhantomData<fn() -> K>,
}

impl<K: Kind> TypedId<K> {
    /// Annotate an existing id. No check is made against any store; a
    /// mismatch is only discovered when the id is read.
    pub const fn new(oid: ObjectId) -> Self {
        Self {
            oid,
            kind: PhantomData,
        }
    }

    /// Parse 40 hex digits; fails with `InvalidHexLength` or `InvalidHex`.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        ObjectId::from_hex(hex).map(Self::new)
    }

    /// Copy exactly 20 raw bytes; any other length is `InvalidHashLength`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        ObjectId::from_bytes(bytes).map(Self::new)
    }

    /// Copy the 20 bytes at `offset`; `OffsetOutOfRange` if `buf` is too short.
    pub fn from_bytes_at(buf: &[u8], offset: usize) -> Result<Self, HashError> {
        ObjectId::from_bytes_at(buf, offset).map(Self::new)
    }

    /// The untyped id.
    pub const fn oid(&self) -> ObjectId {
        self.oid
    }

    /// The object type a read through this id must produce.
    pub const fn expected_type(&self) -> ObjectType {
        K::TYPE
    }
}

impl<K: Kind> Clone for TypedId<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Kind> Copy for TypedId<K> {}

impl<K: Kind> Deref for TypedId<K> {
    type Target = ObjectId;
    fn deref(&self) -> &ObjectId {
        &self.oid
    }
}

impl<K: Kind> AsRef<ObjectId> for TypedId<K> {
    fn as_ref(&self) -> &ObjectId {
        &self.oid
    }
}

impl<K: Kind> Borrow<ObjectId> for TypedId<K> {
    fn borrow(&self) -> &ObjectId {
        &self.oid
    }
}

impl<K: Kind> From<ObjectId> for TypedId<K> {
    fn from(oid: ObjectId) -> Self {
        Self::new(oid)
    }
}

impl<K: Kind> From<TypedId<K>> for ObjectId {
    fn from(id: TypedId<K>) -> Self {
        id.oid
    }
}

impl<K: Kind, L: Kind> PartialEq<TypedId<L>> for TypedId<K> {
    fn eq(&self, other: &TypedId<L>) -> bool {
        self.oid == other.oid
    }
}

impl<K: Kind> Eq for TypedId<K> {}

impl<K: Kind> PartialEq<ObjectId> for TypedId<K> {
    fn eq(&self, other: &ObjectId) -> bool {
        self.oid == *other
    }
}

impl<K: Kind> PartialEq<TypedId<K>> for ObjectId {
    fn eq(&self, other: &TypedId<K>) -> bool {
        *self == other.oid
    }
}

impl<K: Kind, L: Kind> PartialOrd<TypedId<L>> for TypedId<K> {
    fn partial_cmp(&self, other: &TypedId<L>) -> Option<Ordering> {
        Some(self.oid.cmp(&other.oid))
    }
}

impl<K: Kind> Ord for TypedId<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.oid.cmp(&other.oid)
    }
}

impl<K: Kind> PartialOrd<ObjectId> for TypedId<K> {
    fn partial_cmp(&self, other: &ObjectId) -> Option<Ordering> {
        Some(self.oid.cmp(other))
    }
}

impl<K: Kind> PartialOrd<TypedId<K>> for ObjectId {
    fn partial_cmp(&self, other: &TypedId<K>) -> Option<Ordering> {
        Some(self.cmp(&other.oid))
    }
}

impl<K: Kind> Hash for TypedId<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.oid.hash(state);
    }
}

impl<K: Kind> fmt::Display for TypedId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.oid, f)
    }
}

impl<K: Kind> fmt::Debug for TypedId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::ID_NAME, &self.oid.to_hex()[..8])
    }
}

impl<K: Kind> FromStr for TypedId<K> {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
