use crate::{HashError, ObjectId};

/// Streaming SHA-1 computation with collision detection.
///
/// Data can be fed incrementally with [`update`](Hasher::update) or through
/// the [`std::io::Write`] implementation, then finalised into an
/// [`ObjectId`].
pub struct Hasher {
    inner: Box<sha1_checked::Sha1>,
}

impl Hasher {
    pub fn new() -> Self {
        use digest::Digest;
        Self {
            inner: Box::new(sha1_checked::Sha1::new()),
        }
    }

    /// Feed data into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        use digest::Digest;
        self.inner.update(data);
    }

    /// Finalize and return the ObjectId.
    ///
    /// Never fails. Inputs that trip the collision detector still produce a
    /// deterministic (hardened) digest; use [`try_finalize`](Hasher::try_finalize)
    /// when such inputs must be rejected.
    pub fn finalize(self) -> ObjectId {
        let result = self.inner.try_finalize();
        Self::to_oid(result.hash().as_slice())
    }

    /// Finalize, failing if SHA-1 collision detection fires.
    pub fn try_finalize(self) -> Result<ObjectId, HashError> {
        let result = self.inner.try_finalize();
        if result.has_collision() {
            return Err(HashError::Sha1Collision);
        }
        Ok(Self::to_oid(result.hash().as_slice()))
    }

    fn to_oid(digest: &[u8]) -> ObjectId {
        let mut bytes = [0u8; ObjectId::LEN];
        bytes.copy_from_slice(digest);
        ObjectId::from_array(bytes)
    }

    /// Convenience: hash data in one call.
    pub fn digest(data: &[u8]) -> ObjectId {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }

    /// Start a hasher already primed with the object header
    /// `"{kind} {len}\0"`; the caller then feeds exactly `len` payload bytes.
    pub fn for_object(kind: &str, len: usize) -> Self {
        let mut h = Self::new();
        h.update(format!("{kind} {len}\0").as_bytes());
        h
    }

    /// Hash a git object: `"{kind} {len}\0{payload}"`.
    pub fn hash_object(kind: &str, payload: &[u8]) -> ObjectId {
        let mut h = Self::for_object(kind, payload.len());
        h.update(payload);
        h.finalize()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
