use std::sync::{Mutex, MutexGuard};

use git_hash::ObjectId;
use git_object::cache::ObjectCache;
use git_object::Object;
use tracing::trace;

use crate::{ObjectReader, OdbConfig, OdbError, RawObject};

/// An [`ObjectReader`] that keeps recently parsed objects in an LRU cache.
///
/// Only parsed reads go through the cache; [`read_raw`](ObjectReader::read_raw)
/// always reaches the wrapped engine. Misses and errors are not cached.
pub struct CachedOdb<R> {
    inner: R,
    cache: Mutex<ObjectCache>,
}

impl<R: ObjectReader> CachedOdb<R> {
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, &OdbConfig::default())
    }

    pub fn with_config(inner: R, config: &OdbConfig) -> Self {
        Self {
            inner,
            cache: Mutex::new(ObjectCache::new(config.cache_capacity)),
        }
    }

    /// The wrapped engine.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Number of cached objects.
    pub fn cached(&self) -> usize {
        self.cache().len()
    }

    /// Drop every cached object.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    fn cache(&self) -> MutexGuard<'_, ObjectCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<R: ObjectReader> ObjectReader for CachedOdb<R> {
    fn read_raw(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        self.inner.read_raw(oid)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.cache().contains(oid) || self.inner.contains(oid)
    }

    fn read_object(&self, oid: &ObjectId) -> Result<Option<Object>, OdbError> {
        if let Some(obj) = self.cache().get(oid) {
            trace!(%oid, "object cache hit");
            return Ok(Some(obj.clone()));
        }

        let obj = self.inner.read_object(oid)?;
        if let Some(ref obj) = obj {
            self.cache().insert(*oid, obj.clone());
        }
        Ok(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryOdb;
    use git_object::{Blob, GitObject};

    #[test]
    fn caches_successful_reads_only() {
        let odb = CachedOdb::new(MemoryOdb::new());
        let oid = odb.inner().write(&Blob::new(b"cached".to_vec()));

        assert_eq!(odb.cached(), 0);
        assert!(odb.read_object(&ObjectId::NULL).unwrap().is_none());
        assert_eq!(odb.cached(), 0);

        let first = odb.read_object(&oid).unwrap();
        assert_eq!(odb.cached(), 1);
        assert_eq!(odb.read_object(&oid).unwrap(), first);
        assert!(odb.contains(&oid));

        odb.clear_cache();
        assert_eq!(odb.cached(), 0);
        assert!(odb.contains(&oid));
    }

    #[test]
    fn capacity_from_config() {
        let config = OdbConfig::default().cache_capacity(2);
        let odb = CachedOdb::with_config(MemoryOdb::new(), &config);
        for i in 0..5u8 {
            let oid = odb.inner().write(&Blob::new(vec![i]));
            odb.read_object(&oid).unwrap();
        }
        assert_eq!(odb.cached(), 2);
        assert_eq!(odb.into_inner().len(), 5);
    }

    #[test]
    fn raw_reads_bypass_cache() {
        let odb = CachedOdb::new(MemoryOdb::new());
        let blob = Blob::new(b"raw".to_vec());
        let oid = odb.inner().write(&blob);
        let raw = odb.read_raw(&oid).unwrap().unwrap();
        assert_eq!(raw.data, blob.serialize_content().as_ref());
        assert_eq!(odb.cached(), 0);
    }
}
