use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use git_hash::hasher::Hasher;
use git_hash::ObjectId;
use git_object::{GitObject, ObjectType};
use tracing::{debug, trace};

use crate::{ObjectReader, OdbConfig, OdbError, RawObject};

/// Thread-safe in-memory object store.
///
/// Objects are kept as raw kind + payload under their id. Writes hash the
/// payload; [`insert_raw`](MemoryOdb::insert_raw) stores under an id the
/// caller already knows and does not check it, which is what
/// `verify_on_read` is for.
#[derive(Debug, Default)]
pub struct MemoryOdb {
    objects: RwLock<HashMap<ObjectId, RawObject>>,
    config: OdbConfig,
}

impl MemoryOdb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OdbConfig) -> Self {
        Self {
            objects: RwLock::default(),
            config,
        }
    }

    pub fn config(&self) -> &OdbConfig {
        &self.config
    }

    /// Store an object under its computed id.
    pub fn write<T: GitObject + ?Sized>(&self, obj: &T) -> ObjectId {
        self.store(RawObject::from(obj))
    }

    /// Store a kind and payload under the id they hash to.
    pub fn write_raw(&self, obj_type: ObjectType, content: &[u8]) -> ObjectId {
        self.store(RawObject::new(obj_type, content))
    }

    /// Store `raw` under `oid` as given, replacing anything already there.
    pub fn insert_raw(&self, oid: ObjectId, raw: RawObject) {
        trace!(%oid, kind = %raw.obj_type, "inserting raw object");
        self.objects_mut().insert(oid, raw);
    }

    fn store(&self, raw: RawObject) -> ObjectId {
        let oid = raw.compute_id();
        trace!(%oid, kind = %raw.obj_type, size = raw.data.len(), "writing object");
        self.objects_mut().entry(oid).or_insert(raw);
        oid
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects().is_empty()
    }

    /// All stored ids, in ascending order.
    pub fn iter_oids(&self) -> impl Iterator<Item = ObjectId> {
        let mut oids: Vec<ObjectId> = self.objects().keys().copied().collect();
        oids.sort_unstable();
        oids.into_iter()
    }

    fn objects(&self) -> RwLockReadGuard<'_, HashMap<ObjectId, RawObject>> {
        self.objects.read().unwrap_or_else(|e| e.into_inner())
    }

    fn objects_mut(&self) -> RwLockWriteGuard<'_, HashMap<ObjectId, RawObject>> {
        self.objects.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Re-hash `raw` and check it against the id it was stored under.
fn verify(oid: &ObjectId, raw: &RawObject) -> Result<(), OdbError> {
    let mut hasher = Hasher::for_object(raw.obj_type.as_str(), raw.data.len());
    hasher.update(&raw.data);
    let actual = hasher.try_finalize().map_err(|e| {
        debug!(%oid, error = %e, "verification failed");
        OdbError::Corrupt {
            oid: *oid,
            reason: e.to_string(),
        }
    })?;
    if actual != *oid {
        debug!(%oid, %actual, "stored data hashes to a different id");
        return Err(OdbError::Corrupt {
            oid: *oid,
            reason: format!("content hashes to {actual}"),
        });
    }
    Ok(())
}

impl ObjectReader for MemoryOdb {
    fn read_raw(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        let raw = self.objects().get(oid).cloned();
        if let (Some(raw), true) = (&raw, self.config.verify_on_read) {
            verify(oid, raw)?;
        }
        Ok(raw)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.objects().contains_key(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_object::{Blob, Object};

    fn tampered(odb: &MemoryOdb) -> ObjectId {
        let oid = Blob::new(b"original".to_vec()).id();
        odb.insert_raw(oid, RawObject::new(ObjectType::Blob, b"tampered".to_vec()));
        oid
    }

    #[test]
    fn write_and_read_back() {
        let odb = MemoryOdb::new();
        let blob = Blob::new(b"hello world".to_vec());
        let oid = odb.write(&blob);

        assert_eq!(oid.to_hex(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
        assert!(odb.contains(&oid));
        assert_eq!(
            odb.read_raw(&oid).unwrap(),
            Some(RawObject::new(ObjectType::Blob, b"hello world".to_vec()))
        );
        assert_eq!(odb.read_object(&oid).unwrap(), Some(Object::Blob(blob)));
    }

    #[test]
    fn write_raw_matches_write() {
        let odb = MemoryOdb::new();
        let a = odb.write_raw(ObjectType::Blob, b"");
        let b = odb.write(&Blob::default());
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
        assert_eq!(odb.len(), 1);
    }

    #[test]
    fn iter_oids_sorted() {
        let odb = MemoryOdb::new();
        assert!(odb.is_empty());
        for i in 0..20u8 {
            odb.write_raw(ObjectType::Blob, &[i]);
        }
        let oids: Vec<_> = odb.iter_oids().collect();
        assert_eq!(oids.len(), 20);
        assert!(oids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unverified_read_trusts_stored_id() {
        let odb = MemoryOdb::new();
        let oid = tampered(&odb);
        assert!(odb.read_raw(&oid).unwrap().is_some());
    }

    #[test]
    fn verified_read_detects_mismatch() {
        let odb = MemoryOdb::with_config(OdbConfig::default().verify_on_read(true));
        let oid = tampered(&odb);
        match odb.read_raw(&oid) {
            Err(OdbError::Corrupt { oid: bad, reason }) => {
                assert_eq!(bad, oid);
                assert!(reason.starts_with("content hashes to "));
            }
            other => panic!("expected corruption, got {other:?}"),
        }

        let good = odb.write(&Blob::new(b"fine".to_vec()));
        assert!(odb.read_raw(&good).unwrap().is_some());
        assert_eq!(odb.read_raw(&ObjectId::NULL).unwrap(), None);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let odb = std::sync::Arc::new(MemoryOdb::new());
        let oid = odb.write(&Blob::new(b"survives".to_vec()));

        let poisoner = std::sync::Arc::clone(&odb);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.objects.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(odb.objects.is_poisoned());
        assert!(odb.contains(&oid));
        assert_eq!(odb.len(), 1);
    }
}
