use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string, write_hex};
use crate::HashError;

/// A git object identifier: the SHA-1 hash of an object's content.
///
/// Always exactly 20 bytes, immutable once built. Ordering compares the
/// bytes lexicographically as unsigned values, so ids can be sorted or used
/// as keys of ordered indexes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectId([u8; ObjectId::LEN]);

impl ObjectId {
    /// Number of bytes in a SHA-1 hash.
    pub const LEN: usize = 20;
    /// Number of hex digits in a SHA-1 hash.
    pub const HEX_LEN: usize = Self::LEN * 2;
    /// The null OID (all zeros).
    pub const NULL: Self = Self([0u8; Self::LEN]);

    /// Wrap an already-sized digest.
    pub const fn from_array(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Create an ObjectId from a buffer of exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != Self::LEN {
            return Err(HashError::InvalidHashLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        Self::from_bytes_at(bytes, 0)
    }

    /// Copy 20 bytes out of `buf` starting at `offset`.
    ///
    /// The buffer may hold other data around the hash (tree entries, index
    /// tables); only the 20 bytes at `offset` are read, and they are copied.
    pub fn from_bytes_at(buf: &[u8], offset: usize) -> Result<Self, HashError> {
        let end = offset
            .checked_add(Self::LEN)
            .filter(|&end| end <= buf.len())
            .ok_or(HashError::OffsetOutOfRange {
                offset,
                needed: Self::LEN,
                len: buf.len(),
            })?;
        let mut arr = [0u8; Self::LEN];
        arr.copy_from_slice(&buf[offset..end]);
        Ok(Self(arr))
    }

    /// Create an ObjectId from a 40-digit hex string (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let mut bytes = [0u8; Self::LEN];
        hex_decode(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// The byte at `index` (0-based, big-endian with respect to the hex form).
    pub fn byte(&self, index: usize) -> Result<u8, HashError> {
        self.0
            .get(index)
            .copied()
            .ok_or(HashError::ByteIndexOutOfRange {
                index,
                len: Self::LEN,
            })
    }

    /// Borrow the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Return a copy of the raw bytes.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        self.0
    }

    /// Get the hex string representation (lowercase).
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// Check if this is the null (all-zeros) OID.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Get the first byte of the hash (for fan-out table indexing).
    pub fn first_byte(&self) -> u8 {
        self.0[0]
    }

    /// Check if this OID's hex representation starts with the given hex prefix.
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        prefix.len() <= Self::HEX_LEN && self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// A 32-bit fingerprint taken from the first four bytes.
    ///
    /// SHA-1 output is uniformly distributed, so this is all `Hash` feeds to
    /// the hasher.
    pub fn fingerprint(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

impl Hash for ObjectId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.fingerprint());
    }
}

impl From<[u8; ObjectId::LEN]> for ObjectId {
    fn from(bytes: [u8; ObjectId::LEN]) -> Self {
        Self(bytes)
    }
}

impl From<ObjectId> for [u8; ObjectId::LEN] {
    fn from(oid: ObjectId) -> Self {
        oid.0
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = HashError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(&self.0, f)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ObjectId(")?;
        write_hex(&self.0[..4], f)?;
        f.write_str(")")
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
