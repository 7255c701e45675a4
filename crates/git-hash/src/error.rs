/// Errors produced by hash and OID operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("invalid hex character at position {position}: '{character}'")]
    InvalidHex { position: usize, character: char },

    #[error("invalid hex length: expected {expected}, got {actual}")]
    InvalidHexLength { expected: usize, actual: usize },

    #[error("invalid hash length: expected {expected} bytes, got {actual}")]
    InvalidHashLength { expected: usize, actual: usize },

    #[error("offset {offset} out of range: need {needed} bytes, buffer has {len}")]
    OffsetOutOfRange {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("byte index {index} out of range for a {len}-byte hash")]
    ByteIndexOutOfRange { index: usize, len: usize },

    #[error("SHA-1 collision detected")]
    Sha1Collision,
}

impl HashError {
    /// Whether the input was malformed (bad hex or wrong buffer length).
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            Self::InvalidHex { .. } | Self::InvalidHexLength { .. } | Self::InvalidHashLength { .. }
        )
    }

    /// Whether an index or offset fell outside the valid bounds.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::OffsetOutOfRange { .. } | Self::ByteIndexOutOfRange { .. }
        )
    }
}
