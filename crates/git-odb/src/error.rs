use git_hash::ObjectId;
use git_object::ObjectType;

#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("object {oid} is a {actual}, expected a {expected}")]
    TypeMismatch {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OdbError {
    /// The id the error is about, if any.
    pub fn oid(&self) -> Option<ObjectId> {
        match self {
            Self::NotFound(oid) | Self::TypeMismatch { oid, .. } | Self::Corrupt { oid, .. } => {
                Some(*oid)
            }
            Self::InvalidConfig { .. } | Self::Io(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
