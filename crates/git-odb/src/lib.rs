//! Object resolution for git.
//!
//! An id never holds a reference to the store it came from. Resolution takes
//! the store as an argument: anything implementing [`ObjectReader`] can be
//! passed to [`ReadObject::read`], which turns an [`ObjectId`] into an
//! [`Object`] and a typed id such as [`CommitId`] into a
//! [`Commit`](git_object::Commit), failing with
//! [`OdbError::TypeMismatch`] when the stored kind disagrees.
//!
//! [`MemoryOdb`] is an in-memory engine and [`CachedOdb`] puts an LRU cache
//! in front of any other engine.
//!
//! [`ObjectId`]: git_hash::ObjectId
//! [`Object`]: git_object::Object
//! [`CommitId`]: git_object::CommitId

mod cached;
pub mod config;
mod error;
mod memory;
mod reader;

pub use cached::CachedOdb;
pub use config::OdbConfig;
pub use error::OdbError;
pub use memory::MemoryOdb;
pub use reader::{ObjectReader, RawObject, ReadObject};
