//! SHA-1 object identity for git-style content-addressable storage.
//!
//! This crate provides the `ObjectId` type, hex encoding/decoding and the
//! streaming `Hasher` that turns an object's payload into its identifier.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::ObjectId;
