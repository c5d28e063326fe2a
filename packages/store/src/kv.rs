//! # Key/value persistence seam
//!
//! Every durable piece of client state (the session token, the session user,
//! the shopping cart) goes through the [`KeyValueStore`] trait. The same session
//! and cart logic therefore runs against browser `localStorage` on the web
//! ([`crate::LocalStore`]) and against an in-memory map in tests and native
//! builds ([`crate::MemoryStore`]).
//!
//! ## Well-known keys
//!
//! | Key | Value | Owner |
//! |-----|-------|-------|
//! | [`TOKEN_KEY`] | raw bearer token string | [`crate::SessionStore`] |
//! | [`USER_KEY`] | versioned JSON of [`crate::SessionUser`] | [`crate::SessionStore`] |
//! | [`CART_KEY`] | versioned JSON of `Vec<`[`crate::CartItem`]`>` | [`crate::CartStore`] |
//!
//! Only the owning store writes its keys.

use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const CART_KEY: &str = "cart";

/// Failure reading or writing durable client storage.
///
/// The stores never let these escape to page code for reads; they degrade to
/// "nothing stored" instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded while writing `{0}`")]
    QuotaExceeded(String),
    #[error("stored value under `{key}` is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("stored value under `{key}` has unsupported schema version {version}")]
    UnsupportedVersion { key: String, version: u32 },
}

/// Synchronous string key/value storage.
///
/// Browser `localStorage` is synchronous, so the trait is too.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
