//! postcard (de)serialization helpers shared by every table accessor.

use memory_core::error::Error;
use serde::{de::DeserializeOwned, Serialize};

/// Serialize `value` to its on-disk representation.
///
/// # Errors
/// Returns [`Error::Serialization`]-shaped text if postcard encoding fails
/// (practically: never, for the entity types this crate stores).
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    postcard::to_allocvec(value)
        .map_err(|e| Error::StoreError(format!("postcard encode failed: {e}")))
}

/// Inverse of [`encode`].
///
/// # Errors
/// Returns [`Error::StoreError`] if the bytes don't decode as `T`.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    postcard::from_bytes(bytes).map_err(|e| Error::StoreError(format!("postcard decode failed: {e}")))
}
