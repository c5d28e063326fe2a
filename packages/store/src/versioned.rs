//! # Versioned JSON envelopes
//!
//! Structured values are persisted wrapped in an envelope that records their
//! schema version:
//!
//! ```json
//! {"version": 1, "data": {"id": "u1", "email": "a@b.c", "role": "ADMIN"}}
//! ```
//!
//! Decoding accepts three shapes:
//!
//! | Stored shape | Result |
//! |--------------|--------|
//! | envelope with [`SCHEMA_VERSION`] | the payload |
//! | bare JSON value (pre-envelope clients, version 0) | the payload, flagged for rewrite |
//! | envelope with a newer version | [`StorageError::UnsupportedVersion`] |
//!
//! Anything that is not valid JSON for the payload type becomes
//! [`StorageError::Corrupt`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::kv::{KeyValueStore, StorageError};

/// Current schema version written by this client.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Versioned<T> {
    version: u32,
    data: T,
}

/// A successfully decoded value and whether it came from an older schema.
#[derive(Debug, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub migrated: bool,
}

/// Serialize `value` into the current envelope.
pub fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(&Versioned {
        version: SCHEMA_VERSION,
        data: value,
    })
    .map_err(|e| StorageError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a stored string, accepting current envelopes and legacy bare values.
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Decoded<T>, StorageError> {
    let corrupt = |e: serde_json::Error| StorageError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    };

    let json: Value = serde_json::from_str(raw).map_err(corrupt)?;

    if let Some(version) = envelope_version(&json) {
        if version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                key: key.to_string(),
                version,
            });
        }
        let envelope: Versioned<T> = serde_json::from_value(json).map_err(corrupt)?;
        return Ok(Decoded {
            value: envelope.data,
            migrated: envelope.version < SCHEMA_VERSION,
        });
    }

    let value = serde_json::from_value(json).map_err(corrupt)?;
    Ok(Decoded {
        value,
        migrated: true,
    })
}

fn envelope_version(json: &Value) -> Option<u32> {
    let object = json.as_object()?;
    if object.len() != 2 || !object.contains_key("data") {
        return None;
    }
    object
        .get("version")?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
}

/// Read and decode `key`, rewriting legacy values in the current envelope.
///
/// Returns `Ok(None)` when the key is absent. A failed rewrite is logged and
/// the decoded value is still returned.
pub fn load<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    let decoded: Decoded<T> = decode(key, &raw)?;
    if decoded.migrated {
        tracing::debug!(key, "migrating stored value to schema v{SCHEMA_VERSION}");
        let rewritten = encode(key, &decoded.value).and_then(|s| storage.set(key, &s));
        if let Err(e) = rewritten {
            tracing::warn!(key, error = %e, "failed to rewrite migrated value");
        }
    }
    Ok(Some(decoded.value))
}

/// Encode `value` and write it under `key`.
pub fn save<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let encoded = encode(key, value)?;
    storage.set(key, &encoded)
}
