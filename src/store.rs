use std::error::Error;
use std::fmt;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db;

pub const LINKS_KEY: &str = "links";
pub const CATEGORIES_KEY: &str = "categories";

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = db::open_connection(path)?;
        let schema_version = db::get_meta(&conn, "schema_version")?
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(db::CURRENT_SCHEMA_VERSION);
        if schema_version > db::CURRENT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: schema_version,
                supported: db::CURRENT_SCHEMA_VERSION,
            });
        }
        tracing::debug!(path, schema_version, "opened link store");
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(db::get_value(&self.conn, key)?)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        db::set_value(&self.conn, key, value)?;
        Ok(())
    }
}

/// Decodes the value under `key`, or returns `default()` when the key is
/// missing or its value does not decode.
pub fn read_json_or<S, T, F>(store: &S, key: &str, default: F) -> Result<T, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let Some(raw) = store.read(key)? else {
        return Ok(default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored value is malformed; using defaults");
            Ok(default())
        }
    }
}

pub fn write_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value)?;
    store.write(key, &encoded)?;
    tracing::debug!(key, bytes = encoded.len(), "persisted value");
    Ok(())
}

#[derive(Debug)]
pub enum StoreError {
    Db(rusqlite::Error),
    Encode(serde_json::Error),
    UnsupportedSchema { found: i64, supported: i64 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Db(err) => write!(f, "database error: {}", err),
            StoreError::Encode(err) => write!(f, "encode error: {}", err),
            StoreError::UnsupportedSchema { found, supported } => write!(
                f,
                "link store schema version {} is newer than supported version {}",
                found, supported
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Db(err) => Some(err),
            StoreError::Encode(err) => Some(err),
            StoreError::UnsupportedSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Db(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        StoreError::Encode(value)
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
