//! Key-value store contract and implementations.
//!
//! # Responsibility
//! - Define the host persistence collaborator the habit service writes to.
//! - Keep storage transport details out of the service layer.
//!
//! # Invariants
//! - `get` returns only keys that are present; absence is not an error.
//! - `set` is a partial write: keys not in the snapshot are left untouched.

use crate::db::DbError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_kv;
pub mod sqlite_kv;

/// Key holding the ordered habit collection.
pub const HABITS_KEY: &str = "habits";
/// Key holding the dark-mode preference.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Values keyed by store key.
pub type KvSnapshot = BTreeMap<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by key-value store implementations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A value could not be serialized for writing.
    Encode(serde_json::Error),
    /// A stored value could not be parsed back.
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode store value: {err}"),
            Self::Decode { key, source } => {
                write!(f, "failed to decode stored value for `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Host-provided key-value persistence.
pub trait KvStore {
    /// Reads the requested keys. Missing keys are omitted from the result.
    fn get(&self, keys: &[&str]) -> StoreResult<KvSnapshot>;
    /// Writes every entry in `entries`, leaving other keys untouched.
    fn set(&self, entries: KvSnapshot) -> StoreResult<()>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, keys: &[&str]) -> StoreResult<KvSnapshot> {
        (**self).get(keys)
    }

    fn set(&self, entries: KvSnapshot) -> StoreResult<()> {
        (**self).set(entries)
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, keys: &[&str]) -> StoreResult<KvSnapshot> {
        (**self).get(keys)
    }

    fn set(&self, entries: KvSnapshot) -> StoreResult<()> {
        (**self).set(entries)
    }
}
