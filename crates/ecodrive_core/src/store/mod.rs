//! Local key-value persistence for app data.
//!
//! # Responsibility
//! - Define the raw key-value and secure-store contracts.
//! - Provide JSON-typed `get/set/remove` helpers over those contracts.
//! - Own the well-known storage keys, bootstrap and clear-all.
//!
//! # Invariants
//! - `get_item` never fails: read and decode errors are logged and mapped
//!   to `None`. Mutation paths use `try_get_item`, which reports them.
//! - `set_item`/`remove_item` log and then propagate store errors.
//! - The secure store holds only the auth token and has no bulk clear.

use crate::db::DbError;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::{SqliteKeyValueStore, SqliteSecureStore};

/// Key holding the cached current user (object or `null`).
pub const CURRENT_USER_KEY: &str = "ecodrive_current_user";
/// Secure-store key holding the opaque auth token.
pub const AUTH_TOKEN_KEY: &str = "ecodrive_auth_token";

/// Storage key of one serialized entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Users,
    Appointments,
    MaintenanceRecords,
    Notifications,
    Diagnostics,
}

impl CollectionKey {
    /// Every collection initialized by [`initialize_storage`].
    pub const ALL: [Self; 5] = [
        Self::Users,
        Self::Appointments,
        Self::MaintenanceRecords,
        Self::Notifications,
        Self::Diagnostics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "ecodrive_users",
            Self::Appointments => "ecodrive_appointments",
            Self::MaintenanceRecords => "ecodrive_maintenance_records",
            Self::Notifications => "ecodrive_notifications",
            Self::Diagnostics => "ecodrive_diagnostics",
        }
    }
}

impl Display for CollectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by store writes and raw store access.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode {
        key: String,
        source: serde_json::Error,
    },
    /// A stored value exists but does not decode to the requested type.
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage failure: {err}"),
            Self::Encode { key, source } => {
                write!(f, "failed to encode value for `{key}`: {source}")
            }
            Self::Decode { key, source } => {
                write!(f, "failed to decode value for `{key}`: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
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

/// Raw string key-value medium.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
    fn delete(&self, key: &str) -> StoreResult<()>;
    /// Removes every key.
    fn clear(&self) -> StoreResult<()>;
}

/// Secured single-value medium for sensitive strings.
pub trait SecureStore {
    fn read_secret(&self, key: &str) -> StoreResult<Option<String>>;
    fn write_secret(&self, key: &str, value: &str) -> StoreResult<()>;
    fn delete_secret(&self, key: &str) -> StoreResult<()>;
}

/// Reads and decodes one JSON value.
///
/// Returns `None` when the key is absent, holds JSON `null`, or cannot be
/// read/decoded. Failures are logged, never returned.
pub fn get_item<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match try_get_item(store, key) {
        Ok(value) => value,
        Err(err) => {
            error!("event=store_get module=store status=error key={key} error={err}");
            None
        }
    }
}

/// Strict variant of [`get_item`].
///
/// Absent keys and JSON `null` are `Ok(None)`; read and decode failures are
/// returned so callers never overwrite a value they could not understand.
pub fn try_get_item<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str::<Option<T>>(&raw).map_err(|source| StoreError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Encodes `value` as JSON and writes it under `key`.
pub fn set_item<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| {
        error!("event=store_set module=store status=error key={key} error_code=encode_failed error={source}");
        StoreError::Encode {
            key: key.to_string(),
            source,
        }
    })?;

    store.write(key, &encoded).map_err(|err| {
        error!("event=store_set module=store status=error key={key} error={err}");
        err
    })
}

pub fn remove_item<S>(store: &S, key: &str) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
{
    store.delete(key).map_err(|err| {
        error!("event=store_remove module=store status=error key={key} error={err}");
        err
    })
}

/// Reads a secret, mapping failures to `None` like [`get_item`].
pub fn get_secure_item<K>(store: &K, key: &str) -> Option<String>
where
    K: SecureStore + ?Sized,
{
    match store.read_secret(key) {
        Ok(value) => value,
        Err(err) => {
            error!("event=secure_get module=store status=error key={key} error={err}");
            None
        }
    }
}

pub fn set_secure_item<K>(store: &K, key: &str, value: &str) -> StoreResult<()>
where
    K: SecureStore + ?Sized,
{
    store.write_secret(key, value).map_err(|err| {
        error!("event=secure_set module=store status=error key={key} error={err}");
        err
    })
}

pub fn remove_secure_item<K>(store: &K, key: &str) -> StoreResult<()>
where
    K: SecureStore + ?Sized,
{
    store.delete_secret(key).map_err(|err| {
        error!("event=secure_remove module=store status=error key={key} error={err}");
        err
    })
}

/// Ensures every collection key holds a list, writing `[]` where absent.
///
/// Existing collections are left untouched, including ones that no longer
/// decode as a list; those are logged and kept for inspection.
pub fn initialize_storage<S>(store: &S) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
{
    let mut created = 0_usize;
    for key in CollectionKey::ALL {
        match try_get_item::<Vec<serde_json::Value>, _>(store, key.as_str()) {
            Ok(Some(_)) => {}
            Ok(None) => {
                set_item(store, key.as_str(), &Vec::<serde_json::Value>::new())?;
                created += 1;
            }
            Err(err @ StoreError::Decode { .. }) => {
                warn!("event=store_init module=store status=skipped key={key} error={err}");
            }
            Err(err) => return Err(err),
        }
    }

    info!("event=store_init module=store status=ok created_collections={created}");
    Ok(())
}

/// Wipes every key-value entry, then the auth token.
///
/// The secure store has no bulk clear, so the token is removed by key.
pub fn clear_all_data<S, K>(store: &S, secure: &K) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    K: SecureStore + ?Sized,
{
    store.clear().map_err(|err| {
        error!("event=store_clear module=store status=error error={err}");
        err
    })?;
    remove_secure_item(secure, AUTH_TOKEN_KEY)?;

    info!("event=store_clear module=store status=ok");
    Ok(())
}
