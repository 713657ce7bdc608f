//! Repository layer: one trait per entity family, two implementations each.
//!
//! # Responsibility
//! - Define storage-agnostic collection contracts the services depend on.
//! - Keep SQL and guest-JSON details inside this persistence boundary.
//!
//! # Invariants
//! - `Sqlite*` implementations scope every statement by `user_id` and reject
//!   invalid persisted state instead of masking it.
//! - `Local*` implementations treat an absent or corrupt guest payload as an
//!   empty collection and log-and-drop write failures, per the degradation
//!   policy for guest storage.

use crate::db::DbError;
use crate::kv::{KvError, KvStore};
use chrono::{DateTime, NaiveDate, Utc};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod entry_repo;
pub mod habit_repo;
pub mod profile_repo;
pub mod rule_repo;
pub mod schedule_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error shared by all entity families.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Kv(KvError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(text: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{text}` in {column}")))
}

pub(crate) fn parse_date(text: &str, column: &str) -> RepoResult<NaiveDate> {
    text.parse::<NaiveDate>()
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {column}")))
}

pub(crate) fn parse_datetime(text: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{text}` in {column}")))
}

/// Reads one guest collection, degrading to empty on absence or corruption.
pub(crate) fn read_guest_collection<T: DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Vec<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!("event=guest_read module=repo status=error key={key} error={err}");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!("event=guest_read module=repo status=corrupt key={key} error={err}");
            Vec::new()
        }
    }
}

/// Overwrites one guest collection; failures are logged and dropped.
pub(crate) fn write_guest_collection<T: Serialize>(kv: &dyn KvStore, key: &str, records: &[T]) {
    let raw = match serde_json::to_string(records) {
        Ok(raw) => raw,
        Err(err) => {
            error!("event=guest_write module=repo status=error key={key} error={err}");
            return;
        }
    };
    if let Err(err) = kv.set(key, &raw) {
        error!("event=guest_write module=repo status=dropped key={key} error={err}");
    }
}
