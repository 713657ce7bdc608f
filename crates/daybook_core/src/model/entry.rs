//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the daily/weekly/monthly entry record and its natural key.
//!
//! # Invariants
//! - At most one entry exists per `(kind, date)` pair.
//! - `date` always holds the normalized key for `kind`: the day itself, the
//!   Sunday on/before it, or the first of its month.

use crate::dates;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a journal entry.
pub type EntryId = Uuid;

/// Cadence of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// One entry per calendar day.
    Daily,
    /// One entry per Sunday-start week.
    Weekly,
    /// One entry per calendar month.
    Monthly,
}

impl EntryKind {
    /// Normalizes a calendar date to this kind's natural key date.
    pub fn key_for(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => dates::daily_key(date),
            Self::Weekly => dates::weekly_key(date),
            Self::Monthly => dates::monthly_key(date),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Validation failures for journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Content is empty after trimming.
    BlankContent,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "entry content must not be blank"),
        }
    }
}

impl Error for EntryValidationError {}

/// One journal entry, keyed by `(kind, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    /// Normalized key date for `kind`.
    pub date: NaiveDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Creates an entry with a generated id, normalizing `date` for `kind`.
    pub fn new(kind: EntryKind, date: NaiveDate, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            date: kind.key_for(date),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.content.trim().is_empty() {
            return Err(EntryValidationError::BlankContent);
        }
        Ok(())
    }
}
