//! Journal entry repository contracts and both store implementations.
//!
//! # Invariants
//! - Upserts resolve by the `(user, kind, date)` natural key; an existing
//!   row keeps its original id and creation time.
//! - Listing returns creation order in both modes.

use crate::kv::{keys, KvStore};
use crate::model::entry::{EntryId, EntryKind, JournalEntry};
use crate::repo::{
    parse_date, parse_datetime, parse_uuid, read_guest_collection, write_guest_collection,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    date,
    content,
    created_at,
    updated_at
FROM journal_entries";

/// Repository interface for journal entries.
pub trait EntryRepository {
    /// Lists all entries in creation order.
    fn list(&self) -> RepoResult<Vec<JournalEntry>>;
    /// Inserts or updates by `(kind, date)` and returns the stored record.
    fn upsert(&self, entry: &JournalEntry) -> RepoResult<JournalEntry>;
    fn delete(&self, id: EntryId) -> RepoResult<()>;
}

/// Account-store implementation, scoped to one user.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    user_id: Uuid,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: Uuid) -> Self {
        Self { conn, user_id }
    }

    fn find_by_key(&self, kind: EntryKind, date: chrono::NaiveDate) -> RepoResult<JournalEntry> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1 AND kind = ?2 AND date = ?3;"
        ))?;
        let mut rows = stmt.query(params![
            self.user_id.to_string(),
            kind.as_str(),
            date.to_string()
        ])?;
        match rows.next()? {
            Some(row) => parse_entry_row(row),
            None => Err(RepoError::InvalidData(
                "upserted journal entry row is missing".to_string(),
            )),
        }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn list(&self) -> RepoResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![self.user_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn upsert(&self, entry: &JournalEntry) -> RepoResult<JournalEntry> {
        self.conn.execute(
            "INSERT INTO journal_entries (
                uuid,
                user_id,
                kind,
                date,
                content,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id, kind, date) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at;",
            params![
                entry.id.to_string(),
                self.user_id.to_string(),
                entry.kind.as_str(),
                entry.date.to_string(),
                entry.content.as_str(),
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339(),
            ],
        )?;

        self.find_by_key(entry.kind, entry.date)
    }

    fn delete(&self, id: EntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM journal_entries WHERE uuid = ?1 AND user_id = ?2;",
            params![id.to_string(), self.user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Guest-store implementation over the local key-value collaborator.
pub struct LocalEntryRepository {
    kv: Arc<dyn KvStore>,
}

impl LocalEntryRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

impl EntryRepository for LocalEntryRepository {
    fn list(&self) -> RepoResult<Vec<JournalEntry>> {
        Ok(read_guest_collection(
            self.kv.as_ref(),
            keys::JOURNAL_ENTRIES,
        ))
    }

    fn upsert(&self, entry: &JournalEntry) -> RepoResult<JournalEntry> {
        let mut records: Vec<JournalEntry> =
            read_guest_collection(self.kv.as_ref(), keys::JOURNAL_ENTRIES);

        let stored = match records
            .iter_mut()
            .find(|existing| existing.kind == entry.kind && existing.date == entry.date)
        {
            Some(existing) => {
                existing.content = entry.content.clone();
                existing.updated_at = entry.updated_at;
                existing.clone()
            }
            None => {
                records.push(entry.clone());
                entry.clone()
            }
        };

        write_guest_collection(self.kv.as_ref(), keys::JOURNAL_ENTRIES, &records);
        Ok(stored)
    }

    fn delete(&self, id: EntryId) -> RepoResult<()> {
        let mut records: Vec<JournalEntry> =
            read_guest_collection(self.kv.as_ref(), keys::JOURNAL_ENTRIES);
        let before = records.len();
        records.retain(|entry| entry.id != id);
        if records.len() == before {
            return Err(RepoError::NotFound(id));
        }
        write_guest_collection(self.kv.as_ref(), keys::JOURNAL_ENTRIES, &records);
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<JournalEntry> {
    let uuid_text: String = row.get("uuid")?;
    let kind_text: String = row.get("kind")?;
    let kind = EntryKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entry kind `{kind_text}` in journal_entries.kind"))
    })?;
    let date_text: String = row.get("date")?;
    let created_text: String = row.get("created_at")?;
    let updated_text: String = row.get("updated_at")?;

    Ok(JournalEntry {
        id: parse_uuid(&uuid_text, "journal_entries.uuid")?,
        kind,
        date: parse_date(&date_text, "journal_entries.date")?,
        content: row.get("content")?,
        created_at: parse_datetime(&created_text, "journal_entries.created_at")?,
        updated_at: parse_datetime(&updated_text, "journal_entries.updated_at")?,
    })
}
