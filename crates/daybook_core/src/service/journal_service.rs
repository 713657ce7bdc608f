//! Journal entry use-case service.
//!
//! # Responsibility
//! - Own the loaded entry collection and its upsert-by-key semantics.
//! - Run the one-shot guest import when constructed for an account store.
//!
//! # Invariants
//! - At most one in-memory entry per `(kind, date)` key.
//! - The collection stays at last-known-good when a store call fails.

use crate::kv::{keys, KvStore};
use crate::model::entry::{EntryId, EntryKind, JournalEntry};
use crate::repo::entry_repo::EntryRepository;
use crate::service::{migration, ServiceResult};
use chrono::{Datelike, NaiveDate};
use log::error;
use std::sync::Arc;

/// Use-case service for journal entries.
pub struct JournalService<'a> {
    repo: Box<dyn EntryRepository + 'a>,
    guest_vault: Option<Arc<dyn KvStore>>,
    entries: Vec<JournalEntry>,
    loaded: bool,
    saving: bool,
}

impl<'a> JournalService<'a> {
    /// Creates a service over the repository selected for the session's
    /// store mode. `guest_vault` enables the one-shot import and should be
    /// set only for account-backed repositories.
    pub fn new(
        repo: Box<dyn EntryRepository + 'a>,
        guest_vault: Option<Arc<dyn KvStore>>,
    ) -> Self {
        Self {
            repo,
            guest_vault,
            entries: Vec::new(),
            loaded: false,
            saving: false,
        }
    }

    /// Populates the collection, importing guest records first when the
    /// account collection is empty and guest data exists.
    pub fn load(&mut self) -> ServiceResult<()> {
        let mut entries = self.repo.list()?;

        if let Some(kv) = self.guest_vault.as_deref() {
            let repo = self.repo.as_ref();
            let outcome = migration::import_guest_records(
                kv,
                keys::JOURNAL_ENTRIES,
                entries.is_empty(),
                |record: JournalEntry| repo.upsert(&record).map(|_| ()),
            )?;
            if outcome.imported > 0 {
                entries = repo.list()?;
            }
        }

        sort_newest_first(&mut entries);
        self.entries = entries;
        self.loaded = true;
        Ok(())
    }

    /// Inserts or updates the entry keyed by `(kind, date)`.
    pub fn save_entry(
        &mut self,
        kind: EntryKind,
        date: NaiveDate,
        content: &str,
    ) -> ServiceResult<JournalEntry> {
        let draft = JournalEntry::new(kind, date, content.trim());
        draft.validate()?;

        self.saving = true;
        let outcome = self.repo.upsert(&draft);
        self.saving = false;

        match outcome {
            Ok(stored) => {
                self.entries
                    .retain(|entry| !(entry.kind == kind && entry.date == stored.date));
                self.entries.push(stored.clone());
                sort_newest_first(&mut self.entries);
                Ok(stored)
            }
            Err(err) => {
                error!("event=entry_save module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn delete_entry(&mut self, id: EntryId) -> ServiceResult<()> {
        self.saving = true;
        let outcome = self.repo.delete(id);
        self.saving = false;

        match outcome {
            Ok(()) => {
                self.entries.retain(|entry| entry.id != id);
                Ok(())
            }
            Err(err) => {
                error!("event=entry_delete module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The entry whose key covers `date` for the given kind, if any.
    pub fn entry_for(&self, kind: EntryKind, date: NaiveDate) -> Option<&JournalEntry> {
        let key = kind.key_for(date);
        self.entries
            .iter()
            .find(|entry| entry.kind == kind && entry.date == key)
    }

    pub fn today_entry(&self, today: NaiveDate) -> Option<&JournalEntry> {
        self.entry_for(EntryKind::Daily, today)
    }

    pub fn weekly_entry(&self, today: NaiveDate) -> Option<&JournalEntry> {
        self.entry_for(EntryKind::Weekly, today)
    }

    pub fn monthly_entry(&self, today: NaiveDate) -> Option<&JournalEntry> {
        self.entry_for(EntryKind::Monthly, today)
    }

    /// Past daily entries, newest first, excluding today's.
    pub fn recent_entries(&self, today: NaiveDate, limit: usize) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Daily && entry.date != today)
            .take(limit)
            .collect()
    }

    /// Daily entries of one calendar month, oldest first.
    pub fn entries_in_month(&self, year: i32, month: u32) -> Vec<&JournalEntry> {
        let mut selected: Vec<&JournalEntry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.kind == EntryKind::Daily
                    && entry.date.year() == year
                    && entry.date.month() == month
            })
            .collect();
        selected.sort_by_key(|entry| entry.date);
        selected
    }
}

fn sort_newest_first(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}
