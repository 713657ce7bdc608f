//! Schedule use-case service: the persistence sink for planner commits.
//!
//! # Invariants
//! - Every mutation replaces the whole stored block collection; there is no
//!   per-block store traffic.
//! - Blocks are validated before any replacement reaches the store.

use crate::kv::{keys, KvStore};
use crate::model::schedule::TimeBlock;
use crate::repo::schedule_repo::ScheduleRepository;
use crate::service::{migration, ServiceResult};
use log::{error, info};
use std::sync::Arc;

/// Use-case service for the day schedule.
pub struct ScheduleService<'a> {
    repo: Box<dyn ScheduleRepository + 'a>,
    guest_vault: Option<Arc<dyn KvStore>>,
    blocks: Vec<TimeBlock>,
    loaded: bool,
    saving: bool,
}

impl<'a> ScheduleService<'a> {
    pub fn new(
        repo: Box<dyn ScheduleRepository + 'a>,
        guest_vault: Option<Arc<dyn KvStore>>,
    ) -> Self {
        Self {
            repo,
            guest_vault,
            blocks: Vec::new(),
            loaded: false,
            saving: false,
        }
    }

    /// Loads the stored blocks; when the account schedule is empty and the
    /// guest store holds one, the guest blocks are written through as one
    /// replacement (the schedule is a single-document collection).
    pub fn load(&mut self) -> ServiceResult<()> {
        let mut blocks = self.repo.load()?;

        if let Some(kv) = self.guest_vault.as_deref() {
            let pending: Vec<TimeBlock> = migration::pending_guest_records(
                kv,
                keys::SCHEDULE_BLOCKS,
                blocks.is_empty(),
            );
            if !pending.is_empty() {
                self.repo.replace(&pending)?;
                info!(
                    "event=guest_import module=migration status=ok key={} imported={}",
                    keys::SCHEDULE_BLOCKS,
                    pending.len()
                );
                blocks = self.repo.load()?;
            }
        }

        self.blocks = blocks;
        self.loaded = true;
        Ok(())
    }

    /// Commits a full replacement of the block collection.
    pub fn replace_all(&mut self, blocks: Vec<TimeBlock>) -> ServiceResult<()> {
        for block in &blocks {
            block.validate()?;
        }

        self.saving = true;
        let outcome = self.repo.replace(&blocks);
        self.saving = false;

        match outcome {
            Ok(()) => {
                self.blocks = blocks;
                Ok(())
            }
            Err(err) => {
                error!("event=schedule_save module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn clear_all(&mut self) -> ServiceResult<()> {
        self.replace_all(Vec::new())
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }
}
