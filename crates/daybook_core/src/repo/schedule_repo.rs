//! Schedule repository contracts and both store implementations.
//!
//! # Invariants
//! - The block collection is always written as a whole; there is no
//!   per-block mutation at this layer.
//! - The account store keeps one schedule row per user, upserted on
//!   `user_id`; corrupt persisted rows are rejected, not masked.

use crate::kv::{keys, KvStore};
use crate::model::schedule::TimeBlock;
use crate::repo::{read_guest_collection, write_guest_collection, RepoError, RepoResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::Arc;
use uuid::Uuid;

/// Repository interface for the day schedule.
pub trait ScheduleRepository {
    fn load(&self) -> RepoResult<Vec<TimeBlock>>;
    /// Replaces the whole stored collection.
    fn replace(&self, blocks: &[TimeBlock]) -> RepoResult<()>;
}

/// Account-store implementation, scoped to one user.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
    user_id: Uuid,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: Uuid) -> Self {
        Self { conn, user_id }
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn load(&self) -> RepoResult<Vec<TimeBlock>> {
        let mut stmt = self
            .conn
            .prepare("SELECT blocks FROM schedules WHERE user_id = ?1;")?;
        let mut rows = stmt.query(params![self.user_id.to_string()])?;

        let Some(row) = rows.next()? else {
            return Ok(Vec::new());
        };
        let raw: String = row.get("blocks")?;
        serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("invalid block list in schedules.blocks: {err}"))
        })
    }

    fn replace(&self, blocks: &[TimeBlock]) -> RepoResult<()> {
        let raw = serde_json::to_string(blocks).map_err(|err| {
            RepoError::InvalidData(format!("block list failed to serialize: {err}"))
        })?;
        self.conn.execute(
            "INSERT INTO schedules (user_id, blocks, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                blocks = excluded.blocks,
                updated_at = excluded.updated_at;",
            params![
                self.user_id.to_string(),
                raw,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }
}

/// Guest-store implementation over the local key-value collaborator.
pub struct LocalScheduleRepository {
    kv: Arc<dyn KvStore>,
}

impl LocalScheduleRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

impl ScheduleRepository for LocalScheduleRepository {
    fn load(&self) -> RepoResult<Vec<TimeBlock>> {
        Ok(read_guest_collection(
            self.kv.as_ref(),
            keys::SCHEDULE_BLOCKS,
        ))
    }

    fn replace(&self, blocks: &[TimeBlock]) -> RepoResult<()> {
        write_guest_collection(self.kv.as_ref(), keys::SCHEDULE_BLOCKS, blocks);
        Ok(())
    }
}
