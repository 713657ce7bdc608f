//! Habit and habit-log repository contracts and both store implementations.
//!
//! # Invariants
//! - Log upserts resolve by the `(habit_id, date)` natural key.
//! - Deleting a habit removes its logs in the same operation: the account
//!   store cascades through the foreign key, the guest store filters both
//!   collections before writing them back.

use crate::kv::{keys, KvStore};
use crate::model::habit::{Cadence, GoalKind, Habit, HabitId, HabitLog, TrackKind};
use crate::repo::{
    parse_date, parse_datetime, parse_uuid, read_guest_collection, write_guest_collection,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use std::sync::Arc;
use uuid::Uuid;

const HABIT_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    goal,
    track,
    cadence,
    target_value,
    created_at
FROM habits";

const LOG_SELECT_SQL: &str = "SELECT uuid, habit_id, date, value FROM habit_logs";

/// Repository interface for habits and their logs.
pub trait HabitRepository {
    /// Lists habit definitions in creation order.
    fn list_habits(&self) -> RepoResult<Vec<Habit>>;
    fn insert_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    /// Deletes one habit and every log referencing it.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
    fn list_logs(&self) -> RepoResult<Vec<HabitLog>>;
    /// Inserts or updates by `(habit_id, date)` and returns the stored row.
    fn upsert_log(&self, log: &HabitLog) -> RepoResult<HabitLog>;
}

/// Account-store implementation, scoped to one user.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
    user_id: Uuid,
}

impl<'conn> SqliteHabitRepository<'conn> {
    pub fn new(conn: &'conn Connection, user_id: Uuid) -> Self {
        Self { conn, user_id }
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![self.user_id.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn insert_habit(&self, habit: &Habit) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO habits (
                uuid,
                user_id,
                title,
                goal,
                track,
                cadence,
                target_value,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                habit.id.to_string(),
                self.user_id.to_string(),
                habit.title.as_str(),
                goal_to_db(habit.goal),
                track_to_db(habit.track),
                cadence_to_db(habit.cadence),
                habit.target_value,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits
             SET
                title = ?1,
                goal = ?2,
                track = ?3,
                cadence = ?4,
                target_value = ?5
             WHERE uuid = ?6 AND user_id = ?7;",
            params![
                habit.title.as_str(),
                goal_to_db(habit.goal),
                track_to_db(habit.track),
                cadence_to_db(habit.cadence),
                habit.target_value,
                habit.id.to_string(),
                self.user_id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(habit.id));
        }
        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        // habit_logs rows go with it via ON DELETE CASCADE.
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE uuid = ?1 AND user_id = ?2;",
            params![id.to_string(), self.user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_logs(&self) -> RepoResult<Vec<HabitLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY date ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![self.user_id.to_string()])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }
        Ok(logs)
    }

    fn upsert_log(&self, log: &HabitLog) -> RepoResult<HabitLog> {
        self.conn.execute(
            "INSERT INTO habit_logs (uuid, user_id, habit_id, date, value)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, date) DO UPDATE SET
                value = excluded.value;",
            params![
                log.id.to_string(),
                self.user_id.to_string(),
                log.habit_id.to_string(),
                log.date.to_string(),
                log.value,
            ],
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
             WHERE habit_id = ?1 AND date = ?2;"
        ))?;
        let mut rows = stmt.query(params![log.habit_id.to_string(), log.date.to_string()])?;
        match rows.next()? {
            Some(row) => parse_log_row(row),
            None => Err(RepoError::InvalidData(
                "upserted habit log row is missing".to_string(),
            )),
        }
    }
}

/// Guest-store implementation over the local key-value collaborator.
pub struct LocalHabitRepository {
    kv: Arc<dyn KvStore>,
}

impl LocalHabitRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

impl HabitRepository for LocalHabitRepository {
    fn list_habits(&self) -> RepoResult<Vec<Habit>> {
        Ok(read_guest_collection(self.kv.as_ref(), keys::HABITS))
    }

    fn insert_habit(&self, habit: &Habit) -> RepoResult<()> {
        let mut habits: Vec<Habit> = read_guest_collection(self.kv.as_ref(), keys::HABITS);
        habits.push(habit.clone());
        write_guest_collection(self.kv.as_ref(), keys::HABITS, &habits);
        Ok(())
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        let mut habits: Vec<Habit> = read_guest_collection(self.kv.as_ref(), keys::HABITS);
        match habits.iter_mut().find(|existing| existing.id == habit.id) {
            Some(existing) => *existing = habit.clone(),
            None => return Err(RepoError::NotFound(habit.id)),
        }
        write_guest_collection(self.kv.as_ref(), keys::HABITS, &habits);
        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let mut habits: Vec<Habit> = read_guest_collection(self.kv.as_ref(), keys::HABITS);
        let before = habits.len();
        habits.retain(|habit| habit.id != id);
        if habits.len() == before {
            return Err(RepoError::NotFound(id));
        }

        let mut logs: Vec<HabitLog> = read_guest_collection(self.kv.as_ref(), keys::HABIT_LOGS);
        logs.retain(|log| log.habit_id != id);

        write_guest_collection(self.kv.as_ref(), keys::HABITS, &habits);
        write_guest_collection(self.kv.as_ref(), keys::HABIT_LOGS, &logs);
        Ok(())
    }

    fn list_logs(&self) -> RepoResult<Vec<HabitLog>> {
        Ok(read_guest_collection(self.kv.as_ref(), keys::HABIT_LOGS))
    }

    fn upsert_log(&self, log: &HabitLog) -> RepoResult<HabitLog> {
        let mut logs: Vec<HabitLog> = read_guest_collection(self.kv.as_ref(), keys::HABIT_LOGS);

        let stored = match logs
            .iter_mut()
            .find(|existing| existing.habit_id == log.habit_id && existing.date == log.date)
        {
            Some(existing) => {
                existing.value = log.value;
                existing.clone()
            }
            None => {
                logs.push(log.clone());
                log.clone()
            }
        };

        write_guest_collection(self.kv.as_ref(), keys::HABIT_LOGS, &logs);
        Ok(stored)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let uuid_text: String = row.get("uuid")?;
    let goal_text: String = row.get("goal")?;
    let track_text: String = row.get("track")?;
    let cadence_text: String = row.get("cadence")?;
    let created_text: String = row.get("created_at")?;

    Ok(Habit {
        id: parse_uuid(&uuid_text, "habits.uuid")?,
        title: row.get("title")?,
        goal: parse_goal(&goal_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid goal `{goal_text}` in habits.goal"))
        })?,
        track: parse_track(&track_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid track `{track_text}` in habits.track"))
        })?,
        cadence: parse_cadence(&cadence_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid cadence `{cadence_text}` in habits.cadence"))
        })?,
        target_value: row.get("target_value")?,
        created_at: parse_datetime(&created_text, "habits.created_at")?,
    })
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<HabitLog> {
    let uuid_text: String = row.get("uuid")?;
    let habit_text: String = row.get("habit_id")?;
    let date_text: String = row.get("date")?;

    Ok(HabitLog {
        id: parse_uuid(&uuid_text, "habit_logs.uuid")?,
        habit_id: parse_uuid(&habit_text, "habit_logs.habit_id")?,
        date: parse_date(&date_text, "habit_logs.date")?,
        value: row.get("value")?,
    })
}

fn goal_to_db(goal: GoalKind) -> &'static str {
    match goal {
        GoalKind::Target => "target",
        GoalKind::Limit => "limit",
    }
}

fn parse_goal(value: &str) -> Option<GoalKind> {
    match value {
        "target" => Some(GoalKind::Target),
        "limit" => Some(GoalKind::Limit),
        _ => None,
    }
}

fn track_to_db(track: TrackKind) -> &'static str {
    match track {
        TrackKind::Count => "count",
        TrackKind::Minutes => "minutes",
    }
}

fn parse_track(value: &str) -> Option<TrackKind> {
    match value {
        "count" => Some(TrackKind::Count),
        "minutes" => Some(TrackKind::Minutes),
        _ => None,
    }
}

fn cadence_to_db(cadence: Cadence) -> &'static str {
    match cadence {
        Cadence::Daily => "daily",
        Cadence::Weekly => "weekly",
    }
}

fn parse_cadence(value: &str) -> Option<Cadence> {
    match value {
        "daily" => Some(Cadence::Daily),
        "weekly" => Some(Cadence::Weekly),
        _ => None,
    }
}
