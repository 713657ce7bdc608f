//! Habit use-case service.
//!
//! # Responsibility
//! - Own the loaded habit and log collections, the per-day log upsert, and
//!   the cadence-aware progress reads.
//! - Cascade log removal with habit deletion in both store modes.
//!
//! # Invariants
//! - At most one in-memory log per `(habit_id, date)` key.
//! - Habits import before logs so imported logs always have a referent.

use crate::dates;
use crate::kv::{keys, KvStore};
use crate::model::habit::{
    Cadence, GoalKind, Habit, HabitId, HabitLog, HabitProgress, TrackKind,
};
use crate::repo::habit_repo::HabitRepository;
use crate::service::{migration, ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::error;
use std::sync::Arc;

/// Use-case service for habits and their logs.
pub struct HabitService<'a> {
    repo: Box<dyn HabitRepository + 'a>,
    guest_vault: Option<Arc<dyn KvStore>>,
    habits: Vec<Habit>,
    logs: Vec<HabitLog>,
    loaded: bool,
    saving: bool,
}

impl<'a> HabitService<'a> {
    pub fn new(
        repo: Box<dyn HabitRepository + 'a>,
        guest_vault: Option<Arc<dyn KvStore>>,
    ) -> Self {
        Self {
            repo,
            guest_vault,
            habits: Vec::new(),
            logs: Vec::new(),
            loaded: false,
            saving: false,
        }
    }

    /// Populates both collections, importing guest habits before guest logs
    /// so the account store's referential constraint holds.
    pub fn load(&mut self) -> ServiceResult<()> {
        let mut habits = self.repo.list_habits()?;
        let mut logs = self.repo.list_logs()?;

        if let Some(kv) = self.guest_vault.as_deref() {
            let repo = self.repo.as_ref();

            let imported_habits = migration::import_guest_records(
                kv,
                keys::HABITS,
                habits.is_empty(),
                |record: Habit| repo.insert_habit(&record),
            )?;
            if imported_habits.imported > 0 {
                habits = repo.list_habits()?;
            }

            let imported_logs = migration::import_guest_records(
                kv,
                keys::HABIT_LOGS,
                logs.is_empty(),
                |record: HabitLog| repo.upsert_log(&record).map(|_| ()),
            )?;
            if imported_logs.imported > 0 {
                logs = repo.list_logs()?;
            }
        }

        self.habits = habits;
        self.logs = logs;
        self.loaded = true;
        Ok(())
    }

    pub fn add_habit(
        &mut self,
        title: &str,
        goal: GoalKind,
        track: TrackKind,
        cadence: Cadence,
        target_value: u32,
    ) -> ServiceResult<HabitId> {
        let habit = Habit::new(title.trim(), goal, track, cadence, target_value);
        habit.validate()?;

        self.saving = true;
        let outcome = self.repo.insert_habit(&habit);
        self.saving = false;

        match outcome {
            Ok(()) => {
                let id = habit.id;
                self.habits.push(habit);
                Ok(id)
            }
            Err(err) => {
                error!("event=habit_add module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Replaces one habit definition wholesale.
    pub fn update_habit(&mut self, habit: Habit) -> ServiceResult<()> {
        habit.validate()?;

        self.saving = true;
        let outcome = self.repo.update_habit(&habit);
        self.saving = false;

        match outcome {
            Ok(()) => {
                if let Some(existing) = self.habits.iter_mut().find(|h| h.id == habit.id) {
                    *existing = habit;
                }
                Ok(())
            }
            Err(err) => {
                error!("event=habit_update module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Deletes the habit and every log referencing it.
    pub fn delete_habit(&mut self, id: HabitId) -> ServiceResult<()> {
        self.saving = true;
        let outcome = self.repo.delete_habit(id);
        self.saving = false;

        match outcome {
            Ok(()) => {
                self.habits.retain(|habit| habit.id != id);
                self.logs.retain(|log| log.habit_id != id);
                Ok(())
            }
            Err(err) => {
                error!("event=habit_delete module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Records `value` for the habit on `date`, replacing any existing log
    /// for that day.
    pub fn log_value(
        &mut self,
        habit_id: HabitId,
        date: NaiveDate,
        value: u32,
    ) -> ServiceResult<()> {
        if !self.habits.iter().any(|habit| habit.id == habit_id) {
            return Err(ServiceError::NotFound(habit_id));
        }

        let log = HabitLog::new(habit_id, date, value);
        self.saving = true;
        let outcome = self.repo.upsert_log(&log);
        self.saving = false;

        match outcome {
            Ok(stored) => {
                match self
                    .logs
                    .iter_mut()
                    .find(|existing| existing.habit_id == habit_id && existing.date == date)
                {
                    Some(existing) => *existing = stored,
                    None => self.logs.push(stored),
                }
                Ok(())
            }
            Err(err) => {
                error!("event=habit_log module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Steps today's log up by one, seeded from the cadence-aware current
    /// value (so a weekly habit's step builds on the whole week's sum).
    pub fn increment(&mut self, habit_id: HabitId, today: NaiveDate) -> ServiceResult<()> {
        let habit = self
            .habit(habit_id)
            .ok_or(ServiceError::NotFound(habit_id))?
            .clone();
        let current = self.current_value(&habit, today);
        self.log_value(habit_id, today, current + 1)
    }

    /// Steps today's log down by one, flooring at zero.
    pub fn decrement(&mut self, habit_id: HabitId, today: NaiveDate) -> ServiceResult<()> {
        let habit = self
            .habit(habit_id)
            .ok_or(ServiceError::NotFound(habit_id))?
            .clone();
        let current = self.current_value(&habit, today);
        if current == 0 {
            return Ok(());
        }
        self.log_value(habit_id, today, current - 1)
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Cadence-resolved value for `on`: the day's log for daily habits, the
    /// Monday-start week sum for weekly ones.
    pub fn current_value(&self, habit: &Habit, on: NaiveDate) -> u32 {
        match habit.cadence {
            Cadence::Daily => self
                .logs
                .iter()
                .find(|log| log.habit_id == habit.id && log.date == on)
                .map_or(0, |log| log.value),
            Cadence::Weekly => {
                let (start, end) = dates::monday_week_bounds(on);
                self.logs
                    .iter()
                    .filter(|log| {
                        log.habit_id == habit.id && log.date >= start && log.date <= end
                    })
                    .map(|log| log.value)
                    .sum()
            }
        }
    }

    pub fn progress(&self, habit_id: HabitId, on: NaiveDate) -> Option<HabitProgress> {
        let habit = self.habit(habit_id)?;
        Some(HabitProgress::evaluate(habit, self.current_value(habit, on)))
    }

    /// Log history for one habit, newest first.
    pub fn logs_for(&self, habit_id: HabitId) -> Vec<&HabitLog> {
        let mut history: Vec<&HabitLog> = self
            .logs
            .iter()
            .filter(|log| log.habit_id == habit_id)
            .collect();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }
}
