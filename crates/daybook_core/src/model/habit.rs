//! Habit and habit-log domain model.
//!
//! # Responsibility
//! - Define the habit definition record and its per-day log record.
//! - Evaluate progress (`current` vs `target_value`) for both goal kinds.
//!
//! # Invariants
//! - At most one log exists per `(habit_id, date)` pair.
//! - Deleting a habit removes every log that references it.
//! - `target_value` is at least 1; log values are never negative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

/// Stable identifier for a habit log row.
pub type HabitLogId = Uuid;

/// Whether the habit value should be pushed up to or kept under the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Complete when current >= target_value.
    Target,
    /// Complete when current <= target_value; over when it exceeds it.
    Limit,
}

/// Unit of the tracked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Plain repetitions.
    Count,
    /// Minutes spent.
    Minutes,
}

/// How often the habit resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Progress reads today's log alone.
    Daily,
    /// Progress sums logs over the Monday-start week containing the date.
    Weekly,
}

/// Validation failures for habit definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HabitValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Target value of zero can never be meaningful for either goal kind.
    ZeroTarget,
}

impl Display for HabitValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "habit title must not be blank"),
            Self::ZeroTarget => write!(f, "habit target value must be at least 1"),
        }
    }
}

impl Error for HabitValidationError {}

/// A tracked habit definition, independent of its logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub title: String,
    pub goal: GoalKind,
    pub track: TrackKind,
    pub cadence: Cadence,
    pub target_value: u32,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Creates a habit with a generated stable id.
    pub fn new(
        title: impl Into<String>,
        goal: GoalKind,
        track: TrackKind,
        cadence: Cadence,
        target_value: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            goal,
            track,
            cadence,
            target_value,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), HabitValidationError> {
        if self.title.trim().is_empty() {
            return Err(HabitValidationError::BlankTitle);
        }
        if self.target_value == 0 {
            return Err(HabitValidationError::ZeroTarget);
        }
        Ok(())
    }
}

/// One recorded value for a habit on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: HabitLogId,
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub value: u32,
}

impl HabitLog {
    pub fn new(habit_id: HabitId, date: NaiveDate, value: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            date,
            value,
        }
    }
}

/// Progress of one habit against its target for a given date.
///
/// `current` is the raw tracked value; `percent` is capped at 100 for
/// display while `current` itself is never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HabitProgress {
    pub current: u32,
    pub percent: f64,
    pub is_complete: bool,
    pub is_over_limit: bool,
}

impl HabitProgress {
    /// Evaluates progress from a cadence-resolved current value.
    pub fn evaluate(habit: &Habit, current: u32) -> Self {
        let target = f64::from(habit.target_value.max(1));
        let percent = (f64::from(current) / target * 100.0).min(100.0);
        let (is_complete, is_over_limit) = match habit.goal {
            GoalKind::Target => (current >= habit.target_value, false),
            GoalKind::Limit => (
                current <= habit.target_value,
                current > habit.target_value,
            ),
        };
        Self {
            current,
            percent,
            is_complete,
            is_over_limit,
        }
    }
}
