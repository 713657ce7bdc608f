//! User profile record and lifetime-derived counters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed average-lifespan horizon used by the days-remaining estimate.
pub const AVERAGE_LIFESPAN_DAYS: i64 = 30_000;

/// Account profile, read-mostly from the journaling side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub dob: Option<NaiveDate>,
}

impl Profile {
    /// An empty profile shell for a user that has not filled anything in.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            name: None,
            avatar_url: None,
            dob: None,
        }
    }

    /// Days lived so far, counting the birth day as day 1.
    ///
    /// `None` when no birth date is set or it lies in the future.
    pub fn day_of_life(&self, today: NaiveDate) -> Option<i64> {
        let dob = self.dob?;
        let elapsed = (today - dob).num_days();
        if elapsed < 0 {
            return None;
        }
        Some(elapsed + 1)
    }

    /// Estimated days left against [`AVERAGE_LIFESPAN_DAYS`], floored at 0.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.day_of_life(today)
            .map(|day| (AVERAGE_LIFESPAN_DAYS - day).max(0))
    }
}
