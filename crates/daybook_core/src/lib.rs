//! Core domain logic for Daybook.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod dates;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod planner;
pub mod repo;
pub mod service;

pub use config::{Config, ConfigError, Theme};
pub use kv::{FileKvStore, KvError, KvResult, KvStore, MemoryKvStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{EntryId, EntryKind, EntryValidationError, JournalEntry};
pub use model::habit::{
    Cadence, GoalKind, Habit, HabitId, HabitLog, HabitProgress, HabitValidationError, TrackKind,
};
pub use model::profile::{Profile, AVERAGE_LIFESPAN_DAYS};
pub use model::rule::{LifeRule, RuleId, RuleValidationError};
pub use model::schedule::{
    palette_color, BlockId, BlockValidationError, TimeBlock, BLOCK_PALETTE, SLOT_COUNT,
};
pub use planner::{DayPlanner, ResizeEdge, HOUR_HEIGHT_PX, SLOT_HEIGHT_PX};
pub use repo::{RepoError, RepoResult};
pub use service::habit_service::HabitService;
pub use service::journal_service::JournalService;
pub use service::rule_service::RuleService;
pub use service::schedule_service::ScheduleService;
pub use service::session_service::{SessionService, StoreMode};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
