//! Entity services: the use-case layer the presentation code talks to.
//!
//! # Responsibility
//! - Own one in-memory collection per entity family, with loaded/saving
//!   flags for UI feedback.
//! - Keep the in-memory state at last-known-good when a store call fails.
//!
//! # Invariants
//! - Services validate records before any repository call.
//! - Services depend only on repository traits, never on a store mode.

use crate::model::entry::EntryValidationError;
use crate::model::habit::HabitValidationError;
use crate::model::rule::RuleValidationError;
use crate::model::schedule::BlockValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod habit_service;
pub mod journal_service;
pub mod migration;
pub mod rule_service;
pub mod schedule_service;
pub mod session_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by entity services.
#[derive(Debug)]
pub enum ServiceError {
    Entry(EntryValidationError),
    Habit(HabitValidationError),
    Rule(RuleValidationError),
    Block(BlockValidationError),
    /// Operation requires an authenticated session.
    NotSignedIn,
    /// Referenced record is not in the loaded collection.
    NotFound(Uuid),
    /// Reordering input is not a permutation of the loaded collection.
    InvalidOrdering { expected: usize, given: usize },
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry(err) => write!(f, "{err}"),
            Self::Habit(err) => write!(f, "{err}"),
            Self::Rule(err) => write!(f, "{err}"),
            Self::Block(err) => write!(f, "{err}"),
            Self::NotSignedIn => write!(f, "operation requires a signed-in user"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidOrdering { expected, given } => write!(
                f,
                "ordering must cover all {expected} records, got {given}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Entry(err) => Some(err),
            Self::Habit(err) => Some(err),
            Self::Rule(err) => Some(err),
            Self::Block(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for ServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Entry(value)
    }
}

impl From<HabitValidationError> for ServiceError {
    fn from(value: HabitValidationError) -> Self {
        Self::Habit(value)
    }
}

impl From<RuleValidationError> for ServiceError {
    fn from(value: RuleValidationError) -> Self {
        Self::Rule(value)
    }
}

impl From<BlockValidationError> for ServiceError {
    fn from(value: BlockValidationError) -> Self {
        Self::Block(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
