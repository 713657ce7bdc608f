//! Life rule (personal maxim) domain model.
//!
//! # Invariants
//! - `position` values form a dense 0-based order among one owner's rules.
//! - Reordering rewrites every position; deletion renumbers the remainder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a life rule.
pub type RuleId = Uuid;

/// Validation failures for life rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleValidationError {
    /// Content is empty after trimming.
    BlankContent,
}

impl Display for RuleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "rule content must not be blank"),
        }
    }
}

impl Error for RuleValidationError {}

/// One personal maxim with its place in the owner's ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeRule {
    pub id: RuleId,
    pub content: String,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LifeRule {
    pub fn new(content: impl Into<String>, position: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.content.trim().is_empty() {
            return Err(RuleValidationError::BlankContent);
        }
        Ok(())
    }
}
