//! Domain records for journaling, habits, maxims, scheduling, and profile.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules next to the records they protect.
//!
//! # Invariants
//! - Every record is identified by a stable client-generated `Uuid`.
//! - Validation runs before any repository write, in both store modes.

pub mod entry;
pub mod habit;
pub mod profile;
pub mod rule;
pub mod schedule;
