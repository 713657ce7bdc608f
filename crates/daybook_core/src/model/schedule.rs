//! Time block domain model for the day planner.
//!
//! # Responsibility
//! - Define the quarter-hour-aligned block record and its color palette.
//! - Convert between fractional-hour bounds and integer slot coordinates.
//!
//! # Invariants
//! - `start_hour < end_hour`; both are multiples of 0.25 within [0, 24].
//! - Blocks may overlap freely; creation order is the only paint order.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a time block.
pub type BlockId = Uuid;

/// Fifteen-minute slots per hour.
pub const SLOTS_PER_HOUR: u32 = 4;

/// Fifteen-minute slots on the 24-hour timeline.
pub const SLOT_COUNT: u32 = 96;

/// Rotating block palette, indexed by block count at creation time.
pub const BLOCK_PALETTE: [&str; 6] = [
    "hsl(220, 70%, 55%)",
    "hsl(160, 60%, 45%)",
    "hsl(340, 65%, 55%)",
    "hsl(45, 80%, 50%)",
    "hsl(280, 60%, 55%)",
    "hsl(200, 70%, 50%)",
];

/// Returns the palette token for the next block given the current count.
pub fn palette_color(block_count: usize) -> &'static str {
    BLOCK_PALETTE[block_count % BLOCK_PALETTE.len()]
}

/// Validation failures for time blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockValidationError {
    /// Bounds are outside [0, 24] or not strictly increasing.
    InvalidBounds { start: f64, end: f64 },
    /// A bound does not sit on the quarter-hour grid.
    OffGrid(f64),
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBounds { start, end } => {
                write!(f, "block bounds are invalid: start={start} end={end}")
            }
            Self::OffGrid(value) => {
                write!(f, "block bound {value} is not a multiple of 0.25")
            }
        }
    }
}

impl Error for BlockValidationError {}

/// One block on the 24-hour timeline.
///
/// Hour bounds serialize as `startHour`/`endHour` to stay byte-compatible
/// with payloads written by earlier guest stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub id: BlockId,
    #[serde(rename = "startHour")]
    pub start_hour: f64,
    #[serde(rename = "endHour")]
    pub end_hour: f64,
    pub title: String,
    pub color: String,
}

impl TimeBlock {
    /// Creates a block spanning `[start_slot, end_slot)` in slot coordinates.
    pub fn from_slots(start_slot: u32, end_slot: u32, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_hour: f64::from(start_slot) / f64::from(SLOTS_PER_HOUR),
            end_hour: f64::from(end_slot) / f64::from(SLOTS_PER_HOUR),
            title: String::new(),
            color: color.into(),
        }
    }

    /// Start bound in slot coordinates.
    pub fn start_slot(&self) -> u32 {
        (self.start_hour * f64::from(SLOTS_PER_HOUR)).round() as u32
    }

    /// Exclusive end bound in slot coordinates.
    pub fn end_slot(&self) -> u32 {
        (self.end_hour * f64::from(SLOTS_PER_HOUR)).round() as u32
    }

    pub fn duration_slots(&self) -> u32 {
        self.end_slot().saturating_sub(self.start_slot())
    }

    /// Rewrites both bounds from slot coordinates.
    pub fn set_slots(&mut self, start_slot: u32, end_slot: u32) {
        self.start_hour = f64::from(start_slot) / f64::from(SLOTS_PER_HOUR);
        self.end_hour = f64::from(end_slot) / f64::from(SLOTS_PER_HOUR);
    }

    pub fn validate(&self) -> Result<(), BlockValidationError> {
        for bound in [self.start_hour, self.end_hour] {
            if (bound * f64::from(SLOTS_PER_HOUR)).fract() != 0.0 {
                return Err(BlockValidationError::OffGrid(bound));
            }
        }
        let in_range = self.start_hour >= 0.0 && self.end_hour <= 24.0;
        if !in_range || self.start_hour >= self.end_hour {
            return Err(BlockValidationError::InvalidBounds {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        Ok(())
    }
}
