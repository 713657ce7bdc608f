//! Interactive day-planner state machine.
//!
//! # Responsibility
//! - Drive block creation, move, and resize on the 96-slot timeline from
//!   pointer events dispatched by the presentation layer.
//! - Report each committed mutation as a full snapshot of the block
//!   collection; persistence belongs entirely to the caller.
//!
//! # Invariants
//! - Exactly one interaction (select/drag/resize) is live at a time; title
//!   editing is orthogonal and never blocks other interactions.
//! - A cancelled interaction restores the pre-interaction bounds; partial
//!   mutations never survive a pointer-cancel.

mod timeline;

pub use timeline::{DayPlanner, ResizeEdge, HOUR_HEIGHT_PX, SLOT_HEIGHT_PX};
