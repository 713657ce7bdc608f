//! Timeline interaction states and slot geometry.

use crate::model::schedule::{palette_color, BlockId, TimeBlock, SLOT_COUNT};

/// Vertical pixel density of one hour row.
pub const HOUR_HEIGHT_PX: f32 = 48.0;

/// Vertical pixel density of one fifteen-minute slot.
pub const SLOT_HEIGHT_PX: f32 = HOUR_HEIGHT_PX / 4.0;

/// Which edge of a block a resize grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Interaction {
    #[default]
    Idle,
    Selecting {
        anchor: u32,
        cursor: u32,
    },
    Dragging {
        block: BlockId,
        grab_offset: u32,
        origin_start: u32,
    },
    Resizing {
        block: BlockId,
        edge: ResizeEdge,
        origin_start: u32,
        origin_end: u32,
    },
}

/// The planner: a block collection plus the live interaction mode.
#[derive(Debug, Default)]
pub struct DayPlanner {
    blocks: Vec<TimeBlock>,
    interaction: Interaction,
    editing: Option<BlockId>,
}

impl DayPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the planner from a loaded schedule.
    pub fn with_blocks(blocks: Vec<TimeBlock>) -> Self {
        Self {
            blocks,
            interaction: Interaction::Idle,
            editing: None,
        }
    }

    /// Blocks in creation order, which is also paint order.
    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<TimeBlock> {
        self.blocks
    }

    /// Blocks sorted by start bound, for the summary list.
    pub fn blocks_by_start(&self) -> Vec<&TimeBlock> {
        let mut sorted: Vec<&TimeBlock> = self.blocks.iter().collect();
        sorted.sort_by_key(|block| block.start_slot());
        sorted
    }

    pub fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle
    }

    /// Normalized `(lo, hi)` slot bounds of a live selection, for preview.
    pub fn selection(&self) -> Option<(u32, u32)> {
        match self.interaction {
            Interaction::Selecting { anchor, cursor } => {
                Some((anchor.min(cursor), anchor.max(cursor)))
            }
            _ => None,
        }
    }

    pub fn editing(&self) -> Option<BlockId> {
        self.editing
    }

    /// Maps a pointer offset inside the timeline to a slot, clamped to the
    /// 24-hour grid.
    pub fn slot_at(y_px: f32, scroll_px: f32) -> u32 {
        let offset = (y_px + scroll_px).max(0.0);
        clamp_slot((offset / SLOT_HEIGHT_PX) as u32)
    }

    /// Pointer-down on empty timeline area. Ignored unless idle.
    pub fn press_empty(&mut self, slot: u32) -> bool {
        if !self.is_idle() {
            return false;
        }
        let slot = clamp_slot(slot);
        self.interaction = Interaction::Selecting {
            anchor: slot,
            cursor: slot,
        };
        true
    }

    /// Pointer-down on a block's drag handle. Ignored unless idle.
    pub fn press_block(&mut self, id: BlockId, slot: u32) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(block) = self.blocks.iter().find(|block| block.id == id) else {
            return false;
        };
        let start = block.start_slot();
        self.interaction = Interaction::Dragging {
            block: id,
            grab_offset: clamp_slot(slot).saturating_sub(start),
            origin_start: start,
        };
        true
    }

    /// Pointer-down on a block's start or end edge handle. Ignored unless
    /// idle.
    pub fn press_edge(&mut self, id: BlockId, edge: ResizeEdge) -> bool {
        if !self.is_idle() {
            return false;
        }
        let Some(block) = self.blocks.iter().find(|block| block.id == id) else {
            return false;
        };
        self.interaction = Interaction::Resizing {
            block: id,
            edge,
            origin_start: block.start_slot(),
            origin_end: block.end_slot(),
        };
        true
    }

    /// Pointer-move: updates the live interaction, clamped to the grid.
    pub fn drag_to(&mut self, slot: u32) {
        let slot = clamp_slot(slot);
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Selecting { anchor, .. } => {
                self.interaction = Interaction::Selecting {
                    anchor,
                    cursor: slot,
                };
            }
            Interaction::Dragging {
                block, grab_offset, ..
            } => {
                if let Some(target) = self.blocks.iter_mut().find(|b| b.id == block) {
                    let duration = target.duration_slots().max(1);
                    let start = slot
                        .saturating_sub(grab_offset)
                        .min(SLOT_COUNT - duration);
                    target.set_slots(start, start + duration);
                }
            }
            Interaction::Resizing {
                block,
                edge,
                origin_start,
                origin_end,
            } => {
                if let Some(target) = self.blocks.iter_mut().find(|b| b.id == block) {
                    match edge {
                        ResizeEdge::Start => {
                            target.set_slots(slot.min(origin_end - 1), origin_end);
                        }
                        ResizeEdge::End => {
                            let end = (slot + 1).clamp(origin_start + 1, SLOT_COUNT);
                            target.set_slots(origin_start, end);
                        }
                    }
                }
            }
        }
    }

    /// Pointer-up: commits the live interaction.
    ///
    /// Returns the committed block's id; a zero-width selection commits
    /// nothing. A committed selection opens title editing for the new block.
    pub fn release(&mut self) -> Option<BlockId> {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => None,
            Interaction::Selecting { anchor, cursor } => {
                let lo = anchor.min(cursor);
                let hi = anchor.max(cursor);
                if hi > lo {
                    // Inclusive cursor slot becomes the exclusive end bound.
                    Some(self.insert_block(lo, hi + 1))
                } else {
                    None
                }
            }
            Interaction::Dragging { block, .. } => Some(block),
            Interaction::Resizing { block, .. } => Some(block),
        }
    }

    /// Pointer-cancel: aborts to idle, restoring pre-interaction bounds.
    pub fn cancel(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle | Interaction::Selecting { .. } => {}
            Interaction::Dragging {
                block,
                origin_start,
                ..
            } => {
                if let Some(target) = self.blocks.iter_mut().find(|b| b.id == block) {
                    let duration = target.duration_slots().max(1);
                    target.set_slots(origin_start, origin_start + duration);
                }
            }
            Interaction::Resizing {
                block,
                origin_start,
                origin_end,
                ..
            } => {
                if let Some(target) = self.blocks.iter_mut().find(|b| b.id == block) {
                    target.set_slots(origin_start, origin_end);
                }
            }
        }
    }

    /// Plain-click path: creates a one-slot block directly, bypassing the
    /// drag threshold. Ignored while an interaction is live.
    pub fn quick_add(&mut self, slot: u32) -> Option<BlockId> {
        if !self.is_idle() {
            return None;
        }
        let slot = clamp_slot(slot);
        Some(self.insert_block(slot, slot + 1))
    }

    pub fn begin_title_edit(&mut self, id: BlockId) -> bool {
        if self.blocks.iter().any(|block| block.id == id) {
            self.editing = Some(id);
            return true;
        }
        false
    }

    /// Live title update while editing; no length constraint.
    pub fn set_title(&mut self, id: BlockId, title: impl Into<String>) -> bool {
        match self.blocks.iter_mut().find(|block| block.id == id) {
            Some(block) => {
                block.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Commits the title edit (blur or Enter).
    pub fn end_title_edit(&mut self) {
        self.editing = None;
    }

    pub fn set_color(&mut self, id: BlockId, color: impl Into<String>) -> bool {
        match self.blocks.iter_mut().find(|block| block.id == id) {
            Some(block) => {
                block.color = color.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: BlockId) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.id != id);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.blocks.len() != before
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.editing = None;
        self.interaction = Interaction::Idle;
    }

    fn insert_block(&mut self, start_slot: u32, end_slot: u32) -> BlockId {
        let block = TimeBlock::from_slots(start_slot, end_slot, palette_color(self.blocks.len()));
        let id = block.id;
        self.blocks.push(block);
        self.editing = Some(id);
        id
    }
}

fn clamp_slot(slot: u32) -> u32 {
    slot.min(SLOT_COUNT - 1)
}
