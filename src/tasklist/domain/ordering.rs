//! Rank arithmetic for dense per-owner sequence positions.
//!
//! The functions here are the whole of the ordering algorithm: computing
//! the rank of a newly inserted task, the contiguous block displaced by a
//! move, and the dense renumbering that closes the gap left by a soft
//! delete. They are pure so that every adapter applies the same plan
//! inside its own atomicity mechanism.

use super::{Position, Task};
use std::cmp::Ordering;

/// The contiguous block of ranks displaced by moving one task.
///
/// Both variants exclude the moved task's old rank, so applying the shift
/// to a whole active list (target included) touches exactly the tasks
/// strictly between the old and new rank. After the shift and the target's
/// own move, the active ranks are again exactly `1..=N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShift {
    /// The target moved toward the tail; the block `(above, through]`
    /// slides one rank toward the head to fill the gap it left.
    TowardHead {
        /// Exclusive lower bound: the target's old rank.
        above: Position,
        /// Inclusive upper bound: the target's new rank.
        through: Position,
    },
    /// The target moved toward the head; the block `[from, below)` slides
    /// one rank toward the tail to make room for it.
    TowardTail {
        /// Inclusive lower bound: the target's new rank.
        from: Position,
        /// Exclusive upper bound: the target's old rank.
        below: Position,
    },
}

impl BlockShift {
    /// Returns `true` when the given rank lies inside the displaced block.
    #[must_use]
    pub fn applies_to(self, position: Position) -> bool {
        match self {
            Self::TowardHead { above, through } => position > above && position <= through,
            Self::TowardTail { from, below } => position >= from && position < below,
        }
    }

    /// Returns the rank a task ends up at under this shift.
    ///
    /// Ranks outside the displaced block are returned unchanged.
    #[must_use]
    pub fn displaced(self, position: Position) -> Position {
        if !self.applies_to(position) {
            return position;
        }
        match self {
            Self::TowardHead { .. } => position.toward_head(),
            Self::TowardTail { .. } => position.toward_tail(),
        }
    }
}

/// Computes the block displaced by moving a task between two ranks.
///
/// Returns `None` when the ranks are equal: the move is a no-op and
/// nothing shifts.
#[must_use]
pub fn shift_for_move(old: Position, new: Position) -> Option<BlockShift> {
    match new.cmp(&old) {
        Ordering::Greater => Some(BlockShift::TowardHead {
            above: old,
            through: new,
        }),
        Ordering::Less => Some(BlockShift::TowardTail {
            from: new,
            below: old,
        }),
        Ordering::Equal => None,
    }
}

/// Computes the rank of a task appended to a list whose greatest active
/// rank is `current_max`, or the head rank for an empty list.
#[must_use]
pub fn next_position(current_max: Option<Position>) -> Position {
    current_max.map_or(Position::FIRST, Position::toward_tail)
}

/// Reassigns dense `1..=N` ranks over active tasks already sorted by
/// their current rank, preserving relative order.
///
/// Tasks whose rank is already correct are left untouched, so their
/// mutation timestamps survive a neighbour's soft delete.
pub fn close_gaps<'a>(active_in_rank_order: impl IntoIterator<Item = &'a mut Task>) {
    let mut rank = Position::FIRST;
    for task in active_in_rank_order {
        if task.position() != rank {
            task.displaced_to(rank);
        }
        rank = rank.toward_tail();
    }
}
