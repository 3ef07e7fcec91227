// Master queue and sequencing cursor
//
// The master queue is an 81-slot list of sub-board indices fixed at game start.
// A QueueCursor pairs the queue pointer with the wildcard flag so that the whole
// "which board must be played next" decision is one pure transition.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::types::GRID_CELLS;

/// Number of slots in a master queue (9 shuffled blocks of 9)
pub const QUEUE_LEN: usize = GRID_CELLS * GRID_CELLS;

/// Fixed 81-slot sequence of board indices, immutable after creation.
/// Cloning shares the underlying slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MasterQueue(Arc<[u8; QUEUE_LEN]>);

impl MasterQueue {
    /// Builds a queue from 9 independent Fisher-Yates shuffles of 0..9
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut slots = [0u8; QUEUE_LEN];
        for block in slots.chunks_exact_mut(GRID_CELLS) {
            for (i, slot) in block.iter_mut().enumerate() {
                *slot = i as u8;
            }
            block.shuffle(rng);
        }
        MasterQueue(Arc::new(slots))
    }

    /// Nine copies of 0..9 in order
    pub fn identity() -> Self {
        let mut slots = [0u8; QUEUE_LEN];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = (i % GRID_CELLS) as u8;
        }
        MasterQueue(Arc::new(slots))
    }

    /// Expands a legacy 9-slot repeating sequence into a full queue.
    /// Returns None unless the sequence has exactly 9 entries in 0..9.
    pub fn from_legacy_sequence(sequence: &[u8]) -> Option<Self> {
        if sequence.len() != GRID_CELLS || sequence.iter().any(|&b| b as usize >= GRID_CELLS) {
            return None;
        }
        let mut slots = [0u8; QUEUE_LEN];
        for block in slots.chunks_exact_mut(GRID_CELLS) {
            block.copy_from_slice(sequence);
        }
        Some(MasterQueue(Arc::new(slots)))
    }

    /// Wraps explicit slots. Returns None unless there are exactly 81 entries in 0..9.
    pub fn from_slots(slots: &[u8]) -> Option<Self> {
        let slots: [u8; QUEUE_LEN] = slots.try_into().ok()?;
        if slots.iter().any(|&b| b as usize >= GRID_CELLS) {
            return None;
        }
        Some(MasterQueue(Arc::new(slots)))
    }

    pub fn slots(&self) -> &[u8; QUEUE_LEN] {
        &self.0
    }

    /// Board designated at `position`, or None past the end
    pub fn get(&self, position: usize) -> Option<usize> {
        self.0.get(position).map(|&b| b as usize)
    }

    /// True if the queue decomposes into 9 consecutive permutations of 0..9
    pub fn is_permutation_blocks(&self) -> bool {
        self.0.chunks_exact(GRID_CELLS).all(|block| {
            let mut seen = [false; GRID_CELLS];
            block.iter().all(|&b| {
                let b = b as usize;
                b < GRID_CELLS && !std::mem::replace(&mut seen[b], true)
            })
        })
    }
}

/// Queue pointer plus wildcard flag.
/// When `wildcard` is set the pointer is paused and any playable board may be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QueueCursor {
    position: usize,
    wildcard: bool,
}

impl QueueCursor {
    /// Creates a cursor; positions past the end are clamped to the queue length
    pub fn new(position: usize, wildcard: bool) -> Self {
        QueueCursor {
            position: position.min(QUEUE_LEN),
            wildcard,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Board the queue designates, or None under a wildcard or once exhausted.
    /// The designated board may be unplayable; callers degrade to free choice then.
    pub fn target(&self, queue: &MasterQueue) -> Option<usize> {
        if self.wildcard {
            None
        } else {
            queue.get(self.position)
        }
    }

    /// Computes the cursor for the next turn after a move was played under `self`.
    ///
    /// # Arguments
    /// * `queue` - The game's master queue
    /// * `board_completed` - Whether the move won or filled its sub-board
    /// * `playable` - Per-board playability after the move
    pub fn advance(
        self,
        queue: &MasterQueue,
        board_completed: bool,
        playable: &[bool; GRID_CELLS],
    ) -> QueueCursor {
        // Wildcard turns do not consume a slot; queue-governed turns do
        let mut position = if self.wildcard {
            self.position
        } else {
            (self.position + 1).min(QUEUE_LEN)
        };
        let mut wildcard = board_completed;

        if !wildcard {
            let mut target = queue.get(position);
            while let Some(board) = target {
                if playable[board] {
                    break;
                }
                position += 1;
                if position >= QUEUE_LEN {
                    wildcard = true;
                    break;
                }
                target = queue.get(position);
            }

            if !wildcard && target.is_none() && playable.iter().any(|&p| p) {
                wildcard = true;
            }
        }

        QueueCursor::new(position, wildcard)
    }
}
