//! Transposition table: fixed-size array indexed by `key mod size`

use crate::moves::Move;

use super::search::MATE_BOUND;

/// Node type for transposition table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeType {
    /// Score is exact (a PV node)
    Exact,
    /// Search failed high; score is a lower bound
    LowerBound,
    /// Search failed low; score is an upper bound
    UpperBound,
    /// Slot never written
    #[default]
    Unknown,
}

/// How a store treats an occupied slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacementPolicy {
    /// Last write wins
    #[default]
    Always,
    /// Keep a deeper entry for a different position
    DepthPreferred,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TTEntry {
    pub key: u64,
    pub score: i32,
    pub depth: u8,
    pub node_type: NodeType,
    pub best_move: Move,
}

impl TTEntry {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_type == NodeType::Unknown
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    policy: ReplacementPolicy,
}

impl TranspositionTable {
    /// Create a TT with approximately `size_mb` megabytes (at least 1024 entries)
    pub fn new(size_mb: usize, policy: ReplacementPolicy) -> Self {
        let entry_size = std::mem::size_of::<TTEntry>();
        let count = ((size_mb * 1024 * 1024) / entry_size).max(1024);
        Self::with_entries(count, policy)
    }

    pub fn with_entries(count: usize, policy: ReplacementPolicy) -> Self {
        let count = count.max(1);
        tracing::debug!(entries = count, ?policy, "transposition table allocated");
        Self {
            entries: vec![TTEntry::default(); count],
            policy,
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Entry stored for exactly this key, if any. Scores come back as stored;
    /// use [`score_from_tt`] to re-bias mate scores for the probing ply.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        let entry = self.entries[self.index(key)];
        (!entry.is_empty() && entry.key == key).then_some(entry)
    }

    pub fn store(&mut self, key: u64, score: i32, depth: u8, node_type: NodeType, best_move: Move) {
        let index = self.index(key);
        let slot = &mut self.entries[index];
        if !slot.is_empty() && slot.key != key {
            if self.policy == ReplacementPolicy::DepthPreferred && slot.depth > depth {
                return;
            }
            tracing::trace!(
                slot = index,
                old_key = slot.key,
                new_key = key,
                "transposition slot collision"
            );
        }
        *slot = TTEntry {
            key,
            score,
            depth,
            node_type,
            best_move,
        };
    }

    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::default());
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    pub fn fill_percentage(&self) -> f64 {
        let filled = self.entries.iter().filter(|e| !e.is_empty()).count();
        (filled as f64 / self.entries.len() as f64) * 100.0
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(16, ReplacementPolicy::Always)
    }
}

/// Mate scores are stored relative to the node rather than the root.
#[inline]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score + ply as i32
    } else if score <= -MATE_BOUND {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_BOUND {
        score - ply as i32
    } else if score <= -MATE_BOUND {
        score + ply as i32
    } else {
        score
    }
}
