//! Search parameters and configuration
//!
//! Controls search depth, transposition-table sizing and policy, and the
//! optional ordering and evaluation choices.

use crate::eval::EvalKind;

use super::tt::ReplacementPolicy;

/// Search parameters for the engine
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Maximum iterative-deepening depth in plies
    pub max_depth: u8,

    /// Transposition table size in megabytes
    pub tt_size_mb: usize,

    /// Let a deep-enough TT entry cut the search at a node. When off the
    /// table only seeds move ordering.
    pub tt_cutoffs: bool,

    /// What happens when a store hits an occupied slot
    pub replacement: ReplacementPolicy,

    /// Rank losing captures (negative SEE) below killer moves
    pub see_ordering: bool,

    /// Static evaluation used at the leaves
    pub evaluation: EvalKind,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            tt_size_mb: 16,
            tt_cutoffs: true,
            replacement: ReplacementPolicy::Always,
            see_ordering: true,
            evaluation: EvalKind::Tapered,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies (at least 1)
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    pub fn tt_size_mb(mut self, mb: usize) -> Self {
        self.tt_size_mb = mb;
        self
    }

    pub fn tt_cutoffs(mut self, enable: bool) -> Self {
        self.tt_cutoffs = enable;
        self
    }

    pub fn replacement(mut self, policy: ReplacementPolicy) -> Self {
        self.replacement = policy;
        self
    }

    pub fn see_ordering(mut self, enable: bool) -> Self {
        self.see_ordering = enable;
        self
    }

    pub fn evaluation(mut self, kind: EvalKind) -> Self {
        self.evaluation = kind;
        self
    }
}
