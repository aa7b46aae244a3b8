//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs, transposition-table traffic and timing.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched (main search and quiescence)
    pub nodes: u64,

    /// Quiescence nodes searched
    pub qsearch_nodes: u64,

    /// Probes that found an entry for the current key
    pub tt_hits: u64,

    /// Nodes answered directly from the table
    pub tt_cutoffs: u64,

    /// Entries written
    pub tt_stores: u64,

    /// Beta cutoffs in the main search
    pub beta_cutoffs: u64,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    #[inline]
    pub fn inc_node(&mut self) {
        self.nodes += 1;
    }

    #[inline]
    pub fn inc_qsearch_node(&mut self) {
        self.nodes += 1;
        self.qsearch_nodes += 1;
    }

    #[inline]
    pub fn inc_tt_hit(&mut self) {
        self.tt_hits += 1;
    }

    #[inline]
    pub fn inc_tt_cutoff(&mut self) {
        self.tt_cutoffs += 1;
    }

    #[inline]
    pub fn inc_tt_store(&mut self) {
        self.tt_stores += 1;
    }

    #[inline]
    pub fn inc_beta_cutoff(&mut self) {
        self.beta_cutoffs += 1;
    }

    /// Emit a one-line summary at debug level
    pub fn log_summary(&self) {
        tracing::debug!(
            nodes = self.nodes,
            qnodes = self.qsearch_nodes,
            tt_hits = self.tt_hits,
            tt_cutoffs = self.tt_cutoffs,
            tt_stores = self.tt_stores,
            beta_cutoffs = self.beta_cutoffs,
            time_ms = self.search_time.as_millis() as u64,
            nps = self.nps,
            "search finished"
        );
    }
}
