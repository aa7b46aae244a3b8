//! One-time-initialised lookup tables shared by boards and searches.

use std::sync::{Arc, OnceLock};

use crate::attacks::AttackTables;
use crate::zobrist::ZobristKeys;

/// Immutable attack and hashing tables.
///
/// Built once and handed around as `Arc<Tables>`; nothing mutates them after
/// construction so boards on different threads can share one instance.
pub struct Tables {
    pub attacks: AttackTables,
    pub zobrist: ZobristKeys,
}

static SHARED: OnceLock<Arc<Tables>> = OnceLock::new();

impl Tables {
    pub fn new() -> Self {
        let start = std::time::Instant::now();
        let tables = Self {
            attacks: AttackTables::new(),
            zobrist: ZobristKeys::new(),
        };
        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "tables initialised");
        tables
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> Arc<Tables> {
        SHARED.get_or_init(|| Arc::new(Tables::new())).clone()
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}
