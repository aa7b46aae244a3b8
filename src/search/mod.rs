//! Search: iterative deepening alpha-beta with quiescence, transposition
//! table and move ordering, plus perft.

pub mod ordering;
pub mod params;
pub mod perft;
#[allow(clippy::module_inception)]
pub mod search;
pub mod see;
pub mod stats;
pub mod tt;

pub use self::params::SearchParams;
pub use self::perft::{perft, perft_divide};
pub use self::search::{format_pv, Search, SearchResult, INF, MATE};
pub use self::stats::SearchStats;
pub use self::tt::{NodeType, ReplacementPolicy, TranspositionTable};
