//! Arrocco: a bitboard chess engine core.
//!
//! Positions live in [`Board`], which plays moves through a scoped
//! [`MoveGuard`] so every make is paired with its unmake. [`Search`] runs
//! iterative-deepening alpha-beta over a board, and [`Engine`] wraps both
//! for an application that only wants to load positions and ask for moves.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod moves;
pub mod search;
pub mod tables;
pub mod types;
pub mod zobrist;

pub use board::{Board, MoveGuard, START_FEN};
pub use engine::{Engine, PendingMove};
pub use error::{EngineError, FenError, MoveParseError};
pub use eval::{evaluate, EvalKind, Score};
pub use moves::{Move, MoveKind, MoveList};
pub use search::{Search, SearchParams, SearchResult};
pub use tables::Tables;
pub use types::{CastlingRights, Color, PieceKind};
