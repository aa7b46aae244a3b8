use thiserror::Error;

use crate::types::Color;

/// Reasons a FEN string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid piece placement: {0}")]
    PiecePlacement(String),

    #[error("invalid side to move: {0:?}")]
    SideToMove(String),

    #[error("invalid castling rights: {0:?}")]
    CastlingRights(String),

    #[error("invalid en-passant square: {0:?}")]
    EnPassant(String),

    #[error("invalid half-move clock: {0:?}")]
    HalfMoveClock(String),

    #[error("invalid full-move number: {0:?}")]
    FullMoveNumber(String),

    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: u32 },

    #[error("{0} is in check but not on move")]
    KingCapturable(Color),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveParseError {
    #[error("malformed move {0:?}, expected coordinate notation like e2e4 or e7e8q")]
    Malformed(String),

    #[error("{0} is not a legal move in this position")]
    NotLegal(String),
}

/// Errors surfaced by the [`Engine`](crate::engine::Engine) facade.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    MoveParse(#[from] MoveParseError),

    #[error("illegal move {0}")]
    IllegalMove(String),

    #[error("a background search is still running")]
    Busy,

    #[error("background search thread panicked")]
    WorkerPanicked,
}
