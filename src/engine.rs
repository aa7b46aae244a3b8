//! Narrow facade for an application driving the engine: load a position,
//! query it for rendering, validate clicked moves, and ask for a reply,
//! either synchronously or on a background thread.

use std::thread::{self, JoinHandle};

use crate::board::Board;
use crate::error::EngineError;
use crate::moves::{Move, MoveList};
use crate::search::{perft, Search, SearchParams, SearchResult};
use crate::types::{Color, PieceKind};

/// A reply being computed on a worker thread. Hand it back to
/// [`Engine::collect`] to get the result and the searcher back.
#[must_use = "the searcher is only returned through Engine::collect"]
pub struct PendingMove {
    handle: JoinHandle<(Search, SearchResult)>,
}

impl PendingMove {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

pub struct Engine {
    board: Board,
    params: SearchParams,
    /// `None` while a background search owns it
    search: Option<Search>,
}

impl Engine {
    pub fn new(params: SearchParams) -> Self {
        Self {
            board: Board::startpos(),
            search: Some(Search::new(params.clone())),
            params,
        }
    }

    /// Reset to the position described by `fen`.
    pub fn parse(&mut self, fen: &str) -> Result<(), EngineError> {
        self.board.set_fen(fen)?;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fen(&self) -> String {
        self.board.to_fen()
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) -> Result<(), EngineError> {
        let search = self.search.as_mut().ok_or(EngineError::Busy)?;
        search.set_params(params.clone());
        self.params = params;
        Ok(())
    }

    /// Search the current position to the configured depth.
    ///
    /// Check [`SearchResult::is_move_found`] before playing the result: it is
    /// `false` on checkmate and stalemate.
    pub fn get_move(&mut self) -> Result<SearchResult, EngineError> {
        let search = self.search.as_mut().ok_or(EngineError::Busy)?;
        Ok(search.search(&mut self.board))
    }

    /// Start searching a private copy of the current position on a
    /// worker thread. The engine's board stays usable meanwhile.
    pub fn think(&mut self) -> Result<PendingMove, EngineError> {
        let mut search = self.search.take().ok_or(EngineError::Busy)?;
        let mut board = self.board.clone();
        tracing::debug!(fen = %board.to_fen(), "background search started");
        let handle = thread::spawn(move || {
            let result = search.search(&mut board);
            (search, result)
        });
        Ok(PendingMove { handle })
    }

    /// Wait for a background search and take its result.
    pub fn collect(&mut self, pending: PendingMove) -> Result<SearchResult, EngineError> {
        match pending.handle.join() {
            Ok((search, result)) => {
                self.search = Some(search);
                Ok(result)
            }
            Err(_) => {
                tracing::error!("background search panicked; starting a fresh searcher");
                self.search = Some(Search::new(self.params.clone()));
                Err(EngineError::WorkerPanicked)
            }
        }
    }

    pub fn is_thinking(&self) -> bool {
        self.search.is_none()
    }

    /// Play `mv` for the side to move, rejecting anything not legal here.
    pub fn make_move(&mut self, mv: Move) -> Result<(), EngineError> {
        let side = self.board.side_to_move();
        if !self.is_move_legal(mv, side) {
            return Err(EngineError::IllegalMove(mv.to_uci()));
        }
        self.board.apply(mv);
        Ok(())
    }

    /// Play a move given in coordinate notation ("e2e4", "e7e8q").
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, EngineError> {
        let mv = self.board.parse_move(uci)?;
        self.board.apply(mv);
        Ok(mv)
    }

    pub fn side(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn piece(&self, sq: usize, side: Color) -> Option<PieceKind> {
        self.board.piece(sq, side)
    }

    pub fn is_in_check(&self) -> bool {
        self.board.in_check()
    }

    /// Pseudo-legal moves for `side`; filter with [`Engine::is_move_legal`].
    pub fn generate_moves(&self, side: Color) -> MoveList {
        self.board.generate_moves(side)
    }

    /// Whether `mv` is a legal move for `side` in the current position.
    /// Moves for the side not on move are never legal.
    pub fn is_move_legal(&mut self, mv: Move, side: Color) -> bool {
        self.board.is_move_legal(mv, side)
    }

    /// Legal moves of the side to move starting on `sq`.
    pub fn legal_moves_from(&mut self, sq: usize) -> Vec<Move> {
        self.board
            .generate_legal_moves()
            .iter()
            .copied()
            .filter(|mv| mv.from() == sq)
            .collect()
    }

    pub fn run_perft(&mut self, depth: u32) -> u64 {
        perft(&mut self.board, depth)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("fen", &self.board.to_fen())
            .field("thinking", &self.is_thinking())
            .finish()
    }
}
