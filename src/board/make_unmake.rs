// Make/unmake with an undo stack, plus the scoped guard that pairs them

use std::ops::{Deref, DerefMut};

use crate::moves::{Move, MoveKind};
use crate::types::{CastlingRights, Color, PieceKind};

use super::{Board, KING_SIDE_ROOK, QUEEN_SIDE_ROOK};

/// State needed to take a move back. Pushed by `make_move`, popped by
/// `unmake_move`.
#[derive(Debug, Clone)]
pub(crate) struct Undo {
    pub(crate) mv: Move,
    pub(crate) captured: Option<PieceKind>,
    pub(crate) castling: CastlingRights,
    pub(crate) ep: Option<usize>,
    pub(crate) halfmove: u16,
    pub(crate) fullmove: u16,
    /// Key of the position before the move; also feeds repetition detection.
    pub(crate) zobrist: u64,
}

/// A move played on a board, taken back when the guard is dropped.
///
/// The guard holds the only mutable borrow of the board, so moves nest
/// strictly: a child guard has to be released before its parent can be.
/// Use [`MoveGuard::commit`] to keep the move instead.
pub struct MoveGuard<'a> {
    board: &'a mut Board,
    active: bool,
}

impl MoveGuard<'_> {
    /// Keeps the move on the board; it stays in the history for
    /// repetition detection.
    pub fn commit(mut self) {
        self.active = false;
    }

    /// The move this guard will take back.
    pub fn played(&self) -> Move {
        self.board
            .undo_stack
            .last()
            .map_or(Move::NULL, |undo| undo.mv)
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Board;

    #[inline]
    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for MoveGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            self.board.unmake_move();
        }
    }
}

impl Board {
    /// Plays `mv` and returns a guard that takes it back on drop.
    ///
    /// `mv` must be a pseudo-legal move for the side to move; check
    /// untrusted input with [`Board::is_move_legal`] first.
    ///
    /// # Panics
    ///
    /// If no piece of the side to move stands on the origin square.
    pub fn play(&mut self, mv: Move) -> MoveGuard<'_> {
        self.make_move(mv);
        MoveGuard {
            board: self,
            active: true,
        }
    }

    /// Plays `mv` permanently.
    pub fn apply(&mut self, mv: Move) {
        self.play(mv).commit();
    }

    fn make_move(&mut self, mv: Move) {
        let us = self.side;
        let them = us.other();
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();

        let piece = self
            .piece(from, us)
            .unwrap_or_else(|| panic!("make_move {mv}: no {us} piece on origin square"));

        let mut undo = Undo {
            mv,
            captured: None,
            castling: self.castling,
            ep: self.ep,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            zobrist: self.zobrist,
        };

        self.zobrist ^= self.tables.zobrist.ep_key(self.ep);
        self.ep = None;

        match kind {
            MoveKind::EnPassant => {
                let cap_sq = ep_victim_square(to, us);
                self.remove_piece(them, PieceKind::Pawn, cap_sq);
                undo.captured = Some(PieceKind::Pawn);
                self.move_piece(us, piece, from, to);
            }
            MoveKind::KingCastle | MoveKind::QueenCastle => {
                let (rook_from, rook_to) = castle_rook_squares(kind, us);
                self.move_piece(us, PieceKind::King, from, to);
                self.move_piece(us, PieceKind::Rook, rook_from, rook_to);
            }
            _ => {
                if kind.is_capture() {
                    let captured = self.piece(to, them);
                    debug_assert!(captured.is_some(), "capture {mv} without a victim");
                    if let Some(victim) = captured {
                        self.remove_piece(them, victim, to);
                    }
                    undo.captured = captured;
                }
                match kind.promotion_piece() {
                    Some(promoted) => {
                        self.remove_piece(us, PieceKind::Pawn, from);
                        self.add_piece(us, promoted, to);
                    }
                    None => self.move_piece(us, piece, from, to),
                }
                if kind == MoveKind::DoublePawnPush {
                    let ep = (from + to) / 2;
                    self.ep = Some(ep);
                    self.zobrist ^= self.tables.zobrist.ep_key(Some(ep));
                }
            }
        }

        let rights = self.castling_after_move();
        if rights != self.castling {
            self.zobrist ^= self.tables.zobrist.castling_key(self.castling);
            self.zobrist ^= self.tables.zobrist.castling_key(rights);
            self.castling = rights;
        }

        if piece == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove = self.halfmove.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove = self.fullmove.saturating_add(1);
        }

        self.side = them;
        self.zobrist ^= self.tables.zobrist.side;
        self.undo_stack.push(undo);
    }

    pub(crate) fn unmake_move(&mut self) {
        let undo = self
            .undo_stack
            .pop()
            .expect("unmake_move called with an empty undo stack");

        // Restore from the mover's point of view
        self.side = self.side.other();
        let us = self.side;
        let them = us.other();
        let mv = undo.mv;
        let (from, to, kind) = (mv.from(), mv.to(), mv.kind());

        match kind {
            MoveKind::EnPassant => {
                self.move_piece(us, PieceKind::Pawn, to, from);
                self.add_piece(them, PieceKind::Pawn, ep_victim_square(to, us));
            }
            MoveKind::KingCastle | MoveKind::QueenCastle => {
                let (rook_from, rook_to) = castle_rook_squares(kind, us);
                self.move_piece(us, PieceKind::Rook, rook_to, rook_from);
                self.move_piece(us, PieceKind::King, to, from);
            }
            _ => {
                match kind.promotion_piece() {
                    Some(promoted) => {
                        self.remove_piece(us, promoted, to);
                        self.add_piece(us, PieceKind::Pawn, from);
                    }
                    None => {
                        if let Some(piece) = self.piece(to, us) {
                            self.move_piece(us, piece, to, from);
                        }
                    }
                }
                if let Some(victim) = undo.captured {
                    self.add_piece(them, victim, to);
                }
            }
        }

        self.castling = undo.castling;
        self.ep = undo.ep;
        self.halfmove = undo.halfmove;
        self.fullmove = undo.fullmove;
        self.zobrist = undo.zobrist;
    }
}

#[inline]
fn ep_victim_square(ep_target: usize, mover: Color) -> usize {
    match mover {
        Color::White => ep_target - 8,
        Color::Black => ep_target + 8,
    }
}

#[inline]
fn castle_rook_squares(kind: MoveKind, color: Color) -> (usize, usize) {
    let c = color.index();
    if kind == MoveKind::KingCastle {
        (KING_SIDE_ROOK[c], KING_SIDE_ROOK[c] - 2)
    } else {
        (QUEEN_SIDE_ROOK[c], QUEEN_SIDE_ROOK[c] + 3)
    }
}
