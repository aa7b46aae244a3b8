//! Move ordering: principal variation, transposition move, MVV-LVA
//! captures, killer moves and the history heuristic.
//!
//! Every move gets a score; the search then pulls moves out best-first with
//! a selection step so a cutoff on an early move skips sorting the rest.

use crate::board::Board;
use crate::moves::{Move, MoveKind, MoveList, MAX_MOVES};
use crate::types::{Color, PieceKind};

use super::see::see;

pub const MAX_PLY: usize = 64;
pub const KILLER_SLOTS: usize = 2;

pub const PV_SCORE: i32 = 30000;
pub const TT_SCORE: i32 = 20000;
pub const MVV_LVA_OFFSET: i32 = 10000;
pub const KILLER_VALUE: i32 = 1000;

/// Quiet moves never outrank the second killer.
const HISTORY_MAX: i32 = MVV_LVA_OFFSET - KILLER_SLOTS as i32 * KILLER_VALUE - 1;

/// Indexed `[attacker][victim]`, pawn..king
#[rustfmt::skip]
pub const MVV_LVA: [[i32; 6]; 6] = [
    [105, 205, 305, 405, 505, 605],
    [104, 204, 304, 404, 504, 604],
    [103, 203, 303, 403, 503, 603],
    [102, 202, 302, 402, 502, 602],
    [101, 201, 301, 401, 501, 601],
    [100, 200, 300, 400, 500, 600],
];

/// Two quiet moves per ply that recently caused a beta cutoff.
#[derive(Clone)]
pub struct Killers {
    slots: [[Move; KILLER_SLOTS]; MAX_PLY],
}

impl Killers {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; KILLER_SLOTS]; MAX_PLY],
        }
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; KILLER_SLOTS]; MAX_PLY];
    }

    /// Newest killer goes first; storing the current first killer again is a no-op.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slots) = self.slots.get_mut(ply) else {
            return;
        };
        if slots[0] != mv {
            slots[1] = slots[0];
            slots[0] = mv;
        }
    }

    /// Slot holding `mv` at `ply`, if any.
    pub fn slot_of(&self, ply: usize, mv: Move) -> Option<usize> {
        if mv.is_null() {
            return None;
        }
        self.slots.get(ply)?.iter().position(|&k| k == mv)
    }

    pub fn at(&self, ply: usize) -> [Move; KILLER_SLOTS] {
        self.slots.get(ply).copied().unwrap_or([Move::NULL; KILLER_SLOTS])
    }
}

impl Default for Killers {
    fn default() -> Self {
        Self::new()
    }
}

/// `[side][piece][to]` credit for quiet moves that raised alpha.
#[derive(Clone)]
pub struct History {
    table: [[[i32; 64]; 6]; 2],
}

impl History {
    pub fn new() -> Self {
        Self {
            table: [[[0; 64]; 6]; 2],
        }
    }

    pub fn clear(&mut self) {
        self.table = [[[0; 64]; 6]; 2];
    }

    pub fn update(&mut self, side: Color, piece: PieceKind, to: usize, depth: u8) {
        let entry = &mut self.table[side.index()][piece.index()][to];
        *entry = (*entry + depth as i32).min(HISTORY_MAX);
    }

    #[inline]
    pub fn get(&self, side: Color, piece: PieceKind, to: usize) -> i32 {
        self.table[side.index()][piece.index()][to]
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// What a node knows when it orders its moves.
pub struct OrderingHints<'a> {
    pub pv_move: Move,
    pub tt_move: Move,
    pub ply: usize,
    pub killers: &'a Killers,
    pub history: &'a History,
    pub see_ordering: bool,
}

/// Ordering score for `mv` in `board`, higher searched first.
pub fn score_move(board: &Board, mv: Move, hints: &OrderingHints<'_>) -> i32 {
    if !mv.is_null() && mv == hints.pv_move {
        return PV_SCORE;
    }
    if !mv.is_null() && mv == hints.tt_move {
        return TT_SCORE;
    }

    let side = board.side_to_move();
    let attacker = board.piece(mv.from(), side).unwrap_or(PieceKind::Pawn);

    if mv.is_capture() {
        let victim = match mv.kind() {
            MoveKind::EnPassant => PieceKind::Pawn,
            _ => board.piece(mv.to(), side.other()).unwrap_or(PieceKind::Pawn),
        };
        let mvv_lva = MVV_LVA[attacker.index()][victim.index()];
        // Only a capture that can lose material is worth an exchange count
        if hints.see_ordering && victim < attacker && see(board, mv) < 0 {
            return mvv_lva;
        }
        return MVV_LVA_OFFSET + mvv_lva;
    }

    if mv.kind() == MoveKind::QueenPromotion {
        return MVV_LVA_OFFSET;
    }

    if let Some(slot) = hints.killers.slot_of(hints.ply, mv) {
        return MVV_LVA_OFFSET - (slot as i32 + 1) * KILLER_VALUE;
    }

    hints.history.get(side, attacker, mv.to())
}

/// Move list with scores, drained best-first.
pub struct OrderedMoves {
    moves: MoveList,
    scores: [i32; MAX_MOVES],
    next: usize,
}

impl OrderedMoves {
    pub fn new(board: &Board, moves: MoveList, hints: &OrderingHints<'_>) -> Self {
        let mut scores = [0; MAX_MOVES];
        for (score, &mv) in scores.iter_mut().zip(moves.iter()) {
            *score = score_move(board, mv, hints);
        }
        Self {
            moves,
            scores,
            next: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Iterator for OrderedMoves {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let len = self.moves.len();
        if self.next >= len {
            return None;
        }
        let mut best = self.next;
        for i in self.next + 1..len {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        self.moves.swap(self.next, best);
        self.scores.swap(self.next, best);
        let mv = self.moves[self.next];
        self.next += 1;
        Some(mv)
    }
}
