// Position state: bitboards, side to move, castling, en-passant, counters
//
// Square mapping is A1=0, B1=1, ..., H8=63 everywhere.

mod make_unmake;
mod movegen;

pub use make_unmake::MoveGuard;

use std::fmt;
use std::sync::Arc;

use crate::bitboard::{
    count_bits, lsb_index, make_square, parse_square, rank_of, square_bb, square_name,
    Bitboard, DARK_SQUARES, LIGHT_SQUARES, RANK_1, RANK_8,
};
use crate::error::{FenError, MoveParseError};
use crate::moves::{parse_coordinates, Move};
use crate::tables::Tables;
use crate::types::{CastlingRights, Color, PieceKind};

use make_unmake::Undo;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// Castling geometry indexed by color
pub(crate) const KING_ORIGIN: [usize; 2] = [4, 60];
pub(crate) const KING_SIDE_ROOK: [usize; 2] = [7, 63];
pub(crate) const QUEEN_SIDE_ROOK: [usize; 2] = [0, 56];

#[derive(Clone)]
pub struct Board {
    tables: Arc<Tables>,
    pieces: [[Bitboard; 6]; 2],
    occupancy: [Bitboard; 2],
    all: Bitboard,
    side: Color,
    castling: CastlingRights,
    ep: Option<usize>,
    halfmove: u16,
    fullmove: u16,
    zobrist: u64,
    undo_stack: Vec<Undo>,
}

impl Board {
    /// Empty board bound to the given tables; populate it with [`Board::set_fen`].
    pub fn empty(tables: Arc<Tables>) -> Self {
        Self {
            tables,
            pieces: [[0; 6]; 2],
            occupancy: [0; 2],
            all: 0,
            side: Color::White,
            castling: CastlingRights::NONE,
            ep: None,
            halfmove: 0,
            fullmove: 1,
            zobrist: 0,
            undo_stack: Vec::with_capacity(256),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with_tables(fen, Tables::shared())
    }

    pub fn from_fen_with_tables(fen: &str, tables: Arc<Tables>) -> Result<Self, FenError> {
        let mut board = Self::empty(tables);
        board.set_fen(fen)?;
        Ok(board)
    }

    pub fn startpos() -> Self {
        let mut board = Self::empty(Tables::shared());
        board
            .set_fen(START_FEN)
            .unwrap_or_else(|e| unreachable!("start position must parse: {e}"));
        board
    }

    /// Resets the board from a FEN string.
    ///
    /// Requires exactly six whitespace-separated fields. On error the board
    /// is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount {
                found: fields.len(),
            });
        }

        let pieces = parse_placement(fields[0])?;

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            s => return Err(FenError::SideToMove(s.to_string())),
        };

        let mut castling = CastlingRights::NONE;
        if fields[2] != "-" {
            for ch in fields[2].chars() {
                let flag = match ch {
                    'K' => CastlingRights::WHITE_KING,
                    'Q' => CastlingRights::WHITE_QUEEN,
                    'k' => CastlingRights::BLACK_KING,
                    'q' => CastlingRights::BLACK_QUEEN,
                    _ => return Err(FenError::CastlingRights(fields[2].to_string())),
                };
                castling.insert(flag);
            }
        }

        let ep = match fields[3] {
            "-" => None,
            s => {
                let sq = parse_square(s).ok_or_else(|| FenError::EnPassant(s.to_string()))?;
                let expected_rank = if side == Color::White { 5 } else { 2 };
                if rank_of(sq) != expected_rank {
                    return Err(FenError::EnPassant(s.to_string()));
                }
                Some(sq)
            }
        };

        let halfmove = fields[4]
            .parse()
            .map_err(|_| FenError::HalfMoveClock(fields[4].to_string()))?;
        let fullmove = fields[5]
            .parse()
            .map_err(|_| FenError::FullMoveNumber(fields[5].to_string()))?;

        for color in Color::ALL {
            let found = count_bits(pieces[color.index()][PieceKind::King.index()]);
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        if let Some(sq) = ep {
            if !ep_target_is_consistent(&pieces, side, sq) {
                return Err(FenError::EnPassant(fields[3].to_string()));
            }
        }

        let mut next = Self::empty(Arc::clone(&self.tables));
        next.pieces = pieces;
        next.side = side;
        next.castling = castling;
        next.ep = ep;
        next.halfmove = halfmove;
        next.fullmove = fullmove;
        next.refresh_occupancy();
        // Rights whose king or rook is not at home can never be used
        next.castling = next.castling_after_move();

        // The side that just moved cannot have left its king en prise
        let waiting = side.other();
        if next.is_in_check(waiting) {
            return Err(FenError::KingCapturable(waiting));
        }

        next.zobrist = next.compute_hash();
        *self = next;

        tracing::debug!(fen = %fen, key = self.zobrist, "position loaded");
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(make_square(rank, file)) {
                    Some((color, kind)) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece_char(color, kind));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        let side = match self.side {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self.ep.map_or_else(|| "-".to_string(), square_name);
        format!(
            "{} {} {} {} {} {}",
            fen, side, self.castling, ep, self.halfmove, self.fullmove
        )
    }

    // Accessors -------------------------------------------------

    #[inline]
    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.all
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn ep_square(&self) -> Option<usize> {
        self.ep
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    /// Number of moves currently on the undo stack.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Hash recomputed from scratch; equals [`Board::zobrist`] at all times.
    pub fn compute_hash(&self) -> u64 {
        self.tables.zobrist.hash(self)
    }

    pub fn piece_on(&self, sq: usize) -> Option<(Color, PieceKind)> {
        let bb = square_bb(sq);
        if self.all & bb == 0 {
            return None;
        }
        let color = if self.occupancy[0] & bb != 0 {
            Color::White
        } else {
            Color::Black
        };
        self.piece(sq, color).map(|kind| (color, kind))
    }

    /// Kind of the `side` piece on `sq`, if any.
    pub fn piece(&self, sq: usize, side: Color) -> Option<PieceKind> {
        let bb = square_bb(sq);
        if self.occupancy[side.index()] & bb == 0 {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[side.index()][kind.index()] & bb != 0)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> usize {
        lsb_index(self.pieces(color, PieceKind::King)).unwrap_or(64)
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.is_in_check(self.side)
    }

    pub fn is_in_check(&self, side: Color) -> bool {
        let king = self.king_square(side);
        king < 64 && self.is_square_attacked(king, side.other())
    }

    /// Resolves coordinate notation against the legal moves of this position.
    pub fn parse_move(&mut self, s: &str) -> Result<Move, MoveParseError> {
        let (from, to, promotion) = parse_coordinates(s)?;
        self.generate_legal_moves()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
            .ok_or_else(|| MoveParseError::NotLegal(s.to_string()))
    }

    // Draw detection --------------------------------------------

    /// Fifty-move rule, threefold repetition or insufficient material.
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.repetition_count() >= 2 || self.is_insufficient_material()
    }

    #[inline]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove >= 100
    }

    /// How many earlier positions in the move history equal the current one.
    ///
    /// Only positions since the last irreversible move (pawn move or capture)
    /// are scanned.
    pub fn repetition_count(&self) -> usize {
        let window = (self.halfmove as usize).min(self.undo_stack.len());
        self.undo_stack
            .iter()
            .rev()
            .take(window)
            .skip(1)
            .step_by(2)
            .filter(|undo| undo.zobrist == self.zobrist)
            .count()
    }

    pub fn is_insufficient_material(&self) -> bool {
        let heavy = |c: Color| {
            self.pieces(c, PieceKind::Pawn)
                | self.pieces(c, PieceKind::Rook)
                | self.pieces(c, PieceKind::Queen)
        };
        if heavy(Color::White) | heavy(Color::Black) != 0 {
            return false;
        }
        let knights = self.pieces(Color::White, PieceKind::Knight)
            | self.pieces(Color::Black, PieceKind::Knight);
        let bishops = self.pieces(Color::White, PieceKind::Bishop)
            | self.pieces(Color::Black, PieceKind::Bishop);
        let minors = count_bits(knights | bishops);
        if minors <= 1 {
            return true;
        }
        // K+B v K+B with both bishops on the same square colour
        knights == 0
            && count_bits(self.pieces(Color::White, PieceKind::Bishop)) == 1
            && count_bits(self.pieces(Color::Black, PieceKind::Bishop)) == 1
            && (bishops & LIGHT_SQUARES == 0 || bishops & DARK_SQUARES == 0)
    }

    // Raw piece mutation; keeps occupancy and hash in step ------

    #[inline]
    fn add_piece(&mut self, color: Color, kind: PieceKind, sq: usize) {
        let bb = square_bb(sq);
        self.pieces[color.index()][kind.index()] |= bb;
        self.occupancy[color.index()] |= bb;
        self.all |= bb;
        self.zobrist ^= self.tables.zobrist.piece_key(color, kind, sq);
    }

    #[inline]
    fn remove_piece(&mut self, color: Color, kind: PieceKind, sq: usize) {
        let bb = square_bb(sq);
        self.pieces[color.index()][kind.index()] &= !bb;
        self.occupancy[color.index()] &= !bb;
        self.all &= !bb;
        self.zobrist ^= self.tables.zobrist.piece_key(color, kind, sq);
    }

    #[inline]
    fn move_piece(&mut self, color: Color, kind: PieceKind, from: usize, to: usize) {
        self.remove_piece(color, kind, from);
        self.add_piece(color, kind, to);
    }

    fn refresh_occupancy(&mut self) {
        for color in Color::ALL {
            self.occupancy[color.index()] = self.pieces[color.index()].iter().fold(0, |a, b| a | b);
        }
        self.all = self.occupancy[0] | self.occupancy[1];
    }

    /// Current rights minus any whose king or rook has left its origin square.
    fn castling_after_move(&self) -> CastlingRights {
        let mut rights = self.castling;
        for color in Color::ALL {
            let c = color.index();
            let king_home = self.pieces(color, PieceKind::King) & square_bb(KING_ORIGIN[c]) != 0;
            let rooks = self.pieces(color, PieceKind::Rook);
            if !king_home || rooks & square_bb(KING_SIDE_ROOK[c]) == 0 {
                rights.remove(CastlingRights::king_side(color));
            }
            if !king_home || rooks & square_bb(QUEEN_SIDE_ROOK[c]) == 0 {
                rights.remove(CastlingRights::queen_side(color));
            }
        }
        rights
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Boards compare by position; move history and tables are ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.occupancy == other.occupancy
            && self.all == other.all
            && self.side == other.side
            && self.castling == other.castling
            && self.ep == other.ep
            && self.halfmove == other.halfmove
            && self.fullmove == other.fullmove
            && self.zobrist == other.zobrist
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("zobrist", &format_args!("{:016x}", self.zobrist))
            .field("history", &self.undo_stack.len())
            .finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_on(make_square(rank, file)) {
                    Some((color, kind)) => write!(f, "{} ", piece_char(color, kind))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}

fn piece_char(color: Color, kind: PieceKind) -> char {
    match color {
        Color::White => kind.letter().to_ascii_uppercase(),
        Color::Black => kind.letter(),
    }
}

/// An en-passant target must sit behind a pawn that has just made a double
/// push: the pawn is in place and the two squares it crossed are empty.
fn ep_target_is_consistent(pieces: &[[Bitboard; 6]; 2], side: Color, sq: usize) -> bool {
    let (pushed, origin) = match side {
        Color::White => (sq - 8, sq + 8),
        Color::Black => (sq + 8, sq - 8),
    };
    let occupied = pieces.iter().flatten().fold(0, |acc, bb| acc | bb);
    let pawns = pieces[side.other().index()][PieceKind::Pawn.index()];
    pawns & square_bb(pushed) != 0 && occupied & (square_bb(sq) | square_bb(origin)) == 0
}

fn parse_placement(placement: &str) -> Result<[[Bitboard; 6]; 2], FenError> {
    let bad = |why: &str| FenError::PiecePlacement(format!("{why} in {placement:?}"));
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(bad("expected 8 ranks"));
    }
    let mut pieces = [[0u64; 6]; 2];
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(bad("bad empty-square count"));
                }
                file += skip as usize;
            } else {
                let kind = PieceKind::from_letter(ch).ok_or_else(|| bad("unknown piece letter"))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(bad("rank overflows"));
                }
                pieces[color.index()][kind.index()] |= square_bb(make_square(rank, file));
                file += 1;
            }
            if file > 8 {
                return Err(bad("rank overflows"));
            }
        }
        if file != 8 {
            return Err(bad("rank does not cover 8 files"));
        }
    }
    let pawns = pieces[0][0] | pieces[1][0];
    if pawns & (RANK_1 | RANK_8) != 0 {
        return Err(bad("pawn on back rank"));
    }
    Ok(pieces)
}
