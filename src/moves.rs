// Packed move encoding and fixed-capacity move list
//
// 16-bit layout:
//   bits 0-5   from square
//   bits 6-11  to square
//   bits 12-15 move kind

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::bitboard::{parse_square, square_name};
use crate::error::MoveParseError;
use crate::types::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Quiet = 0,
    Capture = 1,
    DoublePawnPush = 2,
    EnPassant = 3,
    KingCastle = 4,
    QueenCastle = 5,
    KnightPromotion = 6,
    BishopPromotion = 7,
    RookPromotion = 8,
    QueenPromotion = 9,
    KnightPromotionCapture = 10,
    BishopPromotionCapture = 11,
    RookPromotionCapture = 12,
    QueenPromotionCapture = 13,
}

impl MoveKind {
    const ALL: [MoveKind; 14] = [
        MoveKind::Quiet,
        MoveKind::Capture,
        MoveKind::DoublePawnPush,
        MoveKind::EnPassant,
        MoveKind::KingCastle,
        MoveKind::QueenCastle,
        MoveKind::KnightPromotion,
        MoveKind::BishopPromotion,
        MoveKind::RookPromotion,
        MoveKind::QueenPromotion,
        MoveKind::KnightPromotionCapture,
        MoveKind::BishopPromotionCapture,
        MoveKind::RookPromotionCapture,
        MoveKind::QueenPromotionCapture,
    ];

    /// Promotion kind for `piece` (knight..queen).
    pub fn promotion(piece: PieceKind, capture: bool) -> MoveKind {
        let base = if capture { 10 } else { 6 };
        let offset = match piece {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            _ => 3,
        };
        Self::ALL[base + offset]
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        matches!(self, MoveKind::Capture | MoveKind::EnPassant) || self as u8 >= 10
    }

    #[inline]
    pub fn is_promotion(self) -> bool {
        self as u8 >= 6
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        matches!(self, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    pub fn promotion_piece(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self as u8 - 6) % 4 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }
}

/// A move packed into 16 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// Placeholder for "no move"; a1a1 is never generated.
    pub const NULL: Move = Move(0);

    #[inline]
    pub fn new(from: usize, to: usize, kind: MoveKind) -> Self {
        debug_assert!(from < 64 && to < 64);
        Move((from as u16) | ((to as u16) << 6) | ((kind as u16) << 12))
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> usize {
        (self.0 & 0x3F) as usize
    }

    #[inline]
    pub const fn to(self) -> usize {
        ((self.0 >> 6) & 0x3F) as usize
    }

    #[inline]
    pub fn kind(self) -> MoveKind {
        // Kinds 14 and 15 are never constructed; from_raw callers get Quiet.
        MoveKind::ALL
            .get((self.0 >> 12) as usize)
            .copied()
            .unwrap_or(MoveKind::Quiet)
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.kind().is_capture()
    }

    #[inline]
    pub fn is_promotion(self) -> bool {
        self.kind().is_promotion()
    }

    #[inline]
    pub fn is_castle(self) -> bool {
        self.kind().is_castle()
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        self.kind().promotion_piece()
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q". The null move prints "0000".
    pub fn to_uci(self) -> String {
        if self.is_null() {
            return "0000".to_string();
        }
        let mut s = format!("{}{}", square_name(self.from()), square_name(self.to()));
        if let Some(p) = self.promotion() {
            s.push(p.letter());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.to_uci(), self.kind())
    }
}

/// Splits coordinate notation into `(from, to, promotion)` without looking at
/// a position. Matching against legal moves happens in `Board::parse_move`.
pub fn parse_coordinates(s: &str) -> Result<(usize, usize, Option<PieceKind>), MoveParseError> {
    let malformed = || MoveParseError::Malformed(s.to_string());
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        return Err(malformed());
    }
    let from = parse_square(&s[0..2]).ok_or_else(malformed)?;
    let to = parse_square(&s[2..4]).ok_or_else(malformed)?;
    let promotion = match s[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_letter(c) {
            Some(k @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen))
                if c.is_ascii_lowercase() =>
            {
                Some(k)
            }
            _ => return Err(malformed()),
        },
    };
    Ok((from, to, promotion))
}

pub const MAX_MOVES: usize = 256;

/// Append-only move buffer with a fixed capacity of 256.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Keeps only the moves for which `f` returns true, preserving order.
    pub fn retain(&mut self, mut f: impl FnMut(Move) -> bool) {
        let mut kept = 0;
        for i in 0..self.len {
            let mv = self.moves[i];
            if f(mv) {
                self.moves[kept] = mv;
                kept += 1;
            }
        }
        self.len = kept;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for MoveList {
    type Target = [Move];

    #[inline]
    fn deref(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

impl DerefMut for MoveList {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
