// Zobrist hashing keys
//
// Keys are derived from a split_mix64 stream so every process builds the
// same table, which keeps hashes reproducible across runs and tests.

use crate::bitboard::iter_bits;
use crate::board::Board;
use crate::types::{CastlingRights, Color, PieceKind};

pub struct ZobristKeys {
    /// Indexed by `color * 6 + kind`, then square.
    pub piece: [[u64; 64]; 12],
    pub side: u64,
    /// One key per castling-rights bit pattern (16).
    pub castling: [u64; 16],
    pub ep_file: [u64; 8],
}

fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

struct KeyStream(u64);

impl KeyStream {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        split_mix64(self.0)
    }
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut stream = KeyStream(0x5eed_a770_cc00_0001);
        let mut piece = [[0u64; 64]; 12];
        for keys in piece.iter_mut() {
            for key in keys.iter_mut() {
                *key = stream.next();
            }
        }
        let side = stream.next();
        let mut castling = [0u64; 16];
        // No rights hashes to zero so an empty-rights position needs no term
        for key in castling.iter_mut().skip(1) {
            *key = stream.next();
        }
        let mut ep_file = [0u64; 8];
        for key in ep_file.iter_mut() {
            *key = stream.next();
        }
        Self {
            piece,
            side,
            castling,
            ep_file,
        }
    }

    #[inline]
    pub fn piece_key(&self, color: Color, kind: PieceKind, sq: usize) -> u64 {
        self.piece[color.index() * 6 + kind.index()][sq]
    }

    #[inline]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    #[inline]
    pub fn ep_key(&self, ep: Option<usize>) -> u64 {
        ep.map_or(0, |sq| self.ep_file[sq % 8])
    }

    /// Full hash of `board` computed from scratch; the incremental key must
    /// always equal this.
    pub fn hash(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                for sq in iter_bits(board.pieces(color, kind)) {
                    h ^= self.piece_key(color, kind, sq);
                }
            }
        }
        if board.side_to_move() == Color::Black {
            h ^= self.side;
        }
        h ^= self.castling_key(board.castling());
        h ^= self.ep_key(board.ep_square());
        h
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        let keys = ZobristKeys::new();
        let mut seen = HashSet::new();
        for row in keys.piece.iter() {
            for &k in row.iter() {
                assert!(seen.insert(k));
            }
        }
        assert!(seen.insert(keys.side));
        for &k in keys.castling.iter().skip(1) {
            assert!(seen.insert(k));
        }
        for &k in keys.ep_file.iter() {
            assert!(seen.insert(k));
        }
    }

    #[test]
    fn keys_are_deterministic() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        assert_eq!(a.piece, b.piece);
        assert_eq!(a.side, b.side);
        assert_eq!(a.castling, b.castling);
    }

    #[test]
    fn side_to_move_changes_hash() {
        let white = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        let keys = ZobristKeys::new();
        assert_eq!(keys.hash(&white) ^ keys.hash(&black), keys.side);
    }
}
