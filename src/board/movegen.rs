// Pseudo-legal move generation, attack queries and the legality filter

use crate::bitboard::{iter_bits, square_bb, Bitboard, RANK_1, RANK_3, RANK_6, RANK_8};
use crate::moves::{Move, MoveKind, MoveList};
use crate::types::{CastlingRights, Color, PieceKind};

use super::{Board, KING_ORIGIN, KING_SIDE_ROOK, QUEEN_SIDE_ROOK};

// Squares strictly between king and rook, indexed [color][king side, queen side]
const CASTLE_EMPTY: [[Bitboard; 2]; 2] = [
    [0x60, 0x0e],
    [0x60 << 56, 0x0e << 56],
];

// Squares the king stands on, crosses or lands on
const CASTLE_SAFE: [[Bitboard; 2]; 2] = [
    [0x70, 0x1c],
    [0x70 << 56, 0x1c << 56],
];

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

impl Board {
    /// All pseudo-legal moves for `side`.
    ///
    /// Moves may leave the mover's king in check; run them through
    /// [`Board::is_move_legal`] or use [`Board::generate_legal_moves`].
    pub fn generate_moves(&self, side: Color) -> MoveList {
        let mut list = MoveList::new();
        self.generate_into(side, false, &mut list);
        list
    }

    /// Pseudo-legal captures for `side`, including en-passant and
    /// promotion-captures. Quiescence search works from this list.
    pub fn generate_captures(&self, side: Color) -> MoveList {
        let mut list = MoveList::new();
        self.generate_into(side, true, &mut list);
        list
    }

    /// Legal moves for the side to move.
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let side = self.side;
        let mut list = self.generate_moves(side);
        list.retain(|mv| self.leaves_king_safe(mv, side));
        list
    }

    pub fn has_legal_move(&mut self) -> bool {
        let side = self.side;
        self.generate_moves(side)
            .iter()
            .any(|&mv| self.leaves_king_safe(mv, side))
    }

    /// Whether `mv` is a legal move for `side` here. Any move value is
    /// accepted: moves for the side not on move, moves not generated in
    /// this position and moves leaving the king attacked are all `false`.
    pub fn is_move_legal(&mut self, mv: Move, side: Color) -> bool {
        side == self.side
            && self.generate_moves(side).contains(&mv)
            && self.leaves_king_safe(mv, side)
    }

    /// King-safety half of [`Board::is_move_legal`] for moves already known
    /// to be pseudo-legal for the side to move.
    pub(crate) fn leaves_king_safe(&mut self, mv: Move, side: Color) -> bool {
        let after = self.play(mv);
        !after.is_in_check(side)
    }

    /// Whether any `by` piece attacks `sq` at the current occupancy.
    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        let a = &self.tables.attacks;
        let queens = self.pieces(by, PieceKind::Queen);
        a.pawn(by.other(), sq) & self.pieces(by, PieceKind::Pawn) != 0
            || a.knight(sq) & self.pieces(by, PieceKind::Knight) != 0
            || a.king(sq) & self.pieces(by, PieceKind::King) != 0
            || a.bishop(sq, self.all) & (self.pieces(by, PieceKind::Bishop) | queens) != 0
            || a.rook(sq, self.all) & (self.pieces(by, PieceKind::Rook) | queens) != 0
    }

    /// Pieces of both colors attacking `sq`, with sliders resolved against `occ`.
    pub fn attackers_to(&self, sq: usize, occ: Bitboard) -> Bitboard {
        let a = &self.tables.attacks;
        let both = |kind| self.pieces(Color::White, kind) | self.pieces(Color::Black, kind);
        let queens = both(PieceKind::Queen);
        (a.pawn(Color::Black, sq) & self.pieces(Color::White, PieceKind::Pawn))
            | (a.pawn(Color::White, sq) & self.pieces(Color::Black, PieceKind::Pawn))
            | (a.knight(sq) & both(PieceKind::Knight))
            | (a.king(sq) & both(PieceKind::King))
            | (a.bishop(sq, occ) & (both(PieceKind::Bishop) | queens))
            | (a.rook(sq, occ) & (both(PieceKind::Rook) | queens))
    }

    fn generate_into(&self, side: Color, captures_only: bool, list: &mut MoveList) {
        let own = self.occupancy(side);
        let enemy = self.occupancy(side.other());
        let targets = if captures_only { enemy } else { !own };

        self.generate_pawn_moves(side, captures_only, list);

        let a = &self.tables.attacks;
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            for from in iter_bits(self.pieces(side, kind)) {
                let attacks = match kind {
                    PieceKind::Knight => a.knight(from),
                    PieceKind::Bishop => a.bishop(from, self.all),
                    PieceKind::Rook => a.rook(from, self.all),
                    PieceKind::Queen => a.queen(from, self.all),
                    _ => a.king(from),
                };
                for to in iter_bits(attacks & targets) {
                    let kind = if enemy & square_bb(to) != 0 {
                        MoveKind::Capture
                    } else {
                        MoveKind::Quiet
                    };
                    list.push(Move::new(from, to, kind));
                }
            }
        }

        if !captures_only {
            self.generate_castle_moves(side, list);
        }
    }

    fn generate_pawn_moves(&self, side: Color, captures_only: bool, list: &mut MoveList) {
        let pawns = self.pieces(side, PieceKind::Pawn);
        if pawns == 0 {
            return;
        }
        let enemy = self.occupancy(side.other());
        let empty = !self.all;
        let (promo_rank, double_rank) = match side {
            Color::White => (RANK_8, RANK_3),
            Color::Black => (RANK_1, RANK_6),
        };
        let forward = |bb: Bitboard| match side {
            Color::White => bb << 8,
            Color::Black => bb >> 8,
        };
        let back = |to: usize, n: usize| match side {
            Color::White => to - n,
            Color::Black => to + n,
        };

        if !captures_only {
            let single = forward(pawns) & empty;
            for to in iter_bits(single & promo_rank) {
                push_promotions(list, back(to, 8), to, false);
            }
            for to in iter_bits(single & !promo_rank) {
                list.push(Move::new(back(to, 8), to, MoveKind::Quiet));
            }
            let double = forward(single & double_rank) & empty;
            for to in iter_bits(double) {
                list.push(Move::new(back(to, 16), to, MoveKind::DoublePawnPush));
            }
        }

        let a = &self.tables.attacks;
        for from in iter_bits(pawns) {
            let hits = a.pawn(side, from) & enemy;
            for to in iter_bits(hits & promo_rank) {
                push_promotions(list, from, to, true);
            }
            for to in iter_bits(hits & !promo_rank) {
                list.push(Move::new(from, to, MoveKind::Capture));
            }
        }

        // The en-passant square only belongs to the side to move
        if side == self.side {
            if let Some(ep) = self.ep {
                for from in iter_bits(a.pawn(side.other(), ep) & pawns) {
                    list.push(Move::new(from, ep, MoveKind::EnPassant));
                }
            }
        }
    }

    fn generate_castle_moves(&self, side: Color, list: &mut MoveList) {
        let c = side.index();
        let king_from = KING_ORIGIN[c];
        if self.pieces(side, PieceKind::King) & square_bb(king_from) == 0 {
            return;
        }
        let rooks = self.pieces(side, PieceKind::Rook);
        let candidates = [
            (
                CastlingRights::king_side(side),
                KING_SIDE_ROOK[c],
                king_from + 2,
                MoveKind::KingCastle,
            ),
            (
                CastlingRights::queen_side(side),
                QUEEN_SIDE_ROOK[c],
                king_from - 2,
                MoveKind::QueenCastle,
            ),
        ];
        for (wing, (right, rook_sq, king_to, kind)) in candidates.into_iter().enumerate() {
            if !self.castling.has(right)
                || rooks & square_bb(rook_sq) == 0
                || self.all & CASTLE_EMPTY[c][wing] != 0
            {
                continue;
            }
            let transit_attacked =
                iter_bits(CASTLE_SAFE[c][wing]).any(|sq| self.is_square_attacked(sq, side.other()));
            if !transit_attacked {
                list.push(Move::new(king_from, king_to, kind));
            }
        }
    }
}

fn push_promotions(list: &mut MoveList, from: usize, to: usize, capture: bool) {
    for piece in PROMOTION_PIECES {
        list.push(Move::new(from, to, MoveKind::promotion(piece, capture)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::parse_square;

    fn sq(name: &str) -> usize {
        parse_square(name).unwrap()
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let mut board = Board::startpos();
        assert_eq!(board.generate_moves(Color::White).len(), 20);
        assert_eq!(board.generate_legal_moves().len(), 20);
        assert!(board.generate_captures(Color::White).is_empty());
    }

    #[test]
    fn square_attack_queries() {
        let board = Board::startpos();
        // f3 is covered by the g1 knight and the e2/g2 pawns
        assert!(board.is_square_attacked(sq("f3"), Color::White));
        assert!(!board.is_square_attacked(sq("e4"), Color::White));
        assert!(board.is_square_attacked(sq("f6"), Color::Black));
    }

    #[test]
    fn attackers_to_collects_both_colors() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/5N2/8/4K3 w - - 0 1").unwrap();
        let attackers = board.attackers_to(sq("d5"), board.occupied());
        assert_eq!(attackers, square_bb(sq("e4")));
        let attackers = board.attackers_to(sq("e4"), board.occupied());
        assert_eq!(attackers, square_bb(sq("d5")));
    }

    #[test]
    fn en_passant_is_generated_for_side_to_move_only() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let moves = board.generate_moves(Color::White);
        assert!(moves
            .iter()
            .any(|m| m.kind() == MoveKind::EnPassant && m.to() == sq("d6")));
        let captures = board.generate_captures(Color::White);
        assert_eq!(captures.len(), 1);
    }

    #[test]
    fn pinned_piece_moves_are_filtered() {
        // The e2 knight is pinned by the e8 rook
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let pseudo = board.generate_moves(Color::White);
        assert!(pseudo.iter().any(|m| m.from() == sq("e2")));
        let legal = board.generate_legal_moves();
        assert!(legal.iter().all(|m| m.from() != sq("e2")));
    }

    #[test]
    fn arbitrary_move_values_are_rejected_without_playing() {
        let mut board = Board::startpos();
        let before = board.clone();
        let bogus = [
            // Empty origin square
            Move::new(sq("e4"), sq("e5"), MoveKind::Quiet),
            // Black piece moved on White's turn
            Move::new(sq("e7"), sq("e5"), MoveKind::DoublePawnPush),
            // Castling through pieces
            Move::new(sq("e1"), sq("g1"), MoveKind::KingCastle),
            // Right squares, wrong kind
            Move::new(sq("e2"), sq("e4"), MoveKind::Quiet),
            Move::NULL,
        ];
        for mv in bogus {
            assert!(!board.is_move_legal(mv, Color::White), "{mv}");
        }
        assert_eq!(board, before);
        assert!(board.is_move_legal(Move::new(sq("e2"), sq("e4"), MoveKind::DoublePawnPush), Color::White));
    }
}
