//! Static exchange evaluation
//!
//! Plays out the capture sequence on a single square, each side always
//! recapturing with its least valuable attacker, and returns the material
//! balance for the side making the first capture. Either side may stop
//! capturing when continuing would lose material. Sliders hidden behind a
//! capturing piece join in as the occupancy shrinks.

use crate::bitboard::{lsb_index, square_bb, Bitboard};
use crate::board::Board;
use crate::eval::MATERIAL;
use crate::moves::{Move, MoveKind};
use crate::types::{Color, PieceKind};

#[inline]
fn value(kind: PieceKind) -> i32 {
    MATERIAL[kind.index()]
}

/// Material won (positive) or lost (negative) by `mv` once all
/// profitable recaptures on its destination square are resolved.
/// Non-captures score 0 unless they promote.
pub fn see(board: &Board, mv: Move) -> i32 {
    let from = mv.from();
    let to = mv.to();
    let Some((us, attacker)) = board.piece_on(from) else {
        return 0;
    };

    let mut occ = board.occupied() ^ square_bb(from);
    let victim = match mv.kind() {
        MoveKind::EnPassant => {
            let victim_sq = if us == Color::White { to - 8 } else { to + 8 };
            occ ^= square_bb(victim_sq);
            Some(PieceKind::Pawn)
        }
        _ => board.piece(to, us.other()),
    };
    let mut gain = victim.map_or(0, value);

    // The piece left standing on the square is the promoted one
    let standing = match mv.promotion() {
        Some(promoted) => {
            gain += value(promoted) - value(PieceKind::Pawn);
            promoted
        }
        None => attacker,
    };

    occ |= square_bb(to);
    gain - exchange(board, to, us.other(), occ, standing)
}

/// Best result for `side` capturing the `target` piece on `sq`, where
/// `occ` holds the pieces still on the board. Never negative: a side can
/// always decline to recapture.
fn exchange(board: &Board, sq: usize, side: Color, occ: Bitboard, target: PieceKind) -> i32 {
    let attackers = board.attackers_to(sq, occ) & occ;
    let Some((from, kind)) = least_valuable(board, attackers & board.occupancy(side), side) else {
        return 0;
    };

    let remaining = occ ^ square_bb(from);
    if kind == PieceKind::King {
        // The king may only take an undefended piece
        let defenders = board.attackers_to(sq, remaining) & remaining & board.occupancy(side.other());
        return if defenders == 0 { value(target) } else { 0 };
    }

    (value(target) - exchange(board, sq, side.other(), remaining, kind)).max(0)
}

fn least_valuable(board: &Board, attackers: Bitboard, side: Color) -> Option<(usize, PieceKind)> {
    PieceKind::ALL.iter().find_map(|&kind| {
        lsb_index(attackers & board.pieces(side, kind)).map(|sq| (sq, kind))
    })
}
