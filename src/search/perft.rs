//! Perft: exhaustive leaf counting over legal moves, for move generator
//! validation and benchmarking.

use crate::board::Board;
use crate::moves::Move;

/// Number of leaf positions `depth` plies below `board`.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let side = board.side_to_move();
    let moves = board.generate_moves(side);
    let mut nodes = 0;
    for &mv in moves.iter() {
        let mut child = board.play(mv);
        if child.is_in_check(side) {
            continue;
        }
        nodes += if depth == 1 { 1 } else { perft(&mut child, depth - 1) };
    }
    nodes
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = board.generate_legal_moves();
    moves
        .iter()
        .map(|&mv| {
            let mut child = board.play(mv);
            (mv, perft(&mut child, depth - 1))
        })
        .collect()
}
