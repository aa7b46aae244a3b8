use arrocco::{Board, START_FEN};

const POSITIONS: [&str; 6] = [
    START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
];

/// Every node below `board` must hash consistently and restore exactly.
fn check_tree(board: &mut Board, depth: u32) {
    assert_eq!(board.zobrist(), board.compute_hash(), "hash drift at {}", board.to_fen());
    if depth == 0 {
        return;
    }
    let before = board.clone();
    let fen = board.to_fen();
    let moves = board.generate_legal_moves();
    for &mv in moves.iter() {
        {
            let mut child = board.play(mv);
            check_tree(&mut child, depth - 1);
        }
        assert_eq!(*board, before, "{mv} did not unmake cleanly from {fen}");
        assert_eq!(board.to_fen(), fen);
    }
}

#[test]
fn make_unmake_round_trip_every_move() {
    for fen in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        check_tree(&mut board, 2);
    }
}

#[test]
fn pseudo_legal_moves_round_trip_too() {
    for fen in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        let before = board.clone();
        let moves = board.generate_moves(board.side_to_move());
        for &mv in moves.iter() {
            let after = board.play(mv);
            assert_eq!(after.zobrist(), after.compute_hash());
            drop(after);
            assert_eq!(board, before);
        }
    }
}

#[test]
fn committed_walk_keeps_hash_in_step() {
    // Deterministic pseudo-random game, always picking a legal move
    let mut board = Board::startpos();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    for ply in 0..200 {
        let moves = board.generate_legal_moves();
        if moves.is_empty() || board.is_draw() {
            break;
        }
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let mv = moves[(seed % moves.len() as u64) as usize];
        board.apply(mv);
        assert_eq!(board.zobrist(), board.compute_hash(), "hash drift after ply {ply}");
        assert_eq!(board.ply_count(), ply + 1);

        // Reloading the FEN gives the same position and key
        let reloaded = Board::from_fen(&board.to_fen()).unwrap();
        assert_eq!(reloaded, board);
    }
}

#[test]
fn transpositions_share_a_key() {
    let mut a = Board::startpos();
    for uci in ["g1f3", "g8f6", "b1c3"] {
        let mv = a.parse_move(uci).unwrap();
        a.apply(mv);
    }
    let mut b = Board::startpos();
    for uci in ["b1c3", "g8f6", "g1f3"] {
        let mv = b.parse_move(uci).unwrap();
        b.apply(mv);
    }
    assert_eq!(a.zobrist(), b.zobrist());
    assert_eq!(a, b);
}

#[test]
fn double_push_key_includes_en_passant() {
    let mut board = Board::startpos();
    let e4 = board.parse_move("e2e4").unwrap();
    board.apply(e4);
    let with_ep = board.zobrist();
    let fen = board.to_fen();
    assert!(fen.contains(" e3 "));

    let without_ep = Board::from_fen(&fen.replace(" e3 ", " - ")).unwrap();
    assert_ne!(with_ep, without_ep.zobrist());
}
