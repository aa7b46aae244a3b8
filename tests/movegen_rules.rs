use arrocco::bitboard::parse_square;
use arrocco::{Board, Color, MoveKind};

fn sq(name: &str) -> usize {
    parse_square(name).unwrap()
}

fn castles(fen: &str) -> Vec<MoveKind> {
    let board = Board::from_fen(fen).unwrap();
    board
        .generate_moves(board.side_to_move())
        .iter()
        .map(|mv| mv.kind())
        .filter(|kind| kind.is_castle())
        .collect()
}

#[test]
fn castling_allowed_when_every_condition_holds() {
    let kinds = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    assert!(kinds.contains(&MoveKind::KingCastle));
    assert!(kinds.contains(&MoveKind::QueenCastle));

    let kinds = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    assert_eq!(kinds.len(), 2);
}

#[test]
fn castling_refused_without_rights() {
    // Rook has moved away and back: the right is gone
    assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").is_empty());
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w K - 0 1"), vec![MoveKind::KingCastle]);
}

#[test]
fn castling_refused_when_rook_missing() {
    // FEN claims the right but the h1 rook is gone
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1"), vec![MoveKind::QueenCastle]);
}

#[test]
fn castling_refused_through_occupied_squares() {
    assert!(castles("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").is_empty());
    // Only b1 blocked: b1 is between rook and king even though the king never crosses it
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1"), vec![MoveKind::KingCastle]);
}

#[test]
fn castling_refused_through_or_into_attack() {
    // f1 attacked by the rook on f3
    assert_eq!(castles("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1"), vec![MoveKind::QueenCastle]);
    // g1 attacked by the bishop on c5
    assert_eq!(castles("4k3/8/8/2b5/8/8/8/R3K2R w KQ - 0 1"), vec![MoveKind::QueenCastle]);
    // King in check: neither side
    assert!(castles("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1").is_empty());
    // b1 must be empty but may be attacked
    assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), vec![MoveKind::QueenCastle]);
}

#[test]
fn promotions_come_in_fours() {
    let board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let moves = board.generate_moves(Color::White);
    let pawn_moves: Vec<_> = moves.iter().filter(|mv| mv.from() == sq("a7")).collect();
    assert_eq!(pawn_moves.len(), 8);

    let quiet: Vec<_> = pawn_moves.iter().filter(|mv| mv.to() == sq("a8")).collect();
    let captures: Vec<_> = pawn_moves.iter().filter(|mv| mv.to() == sq("b8")).collect();
    assert_eq!(quiet.len(), 4);
    assert_eq!(captures.len(), 4);
    assert!(quiet.iter().all(|mv| mv.is_promotion() && !mv.is_capture()));
    assert!(captures.iter().all(|mv| mv.is_promotion() && mv.is_capture()));

    let mut promoted: Vec<_> = quiet.iter().filter_map(|mv| mv.promotion()).collect();
    promoted.sort();
    promoted.dedup();
    assert_eq!(promoted.len(), 4);
}

#[test]
fn black_promotions_too() {
    let board = Board::from_fen("4k3/8/8/8/8/8/p7/1N2K3 b - - 0 1").unwrap();
    let moves = board.generate_moves(Color::Black);
    let from_a2: Vec<_> = moves.iter().filter(|mv| mv.from() == sq("a2")).collect();
    assert_eq!(from_a2.len(), 8);
    assert!(from_a2.iter().all(|mv| mv.is_promotion()));
}

#[test]
fn captures_only_list_is_a_subset() {
    let board = Board::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    let all = board.generate_moves(Color::White);
    let captures = board.generate_captures(Color::White);
    assert!(!captures.is_empty());
    for mv in captures.iter() {
        assert!(mv.is_capture(), "{mv:?} is not a capture");
        assert!(all.contains(mv));
    }
    let capture_count = all.iter().filter(|mv| mv.is_capture()).count();
    assert_eq!(captures.len(), capture_count);
}

#[test]
fn pinned_piece_moves_are_filtered() {
    // The e2 knight is pinned against the king by the e8 rook
    let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    let pseudo = board.generate_moves(Color::White);
    assert!(pseudo.iter().any(|mv| mv.from() == sq("e2")));

    let legal = board.generate_legal_moves();
    assert!(legal.iter().all(|mv| mv.from() != sq("e2")));
    for mv in pseudo.iter().filter(|mv| mv.from() == sq("e2")) {
        assert!(!board.is_move_legal(*mv, Color::White));
    }
}

#[test]
fn king_cannot_step_into_attack() {
    let mut board = Board::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
    let legal = board.generate_legal_moves();
    // d1, e2 and f2 are covered by the rook; Kxd2 and Kf1 remain
    for mv in legal.iter() {
        assert_ne!(mv.to(), sq("e2"));
        assert_ne!(mv.to(), sq("d1"));
        assert_ne!(mv.to(), sq("f2"));
    }
    assert!(legal.iter().any(|mv| mv.to() == sq("d2")));
    assert_eq!(legal.len(), 2);
}

#[test]
fn moves_for_the_side_not_on_move_are_never_legal() {
    let mut board = Board::startpos();
    let black = board.generate_moves(Color::Black);
    assert_eq!(black.len(), 20);
    assert!(black.iter().all(|&mv| !board.is_move_legal(mv, Color::Black)));
}
