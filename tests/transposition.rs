use arrocco::search::tt::{score_from_tt, score_to_tt};
use arrocco::search::{NodeType, ReplacementPolicy, TranspositionTable, MATE};
use arrocco::Board;

#[test]
fn probe_by_position_key() {
    let mut board = Board::startpos();
    let mut tt = TranspositionTable::new(1, ReplacementPolicy::Always);
    let e4 = board.parse_move("e2e4").unwrap();
    tt.store(board.zobrist(), 35, 4, NodeType::Exact, e4);

    let entry = tt.probe(board.zobrist()).unwrap();
    assert_eq!(entry.best_move, e4);

    board.apply(e4);
    assert!(tt.probe(board.zobrist()).is_none());
}

#[test]
fn colliding_keys_never_return_the_wrong_entry() {
    let mut tt = TranspositionTable::with_entries(1024, ReplacementPolicy::Always);
    let a = 7u64;
    let b = 7u64 + 1024;
    tt.store(a, 10, 5, NodeType::LowerBound, Default::default());
    assert!(tt.probe(b).is_none());
    tt.store(b, 20, 1, NodeType::UpperBound, Default::default());
    assert!(tt.probe(a).is_none());
    assert_eq!(tt.probe(b).unwrap().node_type, NodeType::UpperBound);
}

#[test]
fn mate_distance_survives_a_transposition() {
    // Mate found 5 plies below a node at ply 3, probed again from ply 1
    let at_ply_3 = MATE - 8;
    let stored = score_to_tt(at_ply_3, 3);
    assert_eq!(stored, MATE - 5);
    assert_eq!(score_from_tt(stored, 1), MATE - 6);
}
