use arrocco::search::{ReplacementPolicy, INF, MATE};
use arrocco::{Board, EvalKind, Search, SearchParams};

fn search(fen: &str, params: SearchParams) -> (arrocco::SearchResult, Board) {
    let mut board = Board::from_fen(fen).unwrap();
    let mut search = Search::new(params);
    let result = search.search(&mut board);
    (result, board)
}

fn params(depth: u8) -> SearchParams {
    SearchParams::new().max_depth(depth).tt_size_mb(1)
}

#[test]
fn checkmate_at_root_is_not_a_move() {
    let (result, _) = search("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1", params(4));
    assert!(!result.is_move_found());
    assert_eq!(result.score, -MATE);
    assert!(result.pv.is_empty());
}

#[test]
fn stalemate_at_root_scores_zero() {
    for fen in [
        "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1",
        "k7/2Q5/1K6/8/8/8/8/8 b - - 0 1",
    ] {
        let (result, _) = search(fen, params(4));
        assert!(!result.is_move_found(), "{fen}");
        assert_eq!(result.score, 0, "{fen}");
    }
}

#[test]
fn shorter_mate_is_preferred() {
    // Ra8# now, or a slower mate
    let (result, _) = search("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1", params(4));
    assert_eq!(result.best_move.unwrap().to_uci(), "a1a8");
    assert_eq!(result.score, MATE - 1);
}

#[test]
fn mate_in_two_is_found() {
    // Rook ladder: one rook cuts off the seventh rank, the other mates on the eighth
    let (result, _) = search("6k1/8/8/8/8/8/R7/1R4K1 w - - 0 1", params(4));
    assert_eq!(result.score, MATE - 3);
    let first = result.best_move.unwrap().to_uci();
    assert!(first == "a2a7" || first == "b1b7", "unexpected first move {first}");
}

#[test]
fn scores_stay_inside_the_window() {
    let (result, board) = search(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        params(3),
    );
    assert!(result.score > -INF && result.score < INF);
    assert!(result.is_move_found());
    assert_eq!(board.ply_count(), 0);
}

#[test]
fn every_configuration_agrees_on_a_forced_mate() {
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let configs = [
        params(3),
        params(3).tt_cutoffs(false),
        params(3).see_ordering(false),
        params(3).replacement(ReplacementPolicy::DepthPreferred),
        params(3).evaluation(EvalKind::Simple),
    ];
    for config in configs {
        let (result, _) = search(fen, config.clone());
        assert_eq!(result.best_move.unwrap().to_uci(), "a1a8", "{config:?}");
        assert_eq!(result.score, MATE - 1, "{config:?}");
    }
}

#[test]
fn returned_move_is_legal_and_leads_the_pv() {
    let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
    let (result, mut board) = search(fen, params(4));
    let best = result.best_move.unwrap();
    assert!(board.generate_legal_moves().contains(&best));
    assert_eq!(result.pv.first(), Some(&best));
    assert!(result.depth >= 1 && result.depth <= 4);
    assert!(result.nodes > 0);
}

#[test]
fn table_persists_between_searches() {
    let mut board = Board::startpos();
    let mut search = Search::new(params(3));
    search.search(&mut board);
    let first_fill = search.tt().fill_percentage();
    assert!(first_fill > 0.0);

    // A second search of the same position starts from a warm table
    search.search(&mut board);
    assert!(search.stats().tt_hits > 0);

    search.clear_tt();
    assert_eq!(search.tt().fill_percentage(), 0.0);
}
