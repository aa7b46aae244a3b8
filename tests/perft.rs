use arrocco::search::{perft, perft_divide};
use arrocco::{Board, START_FEN};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0u64;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}

fn run_perft_check(fen_str: &str, depth: u32, name: &str) {
    let mut board = Board::from_fen(fen_str).expect("valid FEN");
    let before = board.clone();
    let ours = perft(&mut board, depth);
    assert_eq!(board, before, "{name}: perft left the board changed");

    let fen: Fen = fen_str.parse().unwrap();
    let pos: Chess = fen
        .into_position(CastlingMode::Standard)
        .expect("shakmaty should accept FEN");
    let theirs = perft_shakmaty(&pos, depth);

    assert_eq!(ours, theirs, "mismatch in {name} at depth {depth}");
}

#[test]
fn perft_starting_position() {
    let mut board = Board::startpos();
    assert_eq!(perft(&mut board, 1), 20);
    assert_eq!(perft(&mut board, 2), 400);
    assert_eq!(perft(&mut board, 3), 8902);
    assert_eq!(perft(&mut board, 4), 197281);
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn perft_kiwipete() {
    let mut board = Board::from_fen(KIWIPETE).unwrap();
    assert_eq!(perft(&mut board, 1), 48);
    assert_eq!(perft(&mut board, 2), 2039);
    assert_eq!(perft(&mut board, 3), 97862);
}

#[test]
fn perft_divide_matches_shakmaty_on_kiwipete() {
    let mut board = Board::from_fen(KIWIPETE).unwrap();
    let divide = perft_divide(&mut board, 2);

    let fen: Fen = KIWIPETE.parse().unwrap();
    let pos: Chess = fen.into_position(CastlingMode::Standard).unwrap();
    assert_eq!(divide.len(), pos.legal_moves().len());
    for m in pos.legal_moves() {
        let uci = m.to_uci(CastlingMode::Standard).to_string();
        let mut child = pos.clone();
        child.play_unchecked(&m);
        let expected = perft_shakmaty(&child, 1);
        let got = divide
            .iter()
            .find(|(mv, _)| mv.to_uci() == uci)
            .map(|&(_, n)| n);
        assert_eq!(got, Some(expected), "root move {uci}");
    }
}

#[test]
fn perft_en_passant_discovered_check() {
    // Taking en passant would expose the king on the fifth rank
    run_perft_check("8/8/8/k1pP4/8/8/8/4K3 w - c6 0 1", 3, "en passant discovered check");
    run_perft_check("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 1", 3, "en passant horizontal pin");
}

#[test]
fn perft_castling_prevented_by_attack() {
    run_perft_check("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1", 2, "castling in check");
}

#[test]
fn perft_castling_through_check() {
    run_perft_check("4k3/8/8/8/8/5r2/8/R3K2R w KQ - 0 1", 2, "castling through check");
}

#[test]
fn perft_promotion_capture() {
    run_perft_check("n1n5/P5P1/8/2k5/8/8/8/4K3 w - - 0 1", 3, "promotion capture");
}

#[test]
fn perft_complex_check_response() {
    run_perft_check(
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        3,
        "complex check response",
    );
}

#[test]
fn perft_endgame_with_pins() {
    run_perft_check("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4, "position 3");
}
