use arrocco::eval::{evaluate, evaluate_simple, evaluate_tapered, game_phase, MAX_PHASE};
use arrocco::{Board, Color, EvalKind, START_FEN};

const FENS: [&str; 6] = [
    START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "4k3/8/8/8/8/8/8/4K2R w K - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
];

/// Swap colours and flip the board vertically.
fn mirror_fen(fen: &str) -> String {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let placement: Vec<String> = fields[0]
        .split('/')
        .rev()
        .map(|rank| {
            rank.chars()
                .map(|c| {
                    if c.is_ascii_uppercase() {
                        c.to_ascii_lowercase()
                    } else {
                        c.to_ascii_uppercase()
                    }
                })
                .collect()
        })
        .collect();
    let side = if fields[1] == "w" { "b" } else { "w" };
    let castling: String = if fields[2] == "-" {
        "-".to_string()
    } else {
        let mut swapped: Vec<char> = fields[2]
            .chars()
            .map(|c| {
                if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect();
        swapped.sort_by_key(|c| (c.is_ascii_lowercase(), *c != 'K' && *c != 'k'));
        swapped.into_iter().collect()
    };
    let ep = if fields[3] == "-" {
        "-".to_string()
    } else {
        let mut chars = fields[3].chars();
        let file = chars.next().unwrap();
        let rank = if chars.next() == Some('3') { '6' } else { '3' };
        format!("{file}{rank}")
    };
    format!(
        "{} {side} {castling} {ep} {} {}",
        placement.join("/"),
        fields[4],
        fields[5]
    )
}

#[test]
fn side_symmetry() {
    for fen in FENS {
        let board = Board::from_fen(fen).unwrap();
        for kind in [EvalKind::Simple, EvalKind::Tapered] {
            assert_eq!(
                evaluate(&board, Color::White, kind),
                -evaluate(&board, Color::Black, kind),
                "{fen} {kind:?}"
            );
        }
    }
}

#[test]
fn colour_mirror_symmetry() {
    for fen in FENS {
        let board = Board::from_fen(fen).unwrap();
        let mirrored = Board::from_fen(&mirror_fen(fen)).unwrap();
        assert_eq!(evaluate_simple(&board), -evaluate_simple(&mirrored), "{fen}");
        assert_eq!(evaluate_tapered(&board), -evaluate_tapered(&mirrored), "{fen}");
        assert_eq!(
            evaluate(&board, board.side_to_move(), EvalKind::Tapered),
            evaluate(&mirrored, mirrored.side_to_move(), EvalKind::Tapered),
        );
    }
}

#[test]
fn start_position_is_balanced() {
    let board = Board::startpos();
    assert_eq!(evaluate_simple(&board), 0);
    assert_eq!(evaluate_tapered(&board), 0);
    assert_eq!(game_phase(&board), MAX_PHASE);
}

#[test]
fn material_advantage_shows() {
    let up_a_rook = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
    assert!(evaluate(&up_a_rook, Color::White, EvalKind::Simple) > 400);
    assert!(evaluate(&up_a_rook, Color::White, EvalKind::Tapered) > 400);
    assert!(evaluate(&up_a_rook, Color::Black, EvalKind::Tapered) < -400);
}

#[test]
fn phase_drops_as_pieces_come_off() {
    let full = Board::startpos();
    let no_queens =
        Board::from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
    let pawns_only = Board::from_fen("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1").unwrap();
    assert_eq!(game_phase(&full), 24);
    assert_eq!(game_phase(&no_queens), 16);
    assert_eq!(game_phase(&pawns_only), 0);
}

#[test]
fn mirror_helper_round_trips() {
    for fen in FENS {
        assert_eq!(mirror_fen(&mirror_fen(fen)), fen);
    }
}
