//! Main search implementation
//!
//! Iterative deepening over a fail-hard negamax alpha-beta search, with a
//! quiescence search at the horizon, transposition table, and move ordering
//! from the previous iteration's principal variation, killers and history.

use crate::board::Board;
use crate::eval::{evaluate, Score};
use crate::moves::Move;

use super::ordering::{History, Killers, OrderedMoves, OrderingHints, MAX_PLY};
use super::params::SearchParams;
use super::stats::SearchStats;
use super::tt::{score_from_tt, score_to_tt, NodeType, TranspositionTable};

pub const INF: Score = 50000;
pub const MATE: Score = 49000;
/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_BOUND: Score = MATE - MAX_PLY as Score;

/// Score for the side to move being mated `ply` plies from the root.
#[inline]
pub fn mated_in(ply: usize) -> Score {
    -MATE + ply as Score
}

#[inline]
pub fn is_mate_score(score: Score) -> bool {
    score.abs() >= MATE_BOUND
}

/// Outcome of a root search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the root position has no legal move
    pub best_move: Option<Move>,
    /// From the side to move's point of view
    pub score: Score,
    /// Deepest completed iteration
    pub depth: u8,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

impl SearchResult {
    pub fn is_move_found(&self) -> bool {
        self.best_move.is_some()
    }
}

/// Searcher state. Owns the transposition table, which survives between
/// root searches; killers, history and the PV are reset per root search.
pub struct Search {
    params: SearchParams,
    tt: TranspositionTable,
    stats: SearchStats,
    killers: Killers,
    history: History,
    /// Triangular PV table: row `ply` holds the line from `ply` onward
    pv_table: Vec<[Move; MAX_PLY]>,
    pv_len: [usize; MAX_PLY],
    /// PV of the last completed iteration, followed first by the next one
    prev_pv: Vec<Move>,
}

impl Search {
    pub fn new(params: SearchParams) -> Self {
        let tt = TranspositionTable::new(params.tt_size_mb, params.replacement);
        Self {
            params,
            tt,
            stats: SearchStats::new(),
            killers: Killers::new(),
            history: History::new(),
            pv_table: vec![[Move::NULL; MAX_PLY]; MAX_PLY],
            pv_len: [0; MAX_PLY],
            prev_pv: Vec::new(),
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Replaces the parameters. The table is reallocated only when its size
    /// or replacement policy changes.
    pub fn set_params(&mut self, params: SearchParams) {
        if params.tt_size_mb != self.params.tt_size_mb || params.replacement != self.tt.policy() {
            self.tt = TranspositionTable::new(params.tt_size_mb, params.replacement);
        }
        self.params = params;
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned from earlier games.
    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    /// Iterative deepening from depth 1 to the configured maximum.
    ///
    /// Takes exclusive access to `board` for the whole search; every move
    /// played is taken back before this returns.
    pub fn search(&mut self, board: &mut Board) -> SearchResult {
        self.stats.reset();
        self.stats.start_timing();
        self.killers.clear();
        self.history.clear();
        self.prev_pv.clear();

        let root_moves = board.generate_legal_moves();
        if root_moves.is_empty() {
            let score = if board.in_check() { mated_in(0) } else { 0 };
            tracing::info!(score, "no legal move at the root");
            self.stats.update_timing();
            return SearchResult {
                best_move: None,
                score,
                depth: 0,
                nodes: 0,
                pv: Vec::new(),
            };
        }

        let mut best_move = root_moves[0];
        let mut best_score = -INF;
        let mut completed = 0;

        for depth in 1..=self.params.max_depth {
            let score = self.negamax(board, depth, -INF, INF, 0, true);

            let pv: Vec<Move> = self.pv_table[0][..self.pv_len[0]].to_vec();
            if let Some(&first) = pv.first() {
                best_move = first;
            }
            best_score = score;
            completed = depth;
            self.prev_pv = pv;

            self.stats.update_timing();
            tracing::info!(
                depth,
                score,
                nodes = self.stats.nodes,
                nps = self.stats.nps,
                pv = %format_pv(&self.prev_pv),
                "depth complete"
            );

            // Nothing deeper can beat a forced mate
            if is_mate_score(score) && MATE - score.abs() <= depth as Score {
                break;
            }
        }

        self.stats.update_timing();
        self.stats.log_summary();
        tracing::debug!(fill = self.tt.fill_percentage(), "transposition table usage");

        let pv = if self.prev_pv.is_empty() {
            vec![best_move]
        } else {
            self.prev_pv.clone()
        };
        SearchResult {
            best_move: Some(best_move),
            score: best_score,
            depth: completed,
            nodes: self.stats.nodes,
            pv,
        }
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: Score,
        beta: Score,
        ply: usize,
        follow_pv: bool,
    ) -> Score {
        self.pv_len[ply] = ply;

        if ply > 0 && is_draw_in_tree(board) {
            return 0;
        }
        if depth == 0 {
            return self.quiescence(board, alpha, beta, ply);
        }
        if ply >= MAX_PLY - 1 {
            return evaluate(board, board.side_to_move(), self.params.evaluation);
        }

        self.stats.inc_node();
        let key = board.zobrist();
        let mut tt_move = Move::NULL;
        if let Some(entry) = self.tt.probe(key) {
            self.stats.inc_tt_hit();
            tt_move = entry.best_move;
            if self.params.tt_cutoffs && ply > 0 && entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                let cutoff = match entry.node_type {
                    NodeType::Exact => Some(score.clamp(alpha, beta)),
                    NodeType::LowerBound if score >= beta => Some(beta),
                    NodeType::UpperBound if score <= alpha => Some(alpha),
                    _ => None,
                };
                if let Some(score) = cutoff {
                    self.stats.inc_tt_cutoff();
                    return score;
                }
            }
        }

        let side = board.side_to_move();
        let pv_move = if follow_pv {
            self.prev_pv.get(ply).copied().unwrap_or(Move::NULL)
        } else {
            Move::NULL
        };
        let moves = {
            let hints = OrderingHints {
                pv_move,
                tt_move,
                ply,
                killers: &self.killers,
                history: &self.history,
                see_ordering: self.params.see_ordering,
            };
            OrderedMoves::new(board, board.generate_moves(side), &hints)
        };

        let mut legal = 0;
        let mut best_move = Move::NULL;

        for mv in moves {
            let piece = board.piece(mv.from(), side);
            let quiet = !mv.is_capture() && !mv.is_promotion();

            let mut child = board.play(mv);
            if child.is_in_check(side) {
                continue;
            }
            legal += 1;
            let score = -self.negamax(
                &mut child,
                depth - 1,
                -beta,
                -alpha,
                ply + 1,
                follow_pv && mv == pv_move,
            );
            drop(child);

            if score > alpha && quiet {
                if let Some(piece) = piece {
                    self.history.update(side, piece, mv.to(), depth);
                }
            }
            if score >= beta {
                if quiet {
                    self.killers.store(ply, mv);
                }
                self.stats.inc_beta_cutoff();
                self.store(key, beta, depth, NodeType::LowerBound, mv, ply);
                return beta;
            }
            if score > alpha {
                alpha = score;
                best_move = mv;
                self.update_pv(ply, mv);
            }
        }

        if legal == 0 {
            let score = if board.in_check() { mated_in(ply) } else { 0 };
            self.store(key, score, depth, NodeType::Exact, Move::NULL, ply);
            return score;
        }

        let node_type = if best_move.is_null() {
            NodeType::UpperBound
        } else {
            NodeType::Exact
        };
        self.store(key, alpha, depth, node_type, best_move, ply);
        alpha
    }

    /// Captures-only search below the horizon. In check every legal move
    /// is searched, since standing pat is not an option there.
    fn quiescence(&mut self, board: &mut Board, mut alpha: Score, beta: Score, ply: usize) -> Score {
        self.pv_len[ply] = ply;
        self.stats.inc_qsearch_node();

        let side = board.side_to_move();
        if ply >= MAX_PLY - 1 {
            return evaluate(board, side, self.params.evaluation);
        }

        let in_check = board.in_check();
        if !in_check {
            let stand_pat = evaluate(board, side, self.params.evaluation);
            if stand_pat >= beta {
                return beta;
            }
            if stand_pat > alpha {
                alpha = stand_pat;
            }
        }

        let moves = {
            let hints = OrderingHints {
                pv_move: Move::NULL,
                tt_move: Move::NULL,
                ply,
                killers: &self.killers,
                history: &self.history,
                see_ordering: self.params.see_ordering,
            };
            let list = if in_check {
                board.generate_moves(side)
            } else {
                board.generate_captures(side)
            };
            OrderedMoves::new(board, list, &hints)
        };

        let mut legal = 0;
        for mv in moves {
            let mut child = board.play(mv);
            if child.is_in_check(side) {
                continue;
            }
            legal += 1;
            let score = -self.quiescence(&mut child, -beta, -alpha, ply + 1);
            drop(child);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        if in_check && legal == 0 {
            return mated_in(ply);
        }
        alpha
    }

    fn store(&mut self, key: u64, score: Score, depth: u8, node_type: NodeType, mv: Move, ply: usize) {
        self.tt.store(key, score_to_tt(score, ply), depth, node_type, mv);
        self.stats.inc_tt_store();
    }

    fn update_pv(&mut self, ply: usize, mv: Move) {
        let child_len = if ply + 1 < MAX_PLY {
            self.pv_len[ply + 1].max(ply + 1)
        } else {
            ply + 1
        };
        self.pv_table[ply][ply] = mv;
        for i in ply + 1..child_len {
            self.pv_table[ply][i] = self.pv_table[ply + 1][i];
        }
        self.pv_len[ply] = child_len;
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

/// Draws scored inside the tree: the fifty-move rule, insufficient
/// material, or any repetition of an earlier position.
fn is_draw_in_tree(board: &Board) -> bool {
    board.is_fifty_move_draw() || board.is_insufficient_material() || board.repetition_count() >= 1
}

pub fn format_pv(pv: &[Move]) -> String {
    pv.iter().map(|mv| mv.to_uci()).collect::<Vec<_>>().join(" ")
}
