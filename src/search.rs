// Minimax search with alpha-beta pruning
//
// The engine-controlled player maximizes and its opponent minimizes. Which side is
// to move at a node is read from the state itself, since the state machine rotates
// through seats rather than alternating a fixed parity.

use log::debug;
use std::cmp::Reverse;

use crate::config::MoveOrderingConfig;
use crate::eval::Evaluator;
use crate::game::GameState;
use crate::types::{Move, LINES};

/// Result of a depth-bounded search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Score of the principal line from the engine's perspective
    pub score: i32,
    /// Best move at the root; None only if the root had no legal moves
    pub best_move: Option<Move>,
    /// Nodes visited
    pub nodes: u64,
    /// Depth actually searched
    pub depth: u8,
}

/// Single-threaded alpha-beta searcher
pub struct SearchEngine<'a> {
    evaluator: &'a Evaluator,
    ordering: &'a MoveOrderingConfig,
    nodes: u64,
}

impl<'a> SearchEngine<'a> {
    pub fn new(evaluator: &'a Evaluator, ordering: &'a MoveOrderingConfig) -> Self {
        SearchEngine {
            evaluator,
            ordering,
            nodes: 0,
        }
    }

    /// Searches `state` to `max_depth` plies (at least one)
    pub fn search(&mut self, state: &GameState, max_depth: u8) -> SearchResult {
        let depth = max_depth.max(1);
        self.nodes = 0;

        let (score, best_move) = self.alpha_beta(state, 0, depth, i32::MIN, i32::MAX);

        debug!(
            "Search depth {}: best {:?}, score {}, {} nodes",
            depth, best_move, score, self.nodes
        );

        SearchResult {
            score,
            best_move,
            nodes: self.nodes,
            depth,
        }
    }

    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u8,
        max_depth: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        if state.is_over() || depth >= max_depth {
            return (self.evaluator.evaluate_with_depth(state, max_depth - depth), None);
        }

        let mut moves = state.legal_moves();
        if moves.is_empty() {
            return (self.evaluator.evaluate_with_depth(state, max_depth - depth), None);
        }

        if depth < self.ordering.ordered_plies {
            moves.sort_unstable_by_key(|&mv| Reverse(self.ordering_score(state, mv)));
        }

        let maximizing = state.current_player() == self.evaluator.perspective().engine;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let Some(next) = state.try_apply_move(mv) else {
                continue;
            };
            let (score, _) = self.alpha_beta(&next, depth + 1, max_depth, alpha, beta);

            if maximizing {
                if best_move.is_none() || score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if best_move.is_none() || score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha {
                break;
            }
        }

        (best_score, best_move)
    }

    /// Cheap ordering key for `mv` from the mover's point of view.
    /// Works on copies of fixed-size arrays only.
    pub fn ordering_score(&self, state: &GameState, mv: Move) -> i32 {
        let board_index = mv.board_index();
        let cell = mv.cell_index();
        let mover = state.current_player();
        let board = state.board(board_index);
        let placed = board.with_mark(cell, mover);
        let cfg = self.ordering;

        let mut score = cfg.positional_multiplier * self.evaluator.scores().cell_weights[cell];

        let wins_board = placed.winner() == Some(mover);
        if wins_board {
            score += cfg.board_win_bonus;
            if state.global().with_winner(board_index, mover).winner() == Some(mover) {
                score += cfg.game_win_bonus;
            }
        }

        let blocks = LINES.iter().filter(|line| line.contains(&cell)).any(|line| {
            let mut others = line.iter().filter(|&&i| i != cell).map(|&i| board.get(i));
            match (others.next().flatten(), others.next().flatten()) {
                (Some(a), Some(b)) => a == b && a != mover,
                _ => false,
            }
        });
        if blocks {
            score += cfg.block_bonus;
        }

        if wins_board || placed.is_full() {
            score += cfg.completion_bonus;
        }

        score
    }
}
