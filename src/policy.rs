// Difficulty policy: maps a level from 1 to 10 onto a move-selection strategy
//
// Level 1 is uniform random, 2-3 mix win/block tiering with the one-ply heuristic,
// 4 is the pure heuristic, 5 occasionally searches one ply, and 6-10 run alpha-beta
// at increasing depth. Every path falls back to the heuristic if search finds nothing.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::config::{Config, MoveOrderingConfig, PolicyConfig};
use crate::eval::{Evaluator, Perspective};
use crate::game::GameState;
use crate::search::SearchEngine;
use crate::types::{Move, Outcome, Player};

/// Difficulty level, always within 1..=10
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASIEST: Difficulty = Difficulty(1);
    pub const HARDEST: Difficulty = Difficulty(10);

    /// Returns None outside 1..=10
    pub fn new(level: u8) -> Option<Self> {
        (1..=10).contains(&level).then_some(Difficulty(level))
    }

    /// Clamps any integer into 1..=10
    pub fn clamped(level: i64) -> Self {
        Difficulty(level.clamp(1, 10) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Difficulty::new(level).ok_or_else(|| format!("difficulty {} outside 1..=10", level))
    }
}

impl From<Difficulty> for u8 {
    fn from(level: Difficulty) -> u8 {
        level.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Move selection for one engine-controlled seat
#[derive(Debug, Clone)]
pub struct Policy {
    config: PolicyConfig,
    ordering: MoveOrderingConfig,
    evaluator: Evaluator,
}

impl Policy {
    pub fn new(config: &Config, perspective: Perspective) -> Self {
        Policy {
            config: config.policy.clone(),
            ordering: config.move_ordering.clone(),
            evaluator: Evaluator::new(config.scores.clone(), perspective),
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.evaluator.perspective()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Picks a move for the player to move at `level`.
    /// Returns None only when the state has no legal moves.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        level: Difficulty,
        rng: &mut R,
    ) -> Option<Move> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return None;
        }

        let chosen = match level.level() {
            1 => self.random_move(state, &moves, rng),
            2 | 3 => {
                let chance = self
                    .config
                    .blend_heuristic_chance
                    .get(level.level() as usize - 2)
                    .copied()
                    .unwrap_or(0.0);
                if rng.random_bool(chance.clamp(0.0, 1.0)) {
                    self.heuristic_move(state, rng)
                } else {
                    self.tiered_move(state, &moves, rng)
                }
            }
            4 => self.heuristic_move(state, rng),
            5 => {
                if rng.random_bool(self.config.shallow_minimax_chance.clamp(0.0, 1.0)) {
                    self.search_move(state, 1)
                } else {
                    self.heuristic_move(state, rng)
                }
            }
            _ => {
                let depth = self.search_depth_for(level, moves.len());
                self.search_move(state, depth)
            }
        };

        chosen.or_else(|| self.heuristic_move(state, rng))
    }

    /// Uniform random move, optionally taking a game-winning move first
    pub fn random_move<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        moves: &[Move],
        rng: &mut R,
    ) -> Option<Move> {
        if self.config.random_takes_wins {
            if let Some(mv) = game_winning_moves(state, moves).choose(rng) {
                return Some(*mv);
            }
        }
        moves.choose(rng).copied()
    }

    /// Win the game, else win a sub-board, else block a sub-board, else random
    pub fn tiered_move<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        moves: &[Move],
        rng: &mut R,
    ) -> Option<Move> {
        let mover = state.current_player();
        let board_wins: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|mv| completes_line(state, *mv, mover))
            .collect();

        let winning = game_winning_moves(state, &board_wins);
        if let Some(mv) = winning.choose(rng) {
            return Some(*mv);
        }
        if let Some(mv) = board_wins.choose(rng) {
            return Some(*mv);
        }

        let blocks: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|mv| {
                (0..state.num_players())
                    .filter_map(Player::from_index)
                    .filter(|&p| p != mover)
                    .any(|p| completes_line(state, *mv, p))
            })
            .collect();
        if let Some(mv) = blocks.choose(rng) {
            return Some(*mv);
        }

        moves.choose(rng).copied()
    }

    /// Best immediate evaluator score for the player to move over all legal
    /// moves, ties broken at random
    pub fn heuristic_move<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> Option<Move> {
        let evaluator = self.evaluator_for(state.current_player());
        let mut best_score = i32::MIN;
        let mut best_moves = Vec::new();

        for mv in state.legal_moves() {
            let Some(next) = state.try_apply_move(mv) else {
                continue;
            };
            let score = evaluator.evaluate(&next);
            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(mv);
            } else if score == best_score {
                best_moves.push(mv);
            }
        }

        best_moves.choose(rng).copied()
    }

    /// Evaluator that scores positions for `mover`
    fn evaluator_for(&self, mover: Player) -> Cow<'_, Evaluator> {
        let perspective = self.perspective();
        if mover == perspective.engine {
            Cow::Borrowed(&self.evaluator)
        } else {
            Cow::Owned(Evaluator::new(
                self.evaluator.scores().clone(),
                Perspective::new(mover, perspective.engine),
            ))
        }
    }

    /// Alpha-beta move at `depth`; None only if the state has no moves
    pub fn search_move(&self, state: &GameState, depth: u8) -> Option<Move> {
        let mut engine = SearchEngine::new(&self.evaluator, &self.ordering);
        let result = engine.search(state, depth);
        if result.best_move.is_none() {
            debug!("Search at depth {} returned no move", depth);
        }
        result.best_move
    }

    /// Search depth for levels 6 and up. Level 10 is capped by the adaptive
    /// rules when the branching factor is large.
    pub fn search_depth_for(&self, level: Difficulty, branching: usize) -> u8 {
        let depths = &self.config.search_depths;
        let index = (level.level().saturating_sub(6) as usize)
            .min(depths.len().saturating_sub(1));
        let depth = depths.get(index).copied().unwrap_or(1);

        if level != Difficulty::HARDEST {
            return depth;
        }

        self.config
            .adaptive_depth
            .iter()
            .find(|rule| branching > rule.branching_above)
            .map_or(depth, |rule| depth.min(rule.max_depth))
    }
}

/// True if `player` would complete a line on the move's sub-board by playing there
fn completes_line(state: &GameState, mv: Move, player: Player) -> bool {
    state
        .board(mv.board_index())
        .with_mark(mv.cell_index(), player)
        .winner()
        == Some(player)
}

/// Moves among `candidates` that end the game in the mover's favour
fn game_winning_moves(state: &GameState, candidates: &[Move]) -> Vec<Move> {
    let mover = state.current_player();
    candidates
        .iter()
        .copied()
        .filter(|mv| {
            state
                .try_apply_move(*mv)
                .is_some_and(|next| next.outcome() == Outcome::Won(mover))
        })
        .collect()
}
