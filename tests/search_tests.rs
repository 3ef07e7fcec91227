//! Alpha-Beta Search Tests
//!
//! The engine must find a single game-winning move at every shallow depth,
//! and prefer winning sooner over winning later.

mod common;

use common::diagonal_threat;
use queue_ultimate_ttt::config::Config;
use queue_ultimate_ttt::eval::{Evaluator, Perspective};
use queue_ultimate_ttt::search::SearchEngine;
use queue_ultimate_ttt::types::{Move, Player};

fn evaluator_for(engine: Player, opponent: Player) -> (Evaluator, Config) {
    let config = Config::default_hardcoded();
    let evaluator = Evaluator::new(config.scores.clone(), Perspective::new(engine, opponent));
    (evaluator, config)
}

/// The single immediately winning move is chosen at depths 1 through 3
#[test]
fn test_finds_single_winning_move_at_shallow_depths() {
    let state = diagonal_threat();
    let (evaluator, config) = evaluator_for(Player::X, Player::O);
    let mut engine = SearchEngine::new(&evaluator, &config.move_ordering);

    for depth in 1..=3 {
        let result = engine.search(&state, depth);
        assert_eq!(
            result.best_move,
            Some(Move::from_indices(8, 2)),
            "depth {} should take the winning move",
            depth
        );
        assert!(
            result.score >= config.scores.win,
            "a forced win scores at least the win value, got {}",
            result.score
        );
    }
}

/// An immediate win scores higher than the same win found deeper
#[test]
fn test_sooner_win_scores_higher() {
    let state = diagonal_threat();
    let (evaluator, config) = evaluator_for(Player::X, Player::O);
    let mut engine = SearchEngine::new(&evaluator, &config.move_ordering);

    let shallow = engine.search(&state, 1);
    let deep = engine.search(&state, 3);
    // Same immediate win, more plies left unused at the deeper horizon
    assert!(deep.score > shallow.score);
}

/// Depth zero still searches one ply and returns a legal move
#[test]
fn test_zero_depth_searches_one_ply() {
    let state = diagonal_threat();
    let (evaluator, config) = evaluator_for(Player::X, Player::O);
    let mut engine = SearchEngine::new(&evaluator, &config.move_ordering);

    let result = engine.search(&state, 0);
    assert_eq!(result.depth, 1);
    assert!(result.best_move.is_some());
    assert_eq!(result.nodes as usize, state.legal_moves().len() + 1);
}

/// Finished games have nothing to search
#[test]
fn test_finished_game_has_no_best_move() {
    let finished = diagonal_threat().apply_move(Move::from_indices(8, 2));
    assert!(finished.is_over());

    let (evaluator, config) = evaluator_for(Player::O, Player::X);
    let mut engine = SearchEngine::new(&evaluator, &config.move_ordering);
    let result = engine.search(&finished, 4);
    assert_eq!(result.best_move, None);
    assert!(result.score < 0, "X has won, so O's evaluation is negative");
}
