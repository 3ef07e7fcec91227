//! Difficulty Policy Tests
//!
//! Every level must return a legal move, level 1 must stay legal across many
//! random draws, and every level above 1 must take a game-winning move.

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use common::diagonal_threat;
use queue_ultimate_ttt::config::Config;
use queue_ultimate_ttt::eval::Perspective;
use queue_ultimate_ttt::game::GameState;
use queue_ultimate_ttt::policy::{Difficulty, Policy};
use queue_ultimate_ttt::types::{Move, Outcome, Player};

fn engine_as_x() -> Policy {
    Policy::new(
        &Config::default_hardcoded(),
        Perspective::new(Player::X, Player::O),
    )
}

/// 1,000 level-1 choices over mid-game states from 2-4 player playouts,
/// wildcard turns included, are all legal
#[test]
fn test_level_one_always_legal() {
    let policy = engine_as_x();
    let mut trials = 0;
    let mut wildcard_trials = 0;
    let mut seed = 0;

    while trials < 1000 {
        let num_players = 2 + (seed as usize % 3);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = GameState::new(num_players, None, &mut rng);

        while !state.is_over() {
            let legal = state.legal_moves();
            let mv = policy
                .choose_move(&state, Difficulty::EASIEST, &mut rng)
                .expect("in-progress game has moves");
            assert!(
                legal.contains(&mv),
                "level 1 chose illegal move {:?} (seed {})",
                mv,
                seed
            );

            trials += 1;
            if state.has_wildcard() {
                wildcard_trials += 1;
            }
            state = state.apply_move(mv);
        }
        seed += 1;
    }

    assert!(wildcard_trials > 0, "playouts should reach wildcard turns");
}

/// Level 1 spreads its choices over the legal moves
#[test]
fn test_level_one_varies() {
    let policy = engine_as_x();
    let mut rng = StdRng::seed_from_u64(2024);
    let state = GameState::new(2, Some(0), &mut rng);

    let seen: HashSet<Move> = (0..100)
        .filter_map(|_| policy.choose_move(&state, Difficulty::EASIEST, &mut rng))
        .collect();
    assert!(seen.len() > 1, "level 1 should spread over several moves");
}

/// Levels 1 through 8 answer a fresh game with a legal move
#[test]
fn test_every_level_returns_legal_move_on_fresh_game() {
    let policy = engine_as_x();
    let mut rng = StdRng::seed_from_u64(7);
    let state = GameState::new(2, Some(0), &mut rng);
    let legal = state.legal_moves();

    for level in 1..=8 {
        let level = Difficulty::new(level).unwrap();
        let mv = policy.choose_move(&state, level, &mut rng);
        assert!(
            mv.is_some_and(|m| legal.contains(&m)),
            "level {} returned {:?}",
            level,
            mv
        );
    }
}

/// Every level above 1 takes the game-winning move, and level 1 stays legal
#[test]
fn test_levels_take_game_winning_move() {
    let policy = engine_as_x();
    let mut rng = StdRng::seed_from_u64(11);
    let state = diagonal_threat();
    let legal = state.legal_moves();
    let winning = Move::from_indices(8, 2);

    let random = policy
        .choose_move(&state, Difficulty::EASIEST, &mut rng)
        .unwrap();
    assert!(legal.contains(&random));

    for level in 2..=10 {
        let level = Difficulty::new(level).unwrap();
        for _ in 0..5 {
            let mv = policy.choose_move(&state, level, &mut rng);
            assert_eq!(mv, Some(winning), "level {} missed the win", level);
        }
    }
    assert_eq!(
        state.apply_move(winning).outcome(),
        Outcome::Won(Player::X)
    );
}

/// When asked to move for the other seat, heuristic levels still play for
/// the seat to move and take its win
#[test]
fn test_heuristic_levels_play_for_the_seat_to_move() {
    let policy = Policy::new(
        &Config::default_hardcoded(),
        Perspective::new(Player::O, Player::X),
    );
    let mut rng = StdRng::seed_from_u64(19);
    let state = diagonal_threat();
    assert_eq!(state.current_player(), Player::X);

    for level in 2..=6 {
        let level = Difficulty::new(level).unwrap();
        for _ in 0..5 {
            assert_eq!(
                policy.choose_move(&state, level, &mut rng),
                Some(Move::from_indices(8, 2)),
                "level {} should take the mover's win",
                level
            );
        }
    }
}

/// Level 1 takes wins when configured to
#[test]
fn test_random_level_can_be_configured_to_take_wins() {
    let mut config = Config::default_hardcoded();
    config.policy.random_takes_wins = true;
    let policy = Policy::new(&config, Perspective::new(Player::X, Player::O));
    let mut rng = StdRng::seed_from_u64(3);
    let state = diagonal_threat();

    for _ in 0..20 {
        assert_eq!(
            policy.choose_move(&state, Difficulty::EASIEST, &mut rng),
            Some(Move::from_indices(8, 2))
        );
    }
}

/// Finished games yield no move at any level
#[test]
fn test_no_move_when_game_is_over() {
    let policy = engine_as_x();
    let mut rng = StdRng::seed_from_u64(1);
    let finished = diagonal_threat().apply_move(Move::from_indices(8, 2));

    for level in [1, 4, 6, 10] {
        let level = Difficulty::new(level).unwrap();
        assert_eq!(policy.choose_move(&finished, level, &mut rng), None);
    }
}

/// Out-of-range levels clamp into 1..=10
#[test]
fn test_difficulty_clamps() {
    assert_eq!(Difficulty::clamped(0), Difficulty::EASIEST);
    assert_eq!(Difficulty::clamped(99), Difficulty::HARDEST);
    assert_eq!(Difficulty::clamped(6).level(), 6);
}
