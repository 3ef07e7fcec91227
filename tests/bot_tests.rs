//! Bot Orchestration Tests
//!
//! Deep levels run on a blocking worker inside a tokio runtime; a zero budget
//! forces the inline fallback, which must still produce a legal move.

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;

use common::diagonal_threat;
use queue_ultimate_ttt::bot::{Bot, ExecutionStrategy};
use queue_ultimate_ttt::config::Config;
use queue_ultimate_ttt::eval::Perspective;
use queue_ultimate_ttt::policy::Difficulty;
use queue_ultimate_ttt::types::{Move, Player};

fn engine_as_x() -> Perspective {
    Perspective::new(Player::X, Player::O)
}

/// Inside a runtime, deep levels go to the background and shallow ones stay inline
#[tokio::test]
async fn test_strategy_depends_on_level() {
    let bot = Bot::new(Config::default_hardcoded());
    assert_eq!(
        bot.determine_strategy(Difficulty::HARDEST),
        ExecutionStrategy::Background
    );
    assert_eq!(
        bot.determine_strategy(Difficulty::new(3).unwrap()),
        ExecutionStrategy::Inline
    );
}

/// The background path returns the winning move
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_background_search_finds_win() {
    let bot = Bot::new(Config::default_hardcoded());
    let state = diagonal_threat();

    let mv = bot
        .get_move(&state, Difficulty::HARDEST, engine_as_x())
        .await;
    assert_eq!(mv, Some(Move::from_indices(8, 2)));
}

/// A zero budget falls back to the inline computation
#[tokio::test]
async fn test_zero_budget_falls_back_inline() {
    let mut config = Config::default_hardcoded();
    config.timing.background_timeout_ms = 0;
    config.timing.background_min_level = 1;
    let bot = Bot::new(config);
    let state = diagonal_threat();
    let legal = state.legal_moves();

    for level in [1, 4, 7, 10] {
        let level = Difficulty::new(level).unwrap();
        let mv = bot.get_move(&state, level, engine_as_x()).await;
        assert!(
            mv.is_some_and(|m| legal.contains(&m)),
            "level {} returned {:?}",
            level,
            mv
        );
    }
}

/// The synchronous path works without any runtime
#[test]
fn test_blocking_path_without_runtime() {
    let bot = Bot::new(Config::default_hardcoded());
    let state = diagonal_threat();

    assert_eq!(
        bot.determine_strategy(Difficulty::HARDEST),
        ExecutionStrategy::Inline
    );
    assert_eq!(
        bot.get_move_blocking(&state, Difficulty::HARDEST, engine_as_x()),
        Some(Move::from_indices(8, 2))
    );
}

/// With the default seating the engine plays O; asked to move for X it
/// still answers with X's winning move at every level
#[test]
fn test_mismatched_seat_still_plays_for_the_mover() {
    let bot = Bot::new(Config::default_hardcoded());
    let perspective = bot.default_perspective();
    let state = diagonal_threat();
    assert_ne!(state.current_player(), perspective.engine);

    for level in [2, 3, 4, 5, 6] {
        let level = Difficulty::new(level).unwrap();
        assert_eq!(
            bot.get_move_blocking(&state, level, perspective),
            Some(Move::from_indices(8, 2)),
            "level {} played against the seat to move",
            level
        );
    }
}

/// Finished games yield no move on either path
#[tokio::test]
async fn test_no_move_for_finished_game() {
    let bot = Bot::new(Config::default_hardcoded());
    let finished = diagonal_threat().apply_move(Move::from_indices(8, 2));

    assert_eq!(
        bot.get_move(&finished, Difficulty::HARDEST, engine_as_x()).await,
        None
    );
    assert_eq!(
        bot.get_move_blocking(&finished, Difficulty::EASIEST, engine_as_x()),
        None
    );
}

/// New games honour the configured player count and random start
#[test]
fn test_new_game_with_random_start() {
    let mut config = Config::default_hardcoded();
    config.game.random_start = true;
    config.game.num_players = 4;
    let bot = Bot::new(config);
    let mut rng = StdRng::seed_from_u64(17);

    let mut starters = [false; 4];
    for _ in 0..40 {
        let state = bot.new_game(None, &mut rng);
        assert_eq!(state.num_players(), 4);
        starters[state.current_player_index()] = true;
    }
    assert!(starters.iter().filter(|&&s| s).count() > 1);
}
