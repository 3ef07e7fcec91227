// End-of-game points for single-player sessions
// Pure arithmetic over a finished (or abandoned) game; submitting the result is the caller's job.

use crate::game::GameState;
use crate::policy::Difficulty;
use crate::types::{Outcome, Player};

const BASE_POINTS: i64 = 10_000;
const MOVE_PENALTY: i64 = 150;
const SECOND_PENALTY: i64 = 30;
const BOARD_WON_POINTS: i64 = 500;
const BOARD_LOST_PENALTY: i64 = 200;
const WIN_POINTS: i64 = 5_000;
const DRAW_POINTS: i64 = 1_000;

/// How a finished game ended for the scored player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

/// Inputs to the score formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParams {
    pub player_moves: u32,
    pub total_seconds: f64,
    pub boards_won: u32,
    pub boards_lost: u32,
    /// None while the game is still in progress
    pub result: Option<GameResult>,
    pub difficulty: Difficulty,
    pub hell_mode: bool,
}

/// Points for a game, never negative.
///
/// Starts from 10 000, loses 150 per move and 30 per whole second, gains 500 per
/// sub-board won and loses 200 per sub-board lost, adds 5 000 for a win or 1 000
/// for a draw, then scales by 0.5x (level 1) up to 2.5x (level 10) and doubles in
/// hell mode.
pub fn calculate_score(params: &ScoreParams) -> u64 {
    // Saturating so that non-finite or huge inputs cannot overflow
    let seconds = params.total_seconds.max(0.0).floor() as i64;
    let result_points = match params.result {
        Some(GameResult::Win) => WIN_POINTS,
        Some(GameResult::Draw) => DRAW_POINTS,
        Some(GameResult::Loss) | None => 0,
    };
    let score = BASE_POINTS
        .saturating_sub(params.player_moves as i64 * MOVE_PENALTY)
        .saturating_sub(seconds.saturating_mul(SECOND_PENALTY))
        .saturating_add(params.boards_won as i64 * BOARD_WON_POINTS)
        .saturating_sub(params.boards_lost as i64 * BOARD_LOST_PENALTY)
        .saturating_add(result_points);

    let multiplier = 0.5 + (params.difficulty.level() as f64 - 1.0) * (2.0 / 9.0);
    let mut scaled = (score as f64 * multiplier).round();
    if params.hell_mode {
        scaled = (scaled * 2.0).round();
    }

    scaled.max(0.0) as u64
}

/// Sub-boards won by `player` and won by anyone else
pub fn board_tally(state: &GameState, player: Player) -> (u32, u32) {
    state
        .global()
        .markers()
        .iter()
        .flatten()
        .fold((0, 0), |(won, lost), &owner| {
            if owner == player {
                (won + 1, lost)
            } else {
                (won, lost + 1)
            }
        })
}

/// Result of a finished game for `player`, None while in progress
pub fn result_for(state: &GameState, player: Player) -> Option<GameResult> {
    match state.outcome() {
        Outcome::InProgress => None,
        Outcome::Draw => Some(GameResult::Draw),
        Outcome::Won(winner) if winner == player => Some(GameResult::Win),
        Outcome::Won(_) => Some(GameResult::Loss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ScoreParams {
        ScoreParams {
            player_moves: 20,
            total_seconds: 90.7,
            boards_won: 3,
            boards_lost: 1,
            result: Some(GameResult::Win),
            difficulty: Difficulty::new(1).unwrap(),
            hell_mode: false,
        }
    }

    #[test]
    fn test_level_one_win() {
        // 10000 - 3000 - 2700 + 1500 - 200 + 5000 = 10600, x0.5
        assert_eq!(calculate_score(&params()), 5300);
    }

    #[test]
    fn test_hardest_level_hell_mode() {
        let p = ScoreParams {
            difficulty: Difficulty::HARDEST,
            hell_mode: true,
            ..params()
        };
        // 10600 x 2.5 x 2
        assert_eq!(calculate_score(&p), 53000);
    }

    #[test]
    fn test_score_never_negative() {
        let p = ScoreParams {
            player_moves: 200,
            result: Some(GameResult::Loss),
            ..params()
        };
        assert_eq!(calculate_score(&p), 0);
    }

    #[test]
    fn test_draw_bonus() {
        let p = ScoreParams {
            player_moves: 0,
            total_seconds: 0.0,
            boards_won: 0,
            boards_lost: 0,
            result: Some(GameResult::Draw),
            difficulty: Difficulty::new(1).unwrap(),
            hell_mode: false,
        };
        assert_eq!(calculate_score(&p), 5500);
    }

    #[test]
    fn test_unbounded_duration_floors_at_zero() {
        for seconds in [f64::INFINITY, f64::MAX, 1e300] {
            let p = ScoreParams {
                total_seconds: seconds,
                ..params()
            };
            assert_eq!(calculate_score(&p), 0);
        }
        let p = ScoreParams {
            total_seconds: f64::NAN,
            ..params()
        };
        // NaN counts as no time spent: 10000 - 3000 + 1500 - 200 + 5000 = 13300, x0.5
        assert_eq!(calculate_score(&p), 6650);
    }
}
