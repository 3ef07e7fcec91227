// Configuration module for reading Engine.toml
// All tunable engine parameters live here so search strength can be tuned without recompiling

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::Player;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub timing: TimingConfig,
    pub policy: PolicyConfig,
    pub scores: ScoresConfig,
    pub move_ordering: MoveOrderingConfig,
    pub players: PlayersConfig,
    pub game: GameConfig,
}

/// Background search budget
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    /// How long to wait on the background search before running it inline
    pub background_timeout_ms: u64,
    /// Lowest difficulty level that is sent to the background
    pub background_min_level: u8,
}

/// Difficulty level tuning
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PolicyConfig {
    /// Level 1 takes a game-winning move when one exists
    pub random_takes_wins: bool,
    /// Chance of the one-ply heuristic for levels 2 and 3 (otherwise win/block/random tiering)
    pub blend_heuristic_chance: Vec<f64>,
    /// Chance that level 5 runs a depth-1 search instead of the heuristic
    pub shallow_minimax_chance: f64,
    /// Search depths for levels 6 through 10
    pub search_depths: Vec<u8>,
    /// Level 10 depth caps by branching factor
    pub adaptive_depth: Vec<AdaptiveDepthRule>,
}

/// Caps search depth when the legal move count exceeds a threshold
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveDepthRule {
    pub branching_above: usize,
    pub max_depth: u8,
}

/// Bonuses for a line with no opposing marks, by number of own marks
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LineBands {
    pub three: i32,
    pub two: i32,
    pub one: i32,
}

impl LineBands {
    /// Score for a line holding `count` marks and no opposing marks
    pub fn for_count(&self, count: usize, empty: usize) -> i32 {
        match (count, empty) {
            (3, _) => self.three,
            (2, 1) => self.two,
            (1, 2) => self.one,
            _ => 0,
        }
    }
}

/// All evaluation and scoring constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoresConfig {
    // Terminal scores
    pub win: i32,
    pub draw: i32,
    pub depth_bonus: i32,

    // Positional weight per cell of a 3x3 grid, row-major
    pub cell_weights: [i32; 9],
    pub global_board_weight: i32,

    // Strategic adjustments
    pub wildcard_bonus: i32,
    pub funnel_bonus: i32,

    // Line bands
    pub small_own: LineBands,
    pub small_opponent: LineBands,
    pub global_own: LineBands,
    pub global_opponent: LineBands,
}

/// Move ordering constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MoveOrderingConfig {
    /// Plies from the root that get sorted (1 = root only)
    pub ordered_plies: u8,
    pub game_win_bonus: i32,
    pub board_win_bonus: i32,
    pub block_bonus: i32,
    pub positional_multiplier: i32,
    pub completion_bonus: i32,
}

/// Which symbols the engine and the human play in the two-party setup
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PlayersConfig {
    pub engine: Player,
    pub human: Player,
}

/// New game defaults
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub num_players: usize,
    pub random_start: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Engine.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Engine.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Engine.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Engine.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                background_timeout_ms: 5000,
                background_min_level: 7,
            },
            policy: PolicyConfig {
                random_takes_wins: false,
                blend_heuristic_chance: vec![0.25, 0.5],
                shallow_minimax_chance: 0.5,
                search_depths: vec![2, 3, 4, 6, 8],
                adaptive_depth: vec![
                    AdaptiveDepthRule {
                        branching_above: 40,
                        max_depth: 4,
                    },
                    AdaptiveDepthRule {
                        branching_above: 20,
                        max_depth: 5,
                    },
                    AdaptiveDepthRule {
                        branching_above: 9,
                        max_depth: 7,
                    },
                ],
            },
            scores: ScoresConfig {
                win: 10_000_000,
                draw: 0,
                depth_bonus: 1_000,
                cell_weights: [3, 2, 3, 2, 4, 2, 3, 2, 3],
                global_board_weight: 2_000,
                wildcard_bonus: 300,
                funnel_bonus: 150,
                small_own: LineBands {
                    three: 1_000,
                    two: 100,
                    one: 5,
                },
                small_opponent: LineBands {
                    three: 900,
                    two: 90,
                    one: 4,
                },
                global_own: LineBands {
                    three: 1_000_000,
                    two: 50_000,
                    one: 5_000,
                },
                global_opponent: LineBands {
                    three: 900_000,
                    two: 45_000,
                    one: 4_500,
                },
            },
            move_ordering: MoveOrderingConfig {
                ordered_plies: 2,
                game_win_bonus: 100_000,
                board_win_bonus: 1_000,
                block_bonus: 500,
                positional_multiplier: 10,
                completion_bonus: 200,
            },
            players: PlayersConfig {
                engine: Player::O,
                human: Player::X,
            },
            game: GameConfig {
                num_players: 2,
                random_start: false,
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Engine.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
