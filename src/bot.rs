// Engine-controlled player
//
// Bot owns the static configuration and decides where each move is computed. Deep
// levels are handed to a blocking worker and raced against a time budget; if the
// worker is late, unavailable, or fails, the same computation runs inline instead.
// Searches are never cancelled: a late background result is simply discarded.

use log::{info, warn};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::eval::Perspective;
use crate::game::GameState;
use crate::policy::{Difficulty, Policy};
use crate::types::Move;

/// Where a move computation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// On the caller's thread
    Inline,
    /// On a tokio blocking worker with a bounded wait
    Background,
}

/// Engine-controlled player with a fixed configuration
pub struct Bot {
    config: Config,
    /// Set once a background computation fails; later moves run inline
    background_failed: AtomicBool,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            background_failed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Perspective for the default engine-vs-human seating
    pub fn default_perspective(&self) -> Perspective {
        Perspective::from_config(&self.config.players)
    }

    /// Starts a game with a fresh master queue
    ///
    /// # Arguments
    /// * `num_players` - Seats in play; None uses the configured default
    /// * `rng` - Source for the queue shuffle and, if configured, the starting seat
    pub fn new_game<R: Rng + ?Sized>(&self, num_players: Option<usize>, rng: &mut R) -> GameState {
        let num_players = num_players.unwrap_or(self.config.game.num_players);
        let start = if self.config.game.random_start {
            None
        } else {
            Some(0)
        };
        let state = GameState::new(num_players, start, rng);
        info!(
            "GAME START: {} players, {} moves first",
            state.num_players(),
            state.current_player()
        );
        state
    }

    /// Logs the final result of a game
    pub fn end(&self, state: &GameState) {
        info!("GAME OVER: {:?}", state.outcome());
    }

    /// Computes the engine's move, using a background worker for deep levels
    ///
    /// # Arguments
    /// * `state` - Current game state; the engine's seat must be the one to move
    /// * `level` - Difficulty level
    /// * `perspective` - Which symbol is engine-controlled and which is human
    ///
    /// # Returns
    /// * `Option<Move>` - A legal move, or None if the state has no legal moves
    pub async fn get_move(
        &self,
        state: &GameState,
        level: Difficulty,
        perspective: Perspective,
    ) -> Option<Move> {
        let start_time = Instant::now();
        self.check_seat(state, perspective);

        let strategy = self.determine_strategy(level);
        info!("Level {}: computing move ({:?})", level, strategy);

        let chosen = match strategy {
            ExecutionStrategy::Inline => Self::compute_move(&self.config, state, level, perspective),
            ExecutionStrategy::Background => {
                self.compute_in_background(state, level, perspective).await
            }
        };

        Self::log_choice(level, chosen, start_time);
        chosen
    }

    /// Computes the engine's move on the calling thread
    pub fn get_move_blocking(
        &self,
        state: &GameState,
        level: Difficulty,
        perspective: Perspective,
    ) -> Option<Move> {
        let start_time = Instant::now();
        self.check_seat(state, perspective);

        let chosen = Self::compute_move(&self.config, state, level, perspective);
        Self::log_choice(level, chosen, start_time);
        chosen
    }

    /// Determines where the computation for `level` should run
    pub fn determine_strategy(&self, level: Difficulty) -> ExecutionStrategy {
        if level.level() < self.config.timing.background_min_level
            || self.background_failed.load(Ordering::Acquire)
            || tokio::runtime::Handle::try_current().is_err()
        {
            ExecutionStrategy::Inline
        } else {
            ExecutionStrategy::Background
        }
    }

    /// Races a blocking worker against the configured budget, falling back to
    /// an inline computation on timeout or failure
    async fn compute_in_background(
        &self,
        state: &GameState,
        level: Difficulty,
        perspective: Perspective,
    ) -> Option<Move> {
        let config = self.config.clone();
        let worker_state = state.clone();
        let handle = tokio::task::spawn_blocking(move || {
            Self::compute_move(&config, &worker_state, level, perspective)
        });

        let budget = Duration::from_millis(self.config.timing.background_timeout_ms);
        match tokio::time::timeout(budget, handle).await {
            Ok(Ok(chosen)) => chosen,
            Ok(Err(e)) => {
                warn!("Background search failed ({}), running inline from now on", e);
                self.background_failed.store(true, Ordering::Release);
                Self::compute_move(&self.config, state, level, perspective)
            }
            Err(_) => {
                warn!(
                    "Background search exceeded {}ms, running inline",
                    budget.as_millis()
                );
                Self::compute_move(&self.config, state, level, perspective)
            }
        }
    }

    /// Pure move computation shared by every execution path
    fn compute_move(
        config: &Config,
        state: &GameState,
        level: Difficulty,
        perspective: Perspective,
    ) -> Option<Move> {
        let policy = Policy::new(config, perspective);
        policy.choose_move(state, level, &mut rand::rng())
    }

    fn check_seat(&self, state: &GameState, perspective: Perspective) {
        if state.current_player() != perspective.engine {
            warn!(
                "Engine plays {} but {} is to move",
                perspective.engine,
                state.current_player()
            );
        }
    }

    fn log_choice(level: Difficulty, chosen: Option<Move>, start_time: Instant) {
        match chosen {
            Some(mv) => info!(
                "Level {}: chose {} ({:?}) in {}ms",
                level,
                mv,
                mv,
                start_time.elapsed().as_millis()
            ),
            None => info!("Level {}: no legal moves", level),
        }
    }
}
