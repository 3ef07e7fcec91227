// Library exports for the queue-driven ultimate tic-tac-toe engine
// The selfplay tool and integration tests drive the game through these modules

pub mod bot;
pub mod config;
pub mod eval;
pub mod game;
pub mod persistence;
pub mod policy;
pub mod queue;
pub mod scoring;
pub mod search;
pub mod types;
