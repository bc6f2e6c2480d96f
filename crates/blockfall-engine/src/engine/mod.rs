//! Game controller and the state it manages.
//!
//! This module drives the core data structures through a game:
//!
//! - [`Game`] - Board, active piece, gravity, locking, and host edits
//! - [`GameConfig`] - Board dimensions and timing constants
//! - [`GameStats`] - Rows cleared, T-spins, and lock counts
//! - [`GameEvent`] - Outcomes the host can log or react to
//! - [`StatusMessage`] - Timed feedback text ("Tetris!", "Game Over!", ...)
//! - [`PieceGenerator`] - Seedable uniform piece selection
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] from a [`GameConfig`]; the first piece spawns at the
//!    top center
//! 2. Call [`Game::tick`] with the current time every frame to apply gravity
//! 3. Forward player input to the move, rotate, and slam operations
//! 4. A piece locks after repeated failed drops; full rows are cleared and the
//!    next piece spawns
//! 5. Play stops when a piece cannot spawn, until [`Game::reset`]
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Game, GameConfig, GameEvent};
//!
//! let mut game = Game::new(GameConfig::default()).unwrap();
//!
//! let mut now = Duration::ZERO;
//! while game.stats().locked_pieces() == 0 {
//!     now += Duration::from_millis(100);
//!     game.tick(now);
//! }
//!
//! let events = game.take_events();
//! assert!(events[0].is_piece_locked());
//! ```

pub use self::{
    game::*, game_config::*, game_event::*, game_stats::*, piece_generator::*, status_message::*,
};

mod game;
mod game_config;
mod game_event;
mod game_stats;
mod piece_generator;
mod status_message;
