use serde::{Deserialize, Serialize};

use crate::{BoardSize, BoardSizeError, ConfigError};

/// Tuning constants for a [`Game`](super::Game).
///
/// Missing fields take their defaults when deserializing, so a config file
/// only needs the values it changes:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "fall_speed": 5.0 }"#).unwrap();
/// assert_eq!(config.fall_speed, 5.0);
/// assert_eq!(config.cols, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Rows shown to the player.
    pub visible_rows: usize,
    /// Rows above the playfield used for spawning and rotation overhang.
    pub hidden_rows: usize,
    /// Gravity in cells per second. Zero disables gravity.
    pub fall_speed: f64,
    /// Consecutive failed gravity steps tolerated before a piece locks.
    pub lock_delay_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: BoardSize::DEFAULT.cols(),
            visible_rows: BoardSize::DEFAULT.visible_rows(),
            hidden_rows: 2,
            fall_speed: 2.0,
            lock_delay_attempts: 2,
        }
    }
}

impl GameConfig {
    pub fn board_size(&self) -> Result<BoardSize, BoardSizeError> {
        BoardSize::new(self.cols, self.visible_rows)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fall_speed.is_finite() || self.fall_speed < 0.0 {
            return Err(ConfigError::InvalidFallSpeed {
                fall_speed: self.fall_speed,
            });
        }
        if self.lock_delay_attempts == 0 {
            return Err(ConfigError::ZeroLockDelay);
        }
        if self.hidden_rows > BoardSize::MAX_LEN {
            return Err(ConfigError::TooManyHiddenRows {
                hidden_rows: self.hidden_rows,
            });
        }
        self.board_size().map_err(ConfigError::BoardSize)?;
        Ok(())
    }
}
