pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "board size {cols}x{visible_rows} is outside the supported range (5x4 up to 4096x4096)"
)]
pub struct BoardSizeError {
    pub cols: usize,
    pub visible_rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({col}, {row}) is outside the visible board")]
pub struct CellOutOfRangeError {
    pub col: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SetPieceError {
    #[display("piece does not fit on the board ({validity:?})")]
    Collision { validity: Validity },
    #[display("game is over")]
    GameOver,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("fall speed must be a finite, non-negative number of cells per second, got {fall_speed}")]
    InvalidFallSpeed { fall_speed: f64 },
    #[display("lock delay must allow at least one failed drop")]
    ZeroLockDelay,
    #[display("hidden rows must not exceed {}, got {hidden_rows}", BoardSize::MAX_LEN)]
    TooManyHiddenRows { hidden_rows: usize },
    #[display("{_0}")]
    BoardSize(BoardSizeError),
}
