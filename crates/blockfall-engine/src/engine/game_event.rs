use crate::{PieceKind, Validity};

/// Notable outcomes of a game operation, in the order they happened.
///
/// The engine does no I/O; hosts drain these with
/// [`Game::take_events`](super::Game::take_events) to log, count, or react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// A piece was merged into the board.
    PieceLocked {
        kind: PieceKind,
        rows_cleared: usize,
        t_spin: bool,
    },
    /// The piece to lock was found in an invalid position and was discarded
    /// without touching the board.
    LockRejected { kind: PieceKind, validity: Validity },
    /// A new piece could not spawn; play has stopped until reset.
    GameOver,
    /// The board was cleared and counters reset, by `reset` or `resize`.
    Reset,
}
