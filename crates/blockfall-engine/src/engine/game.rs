use std::{mem, time::Duration};

use crate::{
    CellOutOfRangeError, ConfigError, SetPieceError,
    core::{
        board::{Board, BoardSize, Cell},
        cell_view::CellView,
        color::Color,
        piece::{ActivePiece, PieceKind},
    },
};

use super::{
    game_config::GameConfig,
    game_event::GameEvent,
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
    status_message::StatusMessage,
};

/// Anchor offsets tried after a rotation, unshifted first.
const KICK_OFFSETS: [i32; 3] = [0, 1, -1];

/// Single-step neighbours checked when a T piece locks.
const T_SPIN_NEIGHBORS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// The simulation controller.
///
/// `Game` owns the board, the active piece, and every counter. The host feeds
/// it time through [`Game::tick`] and player input through the move, rotate
/// and slam operations, then reads state back for display.
///
/// Blocked moves and rotations return `false`; with no active piece (after
/// game over) they do nothing and return `true`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Game, GameConfig, PieceSeed};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut game = Game::with_seed(GameConfig::default(), seed).unwrap();
///
/// game.move_left();
/// game.rotate_cw();
/// game.tick(Duration::from_millis(500));
/// game.slam_down();
///
/// assert_eq!(game.stats().locked_pieces(), 1);
/// assert!(!game.is_game_over());
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    generator: PieceGenerator,
    active: Option<ActivePiece>,
    stats: GameStats,
    status: GameStatus,
    message: Option<StatusMessage>,
    events: Vec<GameEvent>,
    now: Duration,
    last_down_time: Duration,
    failed_down_attempts: u32,
}

impl Game {
    /// Creates a game with a randomly seeded piece generator.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Creates a game whose piece sequence is fully determined by `seed`.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_generator(config, PieceGenerator::with_seed(seed))
    }

    pub fn with_generator(
        config: GameConfig,
        generator: PieceGenerator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let size = config.board_size().map_err(ConfigError::BoardSize)?;
        let board = Board::new(size, config.hidden_rows);
        let mut game = Self {
            config,
            board,
            generator,
            active: None,
            stats: GameStats::new(),
            status: GameStatus::Playing,
            message: None,
            events: Vec::new(),
            now: Duration::ZERO,
            last_down_time: Duration::ZERO,
            failed_down_attempts: 0,
        };
        game.spawn_piece();
        Ok(game)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn rows_cleared(&self) -> usize {
        self.stats.rows_cleared()
    }

    #[must_use]
    pub fn t_spin_count(&self) -> usize {
        self.stats.t_spin_count()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Time of the most recent [`Self::tick`]; the clock for every timestamp
    /// the game records.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn last_down_time(&self) -> Duration {
        self.last_down_time
    }

    #[must_use]
    pub fn failed_down_attempts(&self) -> u32 {
        self.failed_down_attempts
    }

    /// The latest status message, expired or not.
    #[must_use]
    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// The latest status message if it has not expired at [`Self::now`].
    #[must_use]
    pub fn visible_message(&self) -> Option<&StatusMessage> {
        self.message.as_ref().filter(|m| !m.is_expired(self.now))
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Returns what to draw at visible cell `(col, row)`; row 0 is the top
    /// visible row.
    #[must_use]
    pub fn cell_view(&self, col: usize, row: usize) -> Option<CellView> {
        if row >= self.board.visible_rows() {
            return None;
        }
        let board_row = row + self.board.hidden_rows();
        let cell = *self.board.cell(col, board_row)?;
        Some(CellView::new(
            cell,
            self.active.as_ref(),
            coord(col),
            coord(board_row),
        ))
    }

    /// Iterates over every visible cell as `(col, row, view)`, row by row.
    pub fn visible_cells(&self) -> impl Iterator<Item = (usize, usize, CellView)> + '_ {
        let cols = self.board.cols();
        (0..self.board.visible_rows()).flat_map(move |row| {
            (0..cols).filter_map(move |col| self.cell_view(col, row).map(|view| (col, row, view)))
        })
    }

    /// Advances gravity to `now`.
    ///
    /// Elapsed time since the last downward step is converted into whole
    /// cell steps at `fall_speed` cells per second. The fractional remainder
    /// carries over to the next tick, so the average rate does not depend on
    /// how often the host calls this. Each step that cannot move the piece
    /// counts as a failed attempt; reaching `lock_delay_attempts` locks it.
    pub fn tick(&mut self, now: Duration) {
        self.now = now;
        if !self.status.is_playing() || self.active.is_none() {
            return;
        }
        let fall_speed = self.config.fall_speed;
        if fall_speed <= 0.0 {
            return;
        }

        let elapsed = now.saturating_sub(self.last_down_time);
        let steps = (elapsed.as_secs_f64() * fall_speed).floor();
        if steps < 1.0 {
            return;
        }
        self.last_down_time =
            (self.last_down_time + Duration::from_secs_f64(steps / fall_speed)).min(now);

        let lock_delay = self.config.lock_delay_attempts;
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = steps as u64;
        for _ in 0..steps {
            if self.try_shift(0, 1) {
                continue;
            }
            self.failed_down_attempts += 1;
            // A blocked piece stays blocked; the remaining steps would only fail.
            if self.failed_down_attempts >= lock_delay {
                break;
            }
        }

        if self.failed_down_attempts >= lock_delay {
            self.lock_current_piece();
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    /// Moves the piece one row down and restarts the gravity timer.
    ///
    /// The timer restarts at [`Self::now`], the time of the latest
    /// [`Self::tick`], not at the moment of the call. Hosts that forward
    /// input between ticks should tick first for exact timing.
    pub fn move_down(&mut self) -> bool {
        if self.active.is_none() {
            return true;
        }
        self.last_down_time = self.now;
        self.try_shift(0, 1)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.try_rotate(ActivePiece::rotated_cw)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.try_rotate(ActivePiece::rotated_ccw)
    }

    /// Drops the piece as far as it goes and locks it immediately.
    pub fn slam_down(&mut self) {
        if self.active.is_none() {
            return;
        }
        while self.move_down() {}
        self.lock_current_piece();
    }

    /// Empties the board, zeroes the counters, and spawns a fresh piece.
    pub fn reset(&mut self) {
        self.board.clear();
        self.reset_state();
        self.spawn_piece();
    }

    /// Switches to a new board size.
    ///
    /// Returns `false` and changes nothing when the size is unchanged.
    /// Otherwise the board is rebuilt at the new size and fully cleared,
    /// counters and timers are reset, and a fresh piece spawns.
    pub fn resize(&mut self, size: BoardSize) -> bool {
        if size == self.board.size() {
            return false;
        }
        let mut board = self.board.resized(size);
        // Carried-over blocks can leave islands the sweep never reaches.
        board.clear();
        self.board = board;
        self.reset_state();
        self.spawn_piece();
        true
    }

    /// Fills or empties a visible cell on behalf of the host.
    ///
    /// The line-clear sweep runs right away, so an edit that completes a row
    /// removes it. An edit under the active piece is not checked; that piece
    /// is rejected when it locks.
    pub fn set_cell(
        &mut self,
        col: usize,
        row: usize,
        filled: bool,
    ) -> Result<(), CellOutOfRangeError> {
        if col >= self.board.cols() || row >= self.board.visible_rows() {
            return Err(CellOutOfRangeError { col, row });
        }
        let cell = if filled {
            Cell::filled(Color::MAGENTA)
        } else {
            Cell::EMPTY
        };
        self.board
            .set_cell(col, row + self.board.hidden_rows(), cell);
        self.message = Some(StatusMessage::cell_edited(self.now));
        self.clear_full_rows();
        Ok(())
    }

    /// Replaces the active piece, as if it had just spawned.
    pub fn set_active_piece(&mut self, piece: ActivePiece) -> Result<(), SetPieceError> {
        if self.status.is_game_over() {
            return Err(SetPieceError::GameOver);
        }
        let validity = self.board.check_piece(&piece);
        if !validity.is_valid() {
            return Err(SetPieceError::Collision { validity });
        }
        self.active = Some(piece);
        self.last_down_time = self.now;
        self.failed_down_attempts = 0;
        Ok(())
    }

    fn try_shift(&mut self, dcol: i32, drow: i32) -> bool {
        let Some(piece) = self.active else {
            return true;
        };
        self.try_commit([piece.shifted(dcol, drow)])
    }

    fn try_rotate(&mut self, rotate: fn(&ActivePiece) -> ActivePiece) -> bool {
        let Some(piece) = self.active else {
            return true;
        };
        let rotated = rotate(&piece);
        let kicks = KICK_OFFSETS.iter().flat_map(|&drow| {
            KICK_OFFSETS
                .iter()
                .map(move |&dcol| rotated.shifted(dcol, drow))
        });
        self.try_commit(kicks)
    }

    /// Commits the first valid candidate. The active piece is left untouched
    /// when none fits.
    fn try_commit(&mut self, candidates: impl IntoIterator<Item = ActivePiece>) -> bool {
        let Some(piece) = candidates
            .into_iter()
            .find(|candidate| self.board.check_piece(candidate).is_valid())
        else {
            return false;
        };
        self.active = Some(piece);
        self.failed_down_attempts = self.failed_down_attempts.saturating_sub(1);
        true
    }

    fn lock_current_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let validity = self.board.check_piece(&piece);
        if !validity.is_valid() {
            self.events.push(GameEvent::LockRejected {
                kind: piece.kind(),
                validity,
            });
            self.spawn_piece();
            return;
        }

        let t_spin = piece.kind() == PieceKind::T && self.is_wedged(&piece);
        if t_spin {
            self.stats.record_t_spin();
            self.message = Some(StatusMessage::t_spin(self.now));
        }

        self.board.fill_piece(&piece);
        let rows_cleared = self.clear_full_rows();
        self.stats.complete_piece_lock(rows_cleared);
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind(),
            rows_cleared,
            t_spin,
        });

        self.spawn_piece();
    }

    fn is_wedged(&self, piece: &ActivePiece) -> bool {
        T_SPIN_NEIGHBORS.iter().all(|&(dcol, drow)| {
            !self
                .board
                .check_piece(&piece.shifted(dcol, drow))
                .is_valid()
        })
    }

    fn clear_full_rows(&mut self) -> usize {
        let cleared = self.board.clear_full_rows();
        self.stats.record_cleared_rows(cleared);
        if cleared == 4 {
            self.message = Some(StatusMessage::tetris(self.now));
        }
        cleared
    }

    fn spawn_piece(&mut self) {
        let kind = self.generator.next_kind();
        let piece = ActivePiece::new(kind, coord(self.board.cols() / 2), 0);
        self.last_down_time = self.now;
        self.failed_down_attempts = 0;

        if self.board.check_piece(&piece).is_valid() {
            self.active = Some(piece);
            return;
        }

        self.active = None;
        self.status = GameStatus::GameOver;
        self.message = Some(StatusMessage::game_over(self.now));
        self.events.push(GameEvent::GameOver);
    }

    fn reset_state(&mut self) {
        self.active = None;
        self.stats = GameStats::new();
        self.status = GameStatus::Playing;
        self.failed_down_attempts = 0;
        self.last_down_time = self.now;
        self.message = Some(StatusMessage::reset(self.now));
        self.events.push(GameEvent::Reset);
    }
}

/// Board coordinates fit in `i32`: [`BoardSize`] caps every side.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn coord(value: usize) -> i32 {
    value as i32
}
