use serde::Serialize;

/// Game statistics: rows cleared, T-spins, and locked pieces.
///
/// Tracks the counters a host shows next to the board:
///
/// - **Rows cleared**: every row removed by the line-clear sweep, including
///   rows completed by host cell edits
/// - **T-spins**: T locks where the piece could not move in any direction
/// - **Locked pieces**: pieces merged into the board
/// - **Line clear distribution**: how many rows each lock removed
///
/// There is no score; counts are the only progress measure.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_cleared_rows(4);
/// stats.complete_piece_lock(4);
///
/// assert_eq!(stats.rows_cleared(), 4);
/// assert_eq!(stats.locked_pieces(), 1);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    rows_cleared: usize,
    t_spin_count: usize,
    locked_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows_cleared: 0,
            t_spin_count: 0,
            locked_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the total number of rows removed.
    #[must_use]
    pub const fn rows_cleared(&self) -> usize {
        self.rows_cleared
    }

    #[must_use]
    pub const fn t_spin_count(&self) -> usize {
        self.t_spin_count
    }

    /// Returns the number of pieces merged into the board.
    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Returns a histogram of rows removed per lock.
    ///
    /// Array indices represent:
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[3]`: singles, doubles, triples
    /// - `[4]`: four or more rows at once
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Adds rows removed by one line-clear sweep.
    pub const fn record_cleared_rows(&mut self, rows: usize) {
        self.rows_cleared += rows;
    }

    pub const fn record_t_spin(&mut self) {
        self.t_spin_count += 1;
    }

    /// Updates statistics after a piece lock.
    ///
    /// # Arguments
    ///
    /// * `cleared_rows` - Number of rows the lock's sweep removed
    pub fn complete_piece_lock(&mut self, cleared_rows: usize) {
        self.locked_pieces += 1;
        let bucket = cleared_rows.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
    }
}
