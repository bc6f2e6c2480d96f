use crate::BoardSizeError;

use super::{color::Color, piece::ActivePiece};

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub filled: bool,
    pub color: Color,
}

impl Cell {
    pub const EMPTY: Self = Self {
        filled: false,
        color: Color::WHITE,
    };

    #[must_use]
    pub const fn filled(color: Color) -> Self {
        Self {
            filled: true,
            color,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Outcome of placing a piece on the board.
///
/// The two invalid variants are distinguished for T-spin bookkeeping only;
/// callers that just need a yes/no use [`Validity::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Validity {
    Valid,
    /// A masked cell lies outside the grid (hidden rows included).
    OutOfBounds,
    /// A masked cell overlaps a filled cell.
    IntersectsBlock,
}

/// Visible dimensions of a board.
///
/// Hidden rows are not part of the size: they are a property of the game
/// configuration and stay constant across resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSize {
    cols: usize,
    visible_rows: usize,
}

impl BoardSize {
    /// Narrowest accepted board. Pieces spawn at anchor `cols / 2` and most
    /// base masks reach local column 2, so every kind fits from 5 columns up.
    pub const MIN_COLS: usize = 5;
    /// Shortest accepted visible area: one piece bounding box.
    pub const MIN_VISIBLE_ROWS: usize = 4;
    /// Longest accepted side, keeping every coordinate well inside `i32`.
    pub const MAX_LEN: usize = 4096;

    /// Standard 10×20 playfield.
    pub const DEFAULT: Self = Self {
        cols: 10,
        visible_rows: 20,
    };

    pub fn new(cols: usize, visible_rows: usize) -> Result<Self, BoardSizeError> {
        if !(Self::MIN_COLS..=Self::MAX_LEN).contains(&cols)
            || !(Self::MIN_VISIBLE_ROWS..=Self::MAX_LEN).contains(&visible_rows)
        {
            return Err(BoardSizeError { cols, visible_rows });
        }
        Ok(Self { cols, visible_rows })
    }

    /// Derives a board size from a host drawing area measured in pixels.
    ///
    /// Each cell is `block_size` pixels square; partial cells are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::BoardSize;
    ///
    /// let size = BoardSize::from_area(150, 290, 14).unwrap();
    /// assert_eq!((size.cols(), size.visible_rows()), (10, 20));
    ///
    /// assert!(BoardSize::from_area(40, 290, 14).is_err());
    /// ```
    pub fn from_area(width: u32, height: u32, block_size: u32) -> Result<Self, BoardSizeError> {
        let cols = width.checked_div(block_size).unwrap_or(0);
        let rows = height.checked_div(block_size).unwrap_or(0);
        Self::new(cols as usize, rows as usize)
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.visible_rows
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Flat grid of cells, hidden rows first.
///
/// # Layout
///
/// ```text
/// row 0                 ┐
/// ...                   │ hidden rows (spawn area, rotation overhang)
/// row hidden_rows - 1   ┘
/// row hidden_rows       ┐
/// ...                   │ visible playfield
/// row total_rows - 1    ┘
/// ```
///
/// Cell `(col, row)` is stored at `col + row * cols`. Hidden rows take part in
/// collision checks and line clears but are never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    hidden_rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    #[must_use]
    pub fn new(size: BoardSize, hidden_rows: usize) -> Self {
        let total_rows = size.visible_rows + hidden_rows;
        Self {
            size,
            hidden_rows,
            cells: vec![Cell::EMPTY; size.cols * total_rows],
        }
    }

    #[must_use]
    pub const fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.size.cols
    }

    #[must_use]
    pub const fn visible_rows(&self) -> usize {
        self.size.visible_rows
    }

    #[must_use]
    pub const fn hidden_rows(&self) -> usize {
        self.hidden_rows
    }

    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.size.visible_rows + self.hidden_rows
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.cols() && row < self.total_rows()).then(|| col + row * self.cols())
    }

    /// Returns the cell at `(col, row)`, counting rows from the top hidden row.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Overwrites the cell at `(col, row)`. Returns `false` when out of range.
    pub fn set_cell(&mut self, col: usize, row: usize, cell: Cell) -> bool {
        let Some(i) = self.index(col, row) else {
            return false;
        };
        self.cells[i] = cell;
        true
    }

    /// Iterates over all rows, hidden rows first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols())
    }

    /// Iterates over the rows that are shown to the player.
    pub fn visible_rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows().skip(self.hidden_rows)
    }

    /// Number of filled cells, hidden rows included.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.filled).count()
    }

    /// Returns the cells of one row, counting from the top hidden row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        let cols = self.cols();
        self.cells.get(row * cols..(row + 1) * cols)
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row)
            .is_some_and(|cells| cells.iter().all(|c| c.filled))
    }

    /// Checks whether `piece` fits on the board.
    ///
    /// Masked cells are visited in mask order and the first offending cell
    /// decides the result.
    #[must_use]
    pub fn check_piece(&self, piece: &ActivePiece) -> Validity {
        for (col, row) in piece.occupied_positions() {
            let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
                return Validity::OutOfBounds;
            };
            match self.cell(col, row) {
                None => return Validity::OutOfBounds,
                Some(cell) if cell.filled => return Validity::IntersectsBlock,
                Some(_) => {}
            }
        }
        Validity::Valid
    }

    /// Writes every masked cell of `piece` as filled with the piece color.
    ///
    /// Cells that fall outside the grid are skipped; callers lock only pieces
    /// that passed [`Self::check_piece`].
    pub fn fill_piece(&mut self, piece: &ActivePiece) {
        let cell = Cell::filled(piece.color());
        for (col, row) in piece.occupied_positions() {
            if let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) {
                self.set_cell(col, row, cell);
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top across hidden and visible rows. When a
    /// row is removed everything above it moves down by one, the top row is
    /// emptied, and the same row index is examined again before moving up.
    pub fn clear_full_rows(&mut self) -> usize {
        let cols = self.cols();
        let mut cleared = 0;
        let mut row = self.total_rows();
        while row > 0 {
            let r = row - 1;
            if !self.is_row_full(r) {
                row -= 1;
                continue;
            }
            cleared += 1;
            self.cells.copy_within(..r * cols, cols);
            self.cells[..cols].fill(Cell::EMPTY);
        }
        cleared
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Returns a board of the new size holding the overlapping top-left
    /// region of this one. Cells outside the overlap start empty.
    #[must_use]
    pub fn resized(&self, size: BoardSize) -> Self {
        let mut board = Self::new(size, self.hidden_rows);
        let cols = usize::min(self.cols(), board.cols());
        for (new_row, old_row) in board
            .cells
            .chunks_exact_mut(size.cols)
            .zip(self.rows())
        {
            new_row[..cols].copy_from_slice(&old_row[..cols]);
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn board_10x20() -> Board {
        Board::new(BoardSize::DEFAULT, 0)
    }

    fn fill_row(board: &mut Board, row: usize, color: Color) {
        for col in 0..board.cols() {
            board.set_cell(col, row, Cell::filled(color));
        }
    }

    fn row_filled(board: &Board, row: usize) -> Vec<bool> {
        (0..board.cols())
            .map(|col| board.cell(col, row).unwrap().filled)
            .collect()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(BoardSize::DEFAULT, 2);
        assert_eq!(board.total_rows(), 22);
        assert_eq!(board.rows().count(), 22);
        assert_eq!(board.visible_rows_iter().count(), 20);
        assert_eq!(board.filled_count(), 0);
        assert!(board.rows().flatten().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn test_board_size_minimum() {
        assert!(BoardSize::new(5, 4).is_ok());
        assert_eq!(
            BoardSize::new(4, 20),
            Err(BoardSizeError {
                cols: 4,
                visible_rows: 20
            })
        );
        assert!(BoardSize::new(5, 3).is_err());
        assert!(BoardSize::new(10, 0).is_err());
        assert!(BoardSize::new(BoardSize::MAX_LEN + 1, 20).is_err());
        assert!(BoardSize::from_area(100, 100, 0).is_err());
    }

    #[test]
    fn test_every_kind_fits_at_spawn_anchor_from_minimum_width() {
        for cols in BoardSize::MIN_COLS..=BoardSize::MIN_COLS + 16 {
            let size = BoardSize::new(cols, BoardSize::MIN_VISIBLE_ROWS).unwrap();
            let board = Board::new(size, 0);
            let anchor = i32::try_from(cols / 2).unwrap();
            for kind in PieceKind::ALL {
                assert_eq!(
                    board.check_piece(&ActivePiece::new(kind, anchor, 0)),
                    Validity::Valid,
                    "{kind:?} on {cols} columns"
                );
            }
        }
    }

    #[test]
    fn test_cell_out_of_range() {
        let mut board = board_10x20();
        assert!(board.cell(10, 0).is_none());
        assert!(board.cell(0, 20).is_none());
        assert!(!board.set_cell(10, 0, Cell::filled(Color::RED)));
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_check_piece_valid_and_out_of_bounds() {
        let board = board_10x20();
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 4, 0)),
            Validity::Valid
        );
        // O occupies local columns 1..=2, so anchor 8 pushes it past column 9.
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 8, 0)),
            Validity::OutOfBounds
        );
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, -2, 0)),
            Validity::OutOfBounds
        );
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 4, 18)),
            Validity::OutOfBounds
        );
        // Empty box columns may hang off the board.
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::I, -1, 0)),
            Validity::Valid
        );
    }

    #[test]
    fn test_check_piece_intersects_block() {
        let mut board = board_10x20();
        board.set_cell(5, 2, Cell::filled(Color::RED));
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 4, 1)),
            Validity::IntersectsBlock
        );
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 3, 1)),
            Validity::IntersectsBlock
        );
        assert_eq!(
            board.check_piece(&ActivePiece::new(PieceKind::O, 6, 1)),
            Validity::Valid
        );
    }

    #[test]
    fn test_fill_piece_writes_color() {
        let mut board = board_10x20();
        let piece = ActivePiece::new(PieceKind::L, 0, 0);
        board.fill_piece(&piece);
        assert_eq!(board.filled_count(), 4);
        for (col, row) in piece.occupied_positions() {
            let cell = board.cell(col as usize, row as usize).unwrap();
            assert_eq!(*cell, Cell::filled(PieceKind::L.color()));
        }
    }

    #[test]
    fn test_clear_full_rows_shifts_rows_down() {
        let mut board = board_10x20();
        fill_row(&mut board, 19, Color::RED);
        board.set_cell(3, 18, Cell::filled(Color::BLUE));
        board.set_cell(7, 17, Cell::filled(Color::GREEN));

        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.filled_count(), 2);
        assert_eq!(*board.cell(3, 19).unwrap(), Cell::filled(Color::BLUE));
        assert_eq!(*board.cell(7, 18).unwrap(), Cell::filled(Color::GREEN));
        assert!(!board.cell(3, 18).unwrap().filled);
    }

    #[test]
    fn test_clear_full_rows_rescans_same_index() {
        let mut board = board_10x20();
        // Two adjacent full rows: after clearing row 19 the former row 18 drops
        // into 19 and must be caught on the same pass.
        fill_row(&mut board, 18, Color::RED);
        fill_row(&mut board, 19, Color::RED);
        board.set_cell(0, 17, Cell::filled(Color::BLUE));

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.filled_count(), 1);
        assert!(board.cell(0, 19).unwrap().filled);
    }

    #[test]
    fn test_clear_full_rows_with_gap() {
        let mut board = board_10x20();
        fill_row(&mut board, 19, Color::RED);
        fill_row(&mut board, 17, Color::RED);
        board.set_cell(2, 18, Cell::filled(Color::BLUE));

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.filled_count(), 1);
        assert_eq!(*board.cell(2, 19).unwrap(), Cell::filled(Color::BLUE));
    }

    #[test]
    fn test_clear_full_rows_includes_hidden_rows() {
        let mut board = Board::new(BoardSize::DEFAULT, 2);
        fill_row(&mut board, 0, Color::RED);
        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.filled_count(), 0);
    }

    #[test]
    fn test_clear_full_rows_partial_row_stays() {
        let mut board = board_10x20();
        fill_row(&mut board, 19, Color::RED);
        board.set_cell(9, 19, Cell::EMPTY);
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(row_filled(&board, 19).iter().filter(|f| **f).count(), 9);
    }

    #[test]
    fn test_resized_copies_overlap() {
        let mut board = board_10x20();
        board.set_cell(0, 0, Cell::filled(Color::RED));
        board.set_cell(9, 0, Cell::filled(Color::RED));
        board.set_cell(2, 19, Cell::filled(Color::RED));

        let smaller = board.resized(BoardSize::new(6, 10).unwrap());
        assert_eq!(smaller.cols(), 6);
        assert_eq!(smaller.total_rows(), 10);
        assert_eq!(smaller.filled_count(), 1);
        assert!(smaller.cell(0, 0).unwrap().filled);

        let larger = board.resized(BoardSize::new(12, 24).unwrap());
        assert_eq!(larger.filled_count(), 3);
        assert!(larger.cell(9, 0).unwrap().filled);
        assert!(larger.cell(2, 19).unwrap().filled);
        assert!(!larger.cell(11, 23).unwrap().filled);
    }
}
