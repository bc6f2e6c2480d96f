use super::{board::Cell, color::Color, piece::ActivePiece};

/// What the host needs to draw one visible cell.
///
/// Built on demand from the board and the active piece; there is no path from
/// a `CellView` back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// The board cell is filled (locked block or host edit).
    pub filled: bool,
    /// The active piece covers this cell.
    pub active: bool,
    /// Color to draw: the cell color when filled, else the piece color when
    /// covered, else the empty-cell color.
    pub color: Color,
}

impl CellView {
    /// Combines a board cell with the active piece covering `(col, row)`.
    #[must_use]
    pub fn new(cell: Cell, piece: Option<&ActivePiece>, col: i32, row: i32) -> Self {
        let active = piece.is_some_and(|p| p.is_hit(col, row));
        let color = match piece {
            Some(p) if active && !cell.filled => p.color(),
            _ => cell.color,
        };
        Self {
            filled: cell.filled,
            active,
            color,
        }
    }

    /// Returns `true` if anything is drawn in this cell.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.filled || self.active
    }
}
