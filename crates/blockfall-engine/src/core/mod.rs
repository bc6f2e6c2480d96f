pub use self::{board::*, cell_view::*, color::*, piece::*};

pub(crate) mod board;
pub(crate) mod cell_view;
pub(crate) mod color;
pub(crate) mod piece;
