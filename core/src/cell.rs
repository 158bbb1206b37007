use serde::{Deserialize, Serialize};

/// State of a single square of the grid.
///
/// Read-only outside the crate: mutation goes through [`crate::Grid`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_mine: bool,
    revealed: bool,
    marked: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_marked(self) -> bool {
        self.marked
    }

    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    /// What a renderer should draw for this cell. `reveal_all` shows mines and
    /// counts of hidden cells without touching the cell itself.
    pub const fn glyph(self, reveal_all: bool) -> Glyph {
        if self.marked {
            Glyph::Flag
        } else if !self.revealed && !reveal_all {
            Glyph::Hidden
        } else if self.is_mine {
            Glyph::Mine
        } else if self.adjacent_mines > 0 {
            Glyph::Count(self.adjacent_mines)
        } else {
            Glyph::Empty
        }
    }

    pub(crate) fn set_mine(&mut self, is_mine: bool) {
        self.is_mine = is_mine;
    }

    pub(crate) fn set_adjacent_mines(&mut self, count: u8) {
        self.adjacent_mines = count;
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
        self.marked = false;
    }

    pub(crate) fn toggle_mark(&mut self) {
        self.marked = !self.marked;
    }
}

/// Display symbol of a cell, independent of any particular renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Flag,
    Hidden,
    Mine,
    Count(u8),
    Empty,
}
