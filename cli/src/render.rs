use std::fmt;
use sweeper_core::{Glyph, Grid};

/// Text form of a grid, one line per row.
pub struct BoardView<'a> {
    grid: &'a Grid,
    reveal_all: bool,
}

impl<'a> BoardView<'a> {
    pub fn new(grid: &'a Grid, reveal_all: bool) -> Self {
        Self { grid, reveal_all }
    }
}

fn glyph_text(glyph: Glyph, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match glyph {
        Glyph::Flag => f.write_str(" * "),
        Glyph::Hidden => f.write_str(" . "),
        Glyph::Mine => f.write_str(" X "),
        Glyph::Count(count) => write!(f, " {count} "),
        Glyph::Empty => f.write_str(" o "),
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.grid.size();
        for row in 0..rows {
            for col in 0..cols {
                glyph_text(self.grid.cell_at((row, col)).glyph(self.reveal_all), f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
