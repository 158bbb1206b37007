/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Walks the 3x3 block around `center` in row-major order, clipped to the
/// board and skipping the center itself.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: Coord2,
    col_start: Coord,
    col_end: Coord,
    row_end: Coord,
    cursor: Option<Coord2>,
}

impl Neighbors {
    pub fn new(center: Coord2, size: Coord2) -> Self {
        let span = |at: Coord, len: Coord| {
            (
                at.saturating_sub(1),
                at.saturating_add(1).min(len.saturating_sub(1)),
            )
        };
        let (row_start, row_end) = span(center.0, size.0);
        let (col_start, col_end) = span(center.1, size.1);
        let cursor = (row_start <= row_end && col_start <= col_end).then_some((row_start, col_start));

        Self {
            center,
            col_start,
            col_end,
            row_end,
            cursor,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pos @ (row, col)) = self.cursor {
            self.cursor = if col < self.col_end {
                Some((row, col + 1))
            } else if row < self.row_end {
                Some((row + 1, self.col_start))
            } else {
                None
            };

            if pos != self.center {
                return Some(pos);
            }
        }
        None
    }
}
