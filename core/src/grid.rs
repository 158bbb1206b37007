use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::Index;
use ndarray::{Array2, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Safe cell opened, with the total number of cells opened including flood fill.
    Revealed(CellCount),
    HitMine,
}

/// Rectangular minefield, stored row-major and addressed by `(row, col)`.
///
/// Deserializing goes through [`Grid::from_mine_coords`], so adjacency counts
/// are recomputed and the mine count is checked against the layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSnapshot")]
pub struct Grid {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl Grid {
    /// Builds a grid with `mine_count` mines placed uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        rows: Coord,
        cols: Coord,
        mine_count: CellCount,
        rng: &mut R,
    ) -> Result<Self> {
        check_config(rows, cols, mine_count)?;

        let mut grid = Self {
            cells: Array2::default(nd_index((rows, cols))),
            mine_count,
        };
        grid.place_mines(rng);
        grid.compute_adjacency();
        log::debug!("Built {rows}x{cols} grid with {mine_count} mines");
        Ok(grid)
    }

    /// Builds a grid from a fixed mine layout. Repeated coordinates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let (rows, cols) = size;
        check_config(rows, cols, 0)?;

        let mut grid = Self {
            cells: Array2::default(nd_index(size)),
            mine_count: 0,
        };
        for &coords in mine_coords {
            let coords = grid.validate_coords(coords)?;
            grid.cell_mut(coords).set_mine(true);
        }

        let mine_count = grid.cells.iter().filter(|cell| cell.is_mine()).count() as CellCount;
        check_config(rows, cols, mine_count)?;
        grid.mine_count = mine_count;
        grid.compute_adjacency();
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    /// All cells in row-major order together with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_revealed()).count() as CellCount
    }

    pub fn marked_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_marked()).count() as CellCount
    }

    /// How many mines have not been marked yet, negative when over-marked.
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.marked_count() as isize)
    }

    pub fn valid_position(&self, row: i64, col: i64) -> bool {
        let (rows, cols) = self.size();
        (0..i64::from(rows)).contains(&row) && (0..i64::from(cols)).contains(&col)
    }

    pub fn validate_position(&self, row: i64, col: i64) -> Result<Coord2> {
        if self.valid_position(row, col) {
            Ok((row as Coord, col as Coord))
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.validate_position(coords.0.into(), coords.1.into())
    }

    pub fn neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size())
    }

    /// Opens a cell, flooding outwards when it is a safe cell with no adjacent mines.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];

        if cell.is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        self.cell_mut(coords).reveal();

        if cell.is_mine() {
            log::debug!("Revealed mine at {coords:?}");
            return Ok(RevealOutcome::HitMine);
        }

        let mut opened = 1;
        log::debug!(
            "Revealed cell at {:?}, mine count: {}",
            coords,
            cell.adjacent_mines()
        );
        if cell.adjacent_mines() == 0 {
            opened += self.flood_fill(coords);
        }
        Ok(RevealOutcome::Revealed(opened))
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cell_mut(coords).toggle_mark();
        log::debug!("Toggled mark at {:?}, marked: {}", coords, self[coords].is_marked());
        Ok(())
    }

    /// Every mine is marked. Hidden safe cells do not prevent a win.
    pub fn is_won(&self) -> bool {
        self.cells
            .iter()
            .filter(|cell| cell.is_mine())
            .all(|cell| cell.is_marked())
    }

    fn place_mines<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cols = usize::from(self.cols());
        let picks = rand::seq::index::sample(rng, self.cells.len(), self.mine_count.into());

        for index in picks {
            let coords = ((index / cols) as Coord, (index % cols) as Coord);
            self.cell_mut(coords).set_mine(true);
        }
    }

    fn compute_adjacency(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.count_adjacent_mines((row as Coord, col as Coord))
        });

        Zip::from(&mut self.cells)
            .and(&counts)
            .for_each(|cell, &count| cell.set_adjacent_mines(count));
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }

    /// Opens the connected zero region around `origin` plus its numbered border.
    /// Marked cells are never opened. The `revealed` flag doubles as the visited
    /// set, so each cell is queued at most once.
    fn flood_fill(&mut self, origin: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([origin]);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in self.neighbors(visit_coords) {
                let cell = self[pos];
                if cell.is_revealed() || cell.is_mine() || cell.is_marked() {
                    continue;
                }

                self.cell_mut(pos).reveal();
                opened += 1;
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    pos,
                    cell.adjacent_mines()
                );

                if cell.adjacent_mines() == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        opened
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[nd_index(coords)]
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd_index(coords)]
    }
}

fn nd_index((row, col): Coord2) -> [usize; 2] {
    [row.into(), col.into()]
}

fn check_config(rows: Coord, cols: Coord, mine_count: CellCount) -> Result<()> {
    let total = GameConfig::new((rows, cols), mine_count).total_cells();
    if total == 0 || mine_count >= total {
        log::warn!("Rejected grid config: {rows}x{cols} with {mine_count} mines");
        return Err(GameError::ConfigurationError {
            rows,
            cols,
            mines: mine_count,
        });
    }
    Ok(())
}

#[derive(Deserialize)]
struct GridSnapshot {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl TryFrom<GridSnapshot> for Grid {
    type Error = GameError;

    fn try_from(snapshot: GridSnapshot) -> Result<Self> {
        let (rows, cols) = snapshot.cells.dim();
        let (Ok(rows), Ok(cols)) = (Coord::try_from(rows), Coord::try_from(cols)) else {
            return Err(GameError::ConfigurationError {
                rows: Coord::MAX,
                cols: Coord::MAX,
                mines: snapshot.mine_count,
            });
        };

        let mines: Vec<Coord2> = snapshot
            .cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_mine())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect();
        let mut grid = Self::from_mine_coords((rows, cols), &mines)?;
        if grid.mine_count != snapshot.mine_count {
            return Err(GameError::ConfigurationError {
                rows,
                cols,
                mines: snapshot.mine_count,
            });
        }

        for ((row, col), saved) in snapshot.cells.indexed_iter() {
            let cell = grid.cell_mut((row as Coord, col as Coord));
            if saved.is_revealed() {
                cell.reveal();
            } else if saved.is_marked() {
                cell.toggle_mark();
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::{SeedableRng, rngs::SmallRng};

    fn layout(size: Coord2, mines: &[Coord2]) -> Grid {
        Grid::from_mine_coords(size, mines).unwrap()
    }

    fn adjacency(grid: &Grid) -> Vec<Vec<u8>> {
        (0..grid.rows())
            .map(|row| {
                (0..grid.cols())
                    .map(|col| grid.cell_at((row, col)).adjacent_mines())
                    .collect()
            })
            .collect()
    }

    fn revealed(grid: &Grid) -> Vec<Coord2> {
        grid.cells()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(coords, _)| coords)
            .collect()
    }

    #[test]
    fn center_mine_adjacency() {
        let grid = layout((3, 3), &[(1, 1)]);

        assert_eq!(adjacency(&grid), [[1, 1, 1], [1, 0, 1], [1, 1, 1]]);
    }

    #[test]
    fn reveal_numbered_cell_does_not_flood() {
        let mut grid = layout((3, 3), &[(1, 1)]);

        let outcome = grid.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(1));
        assert_eq!(revealed(&grid), [(0, 0)]);
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region_and_border() {
        let mut grid = layout((3, 3), &[(2, 2)]);

        let outcome = grid.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed(8));
        assert_eq!(
            revealed(&grid),
            [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1)]
        );
        assert!(!grid.cell_at((2, 2)).is_revealed());
    }

    #[test]
    fn flood_fill_stops_at_marked_cells() {
        // single mine in the far corner, everything else in the top rows is zero
        let mut grid = layout((4, 4), &[(3, 3)]);
        grid.toggle_mark((0, 3)).unwrap();

        grid.reveal((0, 0)).unwrap();

        let cell = grid.cell_at((0, 3));
        assert_eq!(cell.adjacent_mines(), 0);
        assert!(!cell.is_revealed());
        assert!(cell.is_marked());
        assert_eq!(grid.revealed_count(), 14);
    }

    #[test]
    fn marked_barrier_can_wall_off_a_region() {
        // column 1 is fully marked, so the right side stays closed
        let mut grid = layout((3, 5), &[(2, 4)]);
        for row in 0..3 {
            grid.toggle_mark((row, 1)).unwrap();
        }

        grid.reveal((0, 0)).unwrap();

        assert_eq!(revealed(&grid), [(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn reveal_mine_does_not_flood() {
        let mut grid = layout((3, 3), &[(2, 2)]);

        let outcome = grid.reveal((2, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(revealed(&grid), [(2, 2)]);
    }

    #[test]
    fn reveal_twice_is_no_change() {
        let mut grid = layout((3, 3), &[(1, 1)]);
        grid.reveal((0, 0)).unwrap();
        let before = grid.clone();

        assert_eq!(grid.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(grid, before);
    }

    #[test]
    fn won_iff_every_mine_marked() {
        let mut grid = layout((3, 3), &[(0, 0), (2, 2)]);
        assert!(!grid.is_won());

        grid.toggle_mark((0, 0)).unwrap();
        assert!(!grid.is_won());

        grid.toggle_mark((2, 2)).unwrap();
        assert!(grid.is_won());
        assert_eq!(grid.revealed_count(), 0);

        grid.toggle_mark((2, 2)).unwrap();
        assert!(!grid.is_won());
    }

    #[test]
    fn extra_marks_do_not_block_win() {
        let mut grid = layout((2, 2), &[(0, 0)]);
        grid.toggle_mark((1, 1)).unwrap();
        grid.toggle_mark((0, 0)).unwrap();

        assert!(grid.is_won());
        assert_eq!(grid.mines_left(), -1);
    }

    #[test]
    fn valid_position_bounds() {
        let grid = layout((2, 3), &[]);

        assert!(grid.valid_position(0, 0));
        assert!(grid.valid_position(1, 2));
        assert!(!grid.valid_position(2, 0));
        assert!(!grid.valid_position(0, 3));
        assert!(!grid.valid_position(-1, 0));
        assert!(!grid.valid_position(0, -1));
    }

    #[test]
    fn rejects_full_or_empty_boards() {
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(matches!(
            Grid::new(3, 3, 9, &mut rng),
            Err(GameError::ConfigurationError { mines: 9, .. })
        ));
        assert!(Grid::new(0, 3, 0, &mut rng).is_err());
        assert!(Grid::new(3, 0, 0, &mut rng).is_err());
        assert!(Grid::from_mine_coords((1, 2), &[(0, 0), (0, 1)]).is_err());
    }

    #[test]
    fn rejects_out_of_bounds_layout() {
        assert_eq!(
            Grid::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidPosition)
        );
    }

    #[test]
    fn duplicate_layout_coords_count_once() {
        let grid = layout((3, 3), &[(1, 1), (1, 1)]);

        assert_eq!(grid.mine_count(), 1);
    }

    #[test]
    fn serialized_grid_restores_progress() {
        let mut grid = layout((3, 3), &[(2, 2)]);
        grid.reveal((0, 0)).unwrap();
        grid.toggle_mark((2, 2)).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, grid);
    }

    #[test]
    fn deserialize_rejects_mismatched_mine_count() {
        let grid = layout((3, 3), &[(2, 2)]);
        let mut value = serde_json::to_value(&grid).unwrap();
        value["mine_count"] = 2.into();

        assert!(serde_json::from_value::<Grid>(value).is_err());
    }

    #[test]
    fn deserialize_rejects_full_board() {
        let grid = layout((1, 2), &[(0, 0)]);
        let mut value = serde_json::to_value(&grid).unwrap();
        value["cells"]["data"][1]["is_mine"] = true.into();
        value["mine_count"] = 2.into();

        assert!(serde_json::from_value::<Grid>(value).is_err());
    }

    #[test]
    fn deserialize_recomputes_adjacency() {
        let grid = layout((3, 3), &[(2, 2)]);
        let mut value = serde_json::to_value(&grid).unwrap();
        value["cells"]["data"][0]["adjacent_mines"] = 7.into();

        let restored: Grid = serde_json::from_value(value).unwrap();

        assert_eq!(restored.cell_at((0, 0)).adjacent_mines(), 0);
        assert_eq!(restored, grid);
    }

    #[test]
    fn random_placement_has_exact_mine_count() {
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let grid = Grid::new(16, 30, 50, &mut rng).unwrap();

            let mines = grid.cells().filter(|(_, cell)| cell.is_mine()).count();
            assert_eq!(mines, 50);
            assert_eq!(grid.revealed_count(), 0);
            assert_eq!(grid.marked_count(), 0);
        }
    }

    #[test]
    fn nearly_full_board_terminates() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = Grid::new(4, 4, 15, &mut rng).unwrap();

        let safe: Vec<_> = grid.cells().filter(|(_, cell)| !cell.is_mine()).collect();
        assert_eq!(safe.len(), 1);
    }

    #[test]
    fn adjacency_matches_brute_force() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let grid = Grid::new(9, 11, 30, &mut rng).unwrap();

            for ((row, col), cell) in grid.cells() {
                let mut expected = 0;
                for r in i64::from(row) - 1..=i64::from(row) + 1 {
                    for c in i64::from(col) - 1..=i64::from(col) + 1 {
                        if (r, c) != (i64::from(row), i64::from(col))
                            && grid.valid_position(r, c)
                            && grid.cell_at((r as Coord, c as Coord)).is_mine()
                        {
                            expected += 1;
                        }
                    }
                }
                assert_eq!(cell.adjacent_mines(), expected, "at {:?}", (row, col));
            }
        }
    }

    #[test]
    fn flood_fill_reveals_closure_of_zero_region() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut grid = Grid::new(12, 12, 10, &mut rng).unwrap();
            let Some((start, _)) = grid
                .cells()
                .find(|(_, cell)| !cell.is_mine() && cell.adjacent_mines() == 0)
            else {
                continue;
            };

            grid.reveal(start).unwrap();

            for (coords, cell) in grid.cells() {
                if cell.is_revealed() && cell.adjacent_mines() == 0 {
                    for pos in grid.neighbors(coords) {
                        assert!(grid[pos].is_revealed(), "{pos:?} next to open zero {coords:?}");
                    }
                }
                assert!(!(cell.is_revealed() && cell.is_mine()));
            }
        }
    }
}
