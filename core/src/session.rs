use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of a successfully applied command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Continue,
    Quit,
    Lost,
    Won,
}

impl Response {
    /// Whether the caller should stop issuing moves for the current round.
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// A single player's game: the active grid plus the selected difficulty.
///
/// Every command is validated before anything is touched, so a rejected
/// command leaves both the grid and the difficulty as they were.
#[derive(Clone, Debug)]
pub struct GameSession {
    difficulty: Difficulty,
    grid: Grid,
    rng: SmallRng,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Self::from_rng(difficulty, SmallRng::seed_from_u64(seed))
    }

    pub fn from_rng(difficulty: Difficulty, mut rng: SmallRng) -> Result<Self> {
        let grid = build_grid(difficulty, &mut rng)?;
        Ok(Self {
            difficulty,
            grid,
            rng,
        })
    }

    /// Starts from a prepared grid, later grids are drawn from `seed`.
    pub fn with_grid(difficulty: Difficulty, grid: Grid, seed: u64) -> Self {
        Self {
            difficulty,
            grid,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Parses and applies one tokenized command line.
    pub fn execute<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Response> {
        let command = Command::parse(args)?;
        self.apply(command)
    }

    pub fn apply(&mut self, command: Command) -> Result<Response> {
        log::debug!("Applying {} command: {command:?}", command.kind());

        let response = match command {
            Command::Quit => Response::Quit,
            Command::Pick { row, col } => {
                let coords = self.closed_cell(row, col)?;
                match self.grid.reveal(coords)? {
                    RevealOutcome::HitMine => Response::Lost,
                    _ => Response::Continue,
                }
            }
            Command::Flag { row, col } => {
                let coords = self.closed_cell(row, col)?;
                self.grid.toggle_mark(coords)?;
                if self.grid.is_won() {
                    Response::Won
                } else {
                    Response::Continue
                }
            }
            Command::Level(difficulty) => {
                self.grid = build_grid(difficulty, &mut self.rng)?;
                self.difficulty = difficulty;
                Response::Continue
            }
            Command::Reset => {
                self.grid = build_grid(self.difficulty, &mut self.rng)?;
                Response::Continue
            }
        };

        log::debug!("Response: {response:?}");
        Ok(response)
    }

    fn closed_cell(&self, row: i64, col: i64) -> Result<Coord2> {
        let coords = self.grid.validate_position(row, col)?;
        if self.grid[coords].is_revealed() {
            return Err(GameError::CellAlreadyOpen);
        }
        Ok(coords)
    }
}

fn build_grid(difficulty: Difficulty, rng: &mut SmallRng) -> Result<Grid> {
    let GameConfig {
        size: (rows, cols),
        mines,
    } = difficulty.config();
    Grid::new(rows, cols, mines, rng)
}
