//! Walls between cells of a generated maze

use crate::grid::{check_bounds, Direction, Grid, GridError, Position};

/// Closed sides of a single cell
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FieldWalls {
    pub north: bool,
    pub south: bool,
    pub west: bool,
    pub east: bool,
}

impl FieldWalls {
    /// Walls of the cell at `pos`
    ///
    /// A side is open when either this cell or the neighbour across it
    /// points over the side. Sides on the grid edge are always closed.
    fn of_cell(grid: &Grid, pos: Position) -> Self {
        let closed = |side: Direction| {
            let own = grid[pos].direction == Some(side);
            let neighbour = grid
                .neighbour(pos, side)
                .is_some_and(|n| n.direction == Some(side.opposite()));
            !(own || neighbour)
        };

        Self {
            north: closed(Direction::Up),
            south: closed(Direction::Down),
            west: closed(Direction::Left),
            east: closed(Direction::Right),
        }
    }

    /// Is the side facing `direction` closed
    pub fn closed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.north,
            Direction::Down => self.south,
            Direction::Left => self.west,
            Direction::Right => self.east,
        }
    }
}

/// Per-cell walls of a whole maze
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct WallGrid {
    width: usize,
    height: usize,
    walls: Vec<FieldWalls>,
}

impl WallGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, pos: Position) -> Result<&FieldWalls, GridError> {
        check_bounds(pos, self.width, self.height)?;
        Ok(&self.walls[pos.y as usize * self.width + pos.x as usize])
    }

    /// Walls with their positions, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &FieldWalls)> {
        let width = self.width;
        self.walls.iter().enumerate().map(move |(i, walls)| {
            (
                Position::new((i % width) as i32, (i / width) as i32),
                walls,
            )
        })
    }
}

/// Compute the walls of every cell in `grid`
pub fn derive_walls(grid: &Grid) -> WallGrid {
    WallGrid {
        width: grid.width(),
        height: grid.height(),
        walls: grid
            .positions()
            .map(|pos| FieldWalls::of_cell(grid, pos))
            .collect(),
    }
}
