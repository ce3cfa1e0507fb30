//! Hamiltonian cycle around a maze and its traversal
//!
//! Every maze cell becomes a 2x2 block of sub-cells. Each sub-cell either
//! crosses an opening into the neighbouring block or turns along a wall,
//! so the result is a single cycle running around the walls of the maze.

use tracing::trace;

use crate::grid::{Cell, Direction, Grid, GridError, Position};
use crate::walls::WallGrid;

/// Expand `walls` into a `2 * width` x `2 * height` grid holding one cycle
pub fn build_cycle(walls: &WallGrid) -> Grid {
    let mut cycle = Grid::blank(2 * walls.width(), 2 * walls.height());

    for (pos, w) in walls.iter() {
        let (x, y) = (2 * pos.x, 2 * pos.y);
        let north = if w.north { Direction::Left } else { Direction::Up };
        let west = if w.west { Direction::Down } else { Direction::Left };
        let south = if w.south { Direction::Right } else { Direction::Down };
        let east = if w.east { Direction::Up } else { Direction::Right };

        cycle[Position::new(x + 1, y)] = Cell::pointing(north);
        cycle[Position::new(x, y)] = Cell::pointing(west);
        cycle[Position::new(x, y + 1)] = Cell::pointing(south);
        cycle[Position::new(x + 1, y + 1)] = Cell::pointing(east);
    }

    cycle
}

/// Step-wise walk around a cycle grid
///
/// While walking, `marked` means "not yet visited". When the walk is done
/// every flag on the grid is cleared again.
pub struct CycleWalk<'g> {
    grid: &'g mut Grid,
    origin: Position,
    pos: Position,
    steps: usize,
}

impl<'g> CycleWalk<'g> {
    /// Mark the cycle through `origin` as pending
    ///
    /// Fails if `origin` is off the grid, or if following directions from
    /// `origin` hits an empty cell or a loop that does not include
    /// `origin`. Returns the walk positioned at `origin`.
    pub fn new(grid: &'g mut Grid, origin: Position) -> Result<Self, GridError> {
        grid.check(origin)?;
        grid.clear_marks();

        let mut pos = origin;
        let mut length = 0;
        loop {
            let broken = GridError::BrokenCycle {
                origin,
                steps: length,
            };
            if !grid.contains(pos) || grid[pos].marked {
                grid.clear_marks();
                return Err(broken);
            }
            grid[pos].marked = true;
            let Some(direction) = grid[pos].direction else {
                grid.clear_marks();
                return Err(broken);
            };
            pos = pos + direction;
            length += 1;
            if pos == origin {
                break;
            }
        }
        trace!(%origin, length, "cycle marked");

        Ok(Self {
            grid,
            origin,
            pos: origin,
            steps: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Steps taken so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Visit the current cell and move on along its direction
    ///
    /// Returns the new position, or `None` once the walk is back at the
    /// origin.
    pub fn step(&mut self) -> Option<Position> {
        let cell = &mut self.grid[self.pos];
        if !cell.marked {
            return None;
        }
        cell.marked = false;
        let direction = cell.direction?;
        self.pos = self.pos + direction;
        self.steps += 1;
        Some(self.pos)
    }
}

/// Walk the whole cycle from `origin`, calling `on_step` after every step
///
/// Returns the number of steps taken.
///
/// # Examples
/// ```
/// use hamilton_maze::{build_cycle, derive_walls, traverse, Grid, Position};
///
/// // No tree edges at all still gives closed cycles, one per block
/// let mut cycle = build_cycle(&derive_walls(&Grid::new(2, 2).unwrap()));
/// let steps = traverse(&mut cycle, Position::new(0, 0), |_, _| ()).unwrap();
/// assert_eq!(steps, 4);
/// ```
pub fn traverse<F: FnMut(&Grid, Position)>(
    grid: &mut Grid,
    origin: Position,
    mut on_step: F,
) -> Result<usize, GridError> {
    let mut walk = CycleWalk::new(grid, origin)?;
    while let Some(pos) = walk.step() {
        on_step(walk.grid(), pos);
    }
    Ok(walk.steps())
}
