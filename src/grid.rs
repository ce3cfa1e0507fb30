//! Rectangular grid of cells with directed edges

use std::fmt;
use std::ops::{Add, Index, IndexMut};

use rand::Rng;

/// Location in a grid
///
/// Coordinates are signed, so that a step off the grid edge can be
/// represented and rejected with [Grid::contains].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Is the position inside a `width` x `height` grid
    pub fn is_within(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }

    /// Uniformly random position inside a `width` x `height` grid
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: usize, height: usize) -> Self {
        Self {
            x: rng.gen_range(0..width) as i32,
            y: rng.gen_range(0..height) as i32,
        }
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unit step on the grid
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (dx, dy) for each variant, in the order of [Self::ALL]
    const DELTAS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

    pub fn delta(self) -> (i32, i32) {
        Self::DELTAS[self as usize]
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Pick one of the four directions uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::Left => '←',
            Direction::Right => '→',
        }
    }
}

/// Single grid slot
///
/// `marked` is a per-stage flag. While a maze is generated it means "part
/// of the finished tree"; on a cycle grid it means "not yet traversed".
/// Each stage resets it before giving it meaning.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Cell {
    /// Outgoing edge, `None` when unassigned
    pub direction: Option<Direction>,
    pub marked: bool,
}

impl Cell {
    pub fn pointing(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            marked: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.direction.is_none()
    }
}

/// Errors from grid construction and the stages operating on grids
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Grid smaller than 2x2
    InvalidDimensions { width: usize, height: usize },
    /// Position outside of the grid
    OutOfBoundsPosition {
        position: Position,
        width: usize,
        height: usize,
    },
    /// Direction of a cell pointing off the grid
    DirectionOffGrid {
        position: Position,
        direction: Direction,
    },
    /// Following directions from `origin` did not lead back to it
    BrokenCycle { origin: Position, steps: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { width, height } => write!(
                f,
                "invalid grid dimensions {}x{}, both must be at least 2",
                width, height
            ),
            GridError::OutOfBoundsPosition {
                position,
                width,
                height,
            } => write!(
                f,
                "position {} is outside of the {}x{} grid",
                position, width, height
            ),
            GridError::DirectionOffGrid {
                position,
                direction,
            } => write!(
                f,
                "cell at {} points {:?}, off the grid",
                position, direction
            ),
            GridError::BrokenCycle { origin, steps } => write!(
                f,
                "directions from {} do not close into a cycle (gave up after {} steps)",
                origin, steps
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Fail with [GridError::OutOfBoundsPosition] unless `pos` is inside a
/// `width` x `height` grid
pub(crate) fn check_bounds(pos: Position, width: usize, height: usize) -> Result<(), GridError> {
    if pos.is_within(width, height) {
        Ok(())
    } else {
        Err(GridError::OutOfBoundsPosition {
            position: pos,
            width,
            height,
        })
    }
}

/// Rectangular array of cells, stored row by row
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    ///
    /// Both dimensions must be at least 2; on a single row or column the
    /// random walk could never leave the cell it stands on.
    ///
    /// # Examples
    /// ```
    /// use hamilton_maze::{Grid, GridError};
    ///
    /// assert!(Grid::new(4, 3).is_ok());
    /// assert_eq!(
    ///     Grid::new(4, 1),
    ///     Err(GridError::InvalidDimensions { width: 4, height: 1 })
    /// );
    /// ```
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width < 2 || height < 2 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self::blank(width, height))
    }

    /// Unchecked constructor for callers deriving dimensions from a valid grid
    pub(crate) fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.width, self.height)
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Fail with [GridError::OutOfBoundsPosition] unless `pos` is on the grid
    pub fn check(&self, pos: Position) -> Result<(), GridError> {
        check_bounds(pos, self.width, self.height)
    }

    pub fn get(&self, pos: Position) -> Result<&Cell, GridError> {
        self.check(pos)?;
        Ok(&self[pos])
    }

    /// Replace the cell at `pos`
    ///
    /// The cell's direction must lead to another cell on the grid.
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), GridError> {
        self.check(pos)?;
        if let Some(direction) = cell.direction {
            if !self.contains(pos + direction) {
                return Err(GridError::DirectionOffGrid {
                    position: pos,
                    direction,
                });
            }
        }
        self[pos] = cell;
        Ok(())
    }

    pub fn empty_at(&self, pos: Position) -> Result<bool, GridError> {
        self.get(pos).map(Cell::is_empty)
    }

    /// Cell next to `pos` in `direction`, if it is on the grid
    pub fn neighbour(&self, pos: Position, direction: Direction) -> Option<&Cell> {
        self.index_of(pos + direction).map(|i| &self.cells[i])
    }

    /// All positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.cells.len()).map(move |i| Position::new((i % width) as i32, (i / width) as i32))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Reset every cell to empty and unmarked
    pub fn reset(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Reset every `marked` flag to false
    pub fn clear_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.marked = false;
        }
    }
}

/// Panics when `pos` is off the grid, like slice indexing
impl Index<Position> for Grid {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Cell {
        match self.index_of(pos) {
            Some(i) => &self.cells[i],
            None => panic!(
                "position {} out of bounds for {}x{} grid",
                pos, self.width, self.height
            ),
        }
    }
}

impl IndexMut<Position> for Grid {
    fn index_mut(&mut self, pos: Position) -> &mut Cell {
        match self.index_of(pos) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "position {} out of bounds for {}x{} grid",
                pos, self.width, self.height
            ),
        }
    }
}
