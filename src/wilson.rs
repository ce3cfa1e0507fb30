//! Maze generation by loop-erased random walks (Wilson's algorithm)

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::grid::{Cell, Direction, Grid, GridError, Position};

/// Random source from an optional seed
///
/// A fixed seed gives a reproducible maze, otherwise the generator is
/// seeded from system entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    if let Some(state) = seed {
        StdRng::seed_from_u64(state)
    } else {
        StdRng::from_entropy()
    }
}

/// Outcome of a single [WilsonWalk::step]
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum WalkEvent {
    /// An empty cell got a direction and the walk moved on
    Advanced { from: Position, to: Position },
    /// The walk crossed itself; the loop starting at `at` was erased
    Erased { at: Position },
    /// The walk reached the tree and was made permanent. `next` is where
    /// the following walk starts.
    SegmentDone { next: Position },
    /// Every cell belongs to the tree
    Finished,
}

/// Spanning tree generator over a borrowed grid
///
/// Cells marked on the grid are permanent: they belong to the finished
/// tree. The root is marked at construction and keeps no direction, so a
/// complete walk leaves exactly `width * height - 1` directed cells.
pub struct WilsonWalk<'g, R> {
    grid: &'g mut Grid,
    rng: R,
    root: Position,
    /// First cell of the walk in progress
    walk_start: Position,
    pos: Position,
    finished: bool,
}

impl<'g, R: Rng> WilsonWalk<'g, R> {
    /// Prepare a walk from `start` towards `end`
    ///
    /// Both positions are validated before the grid is touched. The grid
    /// is then reset, so a previous maze in it is discarded.
    pub fn new(grid: &'g mut Grid, start: Position, end: Position, rng: R) -> Result<Self, GridError> {
        grid.check(start)?;
        grid.check(end)?;

        grid.reset();
        grid[end].marked = true;

        Ok(Self {
            grid,
            rng,
            root: end,
            walk_start: start,
            pos: start,
            finished: false,
        })
    }

    /// Current state of the grid
    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    /// Cell without a direction that every path ends in
    pub fn root(&self) -> Position {
        self.root
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the generation by one action
    pub fn step(&mut self) -> WalkEvent {
        if self.finished {
            return WalkEvent::Finished;
        }

        let cell = self.grid[self.pos];
        if cell.marked {
            self.finish_segment()
        } else if cell.is_empty() {
            let direction = self.random_direction_from(self.pos);
            self.grid[self.pos] = Cell::pointing(direction);
            let from = self.pos;
            self.pos = from + direction;
            WalkEvent::Advanced { from, to: self.pos }
        } else {
            let at = self.pos;
            self.erase_loop();
            trace!(%at, "erased loop");
            WalkEvent::Erased { at }
        }
    }

    /// Run to completion, calling `on_segment` whenever a walk joins the tree
    pub fn run<F: FnMut(&Grid)>(&mut self, mut on_segment: F) {
        loop {
            match self.step() {
                WalkEvent::SegmentDone { .. } => on_segment(&*self.grid),
                WalkEvent::Finished => {
                    on_segment(&*self.grid);
                    break;
                }
                WalkEvent::Advanced { .. } | WalkEvent::Erased { .. } => (),
            }
        }
    }

    /// Random in-bounds direction out of `from`
    ///
    /// Draws from all four directions and retries when the step would
    /// leave the grid. This favours the interior over a choice restricted
    /// to valid neighbours.
    fn random_direction_from(&mut self, from: Position) -> Direction {
        loop {
            let direction = Direction::random(&mut self.rng);
            if self.grid.contains(from + direction) {
                return direction;
            }
        }
    }

    /// Clear the loop that starts and ends at the current position
    fn erase_loop(&mut self) {
        while let Some(direction) = self.grid[self.pos].direction {
            self.grid[self.pos] = Cell::default();
            self.pos = self.pos + direction;
        }
    }

    /// Make the finished walk permanent and pick the next start
    fn finish_segment(&mut self) -> WalkEvent {
        let mut pos = self.walk_start;
        let mut length = 0;
        while !self.grid[pos].marked {
            self.grid[pos].marked = true;
            length += 1;
            match self.grid[pos].direction {
                Some(direction) => pos = pos + direction,
                None => break,
            }
        }
        debug!(start = %self.walk_start, length, "walk joined the tree");

        let candidates: Vec<Position> = self
            .grid
            .positions()
            .filter(|&p| {
                let cell = &self.grid[p];
                cell.is_empty() && !cell.marked
            })
            .collect();

        match candidates.choose(&mut self.rng) {
            Some(&next) => {
                self.walk_start = next;
                self.pos = next;
                WalkEvent::SegmentDone { next }
            }
            None => {
                self.finished = true;
                WalkEvent::Finished
            }
        }
    }
}

/// Fill `grid` with a random spanning tree rooted at `end`
///
/// # Examples
/// ```
/// use hamilton_maze::{generate, seeded_rng, Grid, Position};
///
/// let mut grid = Grid::new(5, 4).unwrap();
/// generate(&mut grid, Position::new(0, 0), Position::new(4, 3), seeded_rng(Some(1))).unwrap();
/// assert_eq!(grid.cells().filter(|c| c.direction.is_some()).count(), 19);
/// ```
pub fn generate<R: Rng>(
    grid: &mut Grid,
    start: Position,
    end: Position,
    rng: R,
) -> Result<(), GridError> {
    generate_with(grid, start, end, rng, |_| ())
}

/// Like [generate], calling `on_segment` with a snapshot each time a walk
/// joins the tree, and once more when the tree is complete
pub fn generate_with<R: Rng, F: FnMut(&Grid)>(
    grid: &mut Grid,
    start: Position,
    end: Position,
    rng: R,
    on_segment: F,
) -> Result<(), GridError> {
    WilsonWalk::new(grid, start, end, rng)?.run(on_segment);
    Ok(())
}

#[cfg(test)]
mod tests {
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;

    use super::*;

    /// Follow directions from `pos`, returning the cell without a direction
    /// it ends in, or `None` if that takes more than `limit` steps.
    fn path_end(grid: &Grid, mut pos: Position, limit: usize) -> Option<Position> {
        for _ in 0..=limit {
            match grid[pos].direction {
                Some(d) => pos = pos + d,
                None => return Some(pos),
            }
        }
        None
    }

    fn generated(width: usize, height: usize, seed: u64) -> (Grid, Position) {
        let mut grid = Grid::new(width, height).unwrap();
        let mut rng = seeded_rng(Some(seed));
        let start = Position::random(&mut rng, width, height);
        let end = Position::random(&mut rng, width, height);
        generate(&mut grid, start, end, rng).unwrap();
        (grid, end)
    }

    #[test]
    fn all_but_root_get_a_direction() {
        let (grid, root) = generated(6, 4, 3);
        assert_eq!(grid.cells().filter(|c| !c.is_empty()).count(), 23);
        assert!(grid[root].is_empty());
        assert!(grid.cells().all(|c| c.marked));
    }

    #[test]
    fn directions_stay_on_grid() {
        let (grid, _) = generated(7, 5, 11);
        for pos in grid.positions() {
            if let Some(d) = grid[pos].direction {
                assert!(grid.contains(pos + d), "{} points off the grid", pos);
            }
        }
    }

    #[test]
    fn every_path_reaches_root() {
        let (grid, root) = generated(8, 8, 5);
        for pos in grid.positions() {
            assert_eq!(path_end(&grid, pos, grid.len()), Some(root));
        }
    }

    #[test]
    fn reject_positions_outside_grid() {
        let mut grid = Grid::new(3, 3).unwrap();
        let res = generate(
            &mut grid,
            Position::new(3, 0),
            Position::new(0, 0),
            seeded_rng(Some(0)),
        );
        assert!(matches!(res, Err(GridError::OutOfBoundsPosition { .. })));
        let res = generate(
            &mut grid,
            Position::new(0, 0),
            Position::new(0, -1),
            seeded_rng(Some(0)),
        );
        assert!(matches!(res, Err(GridError::OutOfBoundsPosition { .. })));
        assert!(grid.cells().all(|c| *c == Cell::default()));
    }

    #[test]
    fn start_on_root_still_covers_grid() {
        let mut grid = Grid::new(3, 2).unwrap();
        let root = Position::new(1, 1);
        generate(&mut grid, root, root, seeded_rng(Some(9))).unwrap();
        assert_eq!(grid.cells().filter(|c| !c.is_empty()).count(), 5);
        assert!(grid[root].is_empty());
    }

    #[test]
    fn regenerate_into_same_grid() {
        let mut grid = Grid::new(5, 4).unwrap();
        generate(
            &mut grid,
            Position::new(0, 0),
            Position::new(4, 3),
            seeded_rng(Some(0)),
        )
        .unwrap();

        let root = Position::new(0, 3);
        let mut walk =
            WilsonWalk::new(&mut grid, Position::new(2, 1), root, seeded_rng(Some(1000))).unwrap();
        let mut steps = 0;
        while walk.step() != WalkEvent::Finished {
            steps += 1;
            assert!(steps < 1_000_000, "walk did not terminate");
        }

        assert!(grid[root].is_empty());
        assert_eq!(grid.cells().filter(|c| !c.is_empty()).count(), 19);
        for pos in grid.positions() {
            assert_eq!(path_end(&grid, pos, grid.len()), Some(root));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let (a, _) = generated(2, 2, 42);
        let (b, _) = generated(2, 2, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn step_events() {
        let mut grid = Grid::new(4, 4).unwrap();
        let mut walk = WilsonWalk::new(
            &mut grid,
            Position::new(0, 0),
            Position::new(3, 3),
            seeded_rng(Some(2)),
        )
        .unwrap();
        assert_eq!(walk.root(), Position::new(3, 3));

        let mut segments = 0;
        let mut steps = 0;
        loop {
            let before = walk.position();
            match walk.step() {
                WalkEvent::Advanced { from, to } => {
                    assert_eq!(from, before);
                    assert_eq!(to, walk.position());
                }
                WalkEvent::Erased { at } => {
                    assert_eq!(at, before);
                    assert!(walk.grid()[walk.position()].is_empty());
                }
                WalkEvent::SegmentDone { next } => {
                    segments += 1;
                    assert!(walk.grid()[next].is_empty());
                    assert!(!walk.grid()[next].marked);
                }
                WalkEvent::Finished => break,
            }
            steps += 1;
            assert!(steps < 1_000_000, "walk did not terminate");
        }
        assert!(segments >= 1);
        assert!(walk.is_finished());
        assert_eq!(walk.step(), WalkEvent::Finished);
    }

    #[test]
    fn snapshot_after_every_segment() {
        let mut grid = Grid::new(5, 5).unwrap();
        let mut snapshots = Vec::new();
        generate_with(
            &mut grid,
            Position::new(0, 0),
            Position::new(4, 4),
            seeded_rng(Some(8)),
            |g| snapshots.push(g.cells().filter(|c| c.marked).count()),
        )
        .unwrap();
        assert!(snapshots.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(snapshots.last(), Some(&25));
    }

    #[test]
    fn tree_property() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (width, height) = (2 + w as usize % 9, 2 + h as usize % 9);
            let (grid, root) = generated(width, height, seed);
            let directed = grid.cells().filter(|c| !c.is_empty()).count();
            let all_reach_root = grid
                .positions()
                .all(|p| path_end(&grid, p, width * height) == Some(root));
            TestResult::from_bool(directed == width * height - 1 && all_reach_root)
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn accepts_any_rng() {
        let mut grid = Grid::new(3, 3).unwrap();
        let rng: StdRng = StdRng::seed_from_u64(1);
        generate(&mut grid, Position::new(0, 0), Position::new(2, 2), rng).unwrap();
        assert!(grid[Position::new(2, 2)].is_empty());
    }
}
