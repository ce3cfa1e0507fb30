//! Turn a random maze into a single cycle visiting every cell
//!
//! 1. [generate] fills a [Grid] with a random spanning tree, using
//!    loop-erased random walks (Wilson's algorithm).
//! 2. [derive_walls] finds the walls between cells of the finished maze.
//! 3. [build_cycle] doubles the grid: every cell becomes a 2x2 block and
//!    the sub-cells form one Hamiltonian cycle running around the walls.
//! 4. [traverse] walks the cycle once, step by step.
//!
//! Rendering lives behind the [Renderer] trait; [animation::run] strings
//! the stages together and draws between steps.
//!
//! # Examples
//! ```
//! use hamilton_maze::{build_cycle, derive_walls, generate, seeded_rng, traverse, Grid, Position};
//!
//! let mut grid = Grid::new(6, 4).unwrap();
//! generate(&mut grid, Position::new(0, 0), Position::new(5, 3), seeded_rng(Some(1))).unwrap();
//!
//! let walls = derive_walls(&grid);
//! let mut cycle = build_cycle(&walls);
//! assert_eq!((cycle.width(), cycle.height()), (12, 8));
//!
//! let steps = traverse(&mut cycle, Position::new(0, 0), |_, _| ()).unwrap();
//! assert_eq!(steps, 4 * 6 * 4);
//! ```

pub mod animation;
pub mod cycle;
pub mod grid;
pub mod render;
pub mod walls;
pub mod wilson;

pub use cycle::{build_cycle, traverse, CycleWalk};
pub use grid::{Cell, Direction, Grid, GridError, Position};
pub use render::{Frame, Renderer};
pub use walls::{derive_walls, FieldWalls, WallGrid};
pub use wilson::{generate, generate_with, seeded_rng, WalkEvent, WilsonWalk};
