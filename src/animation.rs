//! Full pipeline: generate, build the cycle, walk it
//!
//! Algorithmic stages advance one step at a time; rendering and pacing
//! happen here, between steps.

use std::thread;
use std::time::Duration;

use anyhow::{ensure, Context};
use rand::Rng;
use tracing::info;

use crate::cycle::{build_cycle, CycleWalk};
use crate::grid::{Grid, Position};
use crate::render::{Frame, Renderer};
use crate::walls::derive_walls;
use crate::wilson::{WalkEvent, WilsonWalk};

/// Delays between rendered frames
#[derive(Clone, Copy, Debug, Default)]
pub struct Pacing {
    /// After each finished walk during generation
    pub walk: Duration,
    /// After each step around the cycle
    pub cycle: Duration,
}

impl Pacing {
    pub fn from_millis(walk: u64, cycle: u64) -> Self {
        Self {
            walk: Duration::from_millis(walk),
            cycle: Duration::from_millis(cycle),
        }
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

/// Result of a full run
pub struct Outcome {
    /// Finished maze, every path leading to `root`
    pub maze: Grid,
    pub root: Position,
    /// Cycle grid after traversal
    pub cycle: Grid,
    /// Steps taken around the cycle
    pub cycle_length: usize,
}

/// Step a generator to completion, drawing after every finished walk
pub fn animate_generation<R: Rng, D: Renderer>(
    walk: &mut WilsonWalk<'_, R>,
    renderer: &mut D,
    delay: Duration,
) -> anyhow::Result<()> {
    loop {
        let event = walk.step();
        match event {
            WalkEvent::SegmentDone { .. } | WalkEvent::Finished => {
                renderer
                    .draw(Frame::Maze, walk.grid())
                    .context("Could not draw maze")?;
                pause(delay);
            }
            WalkEvent::Advanced { .. } | WalkEvent::Erased { .. } => (),
        }
        if event == WalkEvent::Finished {
            return Ok(());
        }
    }
}

/// Walk around the cycle, drawing after every step
///
/// Returns the number of steps taken.
pub fn animate_cycle<D: Renderer>(
    walk: &mut CycleWalk<'_>,
    renderer: &mut D,
    delay: Duration,
) -> anyhow::Result<usize> {
    while walk.step().is_some() {
        renderer
            .draw(Frame::Cycle, walk.grid())
            .context("Could not draw cycle")?;
        pause(delay);
    }
    Ok(walk.steps())
}

/// Generate a `width` x `height` maze, turn it into a cycle and walk it
///
/// Start and end of the first walk are random; the cycle is walked from
/// the top left corner. Fails if the walk does not visit every sub-cell
/// exactly once.
pub fn run<R: Rng, D: Renderer>(
    width: usize,
    height: usize,
    rng: &mut R,
    renderer: &mut D,
    pacing: Pacing,
) -> anyhow::Result<Outcome> {
    let mut maze = Grid::new(width, height)?;
    let start = Position::random(rng, width, height);
    let end = Position::random(rng, width, height);
    info!(width, height, %start, %end, "generating maze");

    let root = {
        let mut walk = WilsonWalk::new(&mut maze, start, end, &mut *rng)?;
        animate_generation(&mut walk, renderer, pacing.walk)?;
        walk.root()
    };

    let walls = derive_walls(&maze);
    let mut cycle = build_cycle(&walls);
    info!(
        width = cycle.width(),
        height = cycle.height(),
        "walking cycle"
    );

    let cycle_length = {
        let mut walk = CycleWalk::new(&mut cycle, Position::new(0, 0))?;
        animate_cycle(&mut walk, renderer, pacing.cycle)?
    };

    ensure!(
        cycle_length == cycle.len(),
        "Cycle closed after {} steps, expected {}",
        cycle_length,
        cycle.len()
    );
    ensure!(
        cycle.cells().all(|c| !c.marked),
        "Cycle walk left unvisited cells"
    );

    Ok(Outcome {
        maze,
        root,
        cycle,
        cycle_length,
    })
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::render::NoRender;
    use crate::wilson::seeded_rng;

    /// Keeps (frame, marked cells) of every draw
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Frame, usize)>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, frame: Frame, grid: &Grid) -> io::Result<()> {
            self.frames
                .push((frame, grid.cells().filter(|c| c.marked).count()));
            Ok(())
        }
    }

    struct Broken;

    impl Renderer for Broken {
        fn draw(&mut self, _frame: Frame, _grid: &Grid) -> io::Result<()> {
            Err(io::Error::other("terminal gone"))
        }
    }

    #[test]
    fn full_run() {
        let mut rng = seeded_rng(Some(12));
        let outcome = run(10, 6, &mut rng, &mut NoRender, Pacing::default()).unwrap();
        assert_eq!(outcome.cycle_length, 4 * 10 * 6);
        assert_eq!(
            outcome.maze.cells().filter(|c| c.direction.is_some()).count(),
            59
        );
        assert!(outcome.maze[outcome.root].is_empty());
    }

    #[test]
    fn frames_in_order() {
        let mut rng = seeded_rng(Some(3));
        let mut recorder = Recorder::default();
        run(4, 3, &mut rng, &mut recorder, Pacing::default()).unwrap();

        let maze_frames = recorder
            .frames
            .iter()
            .take_while(|(f, _)| *f == Frame::Maze)
            .count();
        assert!(maze_frames >= 1);
        assert_eq!(recorder.frames[maze_frames - 1].1, 12);

        let cycle_frames = &recorder.frames[maze_frames..];
        assert_eq!(cycle_frames.len(), 48);
        assert!(cycle_frames.iter().all(|(f, _)| *f == Frame::Cycle));
        // One pending flag fewer per step
        for (i, (_, pending)) in cycle_frames.iter().enumerate() {
            assert_eq!(*pending, 48 - i - 1);
        }
    }

    #[test]
    fn same_seed_same_outcome() {
        let a = run(2, 2, &mut seeded_rng(Some(5)), &mut NoRender, Pacing::default()).unwrap();
        let b = run(2, 2, &mut seeded_rng(Some(5)), &mut NoRender, Pacing::default()).unwrap();
        assert_eq!(a.maze, b.maze);
        assert_eq!(a.cycle, b.cycle);
        assert_eq!(a.cycle_length, 16);
    }

    #[test]
    fn reject_small_grid() {
        let res = run(1, 8, &mut seeded_rng(Some(0)), &mut NoRender, Pacing::default());
        assert!(res.is_err());
    }

    #[test]
    fn renderer_errors_stop_the_run() {
        let res = run(3, 3, &mut seeded_rng(Some(0)), &mut Broken, Pacing::default());
        let err = res.err().unwrap();
        assert!(format!("{:#}", err).contains("terminal gone"));
    }
}
