//! CLI printing a generated maze and its cycle grid

use anyhow::Context;
use clap::Parser;
use hamilton_maze::render::grid_to_string;
use hamilton_maze::{build_cycle, derive_walls, generate, seeded_rng, Grid, Position};

/// Print a Wilson's algorithm maze and the Hamiltonian cycle around it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = 16)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = 10)]
    height: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut rng = seeded_rng(args.seed);
    let mut grid = Grid::new(args.width, args.height)?;
    let start = Position::random(&mut rng, args.width, args.height);
    let end = Position::random(&mut rng, args.width, args.height);
    generate(&mut grid, start, end, &mut rng).context("Maze generation failed")?;

    let cycle = build_cycle(&derive_walls(&grid));
    println!("{}", grid_to_string(&grid));
    println!("{}", grid_to_string(&cycle));
    Ok(())
}
