//! CLI for the animated maze cycle

use std::io;

use anyhow::{bail, Context};
use clap::Parser;
use hamilton_maze::animation::{self, Pacing};
use hamilton_maze::render::{self, NoRender, TerminalRenderer};
use hamilton_maze::seeded_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate a maze with Wilson's algorithm, then walk the Hamiltonian
/// cycle around its walls
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells. Defaults to the terminal width.
    width: Option<usize>,

    /// Maze height in cells. Defaults to the terminal height.
    height: Option<usize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Delay after each finished walk in milliseconds
    #[arg(long, default_value_t = 10)]
    walk_delay: u64,

    /// Delay after each step around the cycle in milliseconds
    #[arg(long, default_value_t = 1)]
    cycle_delay: u64,

    /// Only run and check the pipeline, draw nothing
    #[arg(long)]
    no_animation: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let (width, height) = match (args.width, args.height) {
        (Some(w), Some(h)) => (w, h),
        (None, None) => {
            render::fitting_dimensions().context("Could not read terminal size")?
        }
        _ => bail!("Give both width and height, or neither"),
    };
    let mut rng = seeded_rng(args.seed);
    let banner = render::size_banner(width, height);

    let outcome = if args.no_animation {
        println!("{}", banner);
        animation::run(width, height, &mut rng, &mut NoRender, Pacing::default())?
    } else {
        let mut renderer = TerminalRenderer::new(io::stdout())?;
        // Below both frames
        let status_row = (3 * height + 4) as u16;
        renderer.status(status_row, &banner)?;
        let pacing = Pacing::from_millis(args.walk_delay, args.cycle_delay);
        let outcome = animation::run(width, height, &mut rng, &mut renderer, pacing)?;
        renderer.status(status_row + 1, "")?;
        outcome
    };

    info!(
        root = %outcome.root,
        steps = outcome.cycle_length,
        "cycle complete"
    );
    println!("OK!");
    Ok(())
}
