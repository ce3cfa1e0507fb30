//! Drawing grids as text

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType},
};
use itertools::Itertools;

use crate::grid::{Cell, Grid};

/// Which grid a frame shows
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Frame {
    /// Maze under generation
    Maze,
    /// Cycle grid under traversal
    Cycle,
}

/// Consumer of grid snapshots
///
/// Called synchronously after each animation step; the caller waits for
/// `draw` to return before pacing and stepping on.
pub trait Renderer {
    fn draw(&mut self, frame: Frame, grid: &Grid) -> io::Result<()>;
}

/// Renderer that draws nothing
pub struct NoRender;

impl Renderer for NoRender {
    fn draw(&mut self, _frame: Frame, _grid: &Grid) -> io::Result<()> {
        Ok(())
    }
}

pub fn cell_char(cell: &Cell) -> char {
    cell.direction.map_or(' ', |d| d.arrow())
}

/// Grid inside a `|` and `-` frame, one string per line
pub fn grid_lines(grid: &Grid) -> Vec<String> {
    let border = "-".repeat(grid.width() + 2);
    let mut lines = Vec::with_capacity(grid.height() + 2);
    lines.push(border.clone());
    lines.extend(
        grid.rows()
            .map(|row| format!("|{}|", row.iter().map(cell_char).join(""))),
    );
    lines.push(border);
    lines
}

/// Grid as a single multi-line string
pub fn grid_to_string(grid: &Grid) -> String {
    grid_lines(grid).join("\n")
}

/// Status line naming the maze size
pub fn size_banner(width: usize, height: usize) -> String {
    format!("GRID SIZE: {}x{}", width, height)
}

/// Terminal size available for a maze
///
/// The frame border takes two columns and two rows; one more column and
/// two more rows are kept free for the cursor and status lines.
pub fn fitting_dimensions() -> io::Result<(usize, usize)> {
    let (columns, rows) = terminal::size()?;
    Ok((
        (columns as usize).saturating_sub(3),
        (rows as usize).saturating_sub(4),
    ))
}

/// Renderer drawing frames in place on a terminal
///
/// Maze frames are drawn at the top of the screen, cycle frames right below
/// the maze. Marked cells are dimmed. The cursor is hidden while the
/// renderer lives.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    /// Clear the screen and hide the cursor
    pub fn new(mut out: W) -> io::Result<Self> {
        execute!(out, Clear(ClearType::All), Hide, MoveTo(0, 0))?;
        Ok(Self { out })
    }

    /// Print a line of text at `row`
    pub fn status(&mut self, row: u16, text: &str) -> io::Result<()> {
        execute!(
            self.out,
            MoveTo(0, row),
            Clear(ClearType::CurrentLine),
            Print(text)
        )
    }

    fn draw_at(&mut self, top: u16, grid: &Grid) -> io::Result<()> {
        let border = "-".repeat(grid.width() + 2);
        queue!(self.out, MoveTo(0, top), Print(&border))?;

        for (y, row) in grid.rows().enumerate() {
            queue!(self.out, MoveTo(0, top + 1 + y as u16), Print('|'))?;
            for (marked, run) in &row.iter().chunk_by(|cell| cell.marked) {
                let text: String = run.map(cell_char).collect();
                if marked {
                    queue!(
                        self.out,
                        SetAttribute(Attribute::Dim),
                        Print(text),
                        SetAttribute(Attribute::NormalIntensity)
                    )?;
                } else {
                    queue!(self.out, Print(text))?;
                }
            }
            queue!(self.out, Print('|'))?;
        }

        queue!(
            self.out,
            MoveTo(0, top + 1 + grid.height() as u16),
            Print(&border)
        )?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, frame: Frame, grid: &Grid) -> io::Result<()> {
        let top = match frame {
            Frame::Maze => 0,
            // Row `H + 2`, right below the framed maze, which is half as tall
            Frame::Cycle => (grid.height() / 2 + 2) as u16,
        };
        self.draw_at(top, grid)
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show);
    }
}
