//! Fixed 4×4 tile board and the slide/merge rule.

use serde::{Deserialize, Serialize};

use crate::core::grid::Direction;

/// Side length of the board.
pub const SIZE: usize = 4;

/// Largest tile a 4×4 board can build from spawned 4s.
pub const MAX_TILE: u32 = 1 << 17;

/// A tile placed on the board by a spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Result of sliding the whole board one way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub board: Board,
    /// Sum of the values created by merges.
    pub gained: u32,
    /// Whether any tile moved or merged.
    pub changed: bool,
}

/// Row-major grid of tile values; 0 is an empty cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[u32; SIZE]; SIZE],
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a board from explicit rows.
    #[must_use]
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        Self { cells: rows }
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.cells
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row][col] = value;
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    out.push((r, c));
                }
            }
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v == 0)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Whether two orthogonally adjacent cells share a value.
    #[must_use]
    pub fn has_adjacent_pair(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let value = self.cells[r][c];
                if c + 1 < SIZE && self.cells[r][c + 1] == value {
                    return true;
                }
                if r + 1 < SIZE && self.cells[r + 1][c] == value {
                    return true;
                }
            }
        }
        false
    }

    /// Every cell is empty or a tile a real game could hold.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|&v| v == 0 || ((2..=MAX_TILE).contains(&v) && v.is_power_of_two()))
    }

    /// Full board with no merge available.
    #[must_use]
    pub fn is_stuck(&self) -> bool {
        self.is_full() && !self.has_adjacent_pair()
    }

    /// Slide every line toward the edge `direction` points at.
    #[must_use]
    pub fn shift(&self, direction: Direction) -> Shift {
        let mut board = *self;
        let mut gained: u32 = 0;
        let mut changed = false;

        for i in 0..SIZE {
            let coords = line_coords(direction, i);
            let mut line = coords.map(|(r, c)| board.cells[r][c]);
            let (line_gain, line_changed) = slide_line(&mut line);
            if line_changed {
                for (k, (r, c)) in coords.iter().enumerate() {
                    board.cells[*r][*c] = line[k];
                }
                changed = true;
                gained = gained.saturating_add(line_gain);
            }
        }

        Shift {
            board,
            gained,
            changed,
        }
    }
}

/// Cells of line `i`, starting at the edge tiles slide toward.
fn line_coords(direction: Direction, i: usize) -> [(usize, usize); SIZE] {
    std::array::from_fn(|k| match direction {
        Direction::Left => (i, k),
        Direction::Right => (i, SIZE - 1 - k),
        Direction::Up => (k, i),
        Direction::Down => (SIZE - 1 - k, i),
    })
}

/// Slide one line toward index 0.
///
/// Tiles are visited nearest-edge first. A tile travels over empty cells and
/// merges with an equal blocker only if that blocker lies beyond the last
/// merge in this line, so each tile merges at most once per move.
fn slide_line(line: &mut [u32; SIZE]) -> (u32, bool) {
    let mut gained: u32 = 0;
    let mut changed = false;
    let mut last_merge: Option<usize> = None;

    for j in 1..SIZE {
        let value = line[j];
        if value == 0 {
            continue;
        }

        let mut to = j;
        while to > 0 && line[to - 1] == 0 {
            to -= 1;
        }

        let can_merge = to > 0 && line[to - 1] == value && last_merge.map_or(true, |m| to - 1 > m);

        if can_merge {
            let merged = value.saturating_mul(2);
            line[to - 1] = merged;
            line[j] = 0;
            gained = gained.saturating_add(merged);
            last_merge = Some(to - 1);
            changed = true;
        } else if to != j {
            line[to] = value;
            line[j] = 0;
            changed = true;
        }
    }

    (gained, changed)
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>5}")).collect();
            writeln!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}
