//! 3×3 board, marks, and line detection.

use serde::{Deserialize, Serialize};

/// A player's symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other symbol.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// `(row, col)` of one board cell.
pub type Cell = (usize, usize);

/// Three cells forming a row, column or diagonal.
pub type Line = [Cell; 3];

/// The eight winning lines: rows, columns, diagonals.
pub const LINES: [Line; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

pub const CENTER: Cell = (1, 1);

pub const CORNERS: [Cell; 4] = [(0, 0), (0, 2), (2, 0), (2, 2)];

/// Grid of optional marks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Mark>; 3]; 3],
}

impl Board {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a board from rows of optional marks.
    #[must_use]
    pub fn from_rows(rows: [[Option<Mark>; 3]; 3]) -> Self {
        Self { cells: rows }
    }

    /// Parse a compact picture such as `"XO. .X. ..O"`; `.` is empty and
    /// whitespace is ignored. Returns `None` unless exactly nine cells parse.
    #[must_use]
    pub fn parse(picture: &str) -> Option<Self> {
        let marks: Vec<Option<Mark>> = picture
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'X' | 'x' => Some(Some(Mark::X)),
                'O' | 'o' => Some(Some(Mark::O)),
                '.' | '_' => Some(None),
                _ => None,
            })
            .collect::<Option<_>>()?;
        if marks.len() != 9 {
            return None;
        }
        let mut board = Self::empty();
        for (i, mark) in marks.into_iter().enumerate() {
            board.cells[i / 3][i % 3] = mark;
        }
        Some(board)
    }

    #[must_use]
    pub fn get(&self, (row, col): Cell) -> Option<Mark> {
        self.cells[row][col]
    }

    /// Copy of the board with one more mark.
    #[must_use]
    pub fn with(&self, (row, col): Cell, mark: Mark) -> Self {
        let mut next = *self;
        next.cells[row][col] = Some(mark);
        next
    }

    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Cell> {
        (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&cell| self.is_free(cell))
            .collect()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// First completed line, scanning rows, columns, then diagonals.
    #[must_use]
    pub fn winner(&self) -> Option<(Mark, Line)> {
        LINES.iter().find_map(|line| {
            let first = self.get(line[0])?;
            line[1..]
                .iter()
                .all(|&cell| self.get(cell) == Some(first))
                .then_some((first, *line))
        })
    }

    /// Cells where `mark` would complete a line right now.
    #[must_use]
    pub fn winning_cells(&self, mark: Mark) -> Vec<Cell> {
        self.empty_cells()
            .into_iter()
            .filter(|&cell| matches!(self.with(cell, mark).winner(), Some((m, _)) if m == mark))
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                match cell {
                    Some(mark) => write!(f, "{mark}")?,
                    None => f.write_str(".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
