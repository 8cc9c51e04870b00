//! Board representation and line detection.
//!
//! This module contains:
//! - `Symbol` and `Coord` value types
//! - The 3x3 `Board` with index/coordinate conversion
//! - The fixed table of eight winning lines and win/draw detection
//! - A collision-free content hash used as a search cache key

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width and height of the board
pub const BOARD_SIZE: usize = 3;

/// Total number of cells
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Every winning triple as cell indices: three rows, three columns, two diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Marker placed on the board.
///
/// The first seat always plays `X`, the second always plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// Symbol assigned to a seat index (0 or 1)
    pub fn for_seat(seat: usize) -> Self {
        if seat == 0 {
            Symbol::X
        } else {
            Symbol::O
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }

    /// Seat index that plays this symbol
    pub fn seat(self) -> usize {
        match self {
            Symbol::X => 0,
            Symbol::O => 1,
        }
    }

    fn as_char(self) -> char {
        match self {
            Symbol::X => 'X',
            Symbol::O => 'O',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board coordinate: `x` is the column, `y` is the row.
///
/// Values outside 0..3 are representable so that incoming moves can be
/// rejected by validation instead of failing to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    pub const CENTER: Coord = Coord::new(1, 1);

    pub fn is_in_bounds(&self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    /// Row-major cell index, or `None` when out of bounds
    pub fn to_index(&self) -> Option<usize> {
        if self.is_in_bounds() {
            Some(self.y as usize * BOARD_SIZE + self.x as usize)
        } else {
            None
        }
    }

    /// Coordinate for a row-major cell index
    pub fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self::new(
                (index % BOARD_SIZE) as u8,
                (index / BOARD_SIZE) as u8,
            ))
        } else {
            None
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!((self.x, self.y), (0, 0) | (2, 0) | (0, 2) | (2, 2))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// How a winning line runs across the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// A full row (constant `y`)
    Horizontal,
    /// A full column (constant `x`)
    Vertical,
    /// One of the two diagonals
    Diagonal,
}

/// The three cells that decided a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    pub cells: [Coord; 3],
    pub kind: LineKind,
}

impl WinningLine {
    /// Build the descriptor for an entry of `WIN_LINES`
    fn from_indices(line: [usize; 3]) -> Self {
        let cells = line.map(|i| Coord::new((i % BOARD_SIZE) as u8, (i / BOARD_SIZE) as u8));
        let kind = if cells.iter().all(|c| c.y == cells[0].y) {
            LineKind::Horizontal
        } else if cells.iter().all(|c| c.x == cells[0].x) {
            LineKind::Vertical
        } else {
            LineKind::Diagonal
        };
        Self { cells, kind }
    }

    /// Whether this descriptor names one of the eight real lines
    pub fn is_valid(&self) -> bool {
        WIN_LINES
            .iter()
            .any(|line| WinningLine::from_indices(*line) == *self)
    }
}

/// A 3x3 board of optional symbols, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Symbol>; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from row-major cells
    pub fn from_cells(cells: [Option<Symbol>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Symbol>; CELL_COUNT] {
        &self.cells
    }

    /// Get the symbol at a coordinate; out-of-bounds reads as empty
    pub fn get(&self, coord: Coord) -> Option<Symbol> {
        coord.to_index().and_then(|i| self.cells[i])
    }

    pub fn get_index(&self, index: usize) -> Option<Symbol> {
        self.cells.get(index).copied().flatten()
    }

    /// Place a symbol; returns false if the coordinate is out of bounds
    pub fn set(&mut self, coord: Coord, symbol: Option<Symbol>) -> bool {
        match coord.to_index() {
            Some(i) => {
                self.cells[i] = symbol;
                true
            }
            None => false,
        }
    }

    pub fn set_index(&mut self, index: usize, symbol: Option<Symbol>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = symbol;
        }
    }

    pub fn is_empty_at(&self, coord: Coord) -> bool {
        coord.is_in_bounds() && self.get(coord).is_none()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Empty cell indices in row-major order
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells.iter().filter(|c| **c == Some(symbol)).count()
    }

    /// Scan the line table and return the first completed line
    pub fn check_win(&self) -> Option<(Symbol, WinningLine)> {
        WIN_LINES.iter().find_map(|&[a, b, c]| {
            let symbol = self.cells[a]?;
            if self.cells[b] == Some(symbol) && self.cells[c] == Some(symbol) {
                Some((symbol, WinningLine::from_indices([a, b, c])))
            } else {
                None
            }
        })
    }

    /// Whether `symbol` owns any complete line
    pub fn has_line(&self, symbol: Symbol) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.cells[i] == Some(symbol)))
    }

    /// Full board with no completed line
    pub fn is_draw(&self) -> bool {
        self.is_full() && self.check_win().is_none()
    }

    /// Cell that would complete a line for `symbol`, if one exists
    pub fn winning_cell(&self, symbol: Symbol) -> Option<usize> {
        WIN_LINES.iter().find_map(|line| {
            let owned = line.iter().filter(|&&i| self.cells[i] == Some(symbol)).count();
            let empty: Vec<usize> = line
                .iter()
                .copied()
                .filter(|&i| self.cells[i].is_none())
                .collect();
            if owned == 2 && empty.len() == 1 {
                Some(empty[0])
            } else {
                None
            }
        })
    }

    /// Base-3 encoding of the cells (empty = 0, X = 1, O = 2).
    ///
    /// Unique per board, which makes it usable as a cache key without
    /// collision handling.
    pub fn hash(&self) -> u32 {
        self.cells.iter().fold(0u32, |acc, cell| {
            let digit = match cell {
                None => 0,
                Some(Symbol::X) => 1,
                Some(Symbol::O) => 2,
            };
            acc * 3 + digit
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            let row: Vec<String> = (0..BOARD_SIZE)
                .map(|x| match self.cells[y * BOARD_SIZE + x] {
                    Some(s) => s.to_string(),
                    None => ".".to_string(),
                })
                .collect();
            write!(f, "{}", row.join("|"))?;
            if y + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Error from parsing a board string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid board string: {0}")]
pub struct ParseBoardError(String);

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse nine cells in row-major order. `X`/`O` are symbols,
    /// `.`, `_` and `-` are empty; whitespace and `|` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; CELL_COUNT];
        let mut index = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            if index >= CELL_COUNT {
                return Err(ParseBoardError(format!("more than {} cells", CELL_COUNT)));
            }
            cells[index] = match ch.to_ascii_uppercase() {
                'X' => Some(Symbol::X),
                'O' => Some(Symbol::O),
                '.' | '_' | '-' => None,
                other => return Err(ParseBoardError(format!("unexpected '{}'", other))),
            };
            index += 1;
        }
        if index != CELL_COUNT {
            return Err(ParseBoardError(format!("expected {} cells, got {}", CELL_COUNT, index)));
        }
        Ok(Board::from_cells(cells))
    }
}
