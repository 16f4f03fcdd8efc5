use std::fmt::{Display, Formatter};

use ndarray::Array2;

use crate::location::{CellPos, Coord};

/// What a cell carries, as read off the puzzle panel.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Symbol {
    /// No constraint.
    #[default]
    Blank,
    /// Exactly this many of the cell's edges must be on the line.
    Digit(u8),
    /// A colored square; lowercase letter.
    Color(char),
}

impl Symbol {
    /// `' '` and `'.'` are blank, `0`-`9` are digits, any other ASCII letter is a color.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ' ' | '.' => Some(Self::Blank),
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            c if c.is_ascii_alphabetic() => Some(Self::Color(c.to_ascii_lowercase())),
            _ => None,
        }
    }

    /// The character [`Self::from_char`] reads back to this symbol.
    pub fn as_char(&self) -> char {
        match self {
            Self::Blank => ' ',
            Self::Digit(d) => char::from(b'0' + d),
            Self::Color(c) => *c,
        }
    }

    /// Whether this cell imposes nothing.
    pub fn is_blank(&self) -> bool {
        *self == Self::Blank
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Problems turning rows of text into a [`CellOverlay`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayParseError {
    /// Rows must all have the same length.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row, top row first.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        found: usize,
    },
    /// See [`Symbol::from_char`] for what is recognized.
    #[error("unrecognized symbol {symbol:?} at {cell}")]
    UnknownSymbol {
        /// The character as written.
        symbol: char,
        /// Where it was written.
        cell: CellPos,
    },
}

/// One [`Symbol`] per cell, origin top-left, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellOverlay {
    cells: Array2<Symbol>,
}

impl CellOverlay {
    /// An overlay of `width`x`height` cells, all blank.
    pub fn blank(width: Coord, height: Coord) -> Self {
        Self {
            cells: Array2::from_shape_simple_fn((height, width), Symbol::default),
        }
    }

    /// Parse one string per row, top row first.
    pub fn from_rows<I, S>(rows: I) -> Result<Self, OverlayParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut symbols = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (y, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(OverlayParseError::Ragged { row: y, expected, found });
            }

            for (x, c) in row.chars().enumerate() {
                symbols.push(Symbol::from_char(c).ok_or(OverlayParseError::UnknownSymbol {
                    symbol: c,
                    cell: CellPos(x, y),
                })?);
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        let cells = Array2::from_shape_vec((height, width), symbols)
            .map_err(|_| OverlayParseError::Ragged { row: height, expected: width, found: 0 })?;
        Ok(Self { cells })
    }

    /// Cells per row.
    pub fn width(&self) -> Coord {
        self.cells.ncols()
    }

    /// Cells per column.
    pub fn height(&self) -> Coord {
        self.cells.nrows()
    }

    /// The symbol at `cell`, or [`None`] if out of bounds.
    pub fn get(&self, cell: CellPos) -> Option<Symbol> {
        self.cells.get(cell.as_index()).copied()
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellPos, symbol: Symbol) {
        if let Some(slot) = self.cells.get_mut(cell.as_index()) {
            *slot = symbol;
        }
    }

    /// Non-blank cells, row-major.
    pub fn constraints(&self) -> impl Iterator<Item = (CellPos, Symbol)> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, symbol)| !symbol.is_blank())
            .map(|(index, symbol)| (CellPos::from(index), *symbol))
    }

    /// Every cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, Symbol)> + '_ {
        self.cells.indexed_iter().map(|(index, symbol)| (CellPos::from(index), *symbol))
    }
}

impl Display for CellOverlay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.rows() {
            for symbol in row {
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
