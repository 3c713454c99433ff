//! Spreadsheet cell coordinates (`A1`, `G7`, `AW12`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Highest supported zero-based column index (`AW`).
pub const MAX_COLUMN: usize = 48;

/// A zero-based (column, row) pair, displayed as a spreadsheet coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("column index {0} is past the last supported column AW")]
    ColumnOutOfRange(usize),

    #[error("'{0}' is not a cell coordinate")]
    Malformed(String),
}

impl Coord {
    /// Build a coordinate, rejecting columns past `AW`.
    pub fn new(column: usize, row: usize) -> Result<Self, CoordError> {
        if column > MAX_COLUMN {
            return Err(CoordError::ColumnOutOfRange(column));
        }
        Ok(Self { column, row })
    }

    /// The column letters, e.g. `A`, `Z`, `AA`.
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }
}

/// Bijective base-26 letters for a zero-based column index.
fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (column % 26) as u8);
        if column < 26 {
            break;
        }
        column = column / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row + 1)
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordError::Malformed(s.to_string());

        let split = s
            .find(|c: char| !c.is_ascii_uppercase())
            .ok_or_else(malformed)?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let mut column = 0usize;
        for b in letters.bytes() {
            column = column
                .checked_mul(26)
                .and_then(|c| c.checked_add((b - b'A') as usize + 1))
                .ok_or_else(malformed)?;
        }
        let row: usize = digits.parse().map_err(|_| malformed())?;
        if row == 0 {
            return Err(malformed());
        }

        Coord::new(column - 1, row - 1)
    }
}

/// Coordinate text for a zero-based (column, row) pair.
pub fn to_coordinate(column: usize, row: usize) -> Result<String, CoordError> {
    Ok(Coord::new(column, row)?.to_string())
}

/// Zero-based (column, row) pair for coordinate text.
pub fn from_coordinate(coordinate: &str) -> Result<(usize, usize), CoordError> {
    let coord: Coord = coordinate.parse()?;
    Ok((coord.column, coord.row))
}
