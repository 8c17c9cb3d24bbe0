//! Cell position parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell
//! references (e.g. "A1", "B2", "AA100") and zero-indexed row/column
//! coordinates, plus the sheet-wide bounds every position is checked
//! against.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Largest row index a sheet will address (exclusive upper bound is
/// `MAX_ROWS`, so valid rows are `0..MAX_ROWS`).
pub const MAX_ROWS: usize = 16_384;

/// Largest column index a sheet will address (exclusive upper bound is
/// `MAX_COLS`, so valid columns are `0..MAX_COLS`).
pub const MAX_COLS: usize = 16_384;

/// A reference to a cell by zero-indexed row and column.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// A position is valid iff both coordinates fall within the sheet's
    /// declared maximum range.
    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse a cell reference from spreadsheet notation (e.g. "A1", "B2",
    /// "AA10"). Returns `None` if the input isn't a valid A1 reference,
    /// independent of sheet bounds.
    pub fn parse_a1(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let digits = &caps["digits"];

        let mut col_acc = 0usize;
        for c in letters.to_ascii_uppercase().bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = digits.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Convert a column index to spreadsheet-style letters (0 -> A, 25 -> Z,
    /// 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Za-z]+)(?<digits>[0-9]+)$")
            .expect("A1 cell reference regex must compile")
    })
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}
