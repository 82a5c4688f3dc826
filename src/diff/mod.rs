mod align;
mod cursor;
mod index;

pub use align::{align_sheets, ComparedSheet};
pub use cursor::NavCursor;
pub use index::build_diff_index;

/// A ragged grid of cell text as produced by the workbook reader
pub type RawGrid = Vec<Vec<String>>;

/// One cell of a compared sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub value: String,
    /// Set on both sides of a position when the two revisions disagree
    pub changed: bool,
}

/// A rectangular grid of cells for one side of a comparison.
/// Every row has the same length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetSnapshot {
    pub rows: Vec<Vec<Cell>>,
}

impl SheetSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

/// Coordinate of a changed cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiffPosition {
    pub row: usize,
    pub col: usize,
}

impl DiffPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Spreadsheet-style reference, e.g. `B3`
    pub fn to_reference(&self) -> String {
        format!("{}{}", column_name(self.col), self.row + 1)
    }
}

/// Column letters for a 0-based column: 0 -> `A`, 26 -> `AA`
pub fn column_name(col: usize) -> String {
    let mut letters = String::new();
    let mut n = col;
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}
