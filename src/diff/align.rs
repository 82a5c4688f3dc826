use super::{Cell, SheetSnapshot};

/// The two aligned sides of one sheet. `new` and `old` always share the
/// same dimensions and the same `changed` flag at every position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComparedSheet {
    pub new: SheetSnapshot,
    pub old: SheetSnapshot,
}

impl ComparedSheet {
    pub fn row_count(&self) -> usize {
        self.new.row_count()
    }

    pub fn col_count(&self) -> usize {
        self.new.col_count()
    }

    pub fn changed_count(&self) -> usize {
        self.new
            .rows
            .iter()
            .map(|r| r.iter().filter(|c| c.changed).count())
            .sum()
    }
}

/// Pad both grids to a common `max_rows x max_cols` and classify every
/// position by exact text equality. A missing sheet is passed as an empty
/// grid, which makes every cell of the other side changed.
pub fn align_sheets(new: &[Vec<String>], old: &[Vec<String>]) -> ComparedSheet {
    let max_rows = new.len().max(old.len());
    let max_cols = widest_row(new).max(widest_row(old));

    let mut new_rows = Vec::with_capacity(max_rows);
    let mut old_rows = Vec::with_capacity(max_rows);

    for row in 0..max_rows {
        let mut new_row = Vec::with_capacity(max_cols);
        let mut old_row = Vec::with_capacity(max_cols);
        for col in 0..max_cols {
            let a = value_at(new, row, col);
            let b = value_at(old, row, col);
            // No trimming or numeric normalization: "1" and "1.0" differ.
            let changed = a != b;
            new_row.push(Cell { value: a.to_string(), changed });
            old_row.push(Cell { value: b.to_string(), changed });
        }
        new_rows.push(new_row);
        old_rows.push(old_row);
    }

    ComparedSheet {
        new: SheetSnapshot { rows: new_rows },
        old: SheetSnapshot { rows: old_rows },
    }
}

fn widest_row(grid: &[Vec<String>]) -> usize {
    grid.iter().map(|r| r.len()).max().unwrap_or(0)
}

fn value_at(grid: &[Vec<String>], row: usize, col: usize) -> &str {
    grid.get(row)
        .and_then(|r| r.get(col))
        .map(String::as_str)
        .unwrap_or("")
}
