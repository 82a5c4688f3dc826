use super::{DiffPosition, SheetSnapshot};

/// Collect the changed positions of a classified sheet in row-major order.
///
/// Only one side needs scanning: both snapshots of a comparison carry the
/// same `changed` flags.
pub fn build_diff_index(sheet: &SheetSnapshot) -> Vec<DiffPosition> {
    let mut positions = Vec::new();
    for (row, cells) in sheet.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.changed {
                positions.push(DiffPosition { row, col });
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::align_sheets;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn single_change_indexed() {
        let old = grid(&[&["a", "b"], &["c", "d"]]);
        let new = grid(&[&["a", "x"], &["c", "d"]]);
        let cmp = align_sheets(&new, &old);
        assert_eq!(build_diff_index(&cmp.new), vec![DiffPosition::new(0, 1)]);
    }

    #[test]
    fn no_changes_gives_empty_index() {
        let g = grid(&[&["a", "b"]]);
        let cmp = align_sheets(&g, &g);
        assert!(build_diff_index(&cmp.new).is_empty());
    }

    #[test]
    fn index_is_strictly_row_major_and_counts_every_change() {
        let new = grid(&[&["1", "2", "3"], &["4", "5", "6"], &["7", "8", "9"]]);
        let old = grid(&[&["1", "x", "3"], &["y", "5", "z"], &["7", "8"]]);
        let cmp = align_sheets(&new, &old);
        let index = build_diff_index(&cmp.new);
        assert_eq!(
            index,
            vec![
                DiffPosition::new(0, 1),
                DiffPosition::new(1, 0),
                DiffPosition::new(1, 2),
                DiffPosition::new(2, 2),
            ]
        );
        assert!(index.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(index.len(), cmp.changed_count());
    }

    #[test]
    fn old_side_scan_agrees_with_new_side_scan() {
        let new = grid(&[&["a", "b"], &["c"]]);
        let old = grid(&[&["a"], &["c", "d"], &["e"]]);
        let cmp = align_sheets(&new, &old);
        assert_eq!(build_diff_index(&cmp.new), build_diff_index(&cmp.old));
    }

    #[test]
    fn sheet_only_in_new_revision_indexes_every_cell() {
        let new = grid(&[&["a", "b", "c"], &["d", "e", "f"]]);
        let cmp = align_sheets(&new, &[]);
        assert_eq!(build_diff_index(&cmp.new).len(), 2 * 3);
    }
}
