use super::DiffPosition;

/// Diff navigation state: an optional pointer into the current diff index
/// plus the viewport's top-left cell.
///
/// While the pointer is unset, `next`/`prev` resume from the viewport so a
/// user who scrolled by hand lands on the nearest diff in the requested
/// direction. Once set, navigation simply steps through the index with
/// wraparound and ignores later manual scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavCursor {
    pointer: Option<usize>,
    viewport: DiffPosition,
}

impl NavCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset into the diff index, `None` while unset
    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn viewport(&self) -> DiffPosition {
        self.viewport
    }

    /// Back to unset at the origin. Must run whenever the diff index is rebuilt.
    pub fn reset(&mut self) {
        self.pointer = None;
        self.viewport = DiffPosition::default();
    }

    /// Jump to the next changed cell. No-op on an empty index.
    pub fn next(&mut self, index: &[DiffPosition]) -> Option<DiffPosition> {
        if index.is_empty() {
            return None;
        }
        let target = match self.pointer {
            Some(i) => (i + 1) % index.len(),
            None => {
                let vp = self.viewport;
                index
                    .iter()
                    .position(|p| p.row > vp.row || (p.row == vp.row && p.col >= vp.col))
                    .unwrap_or(0)
            }
        };
        Some(self.land(index, target))
    }

    /// Jump to the previous changed cell. No-op on an empty index.
    pub fn prev(&mut self, index: &[DiffPosition]) -> Option<DiffPosition> {
        if index.is_empty() {
            return None;
        }
        let target = match self.pointer {
            Some(i) => (i + index.len() - 1) % index.len(),
            None => {
                let vp = self.viewport;
                index
                    .iter()
                    .rposition(|p| p.row < vp.row || (p.row == vp.row && p.col < vp.col))
                    .unwrap_or(index.len() - 1)
            }
        };
        Some(self.land(index, target))
    }

    fn land(&mut self, index: &[DiffPosition], target: usize) -> DiffPosition {
        let pos = index[target];
        self.pointer = Some(target);
        self.viewport = pos;
        pos
    }

    // ── Manual viewport movement (does not touch the pointer) ──

    pub fn scroll_up(&mut self) {
        self.viewport.row = self.viewport.row.saturating_sub(1);
    }

    pub fn scroll_left(&mut self) {
        self.viewport.col = self.viewport.col.saturating_sub(1);
    }

    /// Move down one row, stopping at `rows - 1`
    pub fn scroll_down(&mut self, rows: usize) {
        if self.viewport.row + 1 < rows {
            self.viewport.row += 1;
        }
    }

    /// Move right one column, stopping at `cols - 1`
    pub fn scroll_right(&mut self, cols: usize) {
        if self.viewport.col + 1 < cols {
            self.viewport.col += 1;
        }
    }
}
