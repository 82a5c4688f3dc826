use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::path::Path;

use crate::diff::{align_sheets, build_diff_index, ComparedSheet, DiffPosition, NavCursor};
use crate::error::{SessionError, SessionResult};
use crate::sheet::{RawWorkbook, WorkbookReader};
use crate::vcs::{Revision, RevisionSource};

/// Forward/backward for sheet cycling and revision stepping.
/// For revisions, forward moves toward older history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// One-cell viewport movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

// ── Comparison ──

/// Everything derived from one revision pair. Replaced as a whole, never
/// patched in place, so readers never see a half-rebuilt state.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Offsets into the revision list: (newer, older)
    pair: (usize, usize),
    /// Union of both revisions' sheet names, lexicographic
    sheet_names: Vec<String>,
    /// Parallel to `sheet_names`
    sheets: Vec<ComparedSheet>,
    active_sheet: usize,
    diff_index: Vec<DiffPosition>,
    cursor: NavCursor,
}

impl Comparison {
    fn build(pair: (usize, usize), new: RawWorkbook, old: RawWorkbook) -> Self {
        let names: BTreeSet<&String> = new.keys().chain(old.keys()).collect();
        let sheet_names: Vec<String> = names.into_iter().cloned().collect();
        let empty = Vec::new();
        let sheets = sheet_names
            .iter()
            .map(|name| {
                let a = new.get(name).unwrap_or(&empty);
                let b = old.get(name).unwrap_or(&empty);
                let sheet = align_sheets(a, b);
                debug!(
                    "sheet '{}': {}x{}, {} changed",
                    name,
                    sheet.row_count(),
                    sheet.col_count(),
                    sheet.changed_count()
                );
                sheet
            })
            .collect();

        let mut cmp = Comparison {
            pair,
            sheet_names,
            sheets,
            active_sheet: 0,
            diff_index: Vec::new(),
            cursor: NavCursor::new(),
        };
        cmp.select_sheet(0);
        cmp
    }

    /// Make `idx` active, rebuild its diff index and reset navigation
    fn select_sheet(&mut self, idx: usize) {
        self.active_sheet = idx;
        self.diff_index = self
            .sheets
            .get(idx)
            .map(|s| build_diff_index(&s.new))
            .unwrap_or_default();
        self.cursor.reset();
    }

    pub fn pair(&self) -> (usize, usize) {
        self.pair
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn active_sheet_index(&self) -> usize {
        self.active_sheet
    }

    pub fn active_sheet_name(&self) -> &str {
        self.sheet_names
            .get(self.active_sheet)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn active_sheet(&self) -> Option<&ComparedSheet> {
        self.sheets.get(self.active_sheet)
    }

    pub fn diff_index(&self) -> &[DiffPosition] {
        &self.diff_index
    }

    pub fn cursor(&self) -> &NavCursor {
        &self.cursor
    }

    pub fn viewport(&self) -> DiffPosition {
        self.cursor.viewport()
    }
}

// ── Session ──

/// Owns the revision history and the active comparison. Pure state: no
/// terminal types, so everything here runs headless in tests.
pub struct Session {
    source: Box<dyn RevisionSource>,
    reader: Box<dyn WorkbookReader>,
    /// Base name of the reviewed file, reused for exported snapshots so the
    /// reader still sees the source extension
    file_name: String,
    revisions: Vec<Revision>,
    comparison: Option<Comparison>,
}

impl Session {
    /// Fetch up to `limit` revisions. At least two are needed to compare anything.
    pub fn new(
        source: Box<dyn RevisionSource>,
        reader: Box<dyn WorkbookReader>,
        file_name: String,
        limit: usize,
    ) -> SessionResult<Self> {
        let revisions = source
            .list_revisions(limit)
            .map_err(|e| SessionError::Retrieval(format!("{:#}", e)))?;
        info!("{} revisions of {} via {}", revisions.len(), file_name, source.name());

        if revisions.len() < 2 {
            return Err(SessionError::Retrieval(format!(
                "{} has {} revision(s) in history, at least 2 are needed",
                file_name,
                revisions.len()
            )));
        }

        Ok(Self {
            source,
            reader,
            file_name,
            revisions,
            comparison: None,
        })
    }

    // ── Read-only access ──

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// The (newer, older) revisions under comparison
    pub fn compared_revisions(&self) -> Option<(&Revision, &Revision)> {
        let (a, b) = self.comparison.as_ref()?.pair;
        Some((self.revisions.get(a)?, self.revisions.get(b)?))
    }

    // ── Commands ──

    /// Compare revision `a` (newer) against revision `b` (older).
    ///
    /// On any failure the current comparison is left exactly as it was. On
    /// success the active sheet is kept by name when it still exists.
    pub fn load_comparison(&mut self, a: usize, b: usize) -> SessionResult<()> {
        self.validate_pair(a, b)?;
        let keep = self
            .comparison
            .as_ref()
            .map(|c| c.active_sheet_name().to_string());

        let mut next = self.build_comparison(a, b)?;
        if let Some(name) = keep {
            if let Some(idx) = next.sheet_names.iter().position(|n| *n == name) {
                next.select_sheet(idx);
            }
        }
        self.comparison = Some(next);
        Ok(())
    }

    /// Slide the comparison window one revision. Returns `Ok(false)` when the
    /// window is already at that end of the history.
    pub fn step_revision_pair(&mut self, dir: Direction) -> SessionResult<bool> {
        let current = match &self.comparison {
            Some(c) => c.pair.0,
            None => return Ok(false),
        };
        let first = match dir {
            Direction::Forward if current + 2 < self.revisions.len() => current + 1,
            Direction::Backward if current > 0 => current - 1,
            _ => return Ok(false),
        };

        let next = self.build_comparison(first, first + 1)?;
        self.comparison = Some(next);
        Ok(true)
    }

    /// Cycle the active sheet, wrapping at either end
    pub fn switch_sheet(&mut self, dir: Direction) {
        let Some(cmp) = self.comparison.as_mut() else {
            return;
        };
        let n = cmp.sheet_names.len();
        if n == 0 {
            return;
        }
        let idx = match dir {
            Direction::Forward => (cmp.active_sheet + 1) % n,
            Direction::Backward => (cmp.active_sheet + n - 1) % n,
        };
        cmp.select_sheet(idx);
        debug!("sheet -> {} ({} diffs)", cmp.active_sheet_name(), cmp.diff_index.len());
    }

    /// Jump to the next changed cell; `None` when the sheet has no changes
    pub fn next_diff(&mut self) -> Option<DiffPosition> {
        let cmp = self.comparison.as_mut()?;
        let pos = cmp.cursor.next(&cmp.diff_index)?;
        debug!("next diff -> {}", pos.to_reference());
        Some(pos)
    }

    /// Jump to the previous changed cell; `None` when the sheet has no changes
    pub fn prev_diff(&mut self) -> Option<DiffPosition> {
        let cmp = self.comparison.as_mut()?;
        let pos = cmp.cursor.prev(&cmp.diff_index)?;
        debug!("prev diff -> {}", pos.to_reference());
        Some(pos)
    }

    pub fn move_viewport(&mut self, mv: Move) {
        let Some(cmp) = self.comparison.as_mut() else {
            return;
        };
        let (rows, cols) = cmp
            .sheets
            .get(cmp.active_sheet)
            .map(|s| (s.row_count(), s.col_count()))
            .unwrap_or((0, 0));
        match mv {
            Move::Up => cmp.cursor.scroll_up(),
            Move::Down => cmp.cursor.scroll_down(rows),
            Move::Left => cmp.cursor.scroll_left(),
            Move::Right => cmp.cursor.scroll_right(cols),
        }
    }

    // ── Internals ──

    fn validate_pair(&self, a: usize, b: usize) -> SessionResult<()> {
        let len = self.revisions.len();
        if a >= len || b >= len {
            return Err(SessionError::Input(format!(
                "offsets {} and {} must be below {}",
                a, b, len
            )));
        }
        if a >= b {
            return Err(SessionError::Input(format!(
                "newer offset {} must be smaller than older offset {}",
                a, b
            )));
        }
        Ok(())
    }

    /// Export, parse and align both revisions. Exported snapshots live in a
    /// scratch directory that is removed when this returns, on every path.
    fn build_comparison(&self, a: usize, b: usize) -> SessionResult<Comparison> {
        let scratch = tempfile::Builder::new()
            .prefix("sr-")
            .tempdir()
            .map_err(|e| SessionError::Retrieval(format!("cannot create temp dir: {}", e)))?;

        let result = self
            .fetch(a, scratch.path())
            .and_then(|new| Ok((new, self.fetch(b, scratch.path())?)));

        match result {
            Ok((new, old)) => {
                let cmp = Comparison::build((a, b), new, old);
                info!(
                    "compared {} vs {}: {} sheets, {} diffs in '{}'",
                    self.revisions[a].label(),
                    self.revisions[b].label(),
                    cmp.sheet_names.len(),
                    cmp.diff_index.len(),
                    cmp.active_sheet_name()
                );
                Ok(cmp)
            }
            Err(e) => {
                warn!("comparison {}:{} failed: {}", a, b, e);
                Err(e)
            }
        }
    }

    fn fetch(&self, idx: usize, dir: &Path) -> SessionResult<RawWorkbook> {
        let rev = &self.revisions[idx];
        // Offset prefix: abbreviated hashes of two revisions may collide
        let dest = dir.join(format!("{}-{}-{}", idx, rev.label(), self.file_name));

        self.source
            .export(rev, &dest)
            .map_err(|e| SessionError::Retrieval(format!("{:#}", e)))?;
        debug!("exported {} to {}", rev.label(), dest.display());

        let book = self.reader.read(&dest).map_err(|e| SessionError::Parse {
            path: dest.clone(),
            reason: format!("{:#}", e),
        })?;
        if book.is_empty() {
            return Err(SessionError::Parse {
                path: dest,
                reason: "workbook contains no sheets".into(),
            });
        }
        Ok(book)
    }
}
