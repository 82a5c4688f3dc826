use log::warn;

use super::session::{Direction, Move, Session};
use crate::config::SrConfig;
use crate::error::SessionResult;

/// Notifications disappear after this many ticks (~2s at 100ms per poll)
const MESSAGE_TICKS: u8 = 20;

// ── Overlay types ──

/// Active overlay popup state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayData {
    /// Choose two revisions: first Enter marks the newer one, second the older
    RevisionPicker {
        selected: usize,
        /// Offset marked by the first Enter
        first: Option<usize>,
    },
    Help,
}

// ── Main App State ──

pub struct App {
    pub session: Session,

    /// Should the app quit?
    pub should_quit: bool,

    /// Active overlay popup (None = no overlay)
    pub overlay: Option<OverlayData>,

    /// Transient status message
    pub message: Option<String>,

    /// Ticks since the message was set (for auto-clearing)
    pub message_ticks: u8,

    pub config: SrConfig,
}

impl App {
    /// Wrap a session and load its first comparison. Failing here is fatal:
    /// there is nothing to show without a comparison.
    pub fn new(mut session: Session, config: SrConfig, pair: (usize, usize)) -> SessionResult<Self> {
        session.load_comparison(pair.0, pair.1)?;
        Ok(App {
            session,
            should_quit: false,
            overlay: None,
            message: None,
            message_ticks: 0,
            config,
        })
    }

    // ── Navigation ──

    pub fn move_viewport(&mut self, mv: Move) {
        self.session.move_viewport(mv);
    }

    pub fn next_diff(&mut self) {
        if self.session.next_diff().is_none() {
            self.notify_no_diffs();
        }
    }

    pub fn prev_diff(&mut self) {
        if self.session.prev_diff().is_none() {
            self.notify_no_diffs();
        }
    }

    fn notify_no_diffs(&mut self) {
        let name = self
            .session
            .comparison()
            .map(|c| c.active_sheet_name().to_string())
            .unwrap_or_default();
        self.notify(&format!("No differences in sheet '{}'", name));
    }

    pub fn switch_sheet(&mut self, dir: Direction) {
        self.session.switch_sheet(dir);
    }

    /// Forward steps toward older history
    pub fn step_revision_pair(&mut self, dir: Direction) {
        match self.session.step_revision_pair(dir) {
            Ok(true) => self.notify_comparing(),
            Ok(false) => {
                let edge = match dir {
                    Direction::Forward => "Already at the oldest revision pair",
                    Direction::Backward => "Already at the newest revision pair",
                };
                self.notify(edge);
            }
            Err(e) => {
                warn!("step {:?} failed: {}", dir, e);
                self.notify(&e.to_string());
            }
        }
    }

    fn notify_comparing(&mut self) {
        if let Some((newer, older)) = self.session.compared_revisions() {
            let msg = format!("Comparing {} vs {}", newer.label(), older.label());
            self.notify(&msg);
        }
    }

    // ── Overlay: Revision Picker ──

    pub fn open_revision_picker(&mut self) {
        let selected = self.session.comparison().map(|c| c.pair().0).unwrap_or(0);
        self.overlay = Some(OverlayData::RevisionPicker {
            selected,
            first: None,
        });
    }

    pub fn open_help(&mut self) {
        self.overlay = Some(OverlayData::Help);
    }

    // ── Overlay: Navigation ──

    pub fn overlay_next(&mut self) {
        let count = self.session.revisions().len();
        if let Some(OverlayData::RevisionPicker { selected, .. }) = &mut self.overlay {
            if *selected + 1 < count {
                *selected += 1;
            }
        }
    }

    pub fn overlay_prev(&mut self) {
        if let Some(OverlayData::RevisionPicker { selected, .. }) = &mut self.overlay {
            if *selected > 0 {
                *selected -= 1;
            }
        }
    }

    /// Handle Enter in an overlay. In the picker the first Enter marks the
    /// newer revision and the second loads the comparison.
    pub fn overlay_select(&mut self) {
        let overlay = match self.overlay.take() {
            Some(o) => o,
            None => return,
        };

        match overlay {
            OverlayData::RevisionPicker {
                selected,
                first: None,
            } => {
                let label = self
                    .session
                    .revisions()
                    .get(selected)
                    .map(|r| r.label())
                    .unwrap_or_default();
                self.overlay = Some(OverlayData::RevisionPicker {
                    selected,
                    first: Some(selected),
                });
                self.notify(&format!("Newer: {}, now pick the older revision", label));
            }
            OverlayData::RevisionPicker {
                selected,
                first: Some(first),
            } => match self.session.load_comparison(first, selected) {
                Ok(()) => self.notify_comparing(),
                Err(e) => {
                    warn!("revision selection {}:{} rejected: {}", first, selected, e);
                    self.notify(&e.to_string());
                }
            },
            OverlayData::Help => {}
        }
    }

    pub fn overlay_close(&mut self) {
        self.overlay = None;
    }

    // ── Notifications ──

    pub fn notify(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_ticks = 0;
    }

    /// Called on every event loop iteration to expire notifications
    pub fn tick(&mut self) {
        if self.message.is_some() {
            self.message_ticks += 1;
            if self.message_ticks > MESSAGE_TICKS {
                self.message = None;
                self.message_ticks = 0;
            }
        }
    }
}
