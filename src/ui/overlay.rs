use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::styles::Palette;
use crate::app::{App, OverlayData};
use crate::vcs::Revision;

/// Render the active overlay on top of the main UI
pub fn render_overlay(f: &mut Frame, area: Rect, app: &App, overlay: &OverlayData, palette: &Palette) {
    match overlay {
        OverlayData::RevisionPicker { selected, first } => {
            render_revision_picker(
                f,
                area,
                app.session.revisions(),
                *selected,
                *first,
                palette,
            );
        }
        OverlayData::Help => render_help(f, area, palette),
    }
}

/// `offset: r<id> by <author>`
fn revision_line(offset: usize, rev: &Revision) -> String {
    format!("{:>2}: {} by {}", offset, rev.label(), rev.author)
}

fn render_revision_picker(
    f: &mut Frame,
    area: Rect,
    revisions: &[Revision],
    selected: usize,
    first: Option<usize>,
    palette: &Palette,
) {
    let popup_height = (revisions.len() as u16 + 2)
        .min(area.height.saturating_sub(4))
        .max(3);
    let popup_width = 60u16.min(area.width.saturating_sub(4)).max(10);
    let popup = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = revisions
        .iter()
        .enumerate()
        .map(|(idx, rev)| {
            let is_sel = idx == selected;
            let marker = if first == Some(idx) {
                "● "
            } else if is_sel {
                "▶ "
            } else {
                "  "
            };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(palette.accent)),
                Span::styled(
                    revision_line(idx, rev),
                    Style::default().fg(if is_sel { palette.bright } else { palette.text }),
                ),
            ]);
            let style = if is_sel {
                Style::default().bg(palette.border)
            } else {
                Style::default().bg(palette.panel)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let title = if first.is_some() {
        " OLDER REVISION (Enter=compare, Esc=cancel) "
    } else {
        " NEWER REVISION (Enter=mark, Esc=cancel) "
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(palette.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.panel));

    // Keep the highlighted row on screen for long histories
    let visible = popup_height.saturating_sub(2) as usize;
    let skip = (selected + 1).saturating_sub(visible);
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();

    f.render_widget(List::new(items).block(block), popup);
}

const HELP: &[(&str, &str)] = &[
    ("←↑↓→ / hjkl", "move viewport one cell"),
    ("] / [", "next / previous changed cell"),
    ("Tab / s", "next sheet"),
    ("Shift-Tab", "previous sheet"),
    ("n", "step to older revision pair"),
    ("p", "step to newer revision pair"),
    ("v", "pick two revisions"),
    ("q", "quit"),
];

fn render_help(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup_height = (HELP.len() as u16 + 2).min(area.height);
    let popup_width = 50u16.min(area.width);
    let popup = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {:<14}", key), palette.key_hint_style()),
                Span::styled(*what, Style::default().fg(palette.text)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" KEYS (Esc=close) ", Style::default().fg(palette.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
        .style(Style::default().bg(palette.panel));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Calculate a centered rectangle within an area
pub(super) fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(r.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1])[1]
}
