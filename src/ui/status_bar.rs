use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::styles::Palette;
use crate::app::{App, Comparison};

/// `Sheet: <name> (<k>/<n>)`
fn sheet_title(cmp: &Comparison) -> String {
    format!(
        "Sheet: {} ({}/{})",
        cmp.active_sheet_name(),
        cmp.active_sheet_index() + 1,
        cmp.sheet_names().len()
    )
}

/// `Pos: row R, col C | Diff: N` with ` (i/N)` once a diff has been visited
fn position_text(cmp: &Comparison) -> String {
    let vp = cmp.viewport();
    let total = cmp.diff_index().len();
    let mut text = format!("Pos: row {}, col {} | Diff: {}", vp.row + 1, vp.col + 1, total);
    if let Some(i) = cmp.cursor().pointer() {
        text.push_str(&format!(" ({}/{})", i + 1, total));
    }
    text
}

/// Render the top bar: sheet on the left, compared revisions on the right
pub fn render_title_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(32)])
        .split(area);

    let left = app
        .session
        .comparison()
        .map(sheet_title)
        .unwrap_or_default();
    let right = match app.session.compared_revisions() {
        Some((newer, older)) => format!("{} vs {} ", newer.label(), older.label()),
        None => String::new(),
    };

    f.render_widget(
        Paragraph::new(format!(" {}", left)).style(palette.title_style()),
        cols[0],
    );
    f.render_widget(
        Paragraph::new(right)
            .alignment(ratatui::layout::Alignment::Right)
            .style(palette.title_style()),
        cols[1],
    );
}

const HINTS: &[(&str, &str)] = &[
    ("←↑↓→", " move "),
    ("]/[", " diff "),
    ("Tab", " sheet "),
    ("n/p", " older/newer "),
    ("v", " revisions "),
    ("?", " help "),
    ("q", " quit"),
];

/// Render the bottom status bar: cursor position, diff counter, key hints
pub fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mut spans = vec![Span::raw(" ")];
    if let Some(cmp) = app.session.comparison() {
        spans.push(Span::styled(position_text(cmp), palette.panel_style()));
        spans.push(Span::styled(" | ", palette.hint_style()));
    }
    for (key, label) in HINTS {
        spans.push(Span::styled(*key, palette.key_hint_style()));
        spans.push(Span::styled(*label, palette.hint_style()));
    }

    let bar = Paragraph::new(Line::from(spans)).style(palette.panel_style());
    f.render_widget(bar, area);
}

/// Render a transient notification in the top-right corner
pub fn render_notification(f: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let notif_width = (message.chars().count() as u16 + 4).min(area.width);
    let notif_x = area.x + area.width.saturating_sub(notif_width + 2);
    let notif_y = area.y + 2;

    let notif_area = Rect {
        x: notif_x,
        y: notif_y.min(area.bottom().saturating_sub(1)),
        width: notif_width,
        height: 1,
    };

    let notif = Paragraph::new(Line::from(vec![
        Span::styled(" ● ", ratatui::style::Style::default().fg(palette.accent)),
        Span::styled(
            message.to_string(),
            ratatui::style::Style::default().fg(palette.bright),
        ),
        Span::raw(" "),
    ]))
    .style(palette.panel_style());

    f.render_widget(notif, notif_area);
}
