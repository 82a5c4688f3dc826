use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles::Palette;
use crate::app::App;
use crate::diff::{column_name, DiffPosition, SheetSnapshot};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render the newer revision on the left and the older on the right, both
/// scrolled to the same viewport
pub fn render(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let cmp = match app.session.comparison() {
        Some(c) => c,
        None => return,
    };
    let sheet = match cmp.active_sheet() {
        Some(s) => s,
        None => return,
    };
    let (newer, older) = match app.session.compared_revisions() {
        Some((a, b)) => (a.label(), b.label()),
        None => (String::new(), String::new()),
    };

    let col_width = app.config.display.col_width.max(1) as usize;
    let viewport = cmp.viewport();
    render_pane(
        f,
        panes[0],
        &format!(" {} (new) ", newer),
        &sheet.new,
        viewport,
        col_width,
        palette,
    );
    render_pane(
        f,
        panes[1],
        &format!(" {} (old) ", older),
        &sheet.old,
        viewport,
        col_width,
        palette,
    );
}

fn render_pane(
    f: &mut Frame,
    area: Rect,
    title: &str,
    sheet: &SheetSnapshot,
    viewport: DiffPosition,
    col_width: usize,
    palette: &Palette,
) {
    let block = Block::default()
        .title(Span::styled(title.to_string(), palette.header_style()))
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.default_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if sheet.row_count() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  (empty sheet)",
            palette.hint_style(),
        )));
        f.render_widget(empty, inner);
        return;
    }

    let lines = pane_lines(
        sheet,
        viewport,
        inner.height as usize,
        inner.width as usize,
        col_width,
        palette,
    );
    f.render_widget(Paragraph::new(lines), inner);
}

/// Lines for one pane: a column-letter header, then one line per visible row
/// with a row-number gutter. `height`/`width` are the inner pane size.
fn pane_lines(
    sheet: &SheetSnapshot,
    viewport: DiffPosition,
    height: usize,
    width: usize,
    col_width: usize,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let rows = visible_range(viewport.row, sheet.row_count(), height.saturating_sub(1));
    let gutter = gutter_width(rows.end);
    let cols = visible_range(
        viewport.col,
        sheet.col_count(),
        visible_columns(width.saturating_sub(gutter), col_width),
    );

    let mut lines = Vec::with_capacity(rows.len() + 1);

    let mut header = vec![Span::raw(" ".repeat(gutter))];
    for col in cols.clone() {
        header.push(Span::styled(
            fit_cell(&column_name(col), col_width),
            palette.header_style(),
        ));
        header.push(Span::raw(" "));
    }
    lines.push(Line::from(header));

    for row in rows {
        let mut spans = vec![Span::styled(
            format!("{:>w$} ", row + 1, w = gutter - 1),
            palette.header_style(),
        )];
        for col in cols.clone() {
            let (text, changed) = sheet
                .cell(row, col)
                .map(|c| (c.value.as_str(), c.changed))
                .unwrap_or(("", false));
            let style = if row == viewport.row && col == viewport.col {
                palette.cursor_style()
            } else if changed {
                palette.changed_style()
            } else {
                Style::default()
            };
            spans.push(Span::styled(fit_cell(text, col_width), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// `start..end` clipped to `total`, at most `capacity` long
fn visible_range(start: usize, total: usize, capacity: usize) -> std::ops::Range<usize> {
    let start = start.min(total);
    start..(start + capacity).min(total)
}

/// Columns of `col_width` plus one separator that fit in `width`, at least one
fn visible_columns(width: usize, col_width: usize) -> usize {
    (width / (col_width + 1)).max(1)
}

/// Room for the largest row number plus a separating space
fn gutter_width(last_row: usize) -> usize {
    last_row.to_string().len().max(3) + 1
}

/// Pad or truncate to exactly `width` characters. Line breaks and tabs
/// inside a cell collapse to spaces so each row stays on one line.
fn fit_cell(text: &str, width: usize) -> String {
    let clean: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let overflow = clean.width() > width;
    let budget = if overflow { width.saturating_sub(1) } else { width };

    let mut out = String::new();
    let mut used = 0;
    for c in clean.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if overflow && width > 0 {
        out.push('…');
        used += 1;
    }
    // A double-width char that did not fit leaves a gap to fill
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::diff::align_sheets;

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn fit_cell_pads_short_text() {
        assert_eq!(fit_cell("ab", 4), "ab  ");
    }

    #[test]
    fn fit_cell_truncates_with_ellipsis() {
        assert_eq!(fit_cell("abcdef", 4), "abc…");
        assert_eq!(fit_cell("abcdef", 4).chars().count(), 4);
    }

    #[test]
    fn fit_cell_flattens_line_breaks() {
        assert_eq!(fit_cell("a\nb", 3), "a b");
    }

    #[test]
    fn fit_cell_measures_wide_chars_by_display_width() {
        assert_eq!(fit_cell("中文", 5), "中文 ");
        assert_eq!(fit_cell("中文", 5).width(), 5);
        assert_eq!(fit_cell("中文字", 4), "中… ");
        assert_eq!(fit_cell("中文字", 4).width(), 4);
        assert_eq!(fit_cell("中文字", 5), "中文…");
    }

    #[test]
    fn visible_range_clips_to_total() {
        assert_eq!(visible_range(2, 5, 10), 2..5);
        assert_eq!(visible_range(0, 5, 3), 0..3);
        assert_eq!(visible_range(9, 5, 3), 5..5);
    }

    #[test]
    fn visible_columns_is_at_least_one() {
        assert_eq!(visible_columns(42, 20), 2);
        assert_eq!(visible_columns(5, 20), 1);
    }

    #[test]
    fn pane_lines_has_header_and_row_numbers() {
        let cmp = align_sheets(&strings(&[&["a", "b"], &["c", "d"]]), &[]);
        let palette = Palette::for_theme(Theme::Dark);
        let lines = pane_lines(&cmp.new, DiffPosition::default(), 10, 40, 3, &palette);
        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).contains("A  "));
        assert!(text(&lines[0]).contains("B  "));
        assert!(text(&lines[2]).trim_start().starts_with("2 c"));
    }

    #[test]
    fn pane_lines_start_at_viewport() {
        let cmp = align_sheets(&strings(&[&["a", "b"], &["c", "d"]]), &[]);
        let palette = Palette::for_theme(Theme::Dark);
        let lines = pane_lines(&cmp.new, DiffPosition::new(1, 1), 10, 40, 3, &palette);
        assert_eq!(lines.len(), 2);
        assert!(text(&lines[0]).contains('B'));
        assert!(!text(&lines[0]).contains('A'));
        assert!(text(&lines[1]).contains('d'));
    }

    #[test]
    fn changed_cells_use_changed_style() {
        let cmp = align_sheets(&strings(&[&["a", "x"]]), &strings(&[&["a", "b"]]));
        let palette = Palette::for_theme(Theme::Classic);
        let lines = pane_lines(&cmp.new, DiffPosition::default(), 5, 40, 3, &palette);
        let row = &lines[1];
        // gutter, A1, sep, B1, sep
        assert_eq!(row.spans[1].style, palette.cursor_style());
        assert_eq!(row.spans[3].content.as_ref(), "x  ");
        assert_eq!(row.spans[3].style, palette.changed_style());
    }
}
