mod grid_view;
mod overlay;
mod status_bar;
mod styles;

pub use styles::Palette;

use crate::app::App;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Render the entire UI
pub fn draw(f: &mut Frame, app: &App, palette: &Palette) {
    let area = f.area();
    if too_small(area) {
        let msg = Paragraph::new(format!(
            "Terminal too small ({}x{}), need {}x{}",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        ))
        .alignment(Alignment::Center)
        .style(palette.default_style());
        f.render_widget(msg, overlay::centered_rect(area.width, 1, area));
        return;
    }

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title bar
            Constraint::Min(1),    // side-by-side grids
            Constraint::Length(1), // status bar
        ])
        .split(area);

    status_bar::render_title_bar(f, outer[0], app, palette);
    grid_view::render(f, outer[1], app, palette);
    status_bar::render_bottom_bar(f, outer[2], app, palette);

    if let Some(ref msg) = app.message {
        status_bar::render_notification(f, area, msg, palette);
    }

    if let Some(ref overlay_data) = app.overlay {
        overlay::render_overlay(f, area, app, overlay_data, palette);
    }
}

fn too_small(area: Rect) -> bool {
    area.width < MIN_WIDTH || area.height < MIN_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_size_is_inclusive() {
        assert!(!too_small(Rect::new(0, 0, 40, 10)));
        assert!(too_small(Rect::new(0, 0, 39, 10)));
        assert!(too_small(Rect::new(0, 0, 80, 9)));
    }
}
