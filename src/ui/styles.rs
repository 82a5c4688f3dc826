use ratatui::style::{Color, Modifier, Style};

use crate::config::Theme;

// ── Dark palette ──
const DARK_BG: Color = Color::Rgb(12, 12, 12);
const DARK_PANEL: Color = Color::Rgb(26, 26, 26);
const DARK_BORDER: Color = Color::Rgb(42, 42, 42);
const DARK_TEXT: Color = Color::Rgb(200, 200, 200);
const DARK_DIM: Color = Color::Rgb(102, 102, 102);
const DARK_MUTED: Color = Color::Rgb(136, 136, 136);
const DARK_BRIGHT: Color = Color::Rgb(232, 232, 232);
const DARK_ACCENT: Color = Color::Rgb(96, 165, 250);
const DARK_CHANGED_BG: Color = Color::Rgb(92, 74, 10);
const DARK_CHANGED_TEXT: Color = Color::Rgb(250, 204, 21);

// ── Light palette ──
const LIGHT_BG: Color = Color::Rgb(250, 250, 250);
const LIGHT_PANEL: Color = Color::Rgb(232, 232, 232);
const LIGHT_BORDER: Color = Color::Rgb(190, 190, 190);
const LIGHT_TEXT: Color = Color::Rgb(40, 40, 40);
const LIGHT_DIM: Color = Color::Rgb(140, 140, 140);
const LIGHT_MUTED: Color = Color::Rgb(100, 100, 100);
const LIGHT_ACCENT: Color = Color::Rgb(29, 78, 216);
const LIGHT_CHANGED_BG: Color = Color::Rgb(254, 240, 138);

/// Colors for one theme. Built once at startup and passed to every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub muted: Color,
    pub bright: Color,
    pub accent: Color,
    changed_fg: Color,
    changed_bg: Color,
    title_fg: Color,
    title_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                bg: DARK_BG,
                panel: DARK_PANEL,
                border: DARK_BORDER,
                text: DARK_TEXT,
                dim: DARK_DIM,
                muted: DARK_MUTED,
                bright: DARK_BRIGHT,
                accent: DARK_ACCENT,
                changed_fg: DARK_CHANGED_TEXT,
                changed_bg: DARK_CHANGED_BG,
                title_fg: DARK_BRIGHT,
                title_bg: DARK_PANEL,
            },
            Theme::Light => Palette {
                bg: LIGHT_BG,
                panel: LIGHT_PANEL,
                border: LIGHT_BORDER,
                text: LIGHT_TEXT,
                dim: LIGHT_DIM,
                muted: LIGHT_MUTED,
                bright: Color::Black,
                accent: LIGHT_ACCENT,
                changed_fg: Color::Black,
                changed_bg: LIGHT_CHANGED_BG,
                title_fg: Color::Black,
                title_bg: LIGHT_PANEL,
            },
            // Plain 16-color terminal look
            Theme::Classic => Palette {
                bg: Color::Reset,
                panel: Color::Reset,
                border: Color::Gray,
                text: Color::Reset,
                dim: Color::DarkGray,
                muted: Color::Gray,
                bright: Color::White,
                accent: Color::Cyan,
                changed_fg: Color::Black,
                changed_bg: Color::Yellow,
                title_fg: Color::White,
                title_bg: Color::Blue,
            },
        }
    }

    // ── Composed styles ──

    pub fn default_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn panel_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.panel)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .bg(self.title_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// A cell whose text differs between the two revisions
    pub fn changed_style(&self) -> Style {
        Style::default().fg(self.changed_fg).bg(self.changed_bg)
    }

    /// The cell at the viewport origin
    pub fn cursor_style(&self) -> Style {
        Style::default()
            .fg(self.bright)
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::BOLD)
    }

    pub fn hint_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}
