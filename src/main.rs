mod app;
mod config;
mod diff;
mod error;
mod logging;
mod sheet;
mod ui;
mod vcs;

use anyhow::{bail, Context, Result};
use app::{App, Direction, Move, Session};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Rows moved by PageUp/PageDown
const PAGE_ROWS: usize = 20;

/// Cell-level diff of a spreadsheet between revisions in version control
#[derive(Parser)]
#[command(name = "sr", version, about)]
struct Cli {
    /// Spreadsheet under version control (xlsx, xlsm, xlsb, xls, ods)
    file: PathBuf,

    /// Number of revisions to load from history
    #[arg(long)]
    limit: Option<usize>,

    /// Version control backend (defaults to auto-detect)
    #[arg(long, value_enum)]
    vcs: Option<vcs::VcsBackend>,

    /// Width of each rendered cell in characters
    #[arg(long)]
    col_width: Option<u16>,

    /// Initial comparison as revision offsets, newest is 0 (default: 0 1)
    #[arg(long, num_args = 2, value_names = ["NEWER", "OLDER"])]
    pair: Option<Vec<usize>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    if !cli.file.is_file() {
        bail!("File not found: {}", cli.file.display());
    }
    let file_name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("File path has no file name")?;
    let dir = cli
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut config = config::load_config(dir);
    if let Some(limit) = cli.limit {
        config.history.limit = limit;
    }
    if let Some(backend) = cli.vcs {
        config.vcs.backend = backend;
    }
    if let Some(width) = cli.col_width {
        config.display.col_width = width;
    }
    let pair = match cli.pair.as_deref() {
        Some([a, b]) => (*a, *b),
        _ => (0, 1),
    };
    info!("reviewing {} (pair {:?}, config {:?})", cli.file.display(), pair, config);

    // Anything that fails before the first comparison is shown is fatal and
    // reported on the normal terminal
    let source = vcs::open_source(&cli.file, config.vcs.backend)?;
    let session = Session::new(
        source,
        Box::new(sheet::CalamineReader),
        file_name,
        config.history.limit,
    )
    .with_context(|| format!("Cannot load history of {}", cli.file.display()))?;
    let palette = ui::Palette::for_theme(config.display.theme);
    let mut app = App::new(session, config, pair)
        .with_context(|| format!("Cannot compare revisions of {}", cli.file.display()))?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &palette);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    palette: &ui::Palette,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app, palette))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Overlay takes priority over normal navigation
                if app.overlay.is_some() {
                    handle_overlay_input(app, key);
                } else {
                    handle_normal_input(app, key);
                }
            }
        }

        // Expire notifications
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_overlay_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.overlay_next(),
        KeyCode::Char('k') | KeyCode::Up => app.overlay_prev(),
        KeyCode::Enter => app.overlay_select(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.overlay_close(),
        _ => {}
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,

        // Viewport
        KeyCode::Up | KeyCode::Char('k') => app.move_viewport(Move::Up),
        KeyCode::Down | KeyCode::Char('j') => app.move_viewport(Move::Down),
        KeyCode::Left | KeyCode::Char('h') => app.move_viewport(Move::Left),
        KeyCode::Right | KeyCode::Char('l') => app.move_viewport(Move::Right),
        KeyCode::PageDown => {
            for _ in 0..PAGE_ROWS {
                app.move_viewport(Move::Down);
            }
        }
        KeyCode::PageUp => {
            for _ in 0..PAGE_ROWS {
                app.move_viewport(Move::Up);
            }
        }

        // Changed cells
        KeyCode::Char(']') => app.next_diff(),
        KeyCode::Char('[') => app.prev_diff(),

        // Sheets
        KeyCode::Tab | KeyCode::Char('s') | KeyCode::Char('S') => {
            app.switch_sheet(Direction::Forward)
        }
        KeyCode::BackTab => app.switch_sheet(Direction::Backward),

        // Revisions
        KeyCode::Char('n') | KeyCode::Char('N') => app.step_revision_pair(Direction::Forward),
        KeyCode::Char('p') | KeyCode::Char('P') => app.step_revision_pair(Direction::Backward),
        KeyCode::Char('v') | KeyCode::Char('V') => app.open_revision_picker(),

        KeyCode::Char('?') => app.open_help(),
        _ => {}
    }
}
