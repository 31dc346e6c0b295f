//! jdex: a decimal-numbered index editor for tagging document sections.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use jdex::{app_state, config, formats, input, logging, sections, storage, ui};
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jdex")]
#[command(about = "Decimal-numbered index editor for tagging document sections", long_about = None)]
struct Args {
    /// Markdown documents whose headings seed the section list
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Local store file (overrides jdex.toml)
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Start from an exported document instead of the local store
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Write an export document on exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Append log output to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    // Stderr would scribble over the TUI, so only log when there is a file to log to
    if args.log_file.is_some() {
        let log_config = logging::LogConfig::from_verbosity(args.verbose, args.log_file.clone());
        logging::init_logging(&log_config).map_err(io::Error::other)?;
    }

    let cfg = config::Config::load();
    let storage_path = args
        .store
        .unwrap_or_else(|| PathBuf::from(&cfg.storage_path));
    let local_store = storage::LocalStore::open(storage_path).map_err(io::Error::other)?;

    let (store, mut section_list) = if let Some(import_path) = &args.import {
        storage::import_document(import_path).map_err(io::Error::other)?
    } else {
        let store = local_store
            .load_store()
            .map_err(io::Error::other)?
            .unwrap_or_default();
        let sections = local_store
            .load_sections()
            .map_err(io::Error::other)?
            .unwrap_or_default();
        (store, sections)
    };

    if !args.paths.is_empty() {
        let format = formats::markdown::MarkdownFormat;
        let mut headings = Vec::new();
        for path in &args.paths {
            match input::read_headings(path, &format, cfg.max_heading_level) {
                Ok(found) => headings.extend(found),
                Err(e) => eprintln!("Skipping {}: {e}", path.display()),
            }
        }
        if !headings.is_empty() {
            section_list = sections::SectionList::from_headings(&headings);
        }
    }

    let app = app_state::AppState::new(store, section_list, local_store, cfg.wrap_width);

    run_tui(app, &cfg, args.export)
}

fn run_tui(
    mut app: app_state::AppState,
    cfg: &config::Config,
    export: Option<PathBuf>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut editor_handler = EditorEventHandler::default();

    let result = run_app(&mut terminal, &mut app, &mut editor_handler);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        return Ok(());
    }

    if cfg.save_on_exit {
        app.save().map_err(io::Error::other)?;
    }
    if let Some(path) = export {
        storage::export_document(&path, &app.store, &app.sections).map_err(io::Error::other)?;
        eprintln!("Exported to {}", path.display());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    editor_handler: &mut EditorEventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.current_view {
                app_state::View::Browse => {
                    app.message = None;
                    match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
                        KeyCode::Left | KeyCode::Char('h') => {
                            if app.focus == app_state::Focus::Hierarchy {
                                app.tab_left();
                            }
                        }
                        KeyCode::Right | KeyCode::Char('l') => {
                            if app.focus == app_state::Focus::Hierarchy {
                                app.tab_right();
                            }
                        }
                        KeyCode::Tab => app.toggle_focus(),
                        KeyCode::Char('a') => app.add_at_cursor(),
                        KeyCode::Char('d') => app.remove_at_cursor(),
                        KeyCode::Char('r') | KeyCode::Enter => app.begin_rename(),
                        KeyCode::Char('n') => app.enter_notes(),
                        KeyCode::Char(' ') => app.toggle_section_check(),
                        KeyCode::Char('t') => app.tag_checked_sections(),
                        KeyCode::Char('x') => app.untag_last(),
                        KeyCode::Char('g') => app.jump_to_reference(),
                        KeyCode::Char(':') => {
                            app.current_view = app_state::View::Command;
                            app.command_buffer.clear();
                        }
                        _ => {}
                    }
                }
                app_state::View::Rename => match key.code {
                    KeyCode::Char(c) => app.input_buffer.push(c),
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    KeyCode::Enter => app.commit_rename(),
                    KeyCode::Esc => app.cancel_rename(),
                    _ => {}
                },
                app_state::View::Notes => {
                    let normal_mode = app
                        .editor_state
                        .as_ref()
                        .is_some_and(|editor_state| editor_state.mode == edtui::EditorMode::Normal);
                    if key.code == KeyCode::Esc && normal_mode {
                        app.exit_notes(true);
                    } else if let Some(ref mut editor_state) = app.editor_state {
                        editor_handler.on_key_event(key, editor_state);
                    }
                }
                app_state::View::Command => match key.code {
                    KeyCode::Char(c) => {
                        app.command_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.command_buffer.pop();
                    }
                    KeyCode::Enter => {
                        let cmd = std::mem::take(&mut app.command_buffer);
                        app.current_view = app_state::View::Browse;
                        if app.execute_command(&cmd) == app_state::CommandResult::Quit {
                            return Ok(());
                        }
                    }
                    KeyCode::Esc => {
                        app.current_view = app_state::View::Browse;
                        app.command_buffer.clear();
                    }
                    _ => {}
                },
            }
        }
    }
}
