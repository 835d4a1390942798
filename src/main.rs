//! folio: fold and attach interactive components to Markdown pages.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use folio::config::Config;
use folio::formats::markdown::MarkdownFormat;
use folio::outline::Outline;
use folio::page::Page;
use folio::script::{self, Script};
use folio::surface::{HeadlessSurface, Surface};
use folio::{input, ui, Result};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Collapsible sections and zoomable figures for Markdown pages", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./folio.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render pages with folded sections and attached components
    Fold {
        /// Files or directories to render
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Write `<stem>.html` files here instead of printing
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Print the folded section tree of a page as JSON
    Outline {
        /// Page to outline
        page: PathBuf,
    },
    /// Browse the folded sections of a page in the terminal
    Browse {
        /// Page to browse
        page: PathBuf,
    },
    /// Replay a JSON event script against a page and print the state trace
    Replay {
        /// Page to attach
        page: PathBuf,

        /// Event script
        script: PathBuf,

        /// Also print the final HTML
        #[arg(long)]
        html: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = Config::resolve(args.config.as_deref())?;

    match args.command {
        Command::Fold { paths, out_dir } => fold_pages(&paths, out_dir.as_deref(), &cfg),
        Command::Outline { page } => {
            let (_, page) = attach(&page, &cfg)?;
            println!("{}", serde_json::to_string_pretty(page.sections())?);
            Ok(())
        }
        Command::Browse { page: path } => {
            let (_, page) = attach(&path, &cfg)?;
            let name = path.file_name().map_or_else(
                || path.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            run_tui(Outline::new(name, page.sections()))?;
            Ok(())
        }
        Command::Replay {
            page: path,
            script: script_path,
            html,
        } => {
            let (mut surface, mut page) = attach(&path, &cfg)?;
            let script = Script::from_json(&fs::read_to_string(script_path)?)?;
            let trace = script::replay(&mut page, &mut surface, &script)?;
            println!("{}", serde_json::to_string_pretty(&trace)?);
            if html {
                println!("{}", surface.document().render());
            }
            Ok(())
        }
    }
}

fn attach(path: &Path, cfg: &Config) -> Result<(HeadlessSurface, Page)> {
    let doc = input::load_page(path, &MarkdownFormat, cfg)?;
    let mut surface = HeadlessSurface::new(doc);
    let page = Page::attach(&mut surface, cfg);
    Ok((surface, page))
}

fn fold_pages(paths: &[PathBuf], out_dir: Option<&Path>, cfg: &Config) -> Result<()> {
    let pages = input::find_pages(paths, &cfg.file_extensions)?;
    if pages.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    for path in &pages {
        let (surface, page) = attach(path, cfg)?;
        log::info!("{}: {} sections", path.display(), page.sections().len());
        let html = surface.into_document().render();
        match out_dir {
            Some(dir) => {
                let stem = path.file_stem().unwrap_or(path.as_os_str());
                let target = dir.join(format!("{}.html", stem.to_string_lossy()));
                fs::write(&target, html)?;
                println!("{}", target.display());
            }
            None => println!("{html}"),
        }
    }
    Ok(())
}

fn run_tui(mut outline: Outline) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut outline);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    outline: &mut Outline,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, outline))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up | KeyCode::Char('k') => {
                    outline.select_prev();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    outline.select_next();
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    outline.select_parent();
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    outline.toggle();
                }
                KeyCode::Home => {
                    outline.select_first();
                }
                KeyCode::End => {
                    outline.select_last();
                }
                _ => {}
            }
        }
    }
}
