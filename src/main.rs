mod api;
mod app;
mod catalog;
mod commands;
mod config;
mod movie;
mod ui;
mod view;

#[cfg(test)]
mod testing;

use api::HttpBackend;
use app::{App, InputMode};
use catalog::Catalog;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use movie::{DraftFields, MovieId};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use ui::form::FormInput;
use view::AffordanceKind;

/// Terminal client for a REST movie catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Movie collection endpoint, e.g. http://localhost:3000/movies
    #[arg(long, global = true, env = "MOVIE_CATALOG_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log file for the TUI (default: cache directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// JSON config file (default: platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI (default)
    Run,
    /// Print the catalog, optionally filtered by title or genre
    List {
        /// Case-insensitive search term
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a movie
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        genre: String,
        #[arg(long, allow_hyphen_values = true)]
        year: String,
    },
    /// Edit a movie; omitted fields keep their current value
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        year: Option<String>,
        #[arg(long)]
        genre: Option<String>,
    },
    /// Delete a movie
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };
    config.apply_overrides(cli.api_url, cli.timeout_secs, cli.log_file);

    // The TUI owns the terminal, so its log goes to a file
    match command {
        Commands::Run => configure_file_logging(config.log_path().as_deref())?,
        _ => configure_stderr_logging(),
    }

    let backend = match HttpBackend::new(&config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };
    tracing::info!(api_url = %backend.base_url(), "using movie backend");

    let result = match command {
        Commands::Run => {
            let (catalog, events) = Catalog::new(backend);
            let mut app = App::new(catalog, events);
            app.init();

            let mut terminal = ratatui::init();
            let size = terminal.size()?;
            app.update_page_size(size.height);

            let result = run_app(&mut terminal, &mut app).await;

            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::List { search } => {
            let mut stdout = std::io::stdout();
            commands::list(backend.as_ref(), &search, &mut stdout).await.map(|_| ())
        }
        Commands::Add { title, genre, year } => {
            let fields = DraftFields { title, year, genre };
            commands::add(backend.as_ref(), fields).await.map(|created| {
                println!("Added {}  {}", created.id, created.display_line());
            })
        }
        Commands::Edit { id, title, year, genre } => {
            commands::edit(backend.as_ref(), MovieId::from(id), title, year, genre)
                .await
                .map(|updated| println!("Updated {}  {}", updated.id, updated.display_line()))
        }
        Commands::Delete { id } => {
            let id = MovieId::from(id);
            commands::delete(backend.as_ref(), id.clone())
                .await
                .map(|()| println!("Deleted {}", id))
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn configure_file_logging(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = path else {
        // No writable location known; keep the terminal clean
        tracing_subscriber::fmt()
            .with_env_filter(env_filter("info"))
            .with_writer(std::io::sink)
            .init();
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn configure_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Apply finished requests before drawing
        app.pump_events();

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll so completions show up promptly
        if crossterm::event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(_, height) => {
                    app.update_page_size(height);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if let Some(form) = app.form.as_mut() {
        match form.handle_key(key) {
            Some(FormInput::Submit) => app.submit_form(),
            Some(FormInput::Cancel) => app.close_form(),
            None => {}
        }
        return;
    }

    if app.input_mode == InputMode::Searching {
        handle_search_input(app, key);
        return;
    }

    handle_list_key(app, key);
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_pop();
        }
        KeyCode::Char(c) => {
            app.search_push(c);
        }
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Searching;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.list_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.list_prev();
        }
        KeyCode::PageDown => {
            app.list_page_down();
        }
        KeyCode::PageUp => {
            app.list_page_up();
        }
        KeyCode::Char('g') => {
            app.list_first();
        }
        KeyCode::Char('G') => {
            app.list_last();
        }
        KeyCode::Char('a') => {
            app.open_create();
        }
        KeyCode::Char('e') => {
            app.activate_selected(AffordanceKind::Edit);
        }
        KeyCode::Char('d') => {
            app.activate_selected(AffordanceKind::Delete);
        }
        KeyCode::Char('r') => {
            app.reload();
        }
        KeyCode::Esc => {
            app.clear_search();
        }
        _ => {}
    }
}
