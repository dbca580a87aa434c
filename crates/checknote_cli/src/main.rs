//! Terminal driver for checknote core.
//!
//! # Responsibility
//! - Run the note use-cases (add, list, toggle, delete) against a local file.
//! - Report failures on stderr with a non-zero exit code.

use checknote_core::{
    init_logging, CoreConfig, NoteFilter, NoteService, NotesFeed, SqliteNoteRepository, Storage,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

/// checknote - a persistent list of to-do notes
#[derive(Parser, Debug)]
#[command(name = "checknote", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (default: <temp dir>/db.db)
    #[arg(long, global = true, env = "CHECKNOTE_DB_PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "CHECKNOTE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "CHECKNOTE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Create the database and tables if missing
    Init,
    /// Add a pending note
    Add {
        /// Note text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List notes, optionally by completion state
    List {
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        #[arg(long)]
        pending: bool,
    },
    /// Mark a note completed
    Done { id: Uuid },
    /// Mark a note pending again
    Undo { id: Uuid },
    /// Delete a note
    Delete { id: Uuid },
}

impl Commands {
    fn list_filter(completed: bool, pending: bool) -> NoteFilter {
        match (completed, pending) {
            (true, _) => NoteFilter::completed(),
            (_, true) => NoteFilter::pending(),
            _ => NoteFilter::all(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> CoreConfig {
    let defaults = CoreConfig::default();
    CoreConfig {
        db_path: cli.db.clone().unwrap_or(defaults.db_path),
        log_level: cli.log_level.clone().unwrap_or(defaults.log_level),
        log_dir: cli.log_dir.clone(),
    }
}

fn run(command: &Commands, config: &CoreConfig) -> Result<(), String> {
    let storage = Storage::open(&config.db_path)
        .map_err(|err| format!("cannot open {}: {err}", config.db_path.display()))?;

    let outcome = {
        let repo = SqliteNoteRepository::try_new(storage.conn()).map_err(|err| err.to_string())?;
        let service = NoteService::new(repo);
        execute(command, &service, config)
    };

    storage.close().map_err(|err| err.to_string())?;
    outcome
}

fn execute(
    command: &Commands,
    service: &NoteService<SqliteNoteRepository<'_>>,
    config: &CoreConfig,
) -> Result<(), String> {
    match command {
        Commands::Init => {
            info!("event=cli_init module=cli status=ok");
            println!("storage ready at {}", config.db_path.display());
        }
        Commands::Add { text } => {
            let note = service
                .create_note(text.join(" "))
                .map_err(|err| err.to_string())?;
            println!("{}", note.uuid);
        }
        Commands::List { completed, pending } => {
            let feed = NotesFeed::mount(service.repo(), Commands::list_filter(*completed, *pending));
            if let Some(err) = feed.error() {
                return Err(err.to_string());
            }
            for note in feed.notes() {
                let mark = if note.completed { 'x' } else { ' ' };
                println!("[{mark}] {}  {}", note.uuid, note.description);
            }
        }
        Commands::Done { id } => {
            service.set_completed(*id, true).map_err(|err| err.to_string())?;
        }
        Commands::Undo { id } => {
            service.set_completed(*id, false).map_err(|err| err.to_string())?;
        }
        Commands::Delete { id } => {
            service.delete_note(*id).map_err(|err| err.to_string())?;
        }
    }
    Ok(())
}
