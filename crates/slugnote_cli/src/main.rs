//! Command-line driver for the note service.
//!
//! # Responsibility
//! - Run note operations against a SQLite file without a web stack.
//! - Print the same outcomes a view layer would act on (landing target,
//!   login redirect, not-found, field errors).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use slugnote_core::db::open_db;
use slugnote_core::{
    after_read, after_write, default_log_level, init_logging, Navigation, Note, NoteDraft,
    NoteService, NotesConfig, Session, SqliteNoteRepository, UserId,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// slugnote - personal notes addressed by unique slugs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, default_value = "slugnote.sqlite3")]
    db: PathBuf,

    /// JSON config file (login/success paths, field limits)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Acting user; omit to act anonymously
    #[arg(long)]
    user: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a note; the slug is derived from the title when omitted
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Replace title, body and slug of the note at SLUG
    Edit {
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        /// New slug; derived from the new title when omitted
        #[arg(long)]
        new_slug: Option<String>,
    },
    /// Delete the note at SLUG
    Delete { slug: String },
    /// List the acting user's notes
    List,
    /// Show one note
    Show { slug: String },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let config = match cli.config.as_ref() {
        Some(path) => NotesConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NotesConfig::default(),
    };

    let session = match cli.user {
        Some(name) => match UserId::new(name) {
            Some(user) => Session::authenticated(user, config.login_path.as_str()),
            None => bail!("--user must not be blank"),
        },
        None => Session::anonymous(config.login_path.as_str()),
    };

    let conn = open_db(&cli.db).with_context(|| format!("opening {}", cli.db.display()))?;
    let repo = SqliteNoteRepository::try_new(&conn)?;
    let service = NoteService::new(repo, config);
    let landing = service.success_target().to_string();

    let code = match cli.command {
        Command::Add { title, body, slug } => {
            let mut draft = NoteDraft::new(title, body);
            draft.slug = slug;
            report(after_write(service.create(&session, &draft), &landing)?)
        }
        Command::Edit {
            slug,
            title,
            body,
            new_slug,
        } => {
            let mut draft = NoteDraft::new(title, body);
            draft.slug = new_slug;
            report(after_write(
                service.update(&session, &slug, &draft),
                &landing,
            )?)
        }
        Command::Delete { slug } => {
            report(after_write(service.delete(&session, &slug), &landing)?)
        }
        Command::List => match after_read(service.list(&session))? {
            Navigation::Render(notes) => {
                for note in &notes {
                    println!("{}\t{}", note.slug, note.title);
                }
                println!("{} note(s)", notes.len());
                ExitCode::SUCCESS
            }
            other => report(other.without_content()),
        },
        Command::Show { slug } => match after_read(service.get(&session, &slug))? {
            Navigation::Render(note) => {
                print_note(&note);
                ExitCode::SUCCESS
            }
            other => report(other.without_content()),
        },
    };

    Ok(code)
}

fn print_note(note: &Note) {
    println!("slug:  {}", note.slug);
    println!("title: {}", note.title);
    println!("owner: {}", note.owner);
    println!();
    println!("{}", note.body);
}

fn report(nav: Navigation<()>) -> ExitCode {
    match nav {
        Navigation::Render(()) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Navigation::Redirect(target) => {
            println!("redirect {target}");
            ExitCode::SUCCESS
        }
        Navigation::NotFound => {
            eprintln!("not found");
            ExitCode::from(4)
        }
        Navigation::Form(errors) => {
            for (field, messages) in errors.fields() {
                for message in messages {
                    eprintln!("{field}: {message}");
                }
            }
            ExitCode::from(2)
        }
    }
}
