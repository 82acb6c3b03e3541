use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode},
    terminal,
};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "larder_admin")]
#[command(about = "Admin utilities for Larder (count-history maintenance)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./larder.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Session(Session),
    Counts(Counts),
}

#[derive(Args, Debug)]
struct Session {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// List finalized sessions, newest first.
    List,
    /// Permanently delete one session and its count records.
    Delete(SessionDeleteArgs),
}

#[derive(Args, Debug)]
struct SessionDeleteArgs {
    #[arg(long)]
    id: Uuid,
    /// Skip the interactive confirmation.
    #[arg(long)]
    yes: bool,
}

#[derive(Args, Debug)]
struct Counts {
    #[command(subcommand)]
    command: CountsCommand,
}

#[derive(Subcommand, Debug)]
enum CountsCommand {
    /// Permanently delete ALL count records and sessions.
    EraseAll(EraseAllArgs),
}

#[derive(Args, Debug)]
struct EraseAllArgs {
    /// Skip the interactive confirmation.
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Session(session) => match session.command {
            SessionCommand::List => {
                let sessions = engine.list_finalized_sessions().await?;
                if sessions.is_empty() {
                    println!("No finalized sessions.");
                }
                for session in sessions {
                    let ended = session
                        .ended_at
                        .map(|dt| dt.to_rfc3339())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{}  {}  ended {}", session.id, session.count_type, ended);
                }
            }
            SessionCommand::Delete(args) => {
                if args.yes
                    || confirm("Permanently delete this session and its count records?")?
                {
                    engine.delete_session(args.id).await?;
                    println!("Session {} deleted.", args.id);
                } else {
                    println!("Aborted.");
                }
            }
        },
        Command::Counts(counts) => match counts.command {
            CountsCommand::EraseAll(args) => {
                if args.yes || confirm("Permanently delete ALL counts and sessions?")? {
                    let (count_rows, session_rows) = engine.erase_all_counts().await?;
                    println!(
                        "Deleted {count_rows} count records and {session_rows} sessions."
                    );
                } else {
                    println!("Aborted.");
                }
            }
        },
    }

    Ok(())
}

/// Single-keypress y/N prompt; anything but `y` aborts.
fn confirm(prompt: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let confirmed = loop {
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => break true,
                KeyCode::Char(_) | KeyCode::Enter | KeyCode::Esc => break false,
                _ => {}
            }
        }
    };
    terminal::disable_raw_mode()?;
    println!("{}", if confirmed { "y" } else { "n" });

    Ok(confirmed)
}
