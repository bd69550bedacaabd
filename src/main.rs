use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use embed_generator::database::SqliteStorage;
use embed_generator::discord::{Format, message_to_string};
use embed_generator::import::{ImportError, import_message, parse_strict};
use embed_generator::store::Command;
use embed_generator::{Config, EditorSession};

mod repl;

use repl::{HELP, ReplAction, parse_line};

/// Edit, validate and store Discord messages for Embed Generator.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Overrides EMBEDG_DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Print the current message as editor JSON.
    Show,
    /// Print the current message as a webhook payload.
    Export {
        /// Leave out local ids (the shape sent to Discord).
        #[arg(long)]
        webhook: bool,
    },
    /// Replace the current message with a JSON file.
    Import {
        file: PathBuf,
        /// Refuse input with validation issues or unsupported parts.
        #[arg(long)]
        strict: bool,
    },
    /// List validation issues of the current message.
    Validate,
    /// Replace the current message with a blank one.
    Clear,
    /// Replace the current message with the welcome message.
    Reset,
    /// Store the current message under a name.
    Backup { name: String },
    /// Replace the current message with a stored backup.
    Restore { name: String },
    /// List stored backups.
    Backups,
    /// Interactive line editor with undo, autosave and scheduled backups.
    Edit,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let storage = Arc::new(SqliteStorage::new(&config.database_url).await?);
    let session = EditorSession::open(storage, config).await;

    match cli.command {
        CliCommand::Show => println!("{}", message_to_string(&session.message().await, Format::Editor)?),
        CliCommand::Export { webhook } => {
            let format = if webhook { Format::Webhook } else { Format::Editor };
            println!("{}", message_to_string(&session.message().await, format)?);
        }
        CliCommand::Import { file, strict } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let message = if strict {
                match parse_strict(&raw) {
                    Ok(message) => message,
                    Err(ImportError::Invalid(problems)) => {
                        for problem in &problems {
                            eprintln!("{problem}");
                        }
                        bail!("import rejected with {} problems", problems.len());
                    }
                    Err(e) => return Err(e.into()),
                }
            } else {
                let import = import_message(&raw)?;
                for warning in &import.warnings {
                    warn!("{}", warning);
                }
                for issue in &import.issues {
                    println!("{issue}");
                }
                import.message
            };
            session.apply(Command::Replace(Box::new(message))).await;
            info!("Imported {}", file.display());
        }
        CliCommand::Validate => {
            let issues = session.issues().borrow().clone();
            if issues.is_empty() {
                println!("No issues");
            }
            for issue in &issues {
                println!("{issue}");
            }
        }
        CliCommand::Clear => {
            session.apply(Command::Clear).await;
        }
        CliCommand::Reset => {
            session.apply(Command::Reset).await;
        }
        CliCommand::Backup { name } => session.backup(&name).await?,
        CliCommand::Restore { name } => session.restore(&name).await?,
        CliCommand::Backups => print_backups(&session).await?,
        CliCommand::Edit => edit(&session).await?,
    }

    session.flush().await
}

async fn print_backups(session: &EditorSession) -> Result<()> {
    for backup in session.backups().await? {
        println!("{}\t{}", backup.name, backup.updated_at.to_rfc3339());
    }
    Ok(())
}

async fn edit(session: &EditorSession) -> Result<()> {
    let mut scheduler = session.start_backups().await?;
    println!("Type help for the list of commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let action = match parse_line(&line) {
            Ok(action) => action,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match action {
            ReplAction::Apply(command) => {
                if !session.apply(command).await {
                    println!("Nothing changed");
                }
            }
            ReplAction::Undo(steps) => println!("Undid {} steps", session.undo(steps).await),
            ReplAction::Redo(steps) => println!("Redid {} steps", session.redo(steps).await),
            ReplAction::Show { webhook } => {
                let format = if webhook { Format::Webhook } else { Format::Editor };
                println!("{}", message_to_string(&session.message().await, format)?);
            }
            ReplAction::Issues => {
                session.flush().await?;
                for issue in session.issues().borrow().iter() {
                    println!("{issue}");
                }
            }
            ReplAction::Save => session.flush().await?,
            ReplAction::Backup(name) => session.backup(&name).await?,
            ReplAction::Restore(name) => {
                if let Err(e) = session.restore(&name).await {
                    println!("{e}");
                }
            }
            ReplAction::Backups => print_backups(session).await?,
            ReplAction::Help => println!("{HELP}"),
            ReplAction::Quit => break,
        }
    }

    if let Err(e) = scheduler.shutdown().await {
        error!("Error stopping scheduler: {}", e);
    }
    Ok(())
}
