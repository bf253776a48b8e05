use clap::Parser;
use notedir::config::{self, NotesConfig};
use notedir::error::{NotesError, Result};
use notedir::logging::init_tracing;
use notedir::manager::{Finalized, NoteManager};
use notedir::store::fs_backend::FsBackend;
use std::io::Read;

mod args;
mod cli;

use args::{Cli, Commands};
use cli::print::{print_info, print_note, print_notes, print_success};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

type Manager = NoteManager<FsBackend>;

async fn run(cli: Cli) -> Result<()> {
    let manager = init_manager(&cli)?;
    manager.load().await?;

    let result = match cli.command {
        Some(Commands::List { search }) => handle_list(&manager, search),
        Some(Commands::New { text }) => handle_new(&manager, text).await,
        Some(Commands::View { name }) => handle_view(&manager, &name),
        Some(Commands::Edit { name, text }) => handle_edit(&manager, &name, text).await,
        Some(Commands::Delete { names }) => handle_delete(&manager, &names).await,
        Some(Commands::Path) => handle_path(&manager).await,
        None => handle_list(&manager, None),
    };

    manager.shutdown().await;
    result
}

fn init_manager(cli: &Cli) -> Result<Manager> {
    let config_dir = config::config_dir()?;
    let config = match NotesConfig::load(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            NotesConfig::default()
        }
    };
    let notes_dir = config::resolve_notes_dir(cli.dir.clone(), &config)?;
    tracing::debug!(dir = %notes_dir.display(), "using notes directory");

    Ok(NoteManager::new(
        FsBackend::new(notes_dir),
        config.manager_options(),
    ))
}

fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn require_note(manager: &Manager, name: &str) -> Result<()> {
    if manager.get(name).is_none() {
        return Err(NotesError::NotFound(name.to_string()));
    }
    Ok(())
}

fn handle_list(manager: &Manager, search: Option<String>) -> Result<()> {
    let notes = manager.view(search.as_deref().unwrap_or(""));
    print_notes(&notes);
    Ok(())
}

async fn handle_new(manager: &Manager, text: Option<String>) -> Result<()> {
    let text = read_text(text)?;
    let identifier = manager.create();
    match manager.finalize(&identifier, &text).await? {
        Finalized::Saved { identifier, .. } => {
            print_success(&format!("Note saved: {}", identifier))
        }
        Finalized::Discarded => print_info("Empty note discarded."),
    }
    Ok(())
}

fn handle_view(manager: &Manager, name: &str) -> Result<()> {
    let note = manager
        .get(name)
        .ok_or_else(|| NotesError::NotFound(name.to_string()))?;
    print_note(&note);
    Ok(())
}

async fn handle_edit(manager: &Manager, name: &str, text: Option<String>) -> Result<()> {
    require_note(manager, name)?;
    let text = read_text(text)?;
    match manager.finalize(name, &text).await? {
        Finalized::Saved {
            identifier,
            renamed_from: Some(_),
        } => print_success(&format!("Note saved as: {}", identifier)),
        Finalized::Saved { identifier, .. } => {
            print_success(&format!("Note saved: {}", identifier))
        }
        Finalized::Discarded => print_info("Empty note discarded."),
    }
    Ok(())
}

async fn handle_delete(manager: &Manager, names: &[String]) -> Result<()> {
    for name in names {
        require_note(manager, name)?;
        manager.delete(name).await?;
        print_success(&format!("Note deleted: {}", name));
    }
    Ok(())
}

async fn handle_path(manager: &Manager) -> Result<()> {
    let location = manager.directory_location().await?;
    println!("{}", location);
    Ok(())
}
