use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notedir")]
#[command(about = "Plain-text notes kept in a single directory", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), " ", env!("GIT_COMMIT_DATE"), ")"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Notes directory (overrides NOTEDIR_HOME and the config file)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List notes, newest first
    #[command(alias = "ls")]
    List {
        /// Only show notes whose name or content contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Write a new note; its name comes from the first line
    #[command(alias = "n")]
    New {
        /// Note text (read from stdin if omitted)
        text: Option<String>,
    },

    /// Print a note
    #[command(alias = "v")]
    View {
        /// Note name, as shown by `list`
        name: String,
    },

    /// Replace a note's content
    #[command(alias = "e")]
    Edit {
        /// Note name, as shown by `list`
        name: String,

        /// New text (read from stdin if omitted)
        text: Option<String>,
    },

    /// Delete one or more notes
    #[command(alias = "rm")]
    Delete {
        /// Note names, as shown by `list`
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },

    /// Print the notes directory
    Path,
}
