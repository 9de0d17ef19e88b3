use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quicknotes")]
#[command(version, about = "Jot down short notes from the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to $QUICKNOTES_DIR, then ./.quicknotes)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new note (newest notes are listed first)
    Add {
        /// Note text
        #[arg(required_unless_present = "stdin")]
        text: Option<String>,

        /// Optional title
        #[arg(long, short = 't', default_value = "")]
        title: String,

        /// Read the note text from stdin
        #[arg(long, conflicts_with = "text")]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all notes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a note's title and/or text
    Edit {
        /// Note ID (or a unique prefix of it)
        id: String,

        /// New title
        #[arg(long, short = 't')]
        title: Option<String>,

        /// New text
        #[arg(long, conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the new text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a single note
    Delete {
        /// Note ID (or a unique prefix of it)
        id: String,

        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete every note
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
