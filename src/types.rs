//! Shared type definitions for the inkwell application.
//!
//! This module holds the crate-wide Result alias and the CLI command set.

use std::path::PathBuf;

use clap::Subcommand;

use crate::InkError;

/// A specialized Result type for inkwell operations.
pub type Result<T> = std::result::Result<T, InkError>;

/// Available subcommands for the inkwell application
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new note
    Create {
        /// Folder id to file the note under (omit for the root)
        #[clap(short, long)]
        folder: Option<String>,
    },

    /// View a note by ID
    View {
        /// ID of the note to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,

        /// Render the markdown content to HTML
        #[clap(long)]
        html: bool,
    },

    /// List notes with optional filtering
    List {
        /// Only show notes filed under this folder id ("root" for unfiled)
        #[clap(short, long)]
        folder: Option<String>,

        /// Only show notes carrying this tag id or name
        #[clap(short, long)]
        tag: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Show full content instead of a preview
        #[clap(short, long)]
        detailed: bool,
    },

    /// Search notes by title or content
    Search {
        /// Search query text
        query: String,

        /// Limit the number of search results (0 = no limit)
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// New title for the note
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New content for the note
        #[clap(short, long)]
        content: Option<String>,

        /// Path to a file containing the new note content
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Delete a note by ID
    Delete {
        /// ID of the note to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Folder operations (create, delete, list)
    Folder {
        /// Create a folder with this name
        #[clap(short, long)]
        create: Option<String>,

        /// Parent folder id for --create
        #[clap(short, long)]
        parent: Option<String>,

        /// Delete the folder with this id
        #[clap(short, long)]
        delete: Option<String>,

        /// List all folders
        #[clap(short, long)]
        list: bool,
    },

    /// Tag palette operations (create, delete, list)
    Tags {
        /// Create a tag with this name
        #[clap(short, long)]
        create: Option<String>,

        /// Color token for --create
        #[clap(long, default_value = "note-blue")]
        color: String,

        /// Delete the tag with this id or name
        #[clap(short, long)]
        delete: Option<String>,

        /// List all tags
        #[clap(short, long)]
        list: bool,
    },

    /// Tag operations on a note (add, remove, list)
    Tag {
        /// ID of the note to modify
        id: String,

        /// Tag id or name to attach
        #[clap(short, long)]
        add: Option<String>,

        /// Tag id or name to detach
        #[clap(short, long)]
        remove: Option<String>,

        /// List all tags on the note
        #[clap(short, long)]
        list: bool,
    },

    /// Settings management
    Config {
        /// Show current settings
        #[clap(short = 'S', long)]
        show: bool,

        /// Update a setting as key=value (e.g. theme=dark, fontSize=18)
        #[clap(short, long)]
        set: Option<String>,

        /// Reset settings to defaults
        #[clap(short, long)]
        reset: bool,
    },
}
