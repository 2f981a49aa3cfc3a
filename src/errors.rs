//! Error types for the inkwell application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note, folder, tag, and settings operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the inkwell application.
#[derive(Error, Debug)]
pub enum InkError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors from the settings database.
    #[error("Settings store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Folder was not found when performing an operation.
    #[error("Folder not found: {id}")]
    FolderNotFound { id: String },

    /// Tag was not found when performing an operation.
    #[error("Tag not found: {id}")]
    TagNotFound { id: String },

    /// Reparenting a folder would make it its own ancestor.
    #[error("Folder cycle: moving {id} under {parent_id} would make it its own ancestor")]
    FolderCycle { id: String, parent_id: String },

    /// The settings store has no settings row yet.
    #[error("Settings store is not initialized")]
    SettingsNotInitialized,

    /// A color token outside the fixed tag palette.
    #[error("Unknown tag color: {0}")]
    UnknownColor(String),

    /// A value stored on disk could not be interpreted.
    #[error("Corrupted stored data: {message}")]
    CorruptedData { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// Generic application error with a custom message.
    #[error("{message}")]
    ApplicationError { message: String },
}
