//! Core data structures for the inkwell application.
//!
//! This module contains the three collection record types — Note, Folder,
//! and Tag — together with the fixed tag color palette.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InkError;

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Note title
    pub title: String,
    /// Note content in Markdown format
    pub content: String,
    /// Folder this note is filed under, or None for the root
    pub folder_id: Option<String>,
    /// Ids of the tags attached to this note
    pub tags: Vec<String>,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new untitled note, optionally filed under a folder
    pub fn new(folder_id: Option<String>) -> Self {
        let now = Utc::now();

        Note {
            id: Uuid::new_v4().to_string(),
            title: "Untitled Note".to_string(),
            content: "# Untitled Note\n\nStart writing here...".to_string(),
            folder_id,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named container node in the folder forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique identifier for the folder
    pub id: String,
    /// Display name
    pub name: String,
    /// Parent folder, or None for the root level
    pub parent_id: Option<String>,
}

impl Folder {
    pub fn new(name: String, parent_id: Option<String>) -> Self {
        Folder {
            id: Uuid::new_v4().to_string(),
            name,
            parent_id,
        }
    }
}

/// A named, colored label attachable to multiple notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier for the tag
    pub id: String,
    /// Display name
    pub name: String,
    /// Color class from the fixed palette
    pub color: TagColor,
}

impl Tag {
    pub fn new(name: String, color: TagColor) -> Self {
        Tag {
            id: Uuid::new_v4().to_string(),
            name,
            color,
        }
    }
}

/// The fixed palette of tag color class tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagColor {
    #[serde(rename = "note-red")]
    Red,
    #[serde(rename = "note-blue")]
    Blue,
    #[serde(rename = "note-purple")]
    Purple,
    #[serde(rename = "note-yellow")]
    Yellow,
    #[serde(rename = "note-green")]
    Green,
}

impl TagColor {
    /// All palette entries, in display order.
    pub const ALL: [TagColor; 5] = [
        TagColor::Red,
        TagColor::Blue,
        TagColor::Purple,
        TagColor::Yellow,
        TagColor::Green,
    ];

    /// The serialized color class token for this palette entry.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagColor::Red => "note-red",
            TagColor::Blue => "note-blue",
            TagColor::Purple => "note-purple",
            TagColor::Yellow => "note-yellow",
            TagColor::Green => "note-green",
        }
    }
}

impl fmt::Display for TagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagColor {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "note-red" => Ok(TagColor::Red),
            "note-blue" => Ok(TagColor::Blue),
            "note-purple" => Ok(TagColor::Purple),
            "note-yellow" => Ok(TagColor::Yellow),
            "note-green" => Ok(TagColor::Green),
            other => Err(InkError::UnknownColor(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_defaults() {
        let note = Note::new(None);

        assert_eq!(note.title, "Untitled Note");
        assert!(note.content.starts_with("# Untitled Note"));
        assert_eq!(note.folder_id, None);
        assert!(note.tags.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn note_serializes_with_camel_case_fields() {
        let mut note = Note::new(Some("folder-1".to_string()));
        note.id = "note-1".to_string();

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["folderId"], "folder-1");
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn tag_color_round_trips_through_token() {
        for color in TagColor::ALL {
            assert_eq!(color.as_str().parse::<TagColor>().unwrap(), color);
        }
        assert!("magenta".parse::<TagColor>().is_err());
    }
}
