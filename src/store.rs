//! Durable storage for the note, folder, and tag collections.
//!
//! Each collection is serialized as a whole under its own stable key in the
//! data directory. Writes go through a temporary file and an atomic rename
//! to prevent data corruption. An empty collection is never written as an
//! explicit empty-array entry; the `.initialized` marker is what lets a
//! later load distinguish "emptied by the user" from "never initialized".

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::{Folder, InkError, Note, Result, Tag};

const NOTES_KEY: &str = "notes";
const FOLDERS_KEY: &str = "folders";
const TAGS_KEY: &str = "tags";
const INIT_MARKER: &str = ".initialized";

/// File-backed key-value store for the three collections.
pub struct CollectionStore {
    /// Directory holding one JSON entry per collection
    data_dir: PathBuf,
}

impl CollectionStore {
    /// Creates a store rooted at the given data directory, creating the
    /// directory if needed.
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        if !data_dir.exists() {
            debug!("Data directory does not exist, creating: {}", data_dir.display());
            fs::create_dir_all(&data_dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                InkError::DirectoryError {
                    path: data_dir.clone(),
                }
            })?;
        }

        Ok(Self { data_dir })
    }

    /// Whether a first hydration has already persisted data here.
    pub fn is_initialized(&self) -> bool {
        self.data_dir.join(INIT_MARKER).exists()
    }

    /// Records that the store holds live data, even when every collection
    /// is currently empty.
    pub fn mark_initialized(&self) -> Result<()> {
        fs::write(self.data_dir.join(INIT_MARKER), b"")?;
        info!("Collection store marked initialized");
        Ok(())
    }

    pub fn save_notes(&self, notes: &[Note]) -> Result<()> {
        self.write_entry(NOTES_KEY, notes)
    }

    pub fn save_folders(&self, folders: &[Folder]) -> Result<()> {
        self.write_entry(FOLDERS_KEY, folders)
    }

    pub fn save_tags(&self, tags: &[Tag]) -> Result<()> {
        self.write_entry(TAGS_KEY, tags)
    }

    /// Loads the notes entry, or None when it has never been written.
    pub fn load_notes(&self) -> Result<Option<Vec<Note>>> {
        self.read_entry(NOTES_KEY)
    }

    pub fn load_folders(&self) -> Result<Option<Vec<Folder>>> {
        self.read_entry(FOLDERS_KEY)
    }

    pub fn load_tags(&self) -> Result<Option<Vec<Tag>>> {
        self.read_entry(TAGS_KEY)
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Serializes a collection under its key using atomic operations.
    ///
    /// An empty collection removes the entry instead of writing one, so a
    /// stale blob cannot resurrect records that were deleted down to zero.
    fn write_entry<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let file_path = self.entry_path(key);

        if items.is_empty() {
            if file_path.exists() {
                debug!("Collection '{}' is empty, removing stale entry", key);
                fs::remove_file(&file_path)?;
            }
            return Ok(());
        }

        debug!("Writing {} items to entry '{}'", items.len(), key);

        // Create a temporary file in the same directory (for atomic operation)
        let dir = file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            InkError::Io(e)
        })?;

        let json = serde_json::to_string_pretty(items).map_err(|e| {
            error!("Failed to serialize collection '{}': {}", key, e);
            InkError::Serialization(e)
        })?;

        temp_file.write_all(json.as_bytes()).map_err(|e| {
            error!("Failed to write to temporary file: {}", e);
            InkError::Io(e)
        })?;

        temp_file.flush().map_err(|e| {
            error!("Failed to flush temporary file: {}", e);
            InkError::Io(e)
        })?;

        // Atomically move the temporary file to the target location
        temp_file.persist(&file_path).map_err(|e| {
            error!("Failed to persist file {}: {}", file_path.display(), e.error);
            InkError::Io(e.error)
        })?;

        Ok(())
    }

    /// Reads a collection entry, or None when the entry does not exist.
    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let file_path = self.entry_path(key);

        if !file_path.exists() {
            debug!("No stored entry for collection '{}'", key);
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path).map_err(|e| {
            error!("Failed to read entry {}: {}", file_path.display(), e);
            InkError::Io(e)
        })?;

        let items: Vec<T> = serde_json::from_str(&content)?;
        debug!("Loaded {} items from entry '{}'", items.len(), key);
        Ok(Some(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagColor;

    fn store() -> (tempfile::TempDir, CollectionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn collections_round_trip_in_order() {
        let (_dir, store) = store();

        let notes = vec![Note::new(None), Note::new(Some("f".to_string()))];
        let folders = vec![
            Folder::new("Work".to_string(), None),
            Folder::new("Archive".to_string(), None),
        ];
        let tags = vec![
            Tag::new("urgent".to_string(), TagColor::Red),
            Tag::new("idea".to_string(), TagColor::Purple),
        ];

        store.save_notes(&notes).unwrap();
        store.save_folders(&folders).unwrap();
        store.save_tags(&tags).unwrap();

        // Reload through a fresh store instance, as a new process would.
        let reopened = CollectionStore::new(_dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load_notes().unwrap().unwrap(), notes);
        assert_eq!(reopened.load_folders().unwrap().unwrap(), folders);
        assert_eq!(reopened.load_tags().unwrap().unwrap(), tags);
    }

    #[test]
    fn missing_entries_load_as_none() {
        let (_dir, store) = store();

        assert!(store.load_notes().unwrap().is_none());
        assert!(store.load_folders().unwrap().is_none());
        assert!(store.load_tags().unwrap().is_none());
    }

    #[test]
    fn empty_write_removes_stale_entry() {
        let (_dir, store) = store();

        store.save_notes(&[Note::new(None)]).unwrap();
        assert!(store.load_notes().unwrap().is_some());

        store.save_notes(&[]).unwrap();
        assert!(store.load_notes().unwrap().is_none());
    }

    #[test]
    fn initialized_marker_survives_empty_collections() {
        let (_dir, store) = store();

        assert!(!store.is_initialized());
        store.mark_initialized().unwrap();
        assert!(store.is_initialized());

        let reopened = CollectionStore::new(_dir.path().to_path_buf()).unwrap();
        assert!(reopened.is_initialized());
        assert!(reopened.load_notes().unwrap().is_none());
    }
}
