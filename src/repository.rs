//! In-memory owner of the note, folder, and tag collections.
//!
//! The repository holds the canonical state for the process: every mutation
//! goes through here, applies its referential-integrity side effects, and
//! re-serializes the affected collection(s) to the [`CollectionStore`].
//! Reads are direct synchronous snapshots of the in-memory collections.
//!
//! One instance per process, constructed explicitly and passed to whatever
//! presentation layer consumes it. In-memory state is the source of truth;
//! the store is a mirror, and a persistence failure leaves memory already
//! updated (no rollback).

use chrono::Utc;
use log::{debug, info};

use crate::{seed, CollectionStore, Folder, InkError, Note, Result, Tag, TagColor};

/// Manages the note, folder, and tag collections and their persistence.
pub struct NoteRepository {
    /// Persistence mirror for the three collections
    store: CollectionStore,

    notes: Vec<Note>,
    folders: Vec<Folder>,
    tags: Vec<Tag>,

    /// Id of the note the presentation layer is displaying, if any
    current_note: Option<String>,

    /// Query string driving the filtered note view
    search_query: String,

    /// Whether the current note is open for editing
    editing: bool,

    /// Guards against repeated hydration
    hydrated: bool,
}

impl NoteRepository {
    pub fn new(store: CollectionStore) -> Self {
        Self {
            store,
            notes: Vec::new(),
            folders: Vec::new(),
            tags: Vec::new(),
            current_note: None,
            search_query: String::new(),
            editing: false,
            hydrated: false,
        }
    }

    /// Populates the collections from the store, or seeds the demonstration
    /// dataset when the store has never been written. Loading and seeding
    /// never mix: either all three collections come from the store, or all
    /// three come from the seed.
    pub fn hydrate(&mut self) -> Result<()> {
        if self.hydrated {
            return Ok(());
        }

        if self.store.is_initialized() {
            self.notes = self.store.load_notes()?.unwrap_or_default();
            self.folders = self.store.load_folders()?.unwrap_or_default();
            self.tags = self.store.load_tags()?.unwrap_or_default();
            info!(
                "Hydrated {} notes, {} folders, {} tags from store",
                self.notes.len(),
                self.folders.len(),
                self.tags.len()
            );
        } else {
            let (notes, folders, tags) = seed::sample_collections();
            self.notes = notes;
            self.folders = folders;
            self.tags = tags;

            self.store.save_notes(&self.notes)?;
            self.store.save_folders(&self.folders)?;
            self.store.save_tags(&self.tags)?;
            self.store.mark_initialized()?;
            info!("Seeded demonstration data into empty store");
        }

        self.hydrated = true;
        Ok(())
    }

    // ----- read surface -----

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// The note the presentation layer is currently displaying.
    pub fn current_note(&self) -> Option<&Note> {
        self.current_note.as_deref().and_then(|id| self.note(id))
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    /// Notes matching the stored search query: case-insensitive substring
    /// match against title or content. An empty query matches everything.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.search_notes(&self.search_query)
    }

    /// Case-insensitive substring search against title or content.
    pub fn search_notes(&self, query: &str) -> Vec<&Note> {
        if query.is_empty() {
            return self.notes.iter().collect();
        }

        let needle = query.to_lowercase();
        self.notes
            .iter()
            .filter(|n| {
                n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Folders whose parent is the given folder (None = root level).
    pub fn folder_children(&self, parent_id: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Notes filed under the given folder (None = unfiled).
    pub fn notes_in_folder(&self, folder_id: Option<&str>) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.folder_id.as_deref() == folder_id)
            .collect()
    }

    /// Notes carrying the given tag.
    pub fn notes_with_tag(&self, tag_id: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.tags.iter().any(|t| t == tag_id))
            .collect()
    }

    // ----- note mutations -----

    /// Creates an untitled note, makes it current, and enters editing mode.
    pub fn create_note(&mut self, folder_id: Option<String>) -> Result<Note> {
        let note = Note::new(folder_id);
        info!("Creating note: {}", note.id);

        self.notes.push(note.clone());
        self.current_note = Some(note.id.clone());
        self.editing = true;

        self.store.save_notes(&self.notes)?;
        Ok(note)
    }

    /// Replaces the stored note matching `note.id`, refreshing `updated_at`,
    /// and makes it the current note.
    pub fn update_note(&mut self, mut note: Note) -> Result<Note> {
        let slot = self
            .notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| InkError::NoteNotFound { id: note.id.clone() })?;

        note.updated_at = Utc::now();
        *slot = note.clone();
        self.current_note = Some(note.id.clone());

        self.store.save_notes(&self.notes)?;
        Ok(note)
    }

    /// Removes a note. When the removed note was current, the first
    /// remaining note (in collection order) becomes current.
    pub fn delete_note(&mut self, id: &str) -> Result<()> {
        if self.note(id).is_none() {
            return Err(InkError::NoteNotFound { id: id.to_string() });
        }
        info!("Deleting note: {}", id);

        self.notes.retain(|n| n.id != id);
        if self.current_note.as_deref() == Some(id) {
            self.current_note = self.notes.first().map(|n| n.id.clone());
        }

        self.store.save_notes(&self.notes)
    }

    /// Makes a note current and leaves editing mode. UI state only; nothing
    /// is persisted.
    pub fn select_note(&mut self, id: &str) -> Result<()> {
        if self.note(id).is_none() {
            return Err(InkError::NoteNotFound { id: id.to_string() });
        }

        self.current_note = Some(id.to_string());
        self.editing = false;
        Ok(())
    }

    /// Replaces the search query driving [`NoteRepository::filtered_notes`].
    pub fn update_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // ----- folder mutations -----

    /// Creates a folder. A parent, when given, must exist.
    pub fn create_folder(&mut self, name: String, parent_id: Option<String>) -> Result<Folder> {
        if let Some(parent) = &parent_id {
            if self.folder(parent).is_none() {
                return Err(InkError::FolderNotFound { id: parent.clone() });
            }
        }

        let folder = Folder::new(name, parent_id);
        info!("Creating folder: {}", folder.id);
        self.folders.push(folder.clone());

        self.store.save_folders(&self.folders)?;
        Ok(folder)
    }

    /// Replaces the stored folder matching `folder.id`. A reparent that
    /// would make the folder its own ancestor is rejected.
    pub fn update_folder(&mut self, folder: Folder) -> Result<Folder> {
        if self.folder(&folder.id).is_none() {
            return Err(InkError::FolderNotFound { id: folder.id });
        }

        if let Some(parent) = &folder.parent_id {
            if self.folder(parent).is_none() {
                return Err(InkError::FolderNotFound { id: parent.clone() });
            }
            if self.would_cycle(&folder.id, parent) {
                return Err(InkError::FolderCycle {
                    id: folder.id,
                    parent_id: parent.clone(),
                });
            }
        }

        let slot = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder.id)
            .ok_or_else(|| InkError::FolderNotFound {
                id: folder.id.clone(),
            })?;
        *slot = folder.clone();

        self.store.save_folders(&self.folders)?;
        Ok(folder)
    }

    /// Removes a folder. Notes filed under it move to the root, and child
    /// folders are re-parented to the root. The folder and note collections
    /// are persisted as two independent writes.
    pub fn delete_folder(&mut self, id: &str) -> Result<()> {
        if self.folder(id).is_none() {
            return Err(InkError::FolderNotFound { id: id.to_string() });
        }
        info!("Deleting folder: {}", id);

        self.folders.retain(|f| f.id != id);

        let mut children_moved = 0;
        for folder in &mut self.folders {
            if folder.parent_id.as_deref() == Some(id) {
                folder.parent_id = None;
                children_moved += 1;
            }
        }

        let mut notes_moved = 0;
        for note in &mut self.notes {
            if note.folder_id.as_deref() == Some(id) {
                note.folder_id = None;
                notes_moved += 1;
            }
        }
        debug!(
            "Folder {} removed; {} child folders and {} notes moved to root",
            id, children_moved, notes_moved
        );

        self.store.save_folders(&self.folders)?;
        if notes_moved > 0 {
            self.store.save_notes(&self.notes)?;
        }
        Ok(())
    }

    /// Whether making `parent_id` the parent of `folder_id` would create a
    /// cycle. Walks the ancestor chain with a visited set, so forests that
    /// already contain a cycle are tolerated rather than looping forever.
    fn would_cycle(&self, folder_id: &str, parent_id: &str) -> bool {
        let mut visited = vec![folder_id];
        let mut cursor = Some(parent_id);

        while let Some(id) = cursor {
            if id == folder_id {
                return true;
            }
            if visited.contains(&id) {
                return false;
            }
            visited.push(id);
            cursor = self.folder(id).and_then(|f| f.parent_id.as_deref());
        }

        false
    }

    // ----- tag mutations -----

    pub fn create_tag(&mut self, name: String, color: TagColor) -> Result<Tag> {
        let tag = Tag::new(name, color);
        info!("Creating tag: {}", tag.id);
        self.tags.push(tag.clone());

        self.store.save_tags(&self.tags)?;
        Ok(tag)
    }

    pub fn update_tag(&mut self, tag: Tag) -> Result<Tag> {
        let slot = self
            .tags
            .iter_mut()
            .find(|t| t.id == tag.id)
            .ok_or_else(|| InkError::TagNotFound { id: tag.id.clone() })?;
        *slot = tag.clone();

        self.store.save_tags(&self.tags)?;
        Ok(tag)
    }

    /// Removes a tag and strips its id from every note's tag set.
    pub fn delete_tag(&mut self, id: &str) -> Result<()> {
        if self.tag(id).is_none() {
            return Err(InkError::TagNotFound { id: id.to_string() });
        }
        info!("Deleting tag: {}", id);

        self.tags.retain(|t| t.id != id);

        let mut notes_changed = 0;
        for note in &mut self.notes {
            let before = note.tags.len();
            note.tags.retain(|t| t != id);
            if note.tags.len() != before {
                notes_changed += 1;
            }
        }
        debug!("Tag {} removed from {} notes", id, notes_changed);

        self.store.save_tags(&self.tags)?;
        if notes_changed > 0 {
            self.store.save_notes(&self.notes)?;
        }
        Ok(())
    }

    /// Attaches a tag to a note and makes the note current. Idempotent: a
    /// note already carrying the tag is left completely unchanged.
    pub fn add_tag_to_note(&mut self, note_id: &str, tag_id: &str) -> Result<()> {
        if self.tag(tag_id).is_none() {
            return Err(InkError::TagNotFound {
                id: tag_id.to_string(),
            });
        }

        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| InkError::NoteNotFound {
                id: note_id.to_string(),
            })?;

        if note.tags.iter().any(|t| t == tag_id) {
            self.current_note = Some(note_id.to_string());
            return Ok(());
        }

        note.tags.push(tag_id.to_string());
        note.updated_at = Utc::now();
        self.current_note = Some(note_id.to_string());

        self.store.save_notes(&self.notes)
    }

    /// Detaches a tag from a note (if present), refreshes `updated_at`, and
    /// makes the note current.
    pub fn remove_tag_from_note(&mut self, note_id: &str, tag_id: &str) -> Result<()> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| InkError::NoteNotFound {
                id: note_id.to_string(),
            })?;

        note.tags.retain(|t| t != tag_id);
        note.updated_at = Utc::now();
        self.current_note = Some(note_id.to_string());

        self.store.save_notes(&self.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> (tempfile::TempDir, NoteRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf()).unwrap();
        let mut repo = NoteRepository::new(store);
        repo.hydrate().unwrap();
        (dir, repo)
    }

    fn empty_repository() -> (tempfile::TempDir, NoteRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = CollectionStore::new(dir.path().to_path_buf()).unwrap();
        store.mark_initialized().unwrap();
        let mut repo = NoteRepository::new(store);
        repo.hydrate().unwrap();
        (dir, repo)
    }

    #[test]
    fn hydrate_seeds_demo_data_into_empty_store() {
        let (_dir, repo) = repository();

        assert_eq!(repo.notes().len(), 5);
        assert_eq!(repo.folders().len(), 3);
        assert_eq!(repo.tags().len(), 5);
    }

    #[test]
    fn hydrate_skips_seed_once_initialized() {
        let (_dir, repo) = empty_repository();

        assert!(repo.notes().is_empty());
        assert!(repo.folders().is_empty());
        assert!(repo.tags().is_empty());
    }

    #[test]
    fn state_round_trips_into_a_fresh_repository() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let store = CollectionStore::new(dir.path().to_path_buf()).unwrap();
            store.mark_initialized().unwrap();
            let mut repo = NoteRepository::new(store);
            repo.hydrate().unwrap();
            repo.create_folder("Inbox".to_string(), None).unwrap();
            repo.create_note(None).unwrap()
        };

        let store = CollectionStore::new(dir.path().to_path_buf()).unwrap();
        let mut reloaded = NoteRepository::new(store);
        reloaded.hydrate().unwrap();

        assert_eq!(reloaded.notes(), &[created]);
        assert_eq!(reloaded.folders().len(), 1);
    }

    #[test]
    fn create_note_defaults_and_current_selection() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        assert_eq!(note.title, "Untitled Note");
        assert!(note.content.starts_with("# Untitled Note"));
        assert_eq!(note.folder_id, None);
        assert!(note.tags.is_empty());
        assert_eq!(repo.current_note().map(|n| n.id.clone()), Some(note.id));
        assert!(repo.is_editing());
    }

    #[test]
    fn delete_only_note_clears_current() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        repo.delete_note(&note.id).unwrap();

        assert!(repo.current_note().is_none());
        assert!(repo.notes().is_empty());
    }

    #[test]
    fn delete_current_note_falls_back_to_first_remaining() {
        let (_dir, mut repo) = empty_repository();

        let first = repo.create_note(None).unwrap();
        let second = repo.create_note(None).unwrap();
        assert_eq!(repo.current_note().unwrap().id, second.id);

        repo.delete_note(&second.id).unwrap();
        assert_eq!(repo.current_note().unwrap().id, first.id);
    }

    #[test]
    fn update_note_refreshes_timestamp_and_sets_current() {
        let (_dir, mut repo) = empty_repository();

        let mut note = repo.create_note(None).unwrap();
        let created_at = note.created_at;
        note.title = "Renamed".to_string();

        let updated = repo.update_note(note).unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= created_at);
        assert_eq!(repo.current_note().unwrap().title, "Renamed");
    }

    #[test]
    fn update_unknown_note_reports_not_found() {
        let (_dir, mut repo) = empty_repository();

        let ghost = Note::new(None);
        assert!(matches!(
            repo.update_note(ghost),
            Err(InkError::NoteNotFound { .. })
        ));
    }

    #[test]
    fn select_note_exits_editing_mode() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        assert!(repo.is_editing());

        repo.select_note(&note.id).unwrap();
        assert!(!repo.is_editing());
        assert_eq!(repo.current_note().unwrap().id, note.id);
    }

    #[test]
    fn delete_folder_moves_notes_to_root() {
        let (_dir, mut repo) = empty_repository();

        let folder = repo.create_folder("Work".to_string(), None).unwrap();
        repo.create_note(Some(folder.id.clone())).unwrap();
        repo.create_note(Some(folder.id.clone())).unwrap();

        repo.delete_folder(&folder.id).unwrap();

        assert!(repo.notes().iter().all(|n| n.folder_id.is_none()));
        assert_eq!(repo.notes().len(), 2);
    }

    #[test]
    fn delete_folder_reparents_children_to_root() {
        let (_dir, mut repo) = empty_repository();

        let parent = repo.create_folder("Parent".to_string(), None).unwrap();
        let child = repo
            .create_folder("Child".to_string(), Some(parent.id.clone()))
            .unwrap();

        repo.delete_folder(&parent.id).unwrap();

        assert_eq!(repo.folder(&child.id).unwrap().parent_id, None);
        assert_eq!(repo.folder_children(None).len(), 1);
    }

    #[test]
    fn reparenting_to_own_descendant_is_rejected() {
        let (_dir, mut repo) = empty_repository();

        let top = repo.create_folder("Top".to_string(), None).unwrap();
        let mid = repo
            .create_folder("Mid".to_string(), Some(top.id.clone()))
            .unwrap();

        let mut moved = repo.folder(&top.id).unwrap().clone();
        moved.parent_id = Some(mid.id.clone());

        assert!(matches!(
            repo.update_folder(moved),
            Err(InkError::FolderCycle { .. })
        ));
    }

    #[test]
    fn rename_folder_and_tag_in_place() {
        let (_dir, mut repo) = empty_repository();

        let mut folder = repo.create_folder("Wrok".to_string(), None).unwrap();
        folder.name = "Work".to_string();
        repo.update_folder(folder.clone()).unwrap();
        assert_eq!(repo.folder(&folder.id).unwrap().name, "Work");

        let mut tag = repo.create_tag("urgnet".to_string(), TagColor::Red).unwrap();
        tag.name = "urgent".to_string();
        repo.update_tag(tag.clone()).unwrap();
        assert_eq!(repo.tag(&tag.id).unwrap().name, "urgent");
    }

    #[test]
    fn delete_tag_cascades_through_notes() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        let tag = repo
            .create_tag("urgent".to_string(), TagColor::Red)
            .unwrap();
        repo.add_tag_to_note(&note.id, &tag.id).unwrap();
        assert_eq!(repo.note(&note.id).unwrap().tags, vec![tag.id.clone()]);

        repo.delete_tag(&tag.id).unwrap();

        assert!(repo.tags().is_empty());
        assert!(repo.note(&note.id).unwrap().tags.is_empty());
    }

    #[test]
    fn add_tag_twice_is_idempotent() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        let tag = repo.create_tag("todo".to_string(), TagColor::Yellow).unwrap();

        repo.add_tag_to_note(&note.id, &tag.id).unwrap();
        let after_first = repo.note(&note.id).unwrap().clone();

        repo.add_tag_to_note(&note.id, &tag.id).unwrap();
        let after_second = repo.note(&note.id).unwrap();

        assert_eq!(after_second.tags, after_first.tags);
        assert_eq!(after_second.updated_at, after_first.updated_at);
    }

    #[test]
    fn remove_tag_from_note_detaches_it() {
        let (_dir, mut repo) = empty_repository();

        let note = repo.create_note(None).unwrap();
        let tag = repo.create_tag("idea".to_string(), TagColor::Purple).unwrap();
        repo.add_tag_to_note(&note.id, &tag.id).unwrap();

        repo.remove_tag_from_note(&note.id, &tag.id).unwrap();

        assert!(repo.note(&note.id).unwrap().tags.is_empty());
        assert!(repo.tag(&tag.id).is_some());
    }

    #[test]
    fn search_finds_weekly_tasks_in_seed_data() {
        let (_dir, mut repo) = repository();

        repo.update_search_query("weekly");
        let matches = repo.filtered_notes();

        assert!(matches.iter().any(|n| n.title == "Weekly Tasks"));
        assert!(matches.iter().all(|n| {
            n.title.to_lowercase().contains("weekly")
                || n.content.to_lowercase().contains("weekly")
        }));
        assert!(!matches.iter().any(|n| n.title == "Project Ideas"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let (_dir, repo) = repository();

        assert_eq!(repo.filtered_notes().len(), repo.notes().len());
    }

    #[test]
    fn folder_and_tag_queries() {
        let (_dir, repo) = repository();

        assert_eq!(repo.folder_children(None).len(), 3);
        assert_eq!(repo.notes_in_folder(Some("folder-2")).len(), 2);
        assert_eq!(repo.notes_with_tag("tag-5").len(), 2);
        assert!(repo.notes_with_tag("tag-missing").is_empty());
    }
}
