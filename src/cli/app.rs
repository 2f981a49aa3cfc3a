//! CLI command handling.
//!
//! The App is the presentation-layer consumer of the note and settings
//! repositories: it issues their operations and renders the results, and
//! never mutates collection state directly.

use std::{
    fs::read_to_string,
    io::{stdin, stdout, Write},
    path::PathBuf,
};

use crate::{
    render_markdown, resolve_theme, Commands, InkError, Note, NoteRepository, ResolvedTheme,
    Result, Settings, SettingsRepository, SettingsUpdate, TagColor, Theme,
};

/// CLI application handler - processes commands against the repositories
pub struct App {
    /// The canonical collection owner
    repository: NoteRepository,

    /// The singleton settings owner
    settings: SettingsRepository,
}

impl App {
    /// Create a new CLI application over explicitly constructed repositories
    pub fn new(repository: NoteRepository, settings: SettingsRepository) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Create { folder } => self.handle_create(folder),

            Commands::View { id, json, html } => self.handle_view(&id, json, html),

            Commands::List {
                folder,
                tag,
                json,
                detailed,
            } => self.handle_list(folder, tag, json, detailed),

            Commands::Search { query, limit, json } => self.handle_search(&query, limit, json),

            Commands::Edit {
                id,
                title,
                content,
                file,
            } => self.handle_edit(&id, title, content, file),

            Commands::Delete { id, force } => self.handle_delete(&id, force),

            Commands::Folder {
                create,
                parent,
                delete,
                list,
            } => self.handle_folder(create, parent, delete, list),

            Commands::Tags {
                create,
                color,
                delete,
                list,
            } => self.handle_tags(create, &color, delete, list),

            Commands::Tag {
                id,
                add,
                remove,
                list,
            } => self.handle_tag(&id, add, remove, list),

            Commands::Config { show, set, reset } => self.handle_config(show, set, reset).await,
        }
    }

    fn handle_create(&mut self, folder: Option<String>) -> Result<()> {
        let note = self.repository.create_note(folder)?;
        println!("Note created with ID: {}", note.id);
        Ok(())
    }

    fn handle_view(&self, id: &str, json: bool, html: bool) -> Result<()> {
        let note = self
            .repository
            .note(id)
            .ok_or_else(|| InkError::NoteNotFound { id: id.to_string() })?;

        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
        } else if html {
            println!("{}", render_markdown(&note.content));
        } else {
            self.print_note(note, true);
        }
        Ok(())
    }

    fn handle_list(
        &self,
        folder: Option<String>,
        tag: Option<String>,
        json: bool,
        detailed: bool,
    ) -> Result<()> {
        let notes: Vec<&Note> = match (folder.as_deref(), tag.as_deref()) {
            (Some("root"), _) => self.repository.notes_in_folder(None),
            (Some(folder_id), _) => self.repository.notes_in_folder(Some(folder_id)),
            (None, Some(token)) => {
                let tag_id = self.resolve_tag_id(token)?;
                self.repository.notes_with_tag(&tag_id)
            }
            (None, None) => self.repository.notes().iter().collect(),
        };

        self.display_notes(&notes, json, detailed)
    }

    fn handle_search(&self, query: &str, limit: usize, json: bool) -> Result<()> {
        let mut results = self.repository.search_notes(query);

        // Apply limit if specified (0 means no limit)
        if limit > 0 && results.len() > limit {
            results.truncate(limit);
        }

        if results.is_empty() {
            println!("No notes found matching query: \"{}\"", query);
            return Ok(());
        }

        self.display_notes(&results, json, false)
    }

    fn handle_edit(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
        file: Option<PathBuf>,
    ) -> Result<()> {
        if content.is_some() && file.is_some() {
            return Err(InkError::ApplicationError {
                message: "Cannot specify both --content and --file options".to_string(),
            });
        }

        let mut note = self
            .repository
            .note(id)
            .cloned()
            .ok_or_else(|| InkError::NoteNotFound { id: id.to_string() })?;

        if let Some(new_title) = title {
            note.title = new_title;
        }

        if let Some(new_content) = content {
            note.content = new_content;
        } else if let Some(path) = file {
            note.content = read_to_string(&path)?;
        }

        let updated = self.repository.update_note(note)?;
        println!("Note {} updated successfully", updated.id);
        Ok(())
    }

    fn handle_delete(&mut self, id: &str, force: bool) -> Result<()> {
        let note = self
            .repository
            .note(id)
            .cloned()
            .ok_or_else(|| InkError::NoteNotFound { id: id.to_string() })?;

        // Show note details and prompt for confirmation (unless force is set)
        if !force {
            println!("You are about to delete the following note:");
            println!("ID:      {}", note.id);
            println!("Title:   {}", note.title);
            println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this note? [y/N]: ");
            stdout().flush().map_err(InkError::Io)?;

            let mut input = String::new();
            stdin().read_line(&mut input).map_err(InkError::Io)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        self.repository.delete_note(id)?;
        println!(
            "Note '{}' ({}) has been permanently deleted.",
            note.title, note.id
        );
        Ok(())
    }

    fn handle_folder(
        &mut self,
        create: Option<String>,
        parent: Option<String>,
        delete: Option<String>,
        list: bool,
    ) -> Result<()> {
        if let Some(name) = create {
            let folder = self.repository.create_folder(name, parent)?;
            println!("Folder created with ID: {}", folder.id);
        }

        if let Some(id) = delete {
            self.repository.delete_folder(&id)?;
            println!("Folder {} deleted; its notes and subfolders moved to root.", id);
        }

        if list {
            if self.repository.folders().is_empty() {
                println!("No folders.");
            }
            for folder in self.repository.folders() {
                match &folder.parent_id {
                    Some(parent_id) => {
                        let parent_name = self
                            .repository
                            .folder(parent_id)
                            .map(|f| f.name.as_str())
                            .unwrap_or("(missing folder)");
                        println!(
                            "{}  {} (in {})",
                            folder.id,
                            console::style(&folder.name).bold(),
                            parent_name
                        );
                    }
                    None => println!("{}  {}", folder.id, console::style(&folder.name).bold()),
                }
            }
        }

        Ok(())
    }

    fn handle_tags(
        &mut self,
        create: Option<String>,
        color: &str,
        delete: Option<String>,
        list: bool,
    ) -> Result<()> {
        if let Some(name) = create {
            let color: TagColor = color.parse()?;
            let tag = self.repository.create_tag(name, color)?;
            println!("Tag created with ID: {}", tag.id);
        }

        if let Some(token) = delete {
            let tag_id = self.resolve_tag_id(&token)?;
            self.repository.delete_tag(&tag_id)?;
            println!("Tag {} deleted and detached from all notes.", tag_id);
        }

        if list {
            if self.repository.tags().is_empty() {
                println!("No tags.");
            }
            for tag in self.repository.tags() {
                println!(
                    "{}  #{} ({})",
                    tag.id,
                    console::style(&tag.name).cyan(),
                    tag.color
                );
            }
        }

        Ok(())
    }

    fn handle_tag(
        &mut self,
        id: &str,
        add: Option<String>,
        remove: Option<String>,
        list: bool,
    ) -> Result<()> {
        if let Some(token) = add {
            let tag_id = self.resolve_tag_id(&token)?;
            self.repository.add_tag_to_note(id, &tag_id)?;
            println!("Tag {} added to note {}", tag_id, id);
        }

        if let Some(token) = remove {
            let tag_id = self.resolve_tag_id(&token)?;
            self.repository.remove_tag_from_note(id, &tag_id)?;
            println!("Tag {} removed from note {}", tag_id, id);
        }

        if list {
            let note = self
                .repository
                .note(id)
                .ok_or_else(|| InkError::NoteNotFound { id: id.to_string() })?;

            if note.tags.is_empty() {
                println!("Note {} has no tags.", id);
            }
            for tag_id in &note.tags {
                match self.repository.tag(tag_id) {
                    Some(tag) => println!("{}  #{} ({})", tag.id, tag.name, tag.color),
                    None => println!("{}  (unknown tag)", tag_id),
                }
            }
        }

        Ok(())
    }

    async fn handle_config(&self, show: bool, set: Option<String>, reset: bool) -> Result<()> {
        let show = show || (set.is_none() && !reset);

        if reset {
            let settings = self.settings.reset().await?;
            println!("Settings reset to defaults.");
            self.apply_theme(&settings);
        }

        if let Some(assignment) = set {
            let update = parse_settings_update(&assignment)?;
            let theme_changed = update.theme.is_some();
            let settings = self.settings.update(&update).await?;
            println!("Settings updated.");
            if theme_changed {
                self.apply_theme(&settings);
            }
        }

        if show {
            let settings = self.settings.settings().await?;
            print_settings(&settings);
        }

        Ok(())
    }

    /// Applies the theme side effect after a settings change; "system" is
    /// resolved against the environment at the moment of application and
    /// never stored resolved.
    fn apply_theme(&self, settings: &Settings) {
        match resolve_theme(settings.theme, terminal_prefers_dark()) {
            ResolvedTheme::Dark => println!("Theme applied: dark"),
            ResolvedTheme::Light => println!("Theme applied: light"),
        }
    }

    /// Accepts either a tag id or a tag name.
    fn resolve_tag_id(&self, token: &str) -> Result<String> {
        if let Some(tag) = self.repository.tag(token) {
            return Ok(tag.id.clone());
        }

        self.repository
            .tags()
            .iter()
            .find(|t| t.name == token)
            .map(|t| t.id.clone())
            .ok_or_else(|| InkError::TagNotFound {
                id: token.to_string(),
            })
    }

    fn display_notes(&self, notes: &[&Note], json: bool, detailed: bool) -> Result<()> {
        if notes.is_empty() {
            println!("No notes found matching the criteria.");
            return Ok(());
        }

        if json {
            self.display_notes_json(notes, detailed)?;
        } else {
            self.display_notes_text(notes, detailed);
        }

        // Print count at the end
        println!(
            "\nFound {} note{}",
            notes.len(),
            if notes.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    fn display_notes_json(&self, notes: &[&Note], detailed: bool) -> Result<()> {
        if detailed {
            println!("{}", serde_json::to_string_pretty(&notes)?);
        } else {
            // Simplified notes with just the headline fields
            let simplified: Vec<serde_json::Value> = notes
                .iter()
                .map(|note| {
                    serde_json::json!({
                        "id": note.id,
                        "title": note.title,
                        "folderId": note.folder_id,
                        "tags": note.tags,
                        "updatedAt": note.updated_at.to_rfc3339(),
                    })
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&simplified)?);
        }

        Ok(())
    }

    fn display_notes_text(&self, notes: &[&Note], detailed: bool) {
        // Use terminal width for formatting if available
        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, note) in notes.iter().enumerate() {
            // Add separator between notes (except before the first)
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            self.print_note(note, detailed);
        }
    }

    fn print_note(&self, note: &Note, detailed: bool) {
        let created_at = note.created_at.format("%Y-%m-%d %H:%M");
        println!("ID: {} | Created: {}", note.id, created_at);
        println!("Title: {}", console::style(&note.title).bold());

        if let Some(folder_id) = &note.folder_id {
            // A dangling folder reference is shown, not treated as an error
            let name = self
                .repository
                .folder(folder_id)
                .map(|f| f.name.as_str())
                .unwrap_or("(missing folder)");
            println!("Folder: {}", name);
        }

        if !note.tags.is_empty() {
            let tags = note
                .tags
                .iter()
                .map(|tag_id| match self.repository.tag(tag_id) {
                    Some(tag) => format!("#{}", tag.name),
                    None => format!("#{}", tag_id),
                })
                .collect::<Vec<_>>()
                .join(" ");
            println!("Tags: {}", console::style(tags).cyan());
        }

        if detailed {
            println!("\n{}", note.content);
        } else {
            let preview = content_preview(&note.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }
    }
}

/// Terminal color-scheme heuristic: the COLORFGBG convention exposes
/// "foreground;background" ANSI indices, and a low background index means a
/// dark terminal. Unset defaults to dark.
fn terminal_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7)
        .unwrap_or(true)
}

/// Parses a `key=value` assignment into a single-field settings update.
fn parse_settings_update(assignment: &str) -> Result<SettingsUpdate> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| InkError::ApplicationError {
            message: format!("Expected key=value, got '{}'", assignment),
        })?;

    let mut update = SettingsUpdate::default();
    match key {
        "theme" => update.theme = Some(value.parse::<Theme>().map_err(|_| invalid(key, value))?),
        "fontFamily" => update.font_family = Some(value.to_string()),
        "fontSize" => update.font_size = Some(value.parse().map_err(|_| invalid(key, value))?),
        "lineHeight" => update.line_height = Some(value.parse().map_err(|_| invalid(key, value))?),
        "showLineNumbers" => {
            update.show_line_numbers = Some(value.parse().map_err(|_| invalid(key, value))?)
        }
        "autoSave" => update.auto_save = Some(value.parse().map_err(|_| invalid(key, value))?),
        "saveInterval" => {
            update.save_interval = Some(value.parse().map_err(|_| invalid(key, value))?)
        }
        other => {
            return Err(InkError::ApplicationError {
                message: format!("Unknown setting: {}", other),
            })
        }
    }

    Ok(update)
}

fn invalid(key: &str, value: &str) -> InkError {
    InkError::ApplicationError {
        message: format!("Invalid value '{}' for setting '{}'", value, key),
    }
}

fn print_settings(settings: &Settings) {
    println!("theme           = {}", settings.theme);
    println!("fontFamily      = {}", settings.font_family);
    println!("fontSize        = {}", settings.font_size);
    println!("lineHeight      = {}", settings.line_height);
    println!("showLineNumbers = {}", settings.show_line_numbers);
    println!("autoSave        = {}", settings.auto_save);
    println!("saveInterval    = {}", settings.save_interval);
    println!("updatedAt       = {}", settings.updated_at.to_rfc3339());
}

/// Generate a content preview for displaying brief notes
fn content_preview(content: &str, max_len: usize) -> String {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    // Truncate by characters, not bytes, so multi-byte content can't split
    // a char boundary
    match first_line.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &first_line[..cut]),
        None => first_line.to_string(),
    }
}
