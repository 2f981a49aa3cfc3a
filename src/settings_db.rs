//! SQLite-backed storage for the singleton settings record.
//!
//! The table holds exactly one row under the fixed key `id = 1`. Schema
//! creation is idempotent and the default row is seeded behind a row-count
//! check, so opening the store on every process start never duplicates it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::{params, types::Value, Connection};
use tokio::sync::{Mutex, OnceCell};

use crate::settings::defaults;
use crate::{InkError, Result, Settings, SettingsUpdate, Theme};

/// SQL schema for the settings store.
pub const SETTINGS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY,
    theme TEXT NOT NULL DEFAULT 'system',
    fontFamily TEXT NOT NULL DEFAULT 'Inter',
    fontSize INTEGER NOT NULL DEFAULT 16,
    lineHeight REAL NOT NULL DEFAULT 1.5,
    showLineNumbers INTEGER NOT NULL DEFAULT 1,
    autoSave INTEGER NOT NULL DEFAULT 1,
    saveInterval INTEGER NOT NULL DEFAULT 30,
    createdAt TEXT NOT NULL,
    updatedAt TEXT NOT NULL
);
"#;

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(InkError::CorruptedData {
                    message: format!("invalid timestamp '{}' in column '{}'", value, column),
                }),
            )
        })
}

/// Parse a theme token from the database.
fn parse_theme(value: &str) -> std::result::Result<Theme, rusqlite::Error> {
    value.parse::<Theme>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// SQLite connection owning the single settings row.
pub struct SettingsDb {
    conn: Connection,
}

impl SettingsDb {
    /// Opens the store at the given path, creating the schema and seeding
    /// the default row if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = SettingsDb { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = SettingsDb { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Idempotent schema setup. The default row is inserted only when the
    /// row-count check reports an empty table.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SETTINGS_SCHEMA)?;

        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;

        if count == 0 {
            let now = Utc::now().to_rfc3339();
            self.conn.execute(
                "INSERT INTO settings
                 (id, theme, fontFamily, fontSize, lineHeight, showLineNumbers,
                  autoSave, saveInterval, createdAt, updatedAt)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    defaults::THEME.as_str(),
                    defaults::FONT_FAMILY,
                    defaults::FONT_SIZE,
                    defaults::LINE_HEIGHT,
                    defaults::SHOW_LINE_NUMBERS,
                    defaults::AUTO_SAVE,
                    defaults::SAVE_INTERVAL,
                    now,
                ],
            )?;
            info!("Seeded default settings row");
        }

        Ok(())
    }

    /// Returns the settings row.
    pub fn get(&self) -> Result<Settings> {
        let result = self.conn.query_row(
            "SELECT id, theme, fontFamily, fontSize, lineHeight, showLineNumbers,
                    autoSave, saveInterval, createdAt, updatedAt
             FROM settings LIMIT 1",
            [],
            |row| {
                let theme_str: String = row.get(1)?;
                let created_str: String = row.get(8)?;
                let updated_str: String = row.get(9)?;

                Ok(Settings {
                    id: row.get(0)?,
                    theme: parse_theme(&theme_str)?,
                    font_family: row.get(2)?,
                    font_size: row.get(3)?,
                    line_height: row.get(4)?,
                    show_line_numbers: row.get::<_, i64>(5)? != 0,
                    auto_save: row.get::<_, i64>(6)? != 0,
                    save_interval: row.get(7)?,
                    created_at: parse_timestamp(&created_str, "createdAt")?,
                    updated_at: parse_timestamp(&updated_str, "updatedAt")?,
                })
            },
        );

        match result {
            Ok(settings) => Ok(settings),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(InkError::SettingsNotInitialized),
            Err(e) => Err(e.into()),
        }
    }

    /// Merges the supplied fields into the row, refreshing `updatedAt`, and
    /// returns the new full record. An empty update is a no-op that still
    /// returns the current record.
    pub fn update(&self, update: &SettingsUpdate) -> Result<Settings> {
        if update.is_empty() {
            return self.get();
        }

        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(theme) = update.theme {
            clauses.push("theme = ?");
            values.push(Value::Text(theme.as_str().to_string()));
        }
        if let Some(font_family) = &update.font_family {
            clauses.push("fontFamily = ?");
            values.push(Value::Text(font_family.clone()));
        }
        if let Some(font_size) = update.font_size {
            clauses.push("fontSize = ?");
            values.push(Value::Integer(font_size as i64));
        }
        if let Some(line_height) = update.line_height {
            clauses.push("lineHeight = ?");
            values.push(Value::Real(line_height));
        }
        if let Some(show_line_numbers) = update.show_line_numbers {
            clauses.push("showLineNumbers = ?");
            values.push(Value::Integer(show_line_numbers as i64));
        }
        if let Some(auto_save) = update.auto_save {
            clauses.push("autoSave = ?");
            values.push(Value::Integer(auto_save as i64));
        }
        if let Some(save_interval) = update.save_interval {
            clauses.push("saveInterval = ?");
            values.push(Value::Integer(save_interval as i64));
        }

        values.push(Value::Text(Utc::now().to_rfc3339()));
        let sql = format!(
            "UPDATE settings SET {}, updatedAt = ? WHERE id = 1",
            clauses.join(", ")
        );
        debug!("Updating settings columns: {}", clauses.join(", "));

        self.conn
            .execute(&sql, rusqlite::params_from_iter(values))?;
        self.get()
    }

    /// Overwrites every mutable field with the fixed defaults, refreshing
    /// `updatedAt`, and returns the record.
    pub fn reset(&self) -> Result<Settings> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE settings
             SET theme = ?1, fontFamily = ?2, fontSize = ?3, lineHeight = ?4,
                 showLineNumbers = ?5, autoSave = ?6, saveInterval = ?7, updatedAt = ?8
             WHERE id = 1",
            params![
                defaults::THEME.as_str(),
                defaults::FONT_FAMILY,
                defaults::FONT_SIZE,
                defaults::LINE_HEIGHT,
                defaults::SHOW_LINE_NUMBERS,
                defaults::AUTO_SAVE,
                defaults::SAVE_INTERVAL,
                now,
            ],
        )?;
        info!("Settings reset to defaults");
        self.get()
    }
}

enum Location {
    Disk(PathBuf),
    Memory,
}

/// Owns the singleton settings record behind a lazily initialized store.
pub struct SettingsRepository {
    location: Location,
    db: OnceCell<Mutex<SettingsDb>>,
}

impl SettingsRepository {
    /// A repository persisting to the given database file.
    pub fn new(path: PathBuf) -> Self {
        Self {
            location: Location::Disk(path),
            db: OnceCell::new(),
        }
    }

    /// A repository backed by an in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            db: OnceCell::new(),
        }
    }

    /// Memoized initialization: the first caller opens the store (creating
    /// the schema and seeding the default row); concurrent callers await
    /// the same in-flight initialization instead of racing to open twice.
    async fn db(&self) -> Result<&Mutex<SettingsDb>> {
        self.db
            .get_or_try_init(|| async {
                let db = match &self.location {
                    Location::Disk(path) => SettingsDb::open(path),
                    Location::Memory => SettingsDb::open_in_memory(),
                }?;
                Ok(Mutex::new(db))
            })
            .await
    }

    /// The current settings record.
    pub async fn settings(&self) -> Result<Settings> {
        self.db().await?.lock().await.get()
    }

    /// Applies a partial update and returns the new full record.
    pub async fn update(&self, update: &SettingsUpdate) -> Result<Settings> {
        self.db().await?.lock().await.update(update)
    }

    /// Restores the fixed defaults and returns the record.
    pub async fn reset(&self) -> Result<Settings> {
        self.db().await?.lock().await.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_defaults_on_first_open() {
        let db = SettingsDb::open_in_memory().unwrap();
        let settings = db.get().unwrap();

        assert_eq!(settings.id, 1);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.font_family, "Inter");
        assert_eq!(settings.font_size, 16);
        assert_eq!(settings.line_height, 1.5);
        assert!(settings.show_line_numbers);
        assert!(settings.auto_save);
        assert_eq!(settings.save_interval, 30);
    }

    #[test]
    fn reopening_never_duplicates_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");

        let first = SettingsDb::open(&path).unwrap();
        first.update(&SettingsUpdate {
            theme: Some(Theme::Dark),
            ..Default::default()
        })
        .unwrap();
        drop(first);

        let reopened = SettingsDb::open(&path).unwrap();
        let count: i64 = reopened
            .conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();

        assert_eq!(count, 1);
        // The customized value survived the second initialization.
        assert_eq!(reopened.get().unwrap().theme, Theme::Dark);
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let db = SettingsDb::open_in_memory().unwrap();

        let updated = db
            .update(&SettingsUpdate {
                font_size: Some(18),
                show_line_numbers: Some(false),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.font_size, 18);
        assert!(!updated.show_line_numbers);
        // Untouched fields keep their defaults.
        assert_eq!(updated.theme, Theme::System);
        assert_eq!(updated.font_family, "Inter");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let db = SettingsDb::open_in_memory().unwrap();
        let before = db.get().unwrap();

        let after = db.update(&SettingsUpdate::default()).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn reset_is_idempotent() {
        let db = SettingsDb::open_in_memory().unwrap();
        db.update(&SettingsUpdate {
            theme: Some(Theme::Light),
            font_size: Some(22),
            ..Default::default()
        })
        .unwrap();

        let first = db.reset().unwrap();
        let second = db.reset().unwrap();

        assert_eq!(first.theme, Theme::System);
        assert_eq!(first.font_size, 16);

        // Identical records except possibly updatedAt.
        let normalize = |mut s: Settings| {
            s.updated_at = s.created_at;
            s
        };
        assert_eq!(normalize(first), normalize(second));
    }

    #[tokio::test]
    async fn repository_memoizes_initialization() {
        let repo = SettingsRepository::in_memory();

        let (a, b) = tokio::join!(repo.settings(), repo.settings());
        let (a, b) = (a.unwrap(), b.unwrap());

        // Both callers observed the same seeded row.
        assert_eq!(a, b);
        assert_eq!(a.theme, Theme::System);
    }

    #[tokio::test]
    async fn repository_update_and_reset_round_trip() {
        let repo = SettingsRepository::in_memory();

        let updated = repo
            .update(&SettingsUpdate {
                auto_save: Some(false),
                save_interval: Some(60),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!updated.auto_save);
        assert_eq!(updated.save_interval, 60);

        let reset = repo.reset().await.unwrap();
        assert!(reset.auto_save);
        assert_eq!(reset.save_interval, 30);
    }
}
