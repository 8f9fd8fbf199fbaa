use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::data::{Gallery, Identity, SessionPhase};
use crate::error::{Error, Result};

/// Key holding the serialized participant identity
pub const KEY_IDENTITY: &str = "hunt_user";
/// Key holding the serialized gallery
pub const KEY_GALLERY: &str = "hunt_uploads";
/// Key holding the session phase tag
pub const KEY_PHASE: &str = "hunt_state";

/// The Store is the flat key-value persistence layer for a session.
///
/// Three independent keys live in a single SQLite `kv` table: the
/// serialized identity, the serialized gallery, and the phase tag.
/// The store is read once at startup and written on every mutation.
pub struct Store {
    conn: Connection,
    db_path: PathBuf,
}

impl Store {
    /// Open the store in the user's data directory, creating it on demand.
    ///
    /// - Linux: ~/.local/share/snaphunt/snaphunt.db
    /// - macOS: ~/Library/Application Support/snaphunt/snaphunt.db
    /// - Windows: %APPDATA%\snaphunt\snaphunt.db
    pub fn open_default() -> Result<Self> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(Error::NoDataDir)?;
        path.push("snaphunt");
        path.push("snaphunt.db");
        Self::open(&path)
    }

    /// Open (or create) the store at an explicit path
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let store = Store {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn load_identity(&self) -> Result<Option<Identity>> {
        match self.get(KEY_IDENTITY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_identity(&self, identity: &Identity) -> Result<()> {
        self.put(KEY_IDENTITY, &serde_json::to_string(identity)?)
    }

    pub fn load_gallery(&self) -> Result<Gallery> {
        match self.get(KEY_GALLERY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Gallery::new()),
        }
    }

    pub fn save_gallery(&self, gallery: &Gallery) -> Result<()> {
        self.put(KEY_GALLERY, &serde_json::to_string(gallery)?)
    }

    pub fn load_phase(&self) -> Result<SessionPhase> {
        match self.get(KEY_PHASE)? {
            Some(tag) => tag.parse(),
            None => Ok(SessionPhase::default()),
        }
    }

    pub fn save_phase(&self, phase: SessionPhase) -> Result<()> {
        self.put(KEY_PHASE, &phase.to_string())
    }

    /// Clear all three session keys
    pub fn reset(&self) -> Result<()> {
        self.delete(KEY_IDENTITY)?;
        self.delete(KEY_GALLERY)?;
        self.delete(KEY_PHASE)?;
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("db_path", &self.db_path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Gender, ImageSlot};

    fn temp_store(name: &str) -> Store {
        let path = std::env::temp_dir().join(format!(
            "snaphunt-store-{}-{}.db",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Store::open(&path).unwrap()
    }

    fn sample_identity() -> Identity {
        Identity {
            given_name: "Mali".into(),
            family_name: "Suksan".into(),
            age: 27,
            gender: Gender::Female,
        }
    }

    #[test]
    fn path_reports_the_backing_file() {
        let store = temp_store("path");
        assert!(store.path().ends_with(format!(
            "snaphunt-store-path-{}.db",
            std::process::id()
        )));
    }

    #[test]
    fn empty_store_yields_defaults() {
        let store = temp_store("defaults");
        assert!(store.load_identity().unwrap().is_none());
        assert!(store.load_gallery().unwrap().is_empty());
        assert_eq!(store.load_phase().unwrap(), SessionPhase::Register);
    }

    #[test]
    fn identity_round_trip() {
        let store = temp_store("identity");
        let identity = sample_identity();
        store.save_identity(&identity).unwrap();
        assert_eq!(store.load_identity().unwrap(), Some(identity));
    }

    #[test]
    fn gallery_round_trip_preserves_image_bytes() {
        let store = temp_store("gallery");
        let mut gallery = Gallery::new();
        gallery
            .insert(ImageSlot {
                slot_id: 7,
                jpeg_data: vec![0xFF, 0xD8, 0x00, 0x42, 0xFF, 0xD9],
                captured_at: 1_700_000_123,
            })
            .unwrap();
        store.save_gallery(&gallery).unwrap();
        assert_eq!(store.load_gallery().unwrap(), gallery);
    }

    #[test]
    fn overwriting_a_key_keeps_one_row() {
        let store = temp_store("overwrite");
        store.save_phase(SessionPhase::Playing).unwrap();
        store.save_phase(SessionPhase::Completed).unwrap();
        assert_eq!(store.load_phase().unwrap(), SessionPhase::Completed);
    }

    #[test]
    fn reset_clears_all_three_keys() {
        let store = temp_store("reset");
        store.save_identity(&sample_identity()).unwrap();
        store.save_gallery(&Gallery::new()).unwrap();
        store.save_phase(SessionPhase::Playing).unwrap();

        store.reset().unwrap();

        assert!(store.load_identity().unwrap().is_none());
        assert!(store.load_gallery().unwrap().is_empty());
        assert_eq!(store.load_phase().unwrap(), SessionPhase::Register);
    }
}
