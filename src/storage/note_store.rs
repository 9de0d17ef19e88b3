// src/storage/note_store.rs
use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::entity::Note;
use crate::error::Result;

use super::KeyValueStore;

/// Key the collection lives under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "notes-manager-v1";

const ID_PREFIX: &str = "n";
const ID_RANDOM_LEN: usize = 7;

/// Owns the canonical, newest-first collection and mirrors it to a medium.
pub struct NoteStore<S> {
    backend: S,
    key: String,
    notes: Vec<Note>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Construct the store from whatever the medium currently holds.
    pub fn open(backend: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            notes: Vec::new(),
        };
        store.notes = store.load();
        store
    }

    /// Read the persisted collection.
    ///
    /// Absent, unparseable or non-array values all yield an empty collection;
    /// the cause is only logged.
    pub fn load(&self) -> Vec<Note> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to read notes");
                return Vec::new();
            }
        };

        match parse_collection(&raw) {
            Ok(notes) => sanitize(notes),
            Err(reason) => {
                warn!(key = %self.key, %reason, "ignoring stored notes");
                Vec::new()
            }
        }
    }

    /// Persist the full collection, overwriting the previous value.
    ///
    /// Returns whether the write went through. A failed write is logged and
    /// leaves the in-memory collection untouched.
    pub fn save(&self) -> bool {
        match self.write() {
            Ok(()) => {
                debug!(key = %self.key, count = self.notes.len(), "saved notes");
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save notes");
                false
            }
        }
    }

    fn write(&self) -> Result<()> {
        let json = serde_json::to_string(&self.notes)?;
        self.backend.set(&self.key, &json)
    }

    /// Fresh id: base36 millis plus a random base36 suffix.
    ///
    /// Retries on the (practically impossible) clash with an id already held.
    pub fn generate_id(&self) -> String {
        loop {
            let id = make_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    // Mutators are crate-private: the controller is the only writer.

    pub(crate) fn prepend(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Note> {
        let index = self.position(id)?;
        Some(self.notes.remove(index))
    }

    pub(crate) fn clear(&mut self) {
        self.notes.clear();
    }
}

fn parse_collection(raw: &str) -> std::result::Result<Vec<Note>, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_array() {
        return Err("stored value is not an array".to_string());
    }
    serde_json::from_value(value).map_err(|e| format!("malformed note entry: {}", e))
}

/// Drop entries that break collection invariants, keeping stored order.
fn sanitize(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            if note.text.trim().is_empty() {
                warn!(id = %note.id, "dropping stored note with empty text");
                return false;
            }
            if !seen.insert(note.id.clone()) {
                warn!(id = %note.id, "dropping stored note with duplicate id");
                return false;
            }
            true
        })
        .collect()
}

fn make_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = to_base36(Uuid::new_v4().as_u128());
    let suffix = &random[random.len().saturating_sub(ID_RANDOM_LEN)..];
    format!("{}_{}_{}", ID_PREFIX, to_base36(millis), suffix)
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuicknotesError;
    use crate::storage::{FileKvStore, MemoryKvStore};
    use tempfile::TempDir;

    struct BrokenKvStore;

    impl KeyValueStore for BrokenKvStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(QuicknotesError::Storage("medium unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(QuicknotesError::Storage("quota exceeded".to_string()))
        }
    }

    fn note(id: &str, title: &str, text: &str) -> Note {
        Note::new(id.to_string(), title.to_string(), text.to_string())
    }

    #[test]
    fn test_open_empty_medium() {
        let store = NoteStore::open(MemoryKvStore::new(), DEFAULT_STORAGE_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let mut store = NoteStore::open(FileKvStore::new(tmp.path()), DEFAULT_STORAGE_KEY);
        store.prepend(note("a", "", "Buy milk"));
        store.prepend(note("b", "Work", "Finish report"));
        assert!(store.save());

        let reopened = NoteStore::open(FileKvStore::new(tmp.path()), DEFAULT_STORAGE_KEY);
        assert_eq!(reopened.notes(), store.notes());
        assert_eq!(reopened.notes()[0].id, "b");
        assert_eq!(reopened.load(), store.notes());
    }

    #[test]
    fn test_load_corrupted_value_is_empty() {
        for raw in ["{not json", "{\"id\":\"a\"}", "42", "\"text\"", "null", "[{\"id\":1}]"] {
            let store = NoteStore::open(MemoryKvStore::with_value(DEFAULT_STORAGE_KEY, raw), DEFAULT_STORAGE_KEY);
            assert!(store.is_empty(), "expected empty collection for {raw}");
        }
    }

    #[test]
    fn test_load_blank_value_is_empty() {
        let store = NoteStore::open(MemoryKvStore::with_value(DEFAULT_STORAGE_KEY, "  "), DEFAULT_STORAGE_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_read_failure_is_empty() {
        let store = NoteStore::open(BrokenKvStore, DEFAULT_STORAGE_KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_invalid_entries() {
        let raw = r#"[
            {"id":"a","title":"","text":"keep","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"b","title":"","text":"   ","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"a","title":"","text":"dupe","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"c","title":"t","text":"also keep","createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let store = NoteStore::open(MemoryKvStore::with_value(DEFAULT_STORAGE_KEY, raw), DEFAULT_STORAGE_KEY);

        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(store.notes()[0].text, "keep");
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let mut store = NoteStore::open(BrokenKvStore, DEFAULT_STORAGE_KEY);
        store.prepend(note("a", "", "still here"));

        assert!(!store.save());
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].text, "still here");
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let mut store = NoteStore::open(MemoryKvStore::new(), "k");
        store.prepend(note("a", "", "one"));
        store.save();
        store.clear();
        store.save();

        assert_eq!(store.backend().get("k").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.backend().write_count(), 2);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut store = NoteStore::open(MemoryKvStore::new(), "k");
        for id in ["a", "b", "c", "d"] {
            store.prepend(note(id, "", id));
        }

        let removed = store.remove("b").unwrap();
        assert_eq!(removed.id, "b");

        let ids: Vec<&str> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a"]);
        assert!(store.remove("b").is_none());
    }

    #[test]
    fn test_generate_id_shape() {
        let store = NoteStore::open(MemoryKvStore::new(), "k");
        let id = store.generate_id();

        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "n");
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), ID_RANDOM_LEN);
        assert!(id[2..].chars().all(|c| c == '_' || c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_id_is_unique() {
        let store = NoteStore::open(MemoryKvStore::new(), "k");
        let ids: HashSet<String> = (0..1000).map(|_| store.generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }
}
