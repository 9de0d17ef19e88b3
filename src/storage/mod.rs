mod kv_store;
mod note_store;

pub use kv_store::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use note_store::{NoteStore, DEFAULT_STORAGE_KEY};
