pub mod cli;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod render;
pub mod storage;

pub use config::Config;
pub use controller::{Confirm, NoteController};
pub use entity::Note;
pub use error::{QuicknotesError, Result};
pub use render::{render, ViewModel};
pub use storage::{FileKvStore, KeyValueStore, MemoryKvStore, NoteStore};
