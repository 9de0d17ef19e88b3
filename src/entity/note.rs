// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user-authored note.
///
/// `created_at` doubles as the last-modified time: every successful edit
/// refreshes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Build a note from already-trimmed input, stamped with the current time.
    pub fn new(id: String, title: String, text: String) -> Self {
        Self {
            id,
            title,
            text,
            created_at: Utc::now(),
        }
    }

    /// Replace title and text and refresh the timestamp. Identity is untouched.
    pub fn revise(&mut self, title: String, text: String) {
        self.title = title;
        self.text = text;
        self.created_at = Utc::now();
    }
}
