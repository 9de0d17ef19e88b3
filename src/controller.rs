//! Validated mutations over the note collection.
//!
//! Every change to a [`NoteStore`] goes through [`NoteController`]. Each
//! successful mutation persists the full collection before returning; the
//! caller redraws from [`NoteController::view`] afterwards.

use std::collections::HashSet;

use tracing::debug;

use crate::entity::Note;
use crate::render::{self, RenderOptions, ViewModel, DEFAULT_UNTITLED_LABEL};
use crate::storage::{KeyValueStore, NoteStore};

pub const DELETE_PROMPT: &str = "Delete this note?";
pub const CLEAR_ALL_PROMPT: &str = "Clear all notes? This cannot be undone.";

/// Asks the user to approve a destructive operation.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// New note was prepended; carries its id
    Created(String),
    /// Text was empty after trimming; the input should be refocused
    EmptyText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOpen {
    Opened(EditDraft),
    NotFound,
    AlreadyEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Saved,
    /// Rejected; the edit session stays open
    EmptyText,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Number of notes removed
    Cleared(usize),
    AlreadyEmpty,
    Declined,
}

impl CreateOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        *self == EditOutcome::Saved
    }
}

impl DeleteOutcome {
    pub fn changed(&self) -> bool {
        *self == DeleteOutcome::Deleted
    }
}

impl ClearOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ClearOutcome::Cleared(_))
    }
}

pub struct NoteController<S> {
    store: NoteStore<S>,
    editing: HashSet<String>,
    untitled_label: String,
    last_save_ok: bool,
}

impl<S: KeyValueStore> NoteController<S> {
    pub fn new(store: NoteStore<S>) -> Self {
        Self {
            store,
            editing: HashSet::new(),
            untitled_label: DEFAULT_UNTITLED_LABEL.to_string(),
            last_save_ok: true,
        }
    }

    pub fn with_untitled_label(mut self, label: impl Into<String>) -> Self {
        self.untitled_label = label.into();
        self
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    /// Whether the most recent mutation reached the medium. True until a
    /// mutation has been attempted; the in-memory collection is never rolled
    /// back either way.
    pub fn last_save_ok(&self) -> bool {
        self.last_save_ok
    }

    fn persist(&mut self) {
        self.last_save_ok = self.store.save();
    }

    /// Fresh render of the current collection.
    pub fn view(&self) -> ViewModel {
        render::render_with(
            self.store.notes(),
            &RenderOptions {
                untitled_label: &self.untitled_label,
                editing: Some(&self.editing),
            },
        )
    }

    pub fn create(&mut self, title: &str, text: &str) -> CreateOutcome {
        let text = text.trim();
        if text.is_empty() {
            return CreateOutcome::EmptyText;
        }

        let id = self.store.generate_id();
        let note = Note::new(id.clone(), title.trim().to_string(), text.to_string());
        self.store.prepend(note);
        debug!(%id, "created note");

        self.persist();
        CreateOutcome::Created(id)
    }

    /// Open an inline edit session. At most one session per note.
    pub fn open_edit(&mut self, id: &str) -> EditOpen {
        let Some(note) = self.store.get(id) else {
            return EditOpen::NotFound;
        };
        if self.editing.contains(id) {
            return EditOpen::AlreadyEditing;
        }

        let draft = EditDraft {
            title: note.title.clone(),
            text: note.text.clone(),
        };
        self.editing.insert(id.to_string());
        EditOpen::Opened(draft)
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing.contains(id)
    }

    /// Close an edit session without touching the note.
    pub fn cancel_edit(&mut self, id: &str) -> bool {
        self.editing.remove(id)
    }

    /// Apply an edit in place, keeping id and position.
    ///
    /// Empty text is rejected and leaves (or puts) the note in an open edit
    /// session so the user can correct it.
    pub fn edit(&mut self, id: &str, title: &str, text: &str) -> EditOutcome {
        if !self.store.contains(id) {
            self.editing.remove(id);
            return EditOutcome::NotFound;
        }

        let text = text.trim();
        if text.is_empty() {
            self.editing.insert(id.to_string());
            return EditOutcome::EmptyText;
        }

        if let Some(note) = self.store.get_mut(id) {
            note.revise(title.trim().to_string(), text.to_string());
        }
        self.editing.remove(id);
        debug!(%id, "edited note");

        self.persist();
        EditOutcome::Saved
    }

    pub fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> DeleteOutcome {
        if !self.store.contains(id) {
            return DeleteOutcome::NotFound;
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Declined;
        }

        self.store.remove(id);
        self.editing.remove(id);
        debug!(%id, "deleted note");

        self.persist();
        DeleteOutcome::Deleted
    }

    /// Remove every note. Does not prompt when there is nothing to clear.
    pub fn clear_all(&mut self, confirm: &mut impl Confirm) -> ClearOutcome {
        if self.store.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return ClearOutcome::Declined;
        }

        let count = self.store.len();
        self.store.clear();
        self.editing.clear();
        debug!(count, "cleared notes");

        self.persist();
        ClearOutcome::Cleared(count)
    }
}
