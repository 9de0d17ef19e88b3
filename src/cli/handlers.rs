use std::io::{self, Read, Write};

use crate::config::Config;
use crate::controller::{
    ClearOutcome, Confirm, CreateOutcome, DeleteOutcome, EditOpen, EditOutcome, NoteController,
};
use crate::error::{QuicknotesError, Result};
use crate::storage::{FileKvStore, KeyValueStore, NoteStore};

const EMPTY_TEXT_MESSAGE: &str = "Note text cannot be empty.";

fn open_controller(config: &Config) -> NoteController<FileKvStore> {
    let store = NoteStore::open(FileKvStore::new(config.data_dir()), config.storage_key());
    NoteController::new(store).with_untitled_label(config.untitled_label())
}

/// Interactive `[y/N]` prompt on the controlling terminal.
///
/// Refuses (and remembers that it refused) when stdin is not a TTY.
struct TtyConfirm {
    subject: Option<String>,
    non_interactive: bool,
}

impl TtyConfirm {
    fn new(subject: Option<String>) -> Self {
        Self {
            subject,
            non_interactive: false,
        }
    }
}

impl Confirm for TtyConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        if !atty::is(atty::Stream::Stdin) {
            self.non_interactive = true;
            return false;
        }

        match &self.subject {
            Some(subject) => eprint!("{} ({}) [y/N] ", message, subject),
            None => eprint!("{} [y/N] ", message),
        }
        let _ = io::stderr().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        input.trim().eq_ignore_ascii_case("y")
    }
}

/// Turn a write the controller could not persist into a command failure.
fn ensure_saved(controller: &NoteController<FileKvStore>) -> Result<()> {
    if controller.last_save_ok() {
        return Ok(());
    }
    let store = controller.store();
    Err(QuicknotesError::Storage(format!(
        "notes were not saved to {}",
        store.backend().path_for(store.key()).display()
    )))
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

/// Resolve an exact id or an unambiguous id prefix.
fn resolve_id<S: KeyValueStore>(controller: &NoteController<S>, id: &str) -> Result<String> {
    if controller.store().contains(id) {
        return Ok(id.to_string());
    }

    let mut matches = controller
        .notes()
        .iter()
        .filter(|n| !id.is_empty() && n.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(note), None) => Ok(note.id.clone()),
        (Some(_), Some(_)) => Err(QuicknotesError::Validation(format!(
            "ID prefix '{}' matches more than one note",
            id
        ))),
        (None, _) => Err(QuicknotesError::NoteNotFound(id.to_string())),
    }
}

pub fn handle_add(
    config: &Config,
    title: String,
    text: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let text = if stdin {
        read_stdin()?
    } else {
        text.unwrap_or_default()
    };

    let mut controller = open_controller(config);
    let id = match controller.create(&title, &text) {
        CreateOutcome::Created(id) => {
            ensure_saved(&controller)?;
            id
        }
        CreateOutcome::EmptyText => {
            return Err(QuicknotesError::Validation(EMPTY_TEXT_MESSAGE.to_string()))
        }
    };

    if json {
        if let Some(note) = controller.store().get(&id) {
            println!("{}", serde_json::to_string_pretty(note)?);
        }
    } else {
        println!("Created note {}", id);
    }

    Ok(())
}

pub fn handle_list(config: &Config, json: bool) -> Result<()> {
    let controller = open_controller(config);
    let view = controller.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.to_text());
    }

    Ok(())
}

pub fn handle_edit(
    config: &Config,
    id: String,
    title: Option<String>,
    text: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let text = if stdin { Some(read_stdin()?) } else { text };
    if title.is_none() && text.is_none() {
        return Err(QuicknotesError::Validation(
            "Nothing to change: pass --title, --text or --stdin".to_string(),
        ));
    }

    let mut controller = open_controller(config);
    let id = resolve_id(&controller, &id)?;

    let draft = match controller.open_edit(&id) {
        EditOpen::Opened(draft) => draft,
        EditOpen::NotFound => return Err(QuicknotesError::NoteNotFound(id)),
        EditOpen::AlreadyEditing => {
            return Err(QuicknotesError::Validation(format!(
                "Note {} is already being edited",
                id
            )))
        }
    };

    let title = title.unwrap_or(draft.title);
    let text = text.unwrap_or(draft.text);

    match controller.edit(&id, &title, &text) {
        EditOutcome::Saved => ensure_saved(&controller)?,
        EditOutcome::EmptyText => {
            return Err(QuicknotesError::Validation(EMPTY_TEXT_MESSAGE.to_string()))
        }
        EditOutcome::NotFound => return Err(QuicknotesError::NoteNotFound(id)),
    }

    if json {
        if let Some(note) = controller.store().get(&id) {
            println!("{}", serde_json::to_string_pretty(note)?);
        }
    } else {
        println!("Updated note {}", id);
    }

    Ok(())
}

pub fn handle_delete(config: &Config, id: String, force: bool) -> Result<()> {
    let mut controller = open_controller(config);
    let id = resolve_id(&controller, &id)?;

    let outcome = if force {
        controller.delete(&id, &mut |_: &str| true)
    } else {
        let subject = controller.view().cards().iter().find(|c| c.id == id).map(|c| c.heading.clone());
        let mut confirm = TtyConfirm::new(subject);
        let outcome = controller.delete(&id, &mut confirm);
        if confirm.non_interactive {
            return Err(QuicknotesError::Validation(
                "Use --force to delete in non-interactive mode".to_string(),
            ));
        }
        outcome
    };

    match outcome {
        DeleteOutcome::Deleted => {
            ensure_saved(&controller)?;
            println!("Deleted note {}", id);
        }
        DeleteOutcome::Declined => println!("Cancelled."),
        DeleteOutcome::NotFound => return Err(QuicknotesError::NoteNotFound(id)),
    }

    Ok(())
}

pub fn handle_clear(config: &Config, force: bool) -> Result<()> {
    let mut controller = open_controller(config);

    let outcome = if force {
        controller.clear_all(&mut |_: &str| true)
    } else {
        let mut confirm = TtyConfirm::new(None);
        let outcome = controller.clear_all(&mut confirm);
        if confirm.non_interactive {
            return Err(QuicknotesError::Validation(
                "Use --force to clear in non-interactive mode".to_string(),
            ));
        }
        outcome
    };

    match outcome {
        ClearOutcome::Cleared(count) => {
            ensure_saved(&controller)?;
            println!("Deleted {} note(s)", count);
        }
        ClearOutcome::AlreadyEmpty => println!("No notes to clear."),
        ClearOutcome::Declined => println!("Cancelled."),
    }

    Ok(())
}
