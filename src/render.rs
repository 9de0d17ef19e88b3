//! Note list rendering.
//!
//! Rendering is a pure mapping from the collection to a [`ViewModel`]. Every
//! call builds the whole view again; nothing is cached between calls and the
//! collection is only borrowed for the duration of the call.

use std::collections::HashSet;
use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::entity::Note;

pub const DEFAULT_UNTITLED_LABEL: &str = "Untitled";
pub const EMPTY_HINT: &str = "No notes yet.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renderable list, either the empty indicator or one card per note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewModel {
    Empty,
    Notes { cards: Vec<NoteCard> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCard {
    pub id: String,
    pub heading: String,
    pub timestamp: String,
    pub body: String,
    pub editing: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Heading used for notes whose title is blank
    pub untitled_label: &'a str,
    /// Ids of notes with an open inline edit
    pub editing: Option<&'a HashSet<String>>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            untitled_label: DEFAULT_UNTITLED_LABEL,
            editing: None,
        }
    }
}

/// Render with default options in the local time zone.
pub fn render(notes: &[Note]) -> ViewModel {
    render_with(notes, &RenderOptions::default())
}

/// Render in the local time zone.
pub fn render_with(notes: &[Note], options: &RenderOptions<'_>) -> ViewModel {
    render_in(notes, options, &Local)
}

/// Render with timestamps shown in `tz`.
pub fn render_in<Tz>(notes: &[Note], options: &RenderOptions<'_>, tz: &Tz) -> ViewModel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if notes.is_empty() {
        return ViewModel::Empty;
    }

    let cards = notes
        .iter()
        .map(|note| NoteCard {
            id: note.id.clone(),
            heading: heading(note, options.untitled_label),
            timestamp: note
                .created_at
                .with_timezone(tz)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            body: note.text.clone(),
            editing: options.editing.is_some_and(|ids| ids.contains(&note.id)),
        })
        .collect();

    ViewModel::Notes { cards }
}

fn heading(note: &Note, untitled_label: &str) -> String {
    match note.title.trim() {
        "" => untitled_label.to_string(),
        title => title.to_string(),
    }
}

impl ViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewModel::Empty)
    }

    pub fn cards(&self) -> &[NoteCard] {
        match self {
            ViewModel::Empty => &[],
            ViewModel::Notes { cards } => cards.as_slice(),
        }
    }

    /// Lay the view out for a terminal.
    pub fn to_text(&self) -> String {
        let cards = match self {
            ViewModel::Empty => return format!("{}\n", EMPTY_HINT),
            ViewModel::Notes { cards } => cards,
        };

        let mut out = String::new();
        for (i, card) in cards.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let marker = if card.editing { " [editing]" } else { "" };
            out.push_str(&format!(
                "{}  {}  ({}){}\n",
                card.id, card.heading, card.timestamp, marker
            ));
            for line in card.body.lines() {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
