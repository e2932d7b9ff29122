//! Note types.

use serde::{Deserialize, Serialize};

/// A text note stored inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub filename: String,
    pub content: String,
}

/// JSON body accepted when saving a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteContent {
    pub content: String,
}
