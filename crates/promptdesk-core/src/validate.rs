//! Identifier validation.
//!
//! Project ids, chat ids and note filenames arrive from HTTP paths and bodies
//! and end up as path segments. Every one of them goes through these checks
//! before a path is built.

use crate::{PromptDeskError, Result};

const MAX_IDENTIFIER_LEN: usize = 255;

/// Extensions recognised as notes.
pub const NOTE_EXTENSIONS: &[&str] = &[".md", ".txt"];

const RESERVED_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Check that `value` is safe to use as a single path segment.
pub fn validate_identifier(field: &'static str, value: &str) -> Result<()> {
    let invalid = |reason: &str| PromptDeskError::InvalidIdentifier {
        field,
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(invalid("is too long"));
    }
    if value.trim() != value {
        return Err(invalid("cannot start or end with whitespace"));
    }
    if value.contains(RESERVED_CHARS) {
        return Err(invalid("cannot contain path separators or reserved characters"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid("cannot contain control characters"));
    }
    if value.contains("..") {
        return Err(invalid("cannot contain '..'"));
    }
    if value.starts_with('.') {
        return Err(invalid("cannot start with '.'"));
    }

    Ok(())
}

pub fn validate_project_id(project_id: &str) -> Result<()> {
    validate_identifier("project id", project_id)
}

pub fn validate_chat_id(chat_id: &str) -> Result<()> {
    validate_identifier("chat id", chat_id)
}

/// Note filenames are identifiers that also carry a note extension.
pub fn validate_note_filename(filename: &str) -> Result<()> {
    validate_identifier("note filename", filename)?;
    if !is_note_filename(filename) {
        return Err(PromptDeskError::InvalidIdentifier {
            field: "note filename",
            reason: format!("must end with one of {}", NOTE_EXTENSIONS.join(", ")),
        });
    }
    Ok(())
}

pub fn is_note_filename(filename: &str) -> bool {
    NOTE_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
}
