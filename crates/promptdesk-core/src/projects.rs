//! Directory-backed project store.
//!
//! Every project is a directory directly under the projects root. Notes are
//! `.md`/`.txt` files inside it; chat files (`chat_<id>.json`) live alongside
//! them and are owned by [`crate::ChatHistoryStore`].

use crate::history::{chat_id_from_filename, is_chat_filename};
use crate::validate::{is_note_filename, validate_note_filename, validate_project_id};
use crate::{PromptDeskError, Result};
use promptdesk_types::Note;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the projects root and the default project if they are missing.
    pub fn ensure_layout(&self, default_project: &str) -> Result<()> {
        validate_project_id(default_project)?;
        let default_dir = self.root.join(default_project);
        std::fs::create_dir_all(&default_dir).map_err(|e| {
            PromptDeskError::storage(
                format!("Failed to create default project {:?}", default_dir),
                e,
            )
        })?;
        Ok(())
    }

    /// List project names, sorted case-insensitively.
    pub fn list_projects(&self) -> Vec<String> {
        let mut projects = Vec::new();

        debug!(target: "promptdesk::projects", "Scanning projects in {:?}", self.root);

        match std::fs::read_dir(&self.root) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }
                    // Skip hidden directories
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        if !name.starts_with('.') {
                            projects.push(name.to_string());
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    target: "promptdesk::projects",
                    "Failed to read projects directory {:?}: {}", self.root, e
                );
            }
        }

        projects.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        projects
    }

    pub fn create(&self, project_id: &str) -> Result<()> {
        validate_project_id(project_id)?;
        let path = self.root.join(project_id);

        if path.exists() {
            return Err(PromptDeskError::ProjectAlreadyExists(project_id.to_string()));
        }

        std::fs::create_dir(&path).map_err(|e| {
            PromptDeskError::storage(format!("Failed to create project '{}'", project_id), e)
        })?;

        info!(target: "promptdesk::projects", "Created project directory: {:?}", path);
        Ok(())
    }

    /// Recursively remove a project and everything in it.
    pub fn delete(&self, project_id: &str) -> Result<()> {
        let path = self.project_dir(project_id)?;

        std::fs::remove_dir_all(&path).map_err(|e| {
            PromptDeskError::storage(format!("Failed to delete project '{}'", project_id), e)
        })?;

        info!(target: "promptdesk::projects", "Deleted project directory: {:?}", path);
        Ok(())
    }

    /// Resolve a project directory, failing if it does not exist.
    pub fn project_dir(&self, project_id: &str) -> Result<PathBuf> {
        validate_project_id(project_id)?;
        let path = self.root.join(project_id);
        if !path.is_dir() {
            return Err(PromptDeskError::ProjectNotFound(project_id.to_string()));
        }
        Ok(path)
    }

    pub fn exists(&self, project_id: &str) -> bool {
        self.project_dir(project_id).is_ok()
    }

    pub fn list_notes(&self, project_id: &str) -> Result<Vec<String>> {
        let dir = self.project_dir(project_id)?;
        self.list_files(&dir, is_note_filename)
    }

    /// Names of the chat files stored in a project.
    pub fn list_chat_files(&self, project_id: &str) -> Result<Vec<String>> {
        let dir = self.project_dir(project_id)?;
        self.list_files(&dir, |name| {
            is_chat_filename(name) && chat_id_from_filename(name).is_some()
        })
    }

    pub fn read_note(&self, project_id: &str, filename: &str) -> Result<Note> {
        let dir = self.project_dir(project_id)?;
        validate_note_filename(filename)?;
        let path = dir.join(filename);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PromptDeskError::NoteNotFound {
                    project: project_id.to_string(),
                    filename: filename.to_string(),
                });
            }
            Err(e) => {
                return Err(PromptDeskError::storage(
                    format!("Failed to read note '{}'", filename),
                    e,
                ));
            }
        };

        Ok(Note {
            filename: filename.to_string(),
            content,
        })
    }

    /// Overwrite (or create) a note. The project must already exist.
    pub fn write_note(&self, project_id: &str, filename: &str, content: &str) -> Result<()> {
        let dir = self.project_dir(project_id)?;
        validate_note_filename(filename)?;
        let path = dir.join(filename);

        std::fs::write(&path, content).map_err(|e| {
            PromptDeskError::storage(format!("Failed to write note '{}'", filename), e)
        })?;

        debug!(
            target: "promptdesk::projects",
            "Saved note {:?} ({} bytes)", path, content.len()
        );
        Ok(())
    }

    fn list_files(&self, dir: &Path, keep: impl Fn(&str) -> bool) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| PromptDeskError::storage(format!("Failed to read {:?}", dir), e))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| keep(name))
            .collect();

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::TempDir;

    fn store() -> (ProjectStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = ProjectStore::new(temp.path().join("projects"));
        store.ensure_layout("default").unwrap();
        (store, temp)
    }

    #[test]
    fn test_ensure_layout_creates_default() {
        let (store, _temp) = store();
        assert_eq!(store.list_projects(), vec!["default"]);
        // Idempotent
        store.ensure_layout("default").unwrap();
    }

    #[test]
    fn test_list_projects_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = ProjectStore::new(temp.path().join("nope"));
        assert!(store.list_projects().is_empty());
    }

    #[test]
    fn test_list_projects_skips_files_and_hidden() {
        let (store, _temp) = store();
        std::fs::create_dir(store.root().join(".git")).unwrap();
        std::fs::write(store.root().join("chat_x.json"), "[]").unwrap();
        store.create("Beta").unwrap();
        store.create("alpha").unwrap();

        assert_eq!(store.list_projects(), vec!["alpha", "Beta", "default"]);
    }

    #[test]
    fn test_create_twice_fails() {
        let (store, _temp) = store();
        store.create("research").unwrap();
        assert!(store.list_projects().contains(&"research".to_string()));

        let err = store.create("research").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_create_rejects_traversal() {
        let (store, temp) = store();
        let err = store.create("../escape").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn test_delete_removes_contents() {
        let (store, _temp) = store();
        store.create("scratch").unwrap();
        store.write_note("scratch", "a.md", "hello").unwrap();

        store.delete("scratch").unwrap();

        assert!(!store.list_projects().contains(&"scratch".to_string()));
        assert_eq!(
            store.read_note("scratch", "a.md").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(store.list_notes("scratch").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_missing_project() {
        let (store, _temp) = store();
        let err = store.delete("ghost").unwrap_err();
        assert!(matches!(err, PromptDeskError::ProjectNotFound(ref p) if p == "ghost"));
    }

    #[test]
    fn test_note_round_trip_utf8() {
        let (store, _temp) = store();
        let content = "# Notizen\n\n- Grüße 👋\n- 日本語\n";
        store.write_note("default", "f.md", content).unwrap();

        let note = store.read_note("default", "f.md").unwrap();
        assert_eq!(note.filename, "f.md");
        assert_eq!(note.content, content);
    }

    #[test]
    fn test_write_note_overwrites() {
        let (store, _temp) = store();
        store.write_note("default", "f.txt", "first version").unwrap();
        store.write_note("default", "f.txt", "2nd").unwrap();
        assert_eq!(store.read_note("default", "f.txt").unwrap().content, "2nd");
    }

    #[test]
    fn test_write_note_requires_project() {
        let (store, temp) = store();
        let err = store.write_note("ghost", "f.md", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!temp.path().join("projects/ghost").exists());
    }

    #[test]
    fn test_read_missing_note() {
        let (store, _temp) = store();
        let err = store.read_note("default", "absent.md").unwrap_err();
        assert!(matches!(err, PromptDeskError::NoteNotFound { .. }));
    }

    #[test]
    fn test_list_notes_filters_extensions() {
        let (store, _temp) = store();
        store.write_note("default", "b.md", "").unwrap();
        store.write_note("default", "a.txt", "").unwrap();
        std::fs::write(store.root().join("default/chat_c1.json"), "[]").unwrap();
        std::fs::write(store.root().join("default/image.png"), "").unwrap();

        assert_eq!(store.list_notes("default").unwrap(), vec!["a.txt", "b.md"]);
        assert_eq!(store.list_chat_files("default").unwrap(), vec!["chat_c1.json"]);
    }

    #[test]
    fn test_list_notes_unknown_project() {
        let (store, _temp) = store();
        assert_eq!(store.list_notes("unknown").unwrap_err().kind(), ErrorKind::NotFound);
    }
}
