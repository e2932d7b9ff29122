//! Chat history store.
//!
//! Holds every chat in memory, keyed by chat id, and mirrors each chat to
//! `<projects_root>/<project>/chat_<chat_id>.json`. Every append rewrites the
//! whole file; [`ChatHistoryStore::flush_all`] writes everything once more at
//! shutdown.
//!
//! Older deployments wrote chat files outside any project directory. When a
//! legacy directory is configured, those files are adopted into the default
//! project on load and the legacy copy is removed.

use crate::validate::{validate_chat_id, validate_project_id};
use crate::{PromptDeskError, Result};
use dashmap::DashMap;
use promptdesk_types::Turn;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CHAT_FILE_PREFIX: &str = "chat_";
const CHAT_FILE_SUFFIX: &str = ".json";

pub(crate) fn chat_filename(chat_id: &str) -> String {
    format!("{CHAT_FILE_PREFIX}{chat_id}{CHAT_FILE_SUFFIX}")
}

pub(crate) fn is_chat_filename(name: &str) -> bool {
    name.starts_with(CHAT_FILE_PREFIX) && name.ends_with(CHAT_FILE_SUFFIX)
}

/// Extract a valid chat id from a `chat_<id>.json` filename.
pub(crate) fn chat_id_from_filename(name: &str) -> Option<&str> {
    let chat_id = name
        .strip_prefix(CHAT_FILE_PREFIX)?
        .strip_suffix(CHAT_FILE_SUFFIX)?;
    validate_chat_id(chat_id).ok()?;
    Some(chat_id)
}

#[derive(Debug, Clone)]
struct ChatRecord {
    project_id: String,
    turns: Vec<Turn>,
}

/// Counters reported after loading chats from disk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadStats {
    pub chats_loaded: usize,
    pub legacy_migrated: usize,
    pub files_skipped: usize,
}

/// Counters reported by [`ChatHistoryStore::flush_all`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlushStats {
    pub written: usize,
    pub failed: usize,
}

pub struct ChatHistoryStore {
    root: PathBuf,
    default_project: String,
    legacy_dir: Option<PathBuf>,
    chats: DashMap<String, ChatRecord>,
}

impl ChatHistoryStore {
    /// Create an empty store. Call [`Self::load`] to read existing chats.
    pub fn new(root: impl Into<PathBuf>, default_project: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_project: default_project.into(),
            legacy_dir: None,
            chats: DashMap::new(),
        }
    }

    /// Also read `chat_<id>.json` files found directly in `dir` on load.
    pub fn with_legacy_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.legacy_dir = Some(dir.into());
        self
    }

    /// Construct a store and load every persisted chat.
    pub fn open(
        root: impl Into<PathBuf>,
        default_project: impl Into<String>,
        legacy_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let mut store = Self::new(root, default_project);
        store.legacy_dir = legacy_dir;
        let stats = store.load()?;
        info!(
            target: "promptdesk::history",
            "Loaded {} chats ({} migrated from legacy files, {} skipped)",
            stats.chats_loaded,
            stats.legacy_migrated,
            stats.files_skipped
        );
        Ok(store)
    }

    /// Scan project directories (and the legacy directory) for chat files.
    pub fn load(&self) -> Result<LoadStats> {
        let mut stats = LoadStats::default();

        for (project_id, dir) in self.project_dirs()? {
            for (chat_id, path) in chat_files_in(&dir) {
                if let Some(existing) = self.chats.get(&chat_id) {
                    warn!(
                        target: "promptdesk::history",
                        "Chat '{}' in project '{}' shadowed by project '{}', skipping {:?}",
                        chat_id, project_id, existing.project_id, path
                    );
                    stats.files_skipped += 1;
                    continue;
                }
                match read_chat_file(&path) {
                    Ok(turns) => {
                        self.chats.insert(
                            chat_id,
                            ChatRecord {
                                project_id: project_id.clone(),
                                turns,
                            },
                        );
                        stats.chats_loaded += 1;
                    }
                    Err(e) => {
                        warn!(target: "promptdesk::history", "Skipping {:?}: {}", path, e);
                        stats.files_skipped += 1;
                    }
                }
            }
        }

        if let Some(legacy_dir) = &self.legacy_dir {
            self.migrate_legacy(legacy_dir, &mut stats);
        }

        Ok(stats)
    }

    /// `(project_id, dir)` for every project directory under the root, sorted.
    fn project_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs: Vec<(String, PathBuf)> = std::fs::read_dir(&self.root)
            .map_err(|e| PromptDeskError::storage(format!("Failed to read {:?}", self.root), e))?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                validate_project_id(&name).ok()?;
                Some((name, path))
            })
            .collect();
        dirs.sort();
        Ok(dirs)
    }

    fn migrate_legacy(&self, legacy_dir: &Path, stats: &mut LoadStats) {
        for (chat_id, path) in chat_files_in(legacy_dir) {
            if self.chats.contains_key(&chat_id) {
                warn!(
                    target: "promptdesk::history",
                    "Legacy chat file {:?} shadowed by a project-scoped chat, ignoring", path
                );
                stats.files_skipped += 1;
                continue;
            }

            let turns = match read_chat_file(&path) {
                Ok(turns) => turns,
                Err(e) => {
                    warn!(target: "promptdesk::history", "Skipping legacy {:?}: {}", path, e);
                    stats.files_skipped += 1;
                    continue;
                }
            };

            match self.write_chat_file(&self.default_project, &chat_id, &turns) {
                Ok(()) => {
                    if let Err(e) = std::fs::remove_file(&path) {
                        warn!(
                            target: "promptdesk::history",
                            "Migrated {:?} but could not remove it: {}", path, e
                        );
                    }
                    info!(
                        target: "promptdesk::history",
                        "Migrated legacy chat '{}' into project '{}'", chat_id, self.default_project
                    );
                }
                Err(e) => {
                    warn!(
                        target: "promptdesk::history",
                        "Loaded legacy chat '{}' but could not migrate it: {}", chat_id, e
                    );
                }
            }

            self.chats.insert(
                chat_id,
                ChatRecord {
                    project_id: self.default_project.clone(),
                    turns,
                },
            );
            stats.chats_loaded += 1;
            stats.legacy_migrated += 1;
        }
    }

    /// Turns of a chat in append order; empty for unknown chats.
    pub fn get(&self, chat_id: &str) -> Vec<Turn> {
        self.chats
            .get(chat_id)
            .map(|record| record.turns.clone())
            .unwrap_or_default()
    }

    /// Append a turn and rewrite the chat's file in `project_id`.
    ///
    /// The project directory must exist. If the file cannot be written the
    /// turn is taken back out of memory, so a failed append leaves the chat
    /// as it was.
    pub fn append(&self, project_id: &str, chat_id: &str, turn: Turn) -> Result<()> {
        validate_project_id(project_id)?;
        validate_chat_id(chat_id)?;
        if !self.root.join(project_id).is_dir() {
            return Err(PromptDeskError::ProjectNotFound(project_id.to_string()));
        }

        let mut created = false;
        let (snapshot, previous_project) = {
            let mut record = self
                .chats
                .entry(chat_id.to_string())
                .or_insert_with(|| {
                    created = true;
                    ChatRecord {
                        project_id: project_id.to_string(),
                        turns: Vec::new(),
                    }
                });
            let previous = (record.project_id != project_id)
                .then(|| std::mem::replace(&mut record.project_id, project_id.to_string()));
            record.turns.push(turn);
            (record.turns.clone(), previous)
        };

        if let Err(e) = self.write_chat_file(project_id, chat_id, &snapshot) {
            self.undo_append(chat_id, snapshot.len(), previous_project, created);
            return Err(e);
        }

        if let Some(previous) = previous_project {
            debug!(
                target: "promptdesk::history",
                "Chat '{}' moved from project '{}' to '{}'", chat_id, previous, project_id
            );
            remove_if_present(&self.root.join(&previous).join(chat_filename(chat_id)));
        }

        debug!(
            target: "promptdesk::history",
            "Saved chat '{}' in project '{}' ({} turns)", chat_id, project_id, snapshot.len()
        );
        Ok(())
    }

    /// Take back the turn pushed by a failed append.
    ///
    /// Skipped when another append has landed on the chat since, as the last
    /// turn is then no longer ours.
    fn undo_append(
        &self,
        chat_id: &str,
        len_after: usize,
        previous_project: Option<String>,
        created: bool,
    ) {
        if let Some(mut record) = self.chats.get_mut(chat_id) {
            if record.turns.len() != len_after {
                warn!(
                    target: "promptdesk::history",
                    "Chat '{}' changed while saving, keeping in-memory turns", chat_id
                );
                return;
            }
            record.turns.pop();
            if let Some(previous) = previous_project {
                record.project_id = previous;
            }
        }
        if created {
            self.chats
                .remove_if(chat_id, |_, record| record.turns.is_empty());
        }
    }

    /// Forget a chat and remove its files. Returns whether it was known.
    ///
    /// Every project directory is searched, so copies that were shadowed on
    /// load do not come back after a restart.
    pub fn clear(&self, chat_id: &str) -> Result<bool> {
        validate_chat_id(chat_id)?;
        let filename = chat_filename(chat_id);

        let removed = self.chats.remove(chat_id);
        if let Some((_, record)) = &removed {
            remove_if_present(&self.root.join(&record.project_id).join(&filename));
        }
        let project_dirs = self.project_dirs().unwrap_or_else(|e| {
            warn!(target: "promptdesk::history", "Could not scan for chat '{}': {}", chat_id, e);
            Vec::new()
        });
        for (_, dir) in project_dirs {
            let path = dir.join(&filename);
            if path.is_file() {
                remove_if_present(&path);
            }
        }
        if let Some(legacy_dir) = &self.legacy_dir {
            remove_if_present(&legacy_dir.join(&filename));
        }

        Ok(removed.is_some())
    }

    /// All chats homed in a project, keyed by chat id.
    ///
    /// Answered from memory; files written into the project directory by
    /// anything else are not picked up until the next load.
    pub fn project_chats(&self, project_id: &str) -> BTreeMap<String, Vec<Turn>> {
        self.chats
            .iter()
            .filter(|entry| entry.project_id == project_id)
            .map(|entry| (entry.key().clone(), entry.turns.clone()))
            .collect()
    }

    /// Drop every chat homed in a project from memory.
    pub fn evict_project(&self, project_id: &str) -> usize {
        let mut evicted = 0;
        self.chats.retain(|_, record| {
            let keep = record.project_id != project_id;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Write every in-memory chat to its project file.
    pub fn flush_all(&self) -> FlushStats {
        let snapshot: Vec<(String, ChatRecord)> = self
            .chats
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut stats = FlushStats::default();
        for (chat_id, record) in snapshot {
            match self.write_chat_file(&record.project_id, &chat_id, &record.turns) {
                Ok(()) => stats.written += 1,
                Err(e) => {
                    warn!(target: "promptdesk::history", "Failed to flush chat '{}': {}", chat_id, e);
                    stats.failed += 1;
                }
            }
        }
        stats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    fn write_chat_file(&self, project_id: &str, chat_id: &str, turns: &[Turn]) -> Result<()> {
        let path = self.root.join(project_id).join(chat_filename(chat_id));
        let json = serde_json::to_string_pretty(turns)?;
        std::fs::write(&path, json).map_err(|e| {
            PromptDeskError::storage(format!("Failed to save chat '{}'", chat_id), e)
        })
    }
}

/// `(chat_id, path)` pairs for every chat file directly inside `dir`.
fn chat_files_in(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            let chat_id = chat_id_from_filename(name)?.to_string();
            Some((chat_id, path))
        })
        .collect();
    files.sort();
    files
}

fn read_chat_file(path: &Path) -> Result<Vec<Turn>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PromptDeskError::storage(format!("Failed to read {:?}", path), e))?;
    Ok(serde_json::from_str(&content)?)
}

fn remove_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(target: "promptdesk::history", "Removed {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(target: "promptdesk::history", "Failed to remove {:?}: {}", path, e),
    }
}
