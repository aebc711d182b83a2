//! The text entry store: wraps incoming text, stamps it, and persists the
//! whole collection as JSON. Persistence is best-effort; a missing or
//! unreadable file is the normal empty state, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum characters per wrapped line.
pub const MAX_LINE_LEN: usize = 12;

/// One received message, line-wrapped and timestamped. Never mutated after
/// creation; removed only by a full reset. Evicting a sprite from the scene
/// does not touch the stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub text: String,
    pub time: String,
}

/// Greedy fixed-width wrap: non-overlapping chunks of at most
/// `max_line_len` characters, joined with newlines. No word-break
/// awareness — chunk boundaries fall at exact character offsets.
pub fn insert_line_breaks(text: &str, max_line_len: usize) -> String {
    if max_line_len == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_line_len)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ordered, persisted collection of received entries.
#[derive(Debug)]
pub struct TextStore {
    entries: Vec<TextEntry>,
    path: PathBuf,
}

impl TextStore {
    /// Open the store, restoring any persisted entries. Restored entries
    /// are not replayed into the scene — the caller only sees them via
    /// [`TextStore::entries`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { entries, path }
    }

    /// Wrap `raw`, stamp the current local time, append, and persist the
    /// full collection (overwrite semantics).
    pub fn append(&mut self, raw: &str) -> &TextEntry {
        let entry = TextEntry {
            text: insert_line_breaks(raw, MAX_LINE_LEN),
            time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        self.entries.push(entry);
        self.save();
        // just pushed, so the slot exists
        &self.entries[self.entries.len() - 1]
    }

    /// Clear the in-memory sequence and remove the persisted copy.
    pub fn reset(&mut self) {
        self.entries.clear();
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove {}: {e}", self.path.display());
            }
        }
    }

    /// Plain-text export: per entry a time line, a content line, and a
    /// separator line.
    pub fn export_plain(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!("Time: {}\n", entry.time));
            out.push_str(&format!("Text: {}\n", entry.text));
            out.push_str("------------------------\n");
        }
        out
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    log::warn!("failed to persist {}: {e}", self.path.display());
                }
            }
            Err(e) => log::warn!("failed to serialize entries: {e}"),
        }
    }
}

fn load_entries(path: &Path) -> Vec<TextEntry> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        // absence is the normal empty state
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&data) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("corrupt store at {}, starting empty: {e}", path.display());
            Vec::new()
        }
    }
}
