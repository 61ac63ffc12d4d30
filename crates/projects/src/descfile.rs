//! `desc.txt` parsing.
//!
//! A description file is a sequence of `key: value` entries. Keys are
//! trimmed and lowercased; the value starts after the first colon with
//! leading whitespace dropped. Lines without a `key:` prefix continue the
//! most recent entry; lines before the first entry are ignored. The entry
//! named `main` describes the project itself, every other key names a
//! media file (with or without extension).

use std::{collections::HashMap, fs, path::Path};

/// File name looked up under a project's storage location.
pub const DESC_FILENAME: &str = "desc.txt";

/// Parsed contents of a `desc.txt` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionFile {
    /// Value of the `main` entry when present. May be empty.
    pub main: Option<String>,
    /// All entries keyed by trimmed, lowercased name (including `main`).
    pub entries: HashMap<String, String>,
}

/// Parse description text.
///
/// A line matches as an entry when it contains a colon with at least one
/// character before it; a whitespace-only key part yields the empty key.
/// Repeating a key discards the previously accumulated value.
#[must_use]
pub fn parse_desc_file(text: &str) -> DescriptionFile {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = text.replace("\r\n", "\n");

    let mut entries: HashMap<String, String> = HashMap::new();
    let mut current: Option<String> = None;
    for raw in normalized.split('\n') {
        let line = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        if let Some((key, value)) = split_entry_line(line) {
            entries.insert(key.clone(), value.to_string());
            current = Some(key);
        } else if let Some(ref key) = current
            && let Some(entry) = entries.get_mut(key)
        {
            if !entry.is_empty() {
                entry.push('\n');
            }
            entry.push_str(raw);
        }
    }

    let main = entries.get("main").cloned();
    DescriptionFile { main, entries }
}

/// Read and parse `<dir>/desc.txt`. `None` when the file cannot be read.
#[must_use]
pub fn load(dir: &Path) -> Option<DescriptionFile> {
    let content = fs::read_to_string(dir.join(DESC_FILENAME)).ok()?;
    Some(parse_desc_file(&content))
}

/// Split an entry line into (key, value). A leading colon means there is
/// no key, so the line continues the previous entry instead. The value
/// keeps trailing whitespace.
fn split_entry_line(line: &str) -> Option<(String, &str)> {
    let (before, after) = line.split_once(':')?;
    if before.is_empty() {
        return None;
    }
    Some((before.trim().to_lowercase(), after.trim_start()))
}
