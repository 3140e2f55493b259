//! The flat `key = value` string table shipped next to the game data.
//! Page text frequently stores a label key instead of prose; emission looks
//! every text run up and falls back to the run itself.

use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Localization {
    entries: HashMap<String, String>,
}

impl Localization {
    /// Loads a string table. A missing or unreadable file yields an empty
    /// table rather than an error; the archive is still useful unlocalized.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) => {
                warn!("no localization table at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            // section braces and blanks carry no strings
            if line.is_empty() || line.starts_with('{') || line.starts_with('}') {
                continue;
            }
            if let Some((key, value)) = line.split_once(" = ") {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Localizes `key`, falling back to the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }
}
