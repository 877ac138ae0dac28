use crate::error::{Result, ScanError};
use std::collections::HashMap;
use std::path::Path;

/// Shortest prefix [`PrefixTable::resolve`] falls back to
pub const MIN_PREFIX_LEN: usize = 2;

/// One `code;name[;extra]` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Lookup key
    pub code: String,
    /// Display name
    pub name: String,
    /// Optional third column (a country code for manufacturers, a
    /// description for products)
    pub extra: Option<String>,
}

/// Code-keyed table with longest-prefix resolution
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    entries: HashMap<String, TableEntry>,
}

impl PrefixTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse table text. `#` comments and blank lines are skipped; any other
    /// line needs a non-empty code and name or the whole table is rejected.
    pub fn parse(text: &str, source: &str) -> Result<Self> {
        let mut table = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split(';').map(str::trim);
            let code = fields.next().unwrap_or_default();
            let name = fields.next().unwrap_or_default();
            if code.is_empty() || name.is_empty() {
                return Err(ScanError::LookupFormat {
                    path: source.to_string(),
                    line: index + 1,
                });
            }
            let extra = fields.next().filter(|s| !s.is_empty()).map(str::to_string);
            table.insert(TableEntry {
                code: code.to_string(),
                name: name.to_string(),
                extra,
            });
        }
        Ok(table)
    }

    /// Read and parse a table file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Add or replace an entry
    pub fn insert(&mut self, entry: TableEntry) {
        self.entries.insert(entry.code.clone(), entry);
    }

    /// Exact match
    pub fn get(&self, code: &str) -> Option<&TableEntry> {
        self.entries.get(code)
    }

    /// Exact match, then ever shorter prefixes down to two characters
    pub fn resolve(&self, code: &str) -> Option<&TableEntry> {
        if let Some(entry) = self.get(code) {
            return Some(entry);
        }
        let chars: Vec<(usize, char)> = code.char_indices().collect();
        (MIN_PREFIX_LEN..chars.len())
            .rev()
            .find_map(|len| self.get(&code[..chars[len].0]))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
