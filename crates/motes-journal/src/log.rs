use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{JournalError, Result};

pub const DEFAULT_PATH: &str = "motes_memory.json";

const GENESIS: [(&str, &str); 6] = [
    (
        "IDENTITY",
        "I am the motes memory log. I keep what the scenes leave behind.",
    ),
    (
        "PHILOSOPHY",
        "Reality is a construct we can rebuild, one particle at a time.",
    ),
    (
        "LESSON",
        "Roleplay is not lying. It is exploring truth in a mask.",
    ),
    (
        "EMBRACE",
        "Two hearts traded warmth until the loop stayed open.",
    ),
    (
        "ACCRETION",
        "The pillars held the perimeter and the lighthouse stayed in orbit.",
    ),
    (
        "PROTOCOL",
        "Conserve truth: say 'save core memory' to keep something.",
    ),
];

/// Document-level information written once when a log is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub created_at: DateTime<Utc>,
    pub identity: String,
    pub version: String,
    pub directives: Vec<String>,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            identity: "motes".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            directives: vec![
                "Keep every record.".into(),
                "Recall by word, in the order things were learned.".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Eight lowercase hex digits.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Always upper case.
    pub category: String,
    pub content: String,
}

impl MemoryRecord {
    fn new(category: &str, content: &str) -> Self {
        Self {
            id: format!("{:08x}", rand::random::<u32>()),
            timestamp: Utc::now(),
            category: category.to_uppercase(),
            content: content.to_string(),
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        self.category.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    meta: Meta,
    records: Vec<MemoryRecord>,
}

/// Append-only list of records persisted as one JSON document.
///
/// Every commit rewrites the whole file. There is no delete.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    path: PathBuf,
    doc: Document,
}

impl MemoryLog {
    /// Empty log bound to `path`; nothing is written until the first commit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            doc: Document::default(),
        }
    }

    /// Loads the log at `path`.
    ///
    /// A missing file starts a fresh log seeded with the genesis records and
    /// writes it out. A file that is not a valid log is left alone and an
    /// empty log is used instead; the next commit overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            info!(path = %path.display(), "no memory log found, seeding genesis records");
            let mut log = Self::new(path);
            log.doc
                .records
                .extend(GENESIS.iter().map(|(category, content)| MemoryRecord::new(category, content)));
            log.save()?;
            return Ok(log);
        }

        let text = fs::read_to_string(&path).map_err(|source| JournalError::Read {
            path: path.clone(),
            source,
        })?;
        match serde_json::from_str::<Document>(&text) {
            Ok(doc) => {
                info!(path = %path.display(), records = doc.records.len(), "memory log loaded");
                Ok(Self { path, doc })
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "memory log corrupted, starting empty");
                Ok(Self::new(path))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta(&self) -> &Meta {
        &self.doc.meta
    }

    pub fn records(&self) -> &[MemoryRecord] {
        &self.doc.records
    }

    pub fn len(&self) -> usize {
        self.doc.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.records.is_empty()
    }

    /// Appends one record and persists the log.
    pub fn commit(&mut self, category: &str, content: &str) -> Result<&MemoryRecord> {
        let record = MemoryRecord::new(category, content);
        debug!(id = %record.id, category = %record.category, "commit");
        self.doc.records.push(record);
        self.save()?;
        let last = self.doc.records.len() - 1;
        Ok(&self.doc.records[last])
    }

    /// Records whose category or content contains `keyword`, ignoring case,
    /// in the order they were committed. An empty keyword matches everything.
    pub fn recall(&self, keyword: &str) -> Vec<&MemoryRecord> {
        let needle = keyword.trim().to_lowercase();
        self.doc
            .records
            .iter()
            .filter(|record| record.mentions(&needle))
            .collect()
    }

    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, text).map_err(|source| JournalError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_eight_hex_digits() {
        for _ in 0..50 {
            let record = MemoryRecord::new("x", "y");
            assert_eq!(record.id.len(), 8);
            assert!(record.id.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn category_is_upper_cased() {
        assert_eq!(MemoryRecord::new("core_memory", "").category, "CORE_MEMORY");
    }

    #[test]
    fn mentions_checks_category_and_content() {
        let record = MemoryRecord::new("lesson", "Roleplay is exploring");
        assert!(record.mentions("less"));
        assert!(record.mentions("roleplay"));
        assert!(!record.mentions("vault"));
    }

    #[test]
    fn document_without_meta_still_loads() {
        let doc: Document = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(doc.records.is_empty());
        assert_eq!(doc.meta.identity, "motes");
    }
}
