use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One discovered audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Canonical path; unique within a catalog.
    pub id: PathBuf,
    /// File name without its extension.
    pub display_name: String,
    /// Absolute path the file was found under.
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercase, with the leading dot.
    pub extension: String,
}

impl CatalogEntry {
    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }

    /// Secondary line for list rows, e.g. `MP3 • 3.50 MB`.
    pub fn details(&self) -> String {
        format!(
            "{} • {:.2} MB",
            self.extension.to_uppercase(),
            self.size_megabytes()
        )
    }
}

/// Ordered, id-unique set of entries produced by one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog keeping the first entry seen for each id.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &Path) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> HashSet<PathBuf> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
