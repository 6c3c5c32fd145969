//! Read-only services the analyzer consults while scanning a document

use crate::symbols::PublicSymbolTable;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Existence check for OBJ and DAT `FILE` targets
pub trait FileSystem: Send + Sync {
    fn file_exists(&self, directory: &str, filename: &str) -> bool;
}

/// Access to the public symbols of an imported object
pub trait NamespaceResolver: Send + Sync {
    fn resolve_namespace(&self, instance: &str, filename: &str) -> Option<Arc<PublicSymbolTable>>;
}

/// Lines switched off by preprocessor conditionals
pub trait LineFilter: Send + Sync {
    fn is_line_disabled(&self, line: usize) -> bool;
}

/// Reports every file as present
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFileSystem;

impl FileSystem for NoFileSystem {
    fn file_exists(&self, _directory: &str, _filename: &str) -> bool {
        true
    }
}

/// Checks the real disk
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn file_exists(&self, directory: &str, filename: &str) -> bool {
        Path::new(directory).join(filename).is_file()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoNamespaces;

impl NamespaceResolver for NoNamespaces {
    fn resolve_namespace(&self, _instance: &str, _filename: &str) -> Option<Arc<PublicSymbolTable>> {
        None
    }
}

/// In-memory tables keyed by filename (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct MapNamespaces {
    tables: HashMap<String, Arc<PublicSymbolTable>>,
}

impl MapNamespaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filename: &str, table: PublicSymbolTable) {
        self.insert_shared(filename, Arc::new(table));
    }

    pub fn insert_shared(&mut self, filename: &str, table: Arc<PublicSymbolTable>) {
        self.tables.insert(filename.to_ascii_lowercase(), table);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl NamespaceResolver for MapNamespaces {
    fn resolve_namespace(&self, _instance: &str, filename: &str) -> Option<Arc<PublicSymbolTable>> {
        self.tables.get(&filename.to_ascii_lowercase()).cloned()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllLinesEnabled;

impl LineFilter for AllLinesEnabled {
    fn is_line_disabled(&self, _line: usize) -> bool {
        false
    }
}

/// Disables an explicit set of lines
#[derive(Debug, Clone, Default)]
pub struct DisabledLines {
    lines: BTreeSet<usize>,
}

impl DisabledLines {
    pub fn new(lines: impl IntoIterator<Item = usize>) -> Self {
        Self {
            lines: lines.into_iter().collect(),
        }
    }
}

impl LineFilter for DisabledLines {
    fn is_line_disabled(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }
}

/// The three collaborators handed to `analyze`
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub file_system: &'a dyn FileSystem,
    pub namespaces: &'a dyn NamespaceResolver,
    pub line_filter: &'a dyn LineFilter,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        file_system: &'a dyn FileSystem,
        namespaces: &'a dyn NamespaceResolver,
        line_filter: &'a dyn LineFilter,
    ) -> Self {
        Self {
            file_system,
            namespaces,
            line_filter,
        }
    }
}

impl Default for Collaborators<'static> {
    fn default() -> Self {
        Self {
            file_system: &NoFileSystem,
            namespaces: &NoNamespaces,
            line_filter: &AllLinesEnabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_file_system_checks_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("child.spin2"), "CON X = 1").unwrap();
        let directory = dir.path().to_string_lossy().to_string();
        assert!(StdFileSystem.file_exists(&directory, "child.spin2"));
        assert!(!StdFileSystem.file_exists(&directory, "missing.spin2"));
    }

    #[test]
    fn test_map_namespaces_ignore_case() {
        let mut namespaces = MapNamespaces::new();
        namespaces.insert("Child.spin2", PublicSymbolTable::new());
        assert!(namespaces.resolve_namespace("c", "child.SPIN2").is_some());
        assert!(namespaces.resolve_namespace("c", "other.spin2").is_none());
    }

    #[test]
    fn test_disabled_lines() {
        let filter = DisabledLines::new([2, 5]);
        assert!(filter.is_line_disabled(5));
        assert!(!filter.is_line_disabled(3));
        assert!(!AllLinesEnabled.is_line_disabled(0));
    }
}
