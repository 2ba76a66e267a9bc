use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The first usage site found for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
    pub component_name: String,
    pub source_file: PathBuf,
}

/// Component name → first usage site, in discovery order
///
/// Insertion is first-seen-wins: recording a name that is already present is
/// a no-op, so the source file never changes once set.
#[derive(Debug, Clone, Default)]
pub struct UsageMap {
    records: Vec<UsageRecord>,
    positions: HashMap<String, usize>,
}

impl UsageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a usage. Returns `true` if the name was new.
    pub fn record(&mut self, component_name: &str, source_file: &Path) -> bool {
        if self.positions.contains_key(component_name) {
            return false;
        }

        self.positions
            .insert(component_name.to_string(), self.records.len());
        self.records.push(UsageRecord {
            component_name: component_name.to_string(),
            source_file: source_file.to_path_buf(),
        });
        true
    }

    pub fn get(&self, component_name: &str) -> Option<&UsageRecord> {
        self.positions
            .get(component_name)
            .map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, component_name: &str) -> bool {
        self.positions.contains_key(component_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UsageRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.component_name.as_str())
    }

    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a UsageMap {
    type Item = &'a UsageRecord;
    type IntoIter = std::slice::Iter<'a, UsageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
