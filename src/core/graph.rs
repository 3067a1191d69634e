use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::parsers::tree::Position;

/// One observed call, from a dependent file through an imported binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// File containing the call.
    pub dependent_file_path: PathBuf,
    /// Start of the call expression, 0-based.
    pub position: Position,
    /// Local name of the imported symbol being invoked.
    pub target_function: String,
    /// Enclosing function of the call; absent at module scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_function: Option<String>,
}

impl DependencyEdge {
    pub fn new(
        dependent_file_path: impl Into<PathBuf>,
        position: Position,
        target_function: impl Into<String>,
    ) -> Self {
        Self {
            dependent_file_path: dependent_file_path.into(),
            position,
            target_function: target_function.into(),
            caller_function: None,
        }
    }

    pub fn with_caller(mut self, caller_function: Option<String>) -> Self {
        self.caller_function = caller_function;
        self
    }
}

/// Reverse dependency index: depended-upon file -> edges that reference it.
///
/// Edges within a bucket keep insertion order. Buckets exist only for files
/// with at least one dependent; lookups on other files return an empty
/// slice. There is no removal: an index is built once and then read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyIndex {
    buckets: BTreeMap<PathBuf, Vec<DependencyEdge>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dependency(&mut self, target_file: impl Into<PathBuf>, edge: DependencyEdge) {
        self.buckets.entry(target_file.into()).or_default().push(edge);
    }

    pub fn extend<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (PathBuf, DependencyEdge)>,
    {
        for (target_file, edge) in edges {
            self.add_dependency(target_file, edge);
        }
    }

    pub fn get_dependencies(&self, target_file: &Path) -> &[DependencyEdge] {
        self.buckets
            .get(target_file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges of `target_file` whose imported symbol is `function`.
    pub fn dependencies_on_function(
        &self,
        target_file: &Path,
        function: &str,
    ) -> Vec<&DependencyEdge> {
        self.get_dependencies(target_file)
            .iter()
            .filter(|edge| edge.target_function == function)
            .collect()
    }

    /// Distinct dependent files of `target_file`, in first-seen order.
    pub fn dependent_files(&self, target_file: &Path) -> Vec<&Path> {
        let mut seen = HashSet::new();
        self.get_dependencies(target_file)
            .iter()
            .map(|edge| edge.dependent_file_path.as_path())
            .filter(|path| seen.insert(*path))
            .collect()
    }

    /// Depended-upon files, sorted by path.
    pub fn targets(&self) -> impl Iterator<Item = &Path> {
        self.buckets.keys().map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[DependencyEdge])> {
        self.buckets
            .iter()
            .map(|(target, edges)| (target.as_path(), edges.as_slice()))
    }

    pub fn target_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn edge_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
