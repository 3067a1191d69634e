use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::AnalyzerConfig;
use crate::parsers::SourceLanguage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub language: SourceLanguage,
}

/// Enumerates analyzable source files under one or more roots.
///
/// Walks are sorted by file name, so the same file set always comes back in
/// the same order; the dependency index relies on that for stable buckets.
pub struct FileScanner {
    include_extensions: HashSet<String>,
    exclude_dirs: HashSet<String>,
    follow_links: bool,
}

impl FileScanner {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            include_extensions: config.include_extensions.iter().cloned().collect(),
            exclude_dirs: config.exclude_dirs.iter().cloned().collect(),
            follow_links: config.follow_links,
        }
    }

    /// Scan every root in turn. A file reachable from several roots is
    /// reported once, at its first position.
    pub fn scan_roots(&self, roots: &[PathBuf]) -> Result<Vec<FileInfo>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for root in roots {
            for file in self.scan_directory(root)? {
                if seen.insert(file.path.clone()) {
                    files.push(file);
                }
            }
        }
        Ok(files)
    }

    /// Files under `root` with an included extension, as absolute paths.
    /// A missing root yields no files.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<FileInfo>> {
        let root = match root_path.canonicalize() {
            Ok(root) => root,
            Err(err) => {
                warn!(root = %root_path.display(), error = %err, "skipping unreadable root");
                return Ok(Vec::new());
            }
        };

        let entries: Vec<DirEntry> = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.path().is_file())
            .collect();

        // Order-preserving parallel filter.
        let files: Vec<FileInfo> = entries
            .par_iter()
            .filter_map(|entry| self.classify(entry.path()))
            .collect();

        debug!(root = %root.display(), files = files.len(), "scanned root");
        Ok(files)
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.contains(name))
                .unwrap_or(false)
    }

    fn classify(&self, path: &Path) -> Option<FileInfo> {
        let extension = path.extension()?.to_str()?;
        if !self.include_extensions.contains(extension) {
            return None;
        }
        let Some(language) = SourceLanguage::from_extension(extension) else {
            debug!(path = %path.display(), "no grammar for included extension");
            return None;
        };
        Some(FileInfo {
            path: path.to_path_buf(),
            language,
        })
    }
}
