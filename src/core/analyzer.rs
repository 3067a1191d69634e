use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::graph::{DependencyEdge, DependencyIndex};
use super::resolver::PathResolver;
use super::scanner::{FileInfo, FileScanner};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::parsers::cache::SyntaxCache;
use crate::parsers::calls::match_call_sites;
use crate::parsers::common::read_source;
use crate::parsers::imports::ImportTable;
use crate::parsers::{FileSyntax, ParserFactory};

/// Builds the reverse dependency index for a workspace.
///
/// Each call to [`CodebaseAnalyzer::analyze`] starts from an empty index and
/// the current file-system state. The only state carried between calls is the
/// optional syntax cache, which is keyed by file content.
pub struct CodebaseAnalyzer {
    file_scanner: FileScanner,
    parser_factory: ParserFactory,
    path_resolver: PathResolver,
    syntax_cache: Option<SyntaxCache>,
}

impl CodebaseAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            file_scanner: FileScanner::new(&config),
            parser_factory: ParserFactory::new(),
            path_resolver: PathResolver::new(config.resolution),
            syntax_cache: SyntaxCache::from_mode(&config.cache),
        }
    }

    pub fn syntax_cache(&self) -> Option<&SyntaxCache> {
        self.syntax_cache.as_ref()
    }

    pub fn analyze(&self, roots: &[PathBuf]) -> Result<DependencyIndex> {
        let start = Instant::now();
        let files = self.file_scanner.scan_roots(roots)?;
        info!(files = files.len(), "scanned workspace");

        // Files are independent; collect preserves enumeration order so the
        // sequential merge below yields deterministic buckets.
        let per_file: Vec<Vec<(PathBuf, DependencyEdge)>> = files
            .par_iter()
            .map(|file| self.analyze_file(file))
            .collect();

        let mut index = DependencyIndex::new();
        for edges in per_file {
            index.extend(edges);
        }

        info!(
            targets = index.target_count(),
            edges = index.edge_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built dependency index"
        );
        Ok(index)
    }

    /// Edges contributed by one file, each paired with the file it depends
    /// on. Read and parse failures are logged and contribute nothing.
    pub fn analyze_file(&self, file: &FileInfo) -> Vec<(PathBuf, DependencyEdge)> {
        let syntax = match self.file_syntax(&file.path) {
            Ok(syntax) => syntax,
            Err(err) => {
                warn!(path = %file.path.display(), error = %err, "skipping file");
                return Vec::new();
            }
        };

        let imports = ImportTable::resolve(&syntax.imports, &file.path, &self.path_resolver);
        let edges = match_call_sites(&file.path, &syntax.call_sites, &imports);
        debug!(
            path = %file.path.display(),
            language = file.language.name(),
            bindings = imports.len(),
            edges = edges.len(),
            "analyzed file"
        );
        edges
    }

    fn file_syntax(&self, path: &Path) -> Result<FileSyntax, AnalysisError> {
        let source = read_source(path)?;

        let Some(cache) = &self.syntax_cache else {
            return self.parse_syntax(path, source);
        };

        let content_hash = SyntaxCache::content_hash(&source);
        if let Some(syntax) = cache.get(path, content_hash) {
            return Ok(syntax);
        }
        let syntax = self.parse_syntax(path, source)?;
        if let Err(err) = cache.store(path, content_hash, &syntax) {
            warn!(path = %path.display(), error = %err, "failed to cache syntax");
        }
        Ok(syntax)
    }

    fn parse_syntax(&self, path: &Path, source: String) -> Result<FileSyntax, AnalysisError> {
        let parser = self.parser_factory.parser_for_path(path)?;
        let tree = parser.parse_source(path, source)?;
        if tree.has_errors() {
            debug!(path = %path.display(), "parsed with syntax errors");
        }
        Ok(FileSyntax::extract(&tree))
    }
}

/// One-shot build of the reverse dependency index over `roots`.
pub fn build_dependency_graph(roots: &[PathBuf], config: AnalyzerConfig) -> Result<DependencyIndex> {
    CodebaseAnalyzer::new(config).analyze(roots)
}
