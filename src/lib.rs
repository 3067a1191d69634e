//! # CODESCOPE
//!
//! Reverse dependency analysis for TypeScript and JavaScript workspaces:
//! "if I change function F in file X, what calls it?"
//!
//! A build enumerates the workspace, parses every file with tree-sitter,
//! reads its named imports, resolves relative specifiers to files, and
//! records each call to an imported binding together with the function the
//! call sits in. The result is a [`DependencyIndex`] keyed by the file being
//! depended upon.
//!
//! ```no_run
//! use codescope::{build_dependency_graph, AnalyzerConfig};
//! use std::path::{Path, PathBuf};
//!
//! let index = build_dependency_graph(&[PathBuf::from(".")], AnalyzerConfig::default())?;
//! for edge in index.get_dependencies(Path::new("/abs/path/to/util.ts")) {
//!     println!("{} calls {}", edge.dependent_file_path.display(), edge.target_function);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod formatters;
pub mod parsers;

pub use crate::config::{AnalyzerConfig, CacheMode};
pub use crate::core::{
    build_dependency_graph, query_at_offset, CodebaseAnalyzer, DependencyEdge, DependencyIndex,
    ImpactLevel, ResolutionPolicy,
};
pub use crate::error::AnalysisError;
pub use crate::parsers::tree::Position;
