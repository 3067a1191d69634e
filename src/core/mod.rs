pub mod analyzer;
pub mod graph;
pub mod impact;
pub mod query;
pub mod resolver;
pub mod scanner;

pub use analyzer::{build_dependency_graph, CodebaseAnalyzer};
pub use graph::{DependencyEdge, DependencyIndex};
pub use impact::{summarize, ImpactLevel, ImpactSummary};
pub use query::{query_at_offset, TargetedQuery};
pub use resolver::{PathResolver, ResolutionPolicy};
pub use scanner::{FileInfo, FileScanner};
