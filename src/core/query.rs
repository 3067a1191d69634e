use std::path::Path;

use super::graph::{DependencyEdge, DependencyIndex};
use crate::parsers::scope::{find_enclosing_function, FunctionInfo};
use crate::parsers::tree::SyntaxTree;

/// Dependents of the function under a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetedQuery<'a> {
    /// Function enclosing the cursor; `None` at module scope.
    pub function: Option<FunctionInfo>,
    pub dependencies: Vec<&'a DependencyEdge>,
}

/// Resolve the function enclosing `offset` in `tree` (the parsed contents of
/// `file`) and return the edges of `file` that call it by that name. At
/// module scope every edge of `file` is returned.
///
/// Matching is on the name the dependent file uses, so callers that import
/// the function under an alias are not included.
pub fn query_at_offset<'a>(
    index: &'a DependencyIndex,
    tree: &SyntaxTree,
    file: &Path,
    offset: usize,
) -> TargetedQuery<'a> {
    let node = tree.find_node_at_offset(offset);
    match find_enclosing_function(tree, node) {
        Some(function) => TargetedQuery {
            dependencies: index.dependencies_on_function(file, &function.name),
            function: Some(function),
        },
        None => TargetedQuery {
            function: None,
            dependencies: index.get_dependencies(file).iter().collect(),
        },
    }
}
