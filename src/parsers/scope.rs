use serde::{Deserialize, Serialize};

use super::tree::{NodeId, NodeKind, Position, SyntaxTree};

pub const ANONYMOUS: &str = "anonymous";

/// A callable scope a node sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub position: Position,
}

/// Walk up from `node` (inclusive) to the nearest function declaration,
/// method, arrow function or function expression. `None` means module scope.
pub fn find_enclosing_function(tree: &SyntaxTree, node: NodeId) -> Option<FunctionInfo> {
    let function = tree
        .ancestors(node)
        .find(|&id| tree.kind(id).is_function_like())?;
    Some(FunctionInfo {
        name: function_name(tree, function),
        position: tree.start_position(function),
    })
}

/// Named function declarations at any depth, in document order. Methods,
/// arrows and function expressions are not listed.
pub fn declared_functions(tree: &SyntaxTree) -> Vec<FunctionInfo> {
    tree.preorder()
        .filter(|&id| {
            matches!(
                tree.kind(id),
                NodeKind::FunctionDeclaration | NodeKind::GeneratorFunctionDeclaration
            )
        })
        .filter_map(|function| {
            let name = tree.child_by_field(function, "name")?;
            Some(FunctionInfo {
                name: tree.text(name).to_string(),
                position: tree.start_position(function),
            })
        })
        .collect()
}

/// Own name first, then the simple identifier of a `const f = ...` binding
/// directly holding the function, then `"anonymous"`.
fn function_name(tree: &SyntaxTree, function: NodeId) -> String {
    let own_name = match tree.kind(function) {
        NodeKind::FunctionDeclaration
        | NodeKind::GeneratorFunctionDeclaration
        | NodeKind::MethodDefinition
        | NodeKind::FunctionExpression => tree.child_by_field(function, "name"),
        _ => None,
    };
    if let Some(name) = own_name {
        return tree.text(name).to_string();
    }

    tree.parent(function)
        .filter(|&parent| tree.kind(parent) == NodeKind::VariableDeclarator)
        .and_then(|declarator| tree.child_by_field(declarator, "name"))
        .filter(|&binding| tree.kind(binding) == NodeKind::Identifier)
        .map(|binding| tree.text(binding).to_string())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}
