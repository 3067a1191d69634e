//! Arena representation of a parsed source file.
//!
//! tree-sitter trees are lowered into a flat `Vec` of [`SyntaxNode`]s that
//! refer to their parent and children by index. Upward walks (scope lookup)
//! and downward descents (offset lookup) are plain index hops over the arena,
//! and the tree owns its source text so node text can be sliced without
//! carrying a second buffer around.
//!
//! Nodes are pushed in pre-order while lowering, so iterating the arena by
//! index visits the tree in document order, parents before children.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A 0-based line/character pair. `character` counts UTF-16 code units from
/// the start of the line, which is what editors and LSP clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

pub type NodeId = usize;

/// The node kinds the analysis cares about. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    ImportStatement,
    ImportClause,
    NamedImports,
    ImportSpecifier,
    CallExpression,
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    MethodDefinition,
    ArrowFunction,
    FunctionExpression,
    VariableDeclarator,
    Identifier,
    StringLiteral,
    Other,
}

impl NodeKind {
    pub fn from_grammar_kind(kind: &str) -> Self {
        match kind {
            "program" => NodeKind::Program,
            "import_statement" => NodeKind::ImportStatement,
            "import_clause" => NodeKind::ImportClause,
            "named_imports" => NodeKind::NamedImports,
            "import_specifier" => NodeKind::ImportSpecifier,
            "call_expression" => NodeKind::CallExpression,
            "function_declaration" => NodeKind::FunctionDeclaration,
            "generator_function_declaration" => NodeKind::GeneratorFunctionDeclaration,
            "method_definition" => NodeKind::MethodDefinition,
            "arrow_function" => NodeKind::ArrowFunction,
            // Older grammars call function expressions plain `function`.
            "function" | "function_expression" | "generator_function" => {
                NodeKind::FunctionExpression
            }
            "variable_declarator" => NodeKind::VariableDeclarator,
            "identifier" => NodeKind::Identifier,
            "string" => NodeKind::StringLiteral,
            _ => NodeKind::Other,
        }
    }

    /// Callable constructs that open a scope a call can be attributed to.
    pub fn is_function_like(self) -> bool {
        match self {
            NodeKind::FunctionDeclaration
            | NodeKind::GeneratorFunctionDeclaration
            | NodeKind::MethodDefinition
            | NodeKind::ArrowFunction
            | NodeKind::FunctionExpression => true,
            NodeKind::Program
            | NodeKind::ImportStatement
            | NodeKind::ImportClause
            | NodeKind::NamedImports
            | NodeKind::ImportSpecifier
            | NodeKind::CallExpression
            | NodeKind::VariableDeclarator
            | NodeKind::Identifier
            | NodeKind::StringLiteral
            | NodeKind::Other => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// The raw grammar kind, kept for kinds folded into `Other`.
    pub grammar_kind: &'static str,
    /// Field name under which this node hangs off its parent, if any.
    pub field: Option<&'static str>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SyntaxNode {
    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte
    }

    fn contains(&self, offset: usize) -> bool {
        self.start_byte <= offset && offset < self.end_byte
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<SyntaxNode>,
    lines: LineIndex,
    has_errors: bool,
}

impl SyntaxTree {
    /// Lower a tree-sitter tree into the arena. Only named nodes are kept;
    /// anonymous tokens (punctuation, keywords) carry nothing the analysis
    /// reads.
    pub fn from_tree_sitter(tree: &tree_sitter::Tree, source: String) -> Self {
        let mut nodes: Vec<SyntaxNode> = Vec::new();
        let mut cursor = tree.walk();
        // Arena id of each node on the cursor's current path; `None` marks an
        // anonymous node that was not lowered.
        let mut path: Vec<Option<NodeId>> = Vec::new();

        'walk: loop {
            let node = cursor.node();
            let parent = path.iter().rev().find_map(|id| *id);
            let id = if node.is_named() || path.is_empty() {
                let id = nodes.len();
                nodes.push(SyntaxNode {
                    kind: NodeKind::from_grammar_kind(node.kind()),
                    grammar_kind: node.kind(),
                    field: cursor.field_name(),
                    parent,
                    children: Vec::new(),
                    start_byte: node.start_byte(),
                    end_byte: node.end_byte(),
                });
                if let Some(parent) = parent {
                    nodes[parent].children.push(id);
                }
                Some(id)
            } else {
                None
            };

            if cursor.goto_first_child() {
                path.push(id);
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    continue 'walk;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
                path.pop();
            }
        }

        let lines = LineIndex::new(&source);
        Self {
            has_errors: tree.root_node().has_error(),
            source,
            nodes,
            lines,
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when tree-sitter had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn grammar_kind(&self, id: NodeId) -> &'static str {
        self.nodes[id].grammar_kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.nodes[child].field == Some(field))
    }

    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.nodes[child].kind == kind)
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.source
            .get(self.nodes[id].byte_range())
            .unwrap_or("")
    }

    /// The node itself followed by each ancestor up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Every node in document order, parents before children.
    pub fn preorder(&self) -> Range<NodeId> {
        0..self.nodes.len()
    }

    pub fn start_position(&self, id: NodeId) -> Position {
        self.position_of(self.nodes[id].start_byte)
    }

    /// Map a byte offset to a line/character position. Offsets past the end
    /// of the source clamp to the end.
    pub fn position_of(&self, offset: usize) -> Position {
        self.lines.position_of(&self.source, offset)
    }

    /// Map a line/character position back to a byte offset, or `None` when
    /// the position lies outside the source.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        self.lines.offset_of(&self.source, position)
    }

    /// The most deeply nested node whose span contains `offset`, or the root
    /// when no child does.
    pub fn find_node_at_offset(&self, offset: usize) -> NodeId {
        let mut current = self.root();
        'descend: loop {
            for &child in self.children(current) {
                if self.nodes[child].contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Byte offsets of line starts, for offset/position conversion.
#[derive(Debug, Clone)]
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self { line_starts }
    }

    fn position_of(&self, source: &str, offset: usize) -> Position {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let character = source[line_start..offset].encode_utf16().count();
        Position { line, character }
    }

    fn offset_of(&self, source: &str, position: Position) -> Option<usize> {
        let line_start = *self.line_starts.get(position.line)?;
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .copied()
            .unwrap_or(source.len());

        let mut units = 0;
        for (idx, ch) in source[line_start..line_end].char_indices() {
            if units >= position.character {
                return Some(line_start + idx);
            }
            units += ch.len_utf16();
        }
        (units >= position.character).then_some(line_end)
    }
}
