//! Named-import extraction and per-file binding tables.
//!
//! Extraction is purely syntactic: it reads the top-level `import`
//! declarations of one tree and records the module specifier together with
//! the local names introduced by `{ ... }` clauses. Turning specifiers into
//! files happens separately in [`ImportTable::resolve`], because that step
//! depends on what exists on disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::common::unquote;
use super::tree::{NodeId, NodeKind, SyntaxTree};
use crate::core::resolver::PathResolver;

/// One `import { ... } from '<specifier>'` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub specifier: String,
    /// Local binding names in clause order; `{ a as b }` contributes `b`.
    pub local_names: Vec<String>,
}

/// Collect the named imports of a file. Only direct children of the program
/// are inspected. Default, namespace and side-effect imports contribute
/// nothing; a declaration mixing a default and a named clause keeps its named
/// part.
pub fn extract_imports(tree: &SyntaxTree) -> Vec<ImportDeclaration> {
    tree.children_of_kind(tree.root(), NodeKind::ImportStatement)
        .filter_map(|statement| import_declaration(tree, statement))
        .collect()
}

fn import_declaration(tree: &SyntaxTree, statement: NodeId) -> Option<ImportDeclaration> {
    let source = tree
        .child_by_field(statement, "source")
        .filter(|&source| tree.kind(source) == NodeKind::StringLiteral)?;
    let specifier = unquote(tree.text(source)).to_string();

    let local_names: Vec<String> = tree
        .children_of_kind(statement, NodeKind::ImportClause)
        .flat_map(|clause| tree.children_of_kind(clause, NodeKind::NamedImports))
        .flat_map(|named| tree.children_of_kind(named, NodeKind::ImportSpecifier))
        .filter_map(|specifier| local_binding_name(tree, specifier))
        .collect();

    if local_names.is_empty() {
        return None;
    }
    Some(ImportDeclaration {
        specifier,
        local_names,
    })
}

fn local_binding_name(tree: &SyntaxTree, specifier: NodeId) -> Option<String> {
    let binding = tree
        .child_by_field(specifier, "alias")
        .or_else(|| tree.child_by_field(specifier, "name"))?;
    let name = tree.text(binding);
    (!name.is_empty()).then(|| name.to_string())
}

/// A named symbol imported into a file, tied to the file it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub local_name: String,
    pub resolved_file: PathBuf,
}

/// `local name -> binding` for one file. Built per file and never merged.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    bindings: HashMap<String, ImportBinding>,
}

impl ImportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve each declaration's specifier relative to `from_file`. A
    /// declaration whose specifier does not resolve contributes no bindings.
    /// When the same local name is bound twice, the later declaration wins.
    pub fn resolve(
        declarations: &[ImportDeclaration],
        from_file: &Path,
        resolver: &PathResolver,
    ) -> Self {
        let mut table = Self::new();
        for declaration in declarations {
            let Some(resolved_file) = resolver.resolve(&declaration.specifier, from_file) else {
                debug!(
                    file = %from_file.display(),
                    specifier = %declaration.specifier,
                    "import not resolved to a workspace file"
                );
                continue;
            };
            for local_name in &declaration.local_names {
                table.insert(ImportBinding {
                    local_name: local_name.clone(),
                    resolved_file: resolved_file.clone(),
                });
            }
        }
        table
    }

    pub fn insert(&mut self, binding: ImportBinding) {
        self.bindings.insert(binding.local_name.clone(), binding);
    }

    pub fn get(&self, local_name: &str) -> Option<&ImportBinding> {
        self.bindings.get(local_name)
    }

    pub fn contains(&self, local_name: &str) -> bool {
        self.bindings.contains_key(local_name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::ResolutionPolicy;
    use crate::parsers::typescript::TypeScriptParser;
    use crate::parsers::LanguageParser;
    use std::fs;

    fn imports_of(source: &str) -> Vec<ImportDeclaration> {
        let tree = TypeScriptParser::new()
            .parse_source(Path::new("main.ts"), source.to_string())
            .unwrap();
        extract_imports(&tree)
    }

    #[test]
    fn named_imports_use_local_names() {
        let imports = imports_of(
            "import { helper as h, other } from './x';\nimport { y } from \"../y\";\n",
        );
        assert_eq!(
            imports,
            vec![
                ImportDeclaration {
                    specifier: "./x".to_string(),
                    local_names: vec!["h".to_string(), "other".to_string()],
                },
                ImportDeclaration {
                    specifier: "../y".to_string(),
                    local_names: vec!["y".to_string()],
                },
            ]
        );
    }

    #[test]
    fn default_namespace_and_side_effect_imports_are_ignored() {
        let imports = imports_of(
            "import def from './a';\nimport * as ns from './b';\nimport './c';\nimport {} from './d';\n",
        );
        assert!(imports.is_empty());
    }

    #[test]
    fn mixed_default_and_named_keeps_named_part() {
        let imports = imports_of("import React, { useState } from './react-shim';\n");
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].local_names, vec!["useState"]);
    }

    #[test]
    fn nested_imports_are_not_visited() {
        // Dynamic import() is an expression, never an import declaration.
        let imports = imports_of("async function f() { const m = await import('./lazy'); }\n");
        assert!(imports.is_empty());
    }

    #[test]
    fn table_drops_unresolved_declarations_and_keeps_later_bindings() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("a.ts"), "export function shared() {}\n").unwrap();
        fs::write(root.join("b.ts"), "export function shared() {}\n").unwrap();
        let main = root.join("main.ts");

        let declarations = vec![
            ImportDeclaration {
                specifier: "./a".to_string(),
                local_names: vec!["shared".to_string()],
            },
            ImportDeclaration {
                specifier: "lodash".to_string(),
                local_names: vec!["debounce".to_string()],
            },
            ImportDeclaration {
                specifier: "./b".to_string(),
                local_names: vec!["shared".to_string()],
            },
        ];
        let table = ImportTable::resolve(
            &declarations,
            &main,
            &PathResolver::new(ResolutionPolicy::Strict),
        );

        assert_eq!(table.len(), 1);
        assert!(!table.contains("debounce"));
        assert_eq!(table.get("shared").unwrap().resolved_file, root.join("b.ts"));
    }
}
