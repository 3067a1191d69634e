//! Call-site collection and matching against a file's import table.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::imports::ImportTable;
use super::scope::find_enclosing_function;
use super::tree::{NodeId, NodeKind, Position, SyntaxTree};
use crate::core::graph::DependencyEdge;

/// A call expression found in a file, before it is tied to an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    /// Source text of the callee expression, e.g. `format` or `util.format`.
    pub callee: String,
    /// Start of the call expression.
    pub position: Position,
    /// Enclosing function name; `None` at module scope.
    pub caller: Option<String>,
}

/// Walk the whole tree in document order and keep every call whose callee
/// text passes `is_candidate`.
pub fn collect_call_sites<F>(tree: &SyntaxTree, is_candidate: F) -> Vec<CallSite>
where
    F: Fn(&str) -> bool,
{
    tree.preorder()
        .filter(|&id| tree.kind(id) == NodeKind::CallExpression)
        .filter_map(|call| {
            let callee = callee_text(tree, call)?;
            if !is_candidate(callee) {
                return None;
            }
            Some(CallSite {
                callee: callee.to_string(),
                position: tree.start_position(call),
                caller: find_enclosing_function(tree, call).map(|info| info.name),
            })
        })
        .collect()
}

fn callee_text(tree: &SyntaxTree, call: NodeId) -> Option<&str> {
    // tree-sitter models tagged templates (tag`...`) as calls; they are not.
    if let Some(arguments) = tree.child_by_field(call, "arguments") {
        if tree.grammar_kind(arguments) == "template_string" {
            return None;
        }
    }
    let function = tree.child_by_field(call, "function")?;
    Some(tree.text(function))
}

/// Turn call sites into edges for every callee bound in `imports`. Each
/// result pairs the depended-upon file with the edge to file under it.
pub fn match_call_sites(
    dependent_file: &Path,
    call_sites: &[CallSite],
    imports: &ImportTable,
) -> Vec<(PathBuf, DependencyEdge)> {
    call_sites
        .iter()
        .filter_map(|site| {
            let binding = imports.get(&site.callee)?;
            let edge = DependencyEdge::new(dependent_file, site.position, &binding.local_name)
                .with_caller(site.caller.clone());
            Some((binding.resolved_file.clone(), edge))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::imports::ImportBinding;
    use crate::parsers::typescript::TypeScriptParser;
    use crate::parsers::LanguageParser;

    fn parse(source: &str) -> SyntaxTree {
        TypeScriptParser::new()
            .parse_source(Path::new("/w/main.ts"), source.to_string())
            .unwrap()
    }

    fn table(names: &[&str], target: &str) -> ImportTable {
        let mut table = ImportTable::new();
        for name in names {
            table.insert(ImportBinding {
                local_name: name.to_string(),
                resolved_file: PathBuf::from(target),
            });
        }
        table
    }

    #[test]
    fn matches_calls_by_exact_callee_text_in_document_order() {
        let tree = parse(
            "import { b, c } from './util';\nfunction a() {\n  b(c());\n  obj.b();\n}\nc();\n",
        );
        let imports = table(&["b", "c"], "/w/util.ts");
        let sites = collect_call_sites(&tree, |callee| imports.contains(callee));
        let edges = match_call_sites(Path::new("/w/main.ts"), &sites, &imports);

        let summary: Vec<(&str, Option<&str>, Position)> = edges
            .iter()
            .map(|(_, e)| {
                (
                    e.target_function.as_str(),
                    e.caller_function.as_deref(),
                    e.position,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("b", Some("a"), Position::new(2, 2)),
                ("c", Some("a"), Position::new(2, 4)),
                ("c", None, Position::new(5, 0)),
            ]
        );
        assert!(edges
            .iter()
            .all(|(target, e)| target == Path::new("/w/util.ts")
                && e.dependent_file_path == Path::new("/w/main.ts")));
    }

    #[test]
    fn tagged_templates_are_not_calls() {
        let tree = parse("import { sql } from './db';\nconst q = sql`select 1`;\nsql('x');\n");
        let sites = collect_call_sites(&tree, |callee| callee == "sql");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].position, Position::new(2, 0));
    }

    #[test]
    fn generic_calls_match_on_the_bare_callee() {
        let tree = parse("import { parse } from './p';\nconst v = parse<number>('1');\n");
        let sites = collect_call_sites(&tree, |callee| callee == "parse");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].caller, None);
    }

    #[test]
    fn unbound_callees_produce_no_edges() {
        let sites = vec![CallSite {
            callee: "missing".to_string(),
            position: Position::new(0, 0),
            caller: None,
        }];
        let edges = match_call_sites(Path::new("/w/main.ts"), &sites, &table(&["b"], "/w/b.ts"));
        assert!(edges.is_empty());
    }
}
