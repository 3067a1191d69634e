use std::path::Path;
use tree_sitter::Language;

use super::common::TreeSitterParser;
use super::tree::SyntaxTree;
use super::LanguageParser;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    TypeScript,
    Tsx,
}

pub struct TypeScriptParser {
    dialect: Dialect,
}

impl TypeScriptParser {
    pub fn new() -> Self {
        Self {
            dialect: Dialect::TypeScript,
        }
    }

    /// Parser for `.tsx` sources, where `<T>` starts a JSX element rather
    /// than a type assertion.
    pub fn tsx() -> Self {
        Self {
            dialect: Dialect::Tsx,
        }
    }

    fn language(&self) -> Language {
        match self.dialect {
            Dialect::TypeScript => tree_sitter_typescript::language_typescript(),
            Dialect::Tsx => tree_sitter_typescript::language_tsx(),
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for TypeScriptParser {
    fn parse_source(&self, file_path: &Path, source: String) -> Result<SyntaxTree> {
        let mut parser = TreeSitterParser::new(self.language())?;
        parser.parse_source(file_path, source)
    }

    fn language_name(&self) -> &str {
        match self.dialect {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
        }
    }
}
