use std::path::Path;

use super::common::TreeSitterParser;
use super::tree::SyntaxTree;
use super::LanguageParser;
use crate::error::Result;

/// JavaScript parser; the grammar also covers JSX.
pub struct JavaScriptParser;

impl JavaScriptParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for JavaScriptParser {
    fn parse_source(&self, file_path: &Path, source: String) -> Result<SyntaxTree> {
        let mut parser = TreeSitterParser::new(tree_sitter_javascript::language())?;
        parser.parse_source(file_path, source)
    }

    fn language_name(&self) -> &str {
        "javascript"
    }
}
