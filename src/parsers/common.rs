use std::fs;
use std::path::Path;
use tree_sitter::{Language, Parser};

use super::tree::SyntaxTree;
use crate::error::{AnalysisError, Result};

/// Thin owner of a tree-sitter parser bound to one grammar.
///
/// `tree_sitter::Parser` is neither `Send` nor `Sync`, so callers build one
/// per parse instead of sharing it across worker threads.
pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    /// Parse `source` into an arena tree. tree-sitter recovers from local
    /// syntax errors, so this only fails when no tree comes back at all.
    pub fn parse_source(&mut self, file_path: &Path, source: String) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| AnalysisError::Parse(file_path.to_path_buf()))?;
        Ok(SyntaxTree::from_tree_sitter(&tree, source))
    }
}

/// Whole-file read. Invalid UTF-8 is replaced with U+FFFD instead of
/// failing, so a stray Latin-1 byte does not hide the rest of the file.
pub fn read_source(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path).map_err(|err| AnalysisError::io(file_path, err))?;
    Ok(match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// The value of a string literal node's text with its quotes removed.
pub fn unquote(literal: &str) -> &str {
    let trimmed = literal.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '"' | '\'' | '`') => {
            &trimmed[1..trimmed.len() - 1]
        }
        _ => trimmed,
    }
}
