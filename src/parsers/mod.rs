pub mod cache;
pub mod calls;
pub mod common;
pub mod imports;
pub mod javascript;
pub mod scope;
pub mod tree;
pub mod typescript;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use calls::CallSite;
use imports::ImportDeclaration;
use tree::SyntaxTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    TypeScript,
    Tsx,
    JavaScript,
}

impl SourceLanguage {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceLanguage::TypeScript => "typescript",
            SourceLanguage::Tsx => "tsx",
            SourceLanguage::JavaScript => "javascript",
        }
    }
}

pub trait LanguageParser {
    fn parse_source(&self, file_path: &Path, source: String) -> Result<SyntaxTree>;

    fn parse_file(&self, file_path: &Path) -> Result<SyntaxTree> {
        let source = common::read_source(file_path)?;
        self.parse_source(file_path, source)
    }

    fn language_name(&self) -> &str;
}

pub struct ParserFactory;

impl ParserFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn get_parser(&self, language: SourceLanguage) -> Box<dyn LanguageParser + Send + Sync> {
        match language {
            SourceLanguage::TypeScript => Box::new(typescript::TypeScriptParser::new()),
            SourceLanguage::Tsx => Box::new(typescript::TypeScriptParser::tsx()),
            SourceLanguage::JavaScript => Box::new(javascript::JavaScriptParser::new()),
        }
    }

    pub fn parser_for_path(&self, path: &Path) -> Result<Box<dyn LanguageParser + Send + Sync>> {
        let language = SourceLanguage::from_path(path)
            .ok_or_else(|| AnalysisError::UnsupportedLanguage(path.to_path_buf()))?;
        Ok(self.get_parser(language))
    }
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// The syntax-only facts the dependency pass needs from one file: its named
/// import declarations and every call whose callee text names one of the
/// imported bindings. Nothing here depends on other files, so it can be
/// cached against the file content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSyntax {
    pub imports: Vec<ImportDeclaration>,
    pub call_sites: Vec<CallSite>,
}

impl FileSyntax {
    pub fn extract(tree: &SyntaxTree) -> Self {
        let imports = imports::extract_imports(tree);
        let local_names: HashSet<&str> = imports
            .iter()
            .flat_map(|decl| decl.local_names.iter().map(String::as_str))
            .collect();
        let call_sites = if local_names.is_empty() {
            Vec::new()
        } else {
            calls::collect_call_sites(tree, |callee| local_names.contains(callee))
        };
        Self {
            imports,
            call_sites,
        }
    }
}
