use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .0.display())]
    Parse(PathBuf),

    #[error("unsupported source file: {}", .0.display())]
    UnsupportedLanguage(PathBuf),

    #[error("grammar rejected by tree-sitter: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("syntax cache entry could not be encoded or decoded: {0}")]
    Cache(#[from] bincode::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
