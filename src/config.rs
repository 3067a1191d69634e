use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::resolver::ResolutionPolicy;
use crate::error::{AnalysisError, Result};

/// Settings for one analysis run.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes. Command-line flags are applied on top of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// File extensions (without the dot) that are enumerated and analyzed.
    pub include_extensions: Vec<String>,
    /// Directory names pruned at any depth of the walk.
    pub exclude_dirs: Vec<String>,
    /// What the path resolver does when no candidate file exists.
    pub resolution: ResolutionPolicy,
    pub follow_links: bool,
    pub cache: CacheMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CacheMode {
    #[default]
    Off,
    Memory,
    Disk {
        dir: PathBuf,
    },
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_extensions: vec!["ts".to_string(), "js".to_string()],
            exclude_dirs: vec!["node_modules".to_string()],
            resolution: ResolutionPolicy::default(),
            follow_links: false,
            cache: CacheMode::Off,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| AnalysisError::io(path, err))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|err| AnalysisError::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.include_extensions.is_empty() {
            return Err(AnalysisError::Config(
                "include_extensions must name at least one extension".to_string(),
            ));
        }
        if let Some(bad) = self
            .include_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(AnalysisError::Config(format!(
                "extension '{bad}' must be non-empty and given without a leading dot"
            )));
        }
        Ok(())
    }

    pub fn with_resolution(mut self, resolution: ResolutionPolicy) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{ "resolution": "lenient" }"#).unwrap();
        assert_eq!(config.resolution, ResolutionPolicy::Lenient);
        assert_eq!(config.include_extensions, vec!["ts", "js"]);
        assert_eq!(config.exclude_dirs, vec!["node_modules"]);
        assert_eq!(config.cache, CacheMode::Off);
    }

    #[test]
    fn disk_cache_mode_parses_with_dir() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{ "cache": { "mode": "disk", "dir": "/tmp/cs" } }"#).unwrap();
        assert_eq!(
            config.cache,
            CacheMode::Disk {
                dir: PathBuf::from("/tmp/cs")
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<AnalyzerConfig>(r#"{ "languages": ["ts"] }"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn dotted_extensions_fail_validation() {
        let config = AnalyzerConfig::default().with_extensions([".ts"]);
        assert!(config.validate().is_err());
    }
}
