use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Candidate suffixes tried, in order, after the specifier itself.
const SCRIPT_EXTENSIONS: [&str; 2] = [".ts", ".js"];
/// Directory entry points tried, in order, when no suffixed file exists.
const INDEX_FILES: [&str; 2] = ["index.ts", "index.js"];

/// What to return when none of the candidate files exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPolicy {
    /// Drop the import. Every resulting edge points at a file that exists.
    #[default]
    Strict,
    /// Assume `<specifier>.ts`, even though it is not on disk.
    Lenient,
}

/// Resolves relative module specifiers to workspace files.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    policy: ResolutionPolicy,
}

impl PathResolver {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Resolve `specifier` as written in `from_file`. Bare package specifiers
    /// are never resolved.
    pub fn resolve(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        if !is_relative_specifier(specifier) {
            return None;
        }
        let base_dir = from_file.parent()?;
        let base = normalize_path(&base_dir.join(specifier));

        let suffixed = SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| with_suffix(&base, ext));
        let indexed = INDEX_FILES.iter().map(|index| base.join(index));
        if let Some(found) = suffixed.chain(indexed).find(|candidate| candidate.is_file()) {
            return Some(found);
        }

        match self.policy {
            ResolutionPolicy::Strict => None,
            ResolutionPolicy::Lenient => Some(with_suffix(&base, SCRIPT_EXTENSIONS[0])),
        }
    }
}

/// `./x`, `../x`, `.` and `..` are relative; anything else names a package.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Lexically fold `.` and `..` components without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}
