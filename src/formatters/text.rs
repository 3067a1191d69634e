use anyhow::Result;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use super::QueryReport;
use crate::core::graph::{DependencyEdge, DependencyIndex};

/// Human-readable listing grouped by dependent file. Positions are shown
/// 1-based, the way editors display them.
pub struct TextFormatter {
    base: Option<PathBuf>,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self { base: None }
    }

    /// Show paths under `base` relative to it.
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn format_report(&self, report: &QueryReport) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Dependents of {}", self.display_path(report.target))?;
        if let Some(function) = report.function {
            writeln!(out, "Function: {function}")?;
        }
        writeln!(
            out,
            "Impact: {} ({} file{}). {}",
            report.impact.level.as_str(),
            report.impact.dependent_files,
            if report.impact.dependent_files == 1 { "" } else { "s" },
            report.impact.message
        )?;

        if report.dependencies.is_empty() {
            writeln!(out, "\nNo dependents found.")?;
            return Ok(out);
        }
        writeln!(out)?;
        self.write_grouped(&mut out, report.dependencies.iter().copied(), "")?;
        Ok(out)
    }

    pub fn format_index(&self, index: &DependencyIndex) -> Result<String> {
        let mut out = String::new();
        if index.is_empty() {
            writeln!(out, "No dependencies found.")?;
            return Ok(out);
        }
        for (target, edges) in index.iter() {
            let files = index.dependent_files(target).len();
            writeln!(
                out,
                "{} ({} call{}, {} file{})",
                self.display_path(target),
                edges.len(),
                if edges.len() == 1 { "" } else { "s" },
                files,
                if files == 1 { "" } else { "s" }
            )?;
            self.write_grouped(&mut out, edges.iter(), "  ")?;
        }
        Ok(out)
    }

    fn write_grouped<'a, I>(&self, out: &mut String, edges: I, indent: &str) -> Result<()>
    where
        I: Iterator<Item = &'a DependencyEdge>,
    {
        let mut groups: Vec<(&Path, Vec<&DependencyEdge>)> = Vec::new();
        for edge in edges {
            let file = edge.dependent_file_path.as_path();
            match groups.iter_mut().find(|(path, _)| *path == file) {
                Some((_, group)) => group.push(edge),
                None => groups.push((file, vec![edge])),
            }
        }

        for (file, group) in groups {
            writeln!(out, "{indent}{}", self.display_path(file))?;
            for edge in group {
                let location = format!(
                    "{}:{}",
                    edge.position.line + 1,
                    edge.position.character + 1
                );
                let caller = match &edge.caller_function {
                    Some(caller) => format!("in {caller}"),
                    None => "at module scope".to_string(),
                };
                writeln!(
                    out,
                    "{indent}  {location:<8} {}  {caller}",
                    edge.target_function
                )?;
            }
        }
        Ok(())
    }

    fn display_path(&self, path: &Path) -> String {
        self.base
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}
