use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::QueryReport;
use crate::core::graph::{DependencyEdge, DependencyIndex};
use crate::core::impact::ImpactSummary;

/// Machine-readable output using the canonical camelCase edge shape.
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportJson<'a> {
    target: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<&'a str>,
    impact: &'a ImpactSummary,
    dependencies: &'a [&'a DependencyEdge],
}

#[derive(Serialize)]
struct IndexJson<'a> {
    targets: Vec<TargetJson<'a>>,
}

#[derive(Serialize)]
struct TargetJson<'a> {
    file: &'a Path,
    dependencies: &'a [DependencyEdge],
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn format_report(&self, report: &QueryReport) -> Result<String> {
        self.render(&ReportJson {
            target: report.target,
            function: report.function,
            impact: &report.impact,
            dependencies: &report.dependencies,
        })
    }

    pub fn format_index(&self, index: &DependencyIndex) -> Result<String> {
        let targets = index
            .iter()
            .map(|(file, dependencies)| TargetJson { file, dependencies })
            .collect();
        self.render(&IndexJson { targets })
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
