pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use std::path::Path;

use crate::core::graph::DependencyEdge;
use crate::core::impact::{summarize, ImpactSummary};

/// The answer to one "who depends on this?" query, ready to render.
#[derive(Debug, Clone)]
pub struct QueryReport<'a> {
    pub target: &'a Path,
    pub function: Option<&'a str>,
    pub dependencies: Vec<&'a DependencyEdge>,
    pub impact: ImpactSummary,
}

impl<'a> QueryReport<'a> {
    pub fn new(
        target: &'a Path,
        function: Option<&'a str>,
        dependencies: Vec<&'a DependencyEdge>,
    ) -> Self {
        let impact = summarize(dependencies.iter().copied());
        Self {
            target,
            function,
            dependencies,
            impact,
        }
    }
}
