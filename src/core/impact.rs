use serde::Serialize;
use std::collections::HashSet;

use super::graph::DependencyEdge;

/// Rough blast radius of a change, from how many files depend on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Low,
    Moderate,
    High,
}

impl ImpactLevel {
    pub fn from_dependent_files(count: usize) -> Self {
        match count {
            0 => ImpactLevel::None,
            1 => ImpactLevel::Low,
            2..=5 => ImpactLevel::Moderate,
            _ => ImpactLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImpactLevel::None => "none",
            ImpactLevel::Low => "low",
            ImpactLevel::Moderate => "moderate",
            ImpactLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub level: ImpactLevel,
    pub dependent_files: usize,
    pub message: String,
}

pub fn summarize<'a, I>(edges: I) -> ImpactSummary
where
    I: IntoIterator<Item = &'a DependencyEdge>,
{
    let dependent_files = edges
        .into_iter()
        .map(|edge| edge.dependent_file_path.as_path())
        .collect::<HashSet<_>>()
        .len();
    let level = ImpactLevel::from_dependent_files(dependent_files);
    let message = match level {
        ImpactLevel::None => "This file appears to have no direct dependents in the workspace. \
                              Changes may be low-risk."
            .to_string(),
        ImpactLevel::Low => "This file has a small number of dependents. \
                             Changes are likely localized and lower-risk."
            .to_string(),
        ImpactLevel::Moderate => format!(
            "This file is a shared dependency for {dependent_files} files. \
             Consider the impact on each before making changes."
        ),
        ImpactLevel::High => format!(
            "Warning: This file is a high-impact dependency, affecting {dependent_files} other files. \
             Changes here could have widespread effects. Recommend thorough testing."
        ),
    };
    ImpactSummary {
        level,
        dependent_files,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::tree::Position;

    fn edges_from(files: &[&str]) -> Vec<DependencyEdge> {
        files
            .iter()
            .map(|file| DependencyEdge::new(*file, Position::new(0, 0), "f"))
            .collect()
    }

    #[test]
    fn tiers_follow_distinct_file_count() {
        assert_eq!(summarize(&edges_from(&[])).level, ImpactLevel::None);
        assert_eq!(
            summarize(&edges_from(&["/a.ts", "/a.ts", "/a.ts"])).level,
            ImpactLevel::Low
        );
        assert_eq!(
            summarize(&edges_from(&["/a.ts", "/b.ts"])).level,
            ImpactLevel::Moderate
        );
        let five = edges_from(&["/a.ts", "/b.ts", "/c.ts", "/d.ts", "/e.ts"]);
        assert_eq!(summarize(&five).level, ImpactLevel::Moderate);
        let six = edges_from(&["/a.ts", "/b.ts", "/c.ts", "/d.ts", "/e.ts", "/f.ts"]);
        let summary = summarize(&six);
        assert_eq!(summary.level, ImpactLevel::High);
        assert_eq!(summary.dependent_files, 6);
        assert!(summary.message.contains("affecting 6 other files"));
    }
}
