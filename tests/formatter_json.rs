use codescope::formatters::{JsonFormatter, QueryReport, TextFormatter};
use codescope::{DependencyEdge, DependencyIndex, Position};
use std::path::Path;

fn index() -> DependencyIndex {
    let mut index = DependencyIndex::new();
    index.add_dependency(
        "/w/util.ts",
        DependencyEdge::new("/w/main.ts", Position::new(1, 27), "format")
            .with_caller(Some("render".to_string())),
    );
    index.add_dependency(
        "/w/util.ts",
        DependencyEdge::new("/w/boot.ts", Position::new(0, 0), "format"),
    );
    index
}

#[test]
fn report_json_carries_impact_and_edges() {
    let index = index();
    let target = Path::new("/w/util.ts");
    let report = QueryReport::new(
        target,
        Some("format"),
        index.dependencies_on_function(target, "format"),
    );

    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new().format_report(&report).unwrap()).unwrap();
    assert_eq!(json["target"], "/w/util.ts");
    assert_eq!(json["function"], "format");
    assert_eq!(json["impact"]["level"], "moderate");
    assert_eq!(json["impact"]["dependentFiles"], 2);
    assert_eq!(json["dependencies"][0]["callerFunction"], "render");
    assert!(json["dependencies"][1].get("callerFunction").is_none());
}

#[test]
fn index_json_lists_targets() {
    let compact = JsonFormatter::compact().format_index(&index()).unwrap();
    assert!(!compact.contains('\n'));

    let json: serde_json::Value = serde_json::from_str(&compact).unwrap();
    let targets = json["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["file"], "/w/util.ts");
    assert_eq!(targets[0]["dependencies"].as_array().unwrap().len(), 2);
}

#[test]
fn empty_report_has_no_impact() {
    let report = QueryReport::new(Path::new("/w/lonely.ts"), None, Vec::new());
    let json: serde_json::Value =
        serde_json::from_str(&JsonFormatter::new().format_report(&report).unwrap()).unwrap();
    assert_eq!(json["impact"]["level"], "none");
    assert!(json.get("function").is_none());

    let text = TextFormatter::new().format_report(&report).unwrap();
    assert!(text.contains("No dependents found."));
}
