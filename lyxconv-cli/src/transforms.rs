//! CLI-specific transforms
//!
//! This module defines the views available to the `inspect` command. Each
//! transform is a stage + format combination (e.g., "final-treeviz",
//! "parse-json").
//!
//! ## Stages
//!
//! 1. **Dispatch** - every input line with the kind its start marker selects
//!    - `line-dispatch`: one line per input line, context free
//!
//! 2. **Parsing** - lines → container tree, with local processing applied
//!    - `parse-treeviz`, `parse-json`: the tree before postprocessing
//!    - `parse-order`: the order in which containers were locally processed
//!
//! 3. **Postprocessing** - stages run in document order
//!    - `final-treeviz`, `final-json`: the tree as it is rendered
//!
//! ## Extra Parameters
//!
//! Transforms can accept extra parameters via `--extra-<name> [value]`:
//!
//! - `tree-full`: list each container's parameters in tree views
//! - `show-linum`: prefix tree lines with source line numbers (on by default)
//! - `filter-header-footer`: leave the document header and footer out of the
//!   final views, as `convert` does
//!
//! Example: `lyxconv inspect file.lyx parse-treeviz --extra-tree-full`

use lyxconv_core::formats::treeviz::to_treeviz_str;
use lyxconv_core::{Container, Converter, LineSource, StringLines};
use std::collections::HashMap;

/// All available CLI transforms (stage + format combinations)
pub const AVAILABLE_TRANSFORMS: &[&str] = &[
    "line-dispatch",
    "parse-treeviz",
    "parse-json",
    "parse-order",
    "final-treeviz",
    "final-json",
];

pub const DEFAULT_TRANSFORM: &str = "final-treeviz";

/// Execute a named transform on a source file with optional extra parameters
///
/// # Examples
///
/// ```ignore
/// let converter = Converter::standard()?;
/// let output = execute_transform(source, "parse-treeviz", &HashMap::new(), &converter)?;
/// ```
pub fn execute_transform(
    source: &str,
    transform_name: &str,
    extra_params: &HashMap<String, String>,
    converter: &Converter,
) -> Result<String, String> {
    // Default show-linum to true for inspect command if not specified
    let mut params = extra_params.clone();
    if !params.contains_key("show-linum") {
        params.insert("show-linum".to_string(), "true".to_string());
    }

    match transform_name {
        "line-dispatch" => Ok(dispatch_lines(source, converter)),
        "parse-treeviz" | "parse-json" | "parse-order" => {
            let mut lines = StringLines::new(source);
            let document = converter
                .parse(&mut lines)
                .map_err(|e| format!("Transform failed: {e}"))?;
            match transform_name {
                "parse-treeviz" => Ok(trees(&document.containers, &params)),
                "parse-json" => containers_to_json(&document.containers),
                _ => Ok(document
                    .processing_order
                    .iter()
                    .map(|(kind, line)| format!("{line:03} {kind}\n"))
                    .collect()),
            }
        }
        "final-treeviz" | "final-json" => {
            let mut lines = StringLines::new(source);
            let document = converter
                .parse(&mut lines)
                .map_err(|e| format!("Transform failed: {e}"))?;
            let filter = params
                .get("filter-header-footer")
                .is_some_and(|value| value.eq_ignore_ascii_case("true"));
            let document = converter.postprocess(document, filter);
            if transform_name == "final-treeviz" {
                Ok(trees(&document.containers, &params))
            } else {
                containers_to_json(&document.containers)
            }
        }
        _ => Err(format!(
            "Unknown transform: {transform_name}. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}

fn dispatch_lines(source: &str, converter: &Converter) -> String {
    let mut lines = StringLines::new(source);
    let mut output = String::new();
    while !lines.finished() {
        let kind = converter.dispatch().resolve(lines.current_line());
        output.push_str(&format!(
            "{:03} {:<12} {}\n",
            lines.line_number(),
            kind.name(),
            lines.current_line()
        ));
        lines.next_line();
    }
    output
}

fn trees(containers: &[Container], params: &HashMap<String, String>) -> String {
    containers
        .iter()
        .map(|container| to_treeviz_str(container, params))
        .collect()
}

fn containers_to_json(containers: &[Container]) -> Result<String, String> {
    serde_json::to_string_pretty(containers).map_err(|e| format!("JSON serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\\begin_layout Standard\nHello \n\\emph on\nworld\n\\emph default\n\\end_layout\n\\begin_layout Bibliography\nSmith\n\\end_layout";

    fn run(name: &str, params: &HashMap<String, String>) -> String {
        let converter = Converter::standard().unwrap();
        execute_transform(SOURCE, name, params, &converter).unwrap()
    }

    #[test]
    fn line_dispatch_names_every_line() {
        let output = run("line-dispatch", &HashMap::new());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), SOURCE.lines().count());
        assert!(lines[0].starts_with("001 paragraph"));
        assert!(lines[1].starts_with("002 text"));
        assert!(lines[2].starts_with("003 text_style"));
        assert!(lines[4].starts_with("005 black_box"));
    }

    #[test]
    fn parse_order_is_bottom_up() {
        let output = run("parse-order", &HashMap::new());
        let first_paragraph = output.lines().position(|l| l.ends_with("paragraph")).unwrap();
        let style = output.lines().position(|l| l.ends_with("text_style")).unwrap();
        assert!(style < first_paragraph);
    }

    #[test]
    fn final_tree_shows_the_bibliography_heading() {
        let parsed = run("parse-treeviz", &HashMap::new());
        let finalized = run("final-treeviz", &HashMap::new());
        assert!(!parsed.contains("2 items"));
        assert!(finalized.contains("2 items"));
        assert!(
            finalized.matches("Bibliography").count() > parsed.matches("Bibliography").count()
        );
        assert!(finalized.starts_with("001 "));
    }

    #[test]
    fn line_numbers_can_be_turned_off() {
        let mut params = HashMap::new();
        params.insert("show-linum".to_string(), "false".to_string());
        let output = run("final-treeviz", &params);
        assert!(!output.starts_with("001 "));
    }

    #[test]
    fn final_views_follow_the_filter_setting() {
        let source = "\\begin_header\n\\textclass article\n\\end_header\n\\begin_layout Standard\nHi\n\\end_layout\n\\end_document";
        let converter = Converter::standard().unwrap();
        let mut params = HashMap::new();

        let full = execute_transform(source, "final-json", &params, &converter).unwrap();
        let full: serde_json::Value = serde_json::from_str(&full).unwrap();
        assert_eq!(full.as_array().map(Vec::len), Some(3));

        params.insert("filter-header-footer".to_string(), "true".to_string());
        let filtered = execute_transform(source, "final-json", &params, &converter).unwrap();
        let filtered: serde_json::Value = serde_json::from_str(&filtered).unwrap();
        assert_eq!(filtered.as_array().map(Vec::len), Some(1));
        assert_eq!(filtered[0]["kind"], "paragraph");
    }

    #[test]
    fn json_is_an_array_of_trees() {
        let output = run("final-json", &HashMap::new());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn unknown_transform_is_an_error() {
        let converter = Converter::standard().unwrap();
        let err = execute_transform(SOURCE, "ast-tag", &HashMap::new(), &converter).unwrap_err();
        assert!(err.contains("Unknown transform"));
    }
}
