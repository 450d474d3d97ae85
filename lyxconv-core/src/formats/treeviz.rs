//! Treeviz formatter for container trees
//!
//! One line per container: tree connectors, the kind's icon and a label
//! truncated to 30 characters. Each top-level container starts a new tree.
//!
//! ```text
//! ¶ \begin_layout Standard
//! ├─ ↵ See section
//! ├─ ⊕ \begin_inset CommandInset ref
//! └─ ↵ for details.
//! ```
//!
//! Extra parameters:
//!
//! - `tree-full=true`: also list each container's parameters
//! - `show-linum=true`: prefix each line with the container's source line

use super::icons::{get_icon, PARAMETER_ICON};
use crate::container::Container;
use crate::error::ConvertError;
use crate::format::{Format, RenderContext};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
struct TreeOptions {
    include_params: bool,
    show_linum: bool,
}

impl TreeOptions {
    fn from_extra(extra: &HashMap<String, String>) -> Self {
        let flag = |key: &str| {
            extra
                .get(key)
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };
        Self {
            include_params: flag("tree-full"),
            show_linum: flag("show-linum"),
        }
    }
}

fn linum(container: &Container, options: TreeOptions) -> String {
    if options.show_linum {
        format!("{:03} ", container.source_line)
    } else {
        String::new()
    }
}

fn format_container(
    container: &Container,
    prefix: &str,
    is_last: bool,
    options: TreeOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{}{} {} {}\n",
        linum(container, options),
        prefix,
        connector,
        get_icon(container.kind),
        container.display_label()
    ));
    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_body(container, &child_prefix, options, output);
}

fn format_body(container: &Container, prefix: &str, options: TreeOptions, output: &mut String) {
    let params: Vec<_> = if options.include_params {
        container.parameters.iter().collect()
    } else {
        Vec::new()
    };
    let total = params.len() + container.contents.len();
    for (i, (key, value)) in params.into_iter().enumerate() {
        let connector = if i + 1 == total { "└─" } else { "├─" };
        output.push_str(&format!("{prefix}{connector} {PARAMETER_ICON} {key}={value}\n"));
    }
    let offset = total - container.contents.len();
    for (i, child) in container.contents.iter().enumerate() {
        format_container(child, prefix, offset + i + 1 == total, options, output);
    }
}

/// Tree view of one top-level container.
pub fn to_treeviz_str(container: &Container, extra: &HashMap<String, String>) -> String {
    let options = TreeOptions::from_extra(extra);
    let mut output = format!(
        "{}{} {}\n",
        linum(container, options),
        get_icon(container.kind),
        container.display_label()
    );
    format_body(container, "", options, &mut output);
    output
}

/// Format implementation for treeviz format
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn render(
        &self,
        container: &Container,
        context: &RenderContext<'_>,
    ) -> Result<String, ConvertError> {
        Ok(to_treeviz_str(container, &context.options.extra))
    }
}
