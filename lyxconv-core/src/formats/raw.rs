//! Raw format: every consumed line, unchanged
//!
//! Renders a container as the exact lines it was parsed from. Synthesized
//! containers contribute only the lines of their children, so converting
//! with this format reproduces the input.

use crate::container::Container;
use crate::error::ConvertError;
use crate::format::{Format, RenderContext};

pub struct RawFormat;

impl Format for RawFormat {
    fn name(&self) -> &str {
        "raw"
    }

    fn description(&self) -> &str {
        "Source lines as read, without rendering"
    }

    fn file_extensions(&self) -> &[&str] {
        &["lyx"]
    }

    fn render(&self, container: &Container, _: &RenderContext<'_>) -> Result<String, ConvertError> {
        let mut text = String::new();
        for line in container.source_lines() {
            text.push_str(&line);
            text.push('\n');
        }
        Ok(text)
    }
}
