//! JSON format: one serialized container tree per line
//!
//! Uses the `serde` representation of [`Container`]. With `pretty=true` in
//! the extra parameters each tree is pretty-printed instead.

use crate::container::Container;
use crate::error::ConvertError;
use crate::format::{Format, RenderContext};

pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Container trees as JSON, one top-level container per line"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json", "jsonl"]
    }

    fn render(
        &self,
        container: &Container,
        context: &RenderContext<'_>,
    ) -> Result<String, ConvertError> {
        let pretty = context
            .options
            .extra
            .get("pretty")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let json = if pretty {
            serde_json::to_string_pretty(container)
        } else {
            serde_json::to_string(container)
        }
        .map_err(|e| ConvertError::Render(format!("JSON serialization failed: {e}")))?;
        Ok(json + "\n")
    }
}
