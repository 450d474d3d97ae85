//! Format trait definition
//!
//! A format renders finalized top-level containers to text. The conversion
//! driver calls [`Format::render`] once per top-level container, in document
//! order, and concatenates the results.

use crate::container::Container;
use crate::error::ConvertError;
use crate::state::PipelineState;
use std::collections::HashMap;

/// Caller-provided rendering options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Document title, for formats that have a place for one
    pub title: Option<String>,
    /// Stylesheet appended after the built-in one
    pub custom_css: Option<String>,
    /// Format-specific settings passed through from the command line
    pub extra: HashMap<String, String>,
}

/// Everything a format may consult besides the container itself.
pub struct RenderContext<'a> {
    pub state: &'a PipelineState,
    pub options: &'a RenderOptions,
}

/// Trait for output formats
///
/// # Examples
///
/// ```ignore
/// struct KindsFormat;
///
/// impl Format for KindsFormat {
///     fn name(&self) -> &str {
///         "kinds"
///     }
///
///     fn render(&self, container: &Container, _: &RenderContext) -> Result<String, ConvertError> {
///         Ok(format!("{}\n", container.kind))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "html", "treeviz")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Render one finalized top-level container.
    fn render(
        &self,
        container: &Container,
        context: &RenderContext<'_>,
    ) -> Result<String, ConvertError>;
}
