//! Error types for conversion

use crate::container::ContainerKind;
use thiserror::Error;

/// Errors that abort a conversion (or, for marker ambiguity, startup).
///
/// Local problems such as malformed attribute lines are not errors: they are
/// logged and parsing continues with a best-effort result.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Two container kinds registered the same start marker
    #[error("start marker '{marker}' is registered for both {first} and {second}")]
    AmbiguousMarker {
        marker: String,
        first: ContainerKind,
        second: ContainerKind,
    },
    /// End of input reached while a container was waiting for its ending
    #[error("unterminated {kind} opened at line {line}: '{text}'")]
    Unterminated {
        kind: ContainerKind,
        line: usize,
        text: String,
    },
    /// A bounded container kind has no ending configured and none was derived
    #[error("no ending marker known for {kind} opened at line {line}")]
    MissingEnding { kind: ContainerKind, line: usize },
    /// Nesting exceeded the configured maximum depth
    #[error("nesting deeper than {max_depth} levels at line {line}")]
    TooDeep { max_depth: usize, line: usize },
    /// Output format not found in the registry
    #[error("format '{0}' not found")]
    FormatNotFound(String),
    /// Error while producing output text
    #[error("render error: {0}")]
    Render(String),
    /// Reading input or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Source line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ConvertError::Unterminated { line, .. }
            | ConvertError::MissingEnding { line, .. }
            | ConvertError::TooDeep { line, .. } => Some(*line),
            _ => None,
        }
    }
}
