//! Format implementations
//!
//! Output formats for finalized container trees: `html` for publishing,
//! `raw` to reproduce the input, and `treeviz` and `json` for inspection.

pub mod html;
pub mod icons;
pub mod json;
pub mod raw;
pub mod treeviz;

pub use html::{default_css, HtmlFormat};
pub use json::JsonFormat;
pub use raw::RawFormat;
pub use treeviz::TreevizFormat;
