//! Shared helpers for the integration tests.

use lyxconv_core::{ConvertOptions, Converter, Document, StringLines};
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", path.display()))
}

/// Parse and postprocess `text` with the standard tables.
pub fn finalize(text: &str) -> Document {
    let converter = Converter::standard().expect("standard tables are unambiguous");
    let mut source = StringLines::new(text);
    let document = converter.parse(&mut source).expect("document parses");
    converter.postprocess(document, false)
}

pub fn convert(text: &str, format: &str) -> String {
    let converter = Converter::standard().expect("standard tables are unambiguous");
    lyxconv_core::convert_str(text, &converter, &ConvertOptions::new(format))
        .expect("conversion succeeds")
}

/// Wrap body lines in a minimal document.
pub fn document(body: &str) -> String {
    format!(
        "#LyX 2.3 created this file.\n\\lyxformat 544\n\\begin_document\n\\begin_header\n\\textclass article\n\\language english\n\\end_header\n\n\\begin_body\n{body}\n\\end_body\n\\end_document\n"
    )
}
