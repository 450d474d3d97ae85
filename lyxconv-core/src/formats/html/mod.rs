//! HTML format implementation
//!
//! Renders the finalized container tree as HTML5. DOM subtrees are built with
//! `markup5ever_rcdom` and serialized with `html5ever`, which takes care of
//! escaping; formula fragments produced during local processing are parsed
//! with `html5ever` and spliced into the tree.
//!
//! # Element Mapping Table
//!
//! | Container          | HTML                                                        |
//! |--------------------|-------------------------------------------------------------|
//! | Header / Footer    | page opening (doctype, head, css, `<body>`) / closing tags  |
//! | Paragraph          | `<p>`                                                       |
//! | Heading            | `<hN id="toc-…">` with `<span class="number">`              |
//! | Title / Author     | `<h1 class="title">` / `<h2 class="author">`                |
//! | Layout             | `<div class="…">`, `<blockquote>`, `<pre class="lyx-code">` |
//! | PlainLayout        | `<span class="plain-layout">`                               |
//! | BibEntry / BibItem | `<p class="biblio">` / `<span class="bibitem">[n]</span>`   |
//! | Formula            | translator fragment                                         |
//! | Label / Reference  | `<a id>` / `<a class="reference" href>`                     |
//! | Citation           | `<span class="citation">[key]</span>`                       |
//! | Footnote           | mark link plus `<span class="footnote-text">`               |
//! | TextStyle          | `<em>`, `<strong>`, `<i>`, `<code>`, `<u>`, `<span>`        |
//! | Table / Row / Cell | `<table><tbody>` / `<tr>` / `<td>`                          |
//! | Note, BlackBox     | nothing                                                     |
//!
//! # Filtering
//!
//! When the conversion elides the header and footer, the output is a bare
//! fragment suitable for inclusion in another page.

mod serializer;

use crate::container::{Container, ContainerKind};
use crate::error::ConvertError;
use crate::format::{Format, RenderContext};

pub use serializer::{default_css, document_end, document_start};

/// Format implementation for HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML5 document with embedded CSS"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn render(
        &self,
        container: &Container,
        context: &RenderContext<'_>,
    ) -> Result<String, ConvertError> {
        match container.kind {
            ContainerKind::Header => Ok(serializer::document_start(context)),
            ContainerKind::Footer => Ok(serializer::document_end()),
            _ => serializer::render_fragment(container, context),
        }
    }
}
