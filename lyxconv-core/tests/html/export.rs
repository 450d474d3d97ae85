//! Export tests for the HTML format (LyX → HTML)
//!
//! These tests convert whole documents and check the resulting HTML.

use crate::common::{convert, document, fixture};
use lyxconv_core::{ConvertOptions, Converter, RenderOptions};

// ============================================================================
// PAGE STRUCTURE
// ============================================================================

#[test]
fn test_page_wrapper() {
    let html = convert(&fixture("sample.lyx"), "html");

    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(html.contains("<title>LyX Document</title>"));
    assert!(html.contains("<body class=\"paragraph-indent\">"));
    assert!(html.ends_with("</body>\n</html>\n"));
    // nothing from the header leaks into the body
    assert!(!html.contains("textclass"));
    assert!(!html.contains("amsmath"));
}

#[test]
fn test_title_option() {
    let converter = Converter::standard().unwrap();
    let options = ConvertOptions {
        render: RenderOptions {
            title: Some("Notes & Drafts".to_string()),
            ..Default::default()
        },
        ..ConvertOptions::new("html")
    };
    let html = lyxconv_core::convert_str(&document(""), &converter, &options).unwrap();
    assert!(html.contains("<title>Notes &amp; Drafts</title>"));
}

#[test]
fn test_language_from_header() {
    let text = document("").replace("\\language english", "\\language ngerman");
    let html = convert(&text, "html");
    assert!(html.contains("<html lang=\"de\">"));
}

// ============================================================================
// ELEMENTS
// ============================================================================

#[test]
fn test_title_and_author() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains("<h1 class=\"title\">A Small Test</h1>"));
    assert!(html.contains("<h2 class=\"author\">Jane Roe</h2>"));
}

#[test]
fn test_numbered_headings() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains(
        "<h2 id=\"toc-1\"><span class=\"number\">1</span>Introduction<a id=\"sec:intro\" class=\"label\"></a></h2>"
    ));
    assert!(html.contains("<h3 id=\"toc-1.1\"><span class=\"number\">1.1</span>Details</h3>"));
}

#[test]
fn test_reference_points_at_heading() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains("See section <a class=\"reference\" href=\"#toc-1\">1</a> for "));
}

#[test]
fn test_styles() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains("<em>more</em> about <strong>this</strong>."));
}

#[test]
fn test_formula_and_citation() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains("Energy is <span class=\"formula\">"));
    assert!(html.contains("<sup>2</sup>"));
    assert!(html.contains("<span class=\"citation\">[smith]</span>"));
}

#[test]
fn test_footnote() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert!(html.contains(
        "<a class=\"footnote-mark\" id=\"footnote-ref-1\" href=\"#footnote-1\">1</a>"
    ));
    assert!(html.contains(
        "<span class=\"footnote-text\" id=\"footnote-1\"><span class=\"plain-layout\">A footnote.</span></span>"
    ));
}

#[test]
fn test_bibliography_heading_once() {
    let html = convert(&fixture("sample.lyx"), "html");
    assert_eq!(html.matches("Bibliography").count(), 1);
    assert!(html.contains(
        "<h2>Bibliography</h2>\n<p class=\"biblio\"><span class=\"bibitem\" id=\"bib-smith\">[1]</span>Smith 2001</p>"
    ));
    assert!(html.contains(
        "<p class=\"biblio\"><span class=\"bibitem\" id=\"bib-doe\">[2]</span>Doe 2002</p>"
    ));
    let heading = html.find("<h2>Bibliography</h2>").unwrap();
    let first_entry = html.find("Smith 2001").unwrap();
    assert!(heading < first_entry);
}

#[test]
fn test_bibliography_heading_is_translated() {
    let body = "\\begin_layout Bibliography\n\\begin_inset CommandInset bibitem\nLatexCommand bibitem\nkey \"a\"\n\n\\end_inset\n\nA\n\\end_layout";
    let text = document(body).replace("\\language english", "\\language spanish");
    let html = convert(&text, "html");
    assert!(html.contains("<h2>Bibliografía</h2>"));
}

#[test]
fn test_text_is_escaped() {
    let html = convert(&document("\\begin_layout Standard\na < b & c\n\\end_layout"), "html");
    assert!(html.contains("<p>a &lt; b &amp; c</p>"));
}

#[test]
fn test_notes_are_dropped() {
    let body = "\\begin_layout Standard\nkept\n\\begin_inset Note Note\nstatus open\n\n\\begin_layout Plain Layout\nhidden\n\\end_layout\n\n\\end_inset\n\n\\end_layout";
    let html = convert(&document(body), "html");
    assert!(html.contains("<p>kept</p>"));
    assert!(!html.contains("hidden"));
}

#[test]
fn test_overlapping_style_runs() {
    let body = "\\begin_layout Standard\n\\emph on\nfoo \n\\series bold\nbar \n\\emph default\nbaz \n\\series default\nqux\n\\end_layout";
    let html = convert(&document(body), "html");
    assert!(html.contains("<p><em>foo <strong>bar </strong></em><strong>baz </strong>qux</p>"));
}

#[test]
fn test_formula_with_style_commands() {
    let body = "\\begin_layout Standard\n\\begin_inset Formula \\[\n\\bar x=1\n\\]\n\\end_inset\n\n\\end_layout\n\\begin_layout Standard\nafter\n\\end_layout";
    let html = convert(&document(body), "html");
    assert!(html.contains("<div class=\"formula\">"));
    assert!(html.contains("<p>after</p>"));
}

#[test]
fn test_filtered_output_is_a_fragment() {
    let converter = Converter::standard().unwrap();
    let options = ConvertOptions {
        filter_header_footer: true,
        ..ConvertOptions::new("html")
    };
    let html =
        lyxconv_core::convert_str(&fixture("sample.lyx"), &converter, &options).unwrap();
    assert!(html.starts_with("<h1 class=\"title\">"));
    assert!(!html.contains("<body"));
    assert!(!html.contains("</html>"));
}
