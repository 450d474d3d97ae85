//! HTML serialization (container tree → HTML)
//!
//! Pipeline per top-level container: Container → RcDom subtree → HTML string.
//! The document header and footer do not go through the DOM: they open and
//! close the page around everything else.

use crate::container::{Container, ContainerKind};
use crate::error::ConvertError;
use crate::format::RenderContext;
use crate::translations::language_code;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute,
    LocalName, ParseOpts, QualName,
};
use log::warn;
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

const DEFAULT_CSS: &str = include_str!("../../../css/lyxconv.css");

/// The stylesheet embedded in every page.
pub fn default_css() -> &'static str {
    DEFAULT_CSS
}

/// Opening of the page: doctype, head with the embedded stylesheet, body.
pub fn document_start(context: &RenderContext<'_>) -> String {
    let css = DEFAULT_CSS;
    let custom_css = context.options.custom_css.as_deref().unwrap_or("");
    let title = html_escape(context.options.title.as_deref().unwrap_or("LyX Document"));
    let lang = language_code(&context.state.language);
    let body_class = format!("paragraph-{}", context.state.paragraph_style.name());

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="generator" content="lyxconv">
  <title>{title}</title>
  <style>
{css}
{custom_css}
  </style>
</head>
<body class="{body_class}">
"#
    )
}

/// Closing of the page.
pub fn document_end() -> String {
    "</body>\n</html>\n".to_string()
}

/// Render one top-level container as an HTML fragment, one line per
/// top-level element.
pub fn render_fragment(
    container: &Container,
    context: &RenderContext<'_>,
) -> Result<String, ConvertError> {
    let holder = create_element("div", vec![]);
    render_node(&holder, container, context)?;
    serialize_children(&holder)
}

fn render_node(
    parent: &Handle,
    container: &Container,
    context: &RenderContext<'_>,
) -> Result<(), ConvertError> {
    match container.kind {
        ContainerKind::Text => {
            let text = match container.begin.as_str() {
                "\\backslash" => "\\",
                line => line,
            };
            if !text.is_empty() {
                append(parent, create_text(text));
            }
        }

        ContainerKind::BlackBox
        | ContainerKind::Header
        | ContainerKind::Footer
        | ContainerKind::Note => {}

        ContainerKind::Paragraph => {
            let p = append(parent, create_element("p", vec![]));
            render_children(&p, container, context)?;
        }

        ContainerKind::Layout => {
            let layout = container.parameter("layout").unwrap_or("");
            let element = match layout {
                "Quote" | "Quotation" => create_element("blockquote", vec![]),
                "LyX-Code" => create_element("pre", vec![("class", "lyx-code")]),
                _ => create_element("div", vec![("class", &css_class(layout))]),
            };
            let element = append(parent, element);
            render_children(&element, container, context)?;
        }

        ContainerKind::PlainLayout => {
            let span = append(parent, create_element("span", vec![("class", "plain-layout")]));
            render_children(&span, container, context)?;
        }

        ContainerKind::Heading => {
            let level = container
                .parameter("level")
                .and_then(|level| level.parse::<usize>().ok())
                .unwrap_or(2)
                .clamp(1, 6);
            let tag = format!("h{level}");
            let mut attrs = vec![];
            if let Some(anchor) = container.parameter("anchor") {
                attrs.push(("id", anchor));
            }
            let heading = append(parent, create_element(&tag, attrs));
            if let Some(number) = container.parameter("number") {
                let span = append(&heading, create_element("span", vec![("class", "number")]));
                append(&span, create_text(number));
            }
            render_children(&heading, container, context)?;
        }

        ContainerKind::Title => {
            let h1 = append(parent, create_element("h1", vec![("class", "title")]));
            render_children(&h1, container, context)?;
        }

        ContainerKind::Author => {
            let h2 = append(parent, create_element("h2", vec![("class", "author")]));
            render_children(&h2, container, context)?;
        }

        ContainerKind::BibEntry => {
            let p = append(parent, create_element("p", vec![("class", "biblio")]));
            render_children(&p, container, context)?;
        }

        ContainerKind::BibItem => {
            let key = container.parameter("key").unwrap_or("");
            let id = format!("bib-{key}");
            let shown = container
                .parameter("label")
                .filter(|label| !label.is_empty())
                .or_else(|| container.parameter("number"))
                .unwrap_or(key);
            let span = append(
                parent,
                create_element("span", vec![("class", "bibitem"), ("id", &id)]),
            );
            append(&span, create_text(&format!("[{shown}]")));
        }

        ContainerKind::Inset => render_inset(parent, container, context)?,

        ContainerKind::Formula => match &container.rendered {
            Some(fragment) => {
                for node in parse_fragment(fragment) {
                    append(parent, node);
                }
            }
            None => {
                let formula = container.parameter("formula").unwrap_or("");
                let span = append(parent, create_element("span", vec![("class", "formula")]));
                append(&span, create_text(formula));
            }
        },

        ContainerKind::Label => {
            let name = container.parameter("name").unwrap_or("");
            append(
                parent,
                create_element("a", vec![("id", name), ("class", "label")]),
            );
        }

        ContainerKind::Reference => {
            let key = container.parameter("reference").unwrap_or("");
            let href = format!("#{}", container.parameter("target").unwrap_or(key));
            let shown = container.parameter("number").unwrap_or(key);
            let a = append(
                parent,
                create_element("a", vec![("class", "reference"), ("href", &href)]),
            );
            append(&a, create_text(shown));
        }

        ContainerKind::Citation => {
            let key = container.parameter("key").unwrap_or("");
            let span = append(parent, create_element("span", vec![("class", "citation")]));
            append(&span, create_text(&format!("[{key}]")));
        }

        ContainerKind::Footnote => {
            let number = container.parameter("number").unwrap_or("*");
            let mark_id = format!("footnote-ref-{number}");
            let text_id = format!("footnote-{number}");
            let href = format!("#{text_id}");
            let span = append(parent, create_element("span", vec![("class", "footnote")]));
            let mark = append(
                &span,
                create_element(
                    "a",
                    vec![("class", "footnote-mark"), ("id", &mark_id), ("href", &href)],
                ),
            );
            append(&mark, create_text(number));
            let text = append(
                &span,
                create_element("span", vec![("class", "footnote-text"), ("id", &text_id)]),
            );
            render_children(&text, container, context)?;
        }

        ContainerKind::Newline => {
            append(parent, create_element("br", vec![]));
        }

        ContainerKind::Branch | ContainerKind::Composite => {
            render_children(parent, container, context)?;
        }

        ContainerKind::TextStyle => {
            let style = container.parameter("style").unwrap_or("");
            let value = container.parameter("value").unwrap_or("");
            match style_element(style, value) {
                Some((tag, class)) => {
                    let attrs = class.map(|class| vec![("class", class)]).unwrap_or_default();
                    let element = append(parent, create_element(tag, attrs));
                    render_children(&element, container, context)?;
                }
                None => {
                    if !matches!(value, "default" | "off" | "medium" | "up" | "roman" | "no") {
                        warn!(
                            "line {}: unknown style value '{style} {value}'",
                            container.source_line
                        );
                    }
                    render_children(parent, container, context)?;
                }
            }
        }

        ContainerKind::Table => {
            let table = append(parent, create_element("table", vec![]));
            let tbody = append(&table, create_element("tbody", vec![]));
            render_children(&tbody, container, context)?;
        }

        ContainerKind::Row => {
            let tr = append(parent, create_element("tr", vec![]));
            render_children(&tr, container, context)?;
        }

        ContainerKind::Cell => {
            let style = container
                .parameter("alignment")
                .filter(|align| matches!(*align, "left" | "center" | "right"))
                .map(|align| format!("text-align: {align}"));
            let attrs = match &style {
                Some(style) => vec![("style", style.as_str())],
                None => vec![],
            };
            let td = append(parent, create_element("td", attrs));
            render_children(&td, container, context)?;
        }
    }
    Ok(())
}

fn render_children(
    parent: &Handle,
    container: &Container,
    context: &RenderContext<'_>,
) -> Result<(), ConvertError> {
    for child in &container.contents {
        render_node(parent, child, context)?;
    }
    Ok(())
}

/// Insets without a specific kind, told apart by their type word.
fn render_inset(
    parent: &Handle,
    container: &Container,
    context: &RenderContext<'_>,
) -> Result<(), ConvertError> {
    let inset = container.parameter("inset").unwrap_or("");
    let mut words = inset.split_whitespace();
    match words.next().unwrap_or("") {
        "Quotes" => {
            append(parent, create_text(quote_mark(words.next().unwrap_or(""))));
        }
        "space" => {
            append(parent, create_text("\u{a0}"));
        }
        "ERT" | "Comment" | "CommandInset" | "Index" | "Marginal" => {}
        "Tabular" | "Text" => render_children(parent, container, context)?,
        other => {
            let class = format!("inset {}", css_class(other));
            let span = append(parent, create_element("span", vec![("class", &class)]));
            render_children(&span, container, context)?;
        }
    }
    Ok(())
}

/// LyX quote codes: language letter, side (`l`/`r`), single or double.
fn quote_mark(code: &str) -> &'static str {
    let mut chars = code.chars().skip(1);
    let side = chars.next();
    let double = chars.next() != Some('s');
    match (side, double) {
        (Some('l'), true) => "“",
        (Some('l'), false) => "‘",
        (_, true) => "”",
        (_, false) => "’",
    }
}

fn style_element(style: &str, value: &str) -> Option<(&'static str, Option<&'static str>)> {
    let element = match (style, value) {
        ("emph", "on") => ("em", None),
        ("series", "bold") => ("strong", None),
        ("shape", "italic") | ("shape", "slanted") => ("i", None),
        ("shape", "smallcaps") | ("noun", "on") => ("span", Some("noun")),
        ("family", "typewriter") => ("code", None),
        ("family", "sans") => ("span", Some("sans")),
        ("bar", "under") => ("u", None),
        _ => return None,
    };
    Some(element)
}

/// `Plain Layout` → `plain-layout`
fn css_class(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a pre-rendered fragment into DOM nodes.
fn parse_fragment(fragment: &str) -> Vec<Handle> {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{fragment}</body></html>");
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    find_element(&dom.document, "body")
        .map(|body| body.children.take())
        .unwrap_or_default()
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: ref qname, .. } = handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, name))
}

fn append(parent: &Handle, child: Handle) -> Handle {
    parent.children.borrow_mut().push(child.clone());
    child
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize each child of `holder`, one per line
fn serialize_children(holder: &Handle) -> Result<String, ConvertError> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut html = String::new();
    for child in holder.children.borrow().iter() {
        let mut output = Vec::new();
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| ConvertError::Render(format!("HTML serialization failed: {e}")))?;
        let text = String::from_utf8(output)
            .map_err(|e| ConvertError::Render(format!("UTF-8 conversion failed: {e}")))?;
        html.push_str(&text);
        html.push('\n');
    }
    Ok(html)
}

/// Escape HTML special characters in text
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
