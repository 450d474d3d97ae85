//! Container tree
//!
//! A [`Container`] is a typed node of the document tree. Its kind is decided
//! by the dispatch table from the literal text of its opening line, its
//! header lines and parameters are collected by the kind's parser, and its
//! children are materialized by the factory in document order.
//!
//! Containers keep every line they consumed (`begin`, `header`, the lines of
//! their children, `end`), so [`Container::source_lines`] reproduces the
//! input exactly. The partition invariant of the parser is checked against
//! that method in the tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Parameter set of a container: name → value, ordered by name.
pub type Parameters = BTreeMap<String, String>;

/// The closed set of container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Default passthrough: one unrecognized line kept verbatim
    Text,
    /// Inert single-line command that produces no output
    BlackBox,
    Header,
    Footer,
    /// Any layout without a more specific kind
    Layout,
    Paragraph,
    PlainLayout,
    Heading,
    Title,
    Author,
    BibEntry,
    /// Any inset without a more specific kind
    Inset,
    Formula,
    Label,
    Reference,
    Citation,
    BibItem,
    Footnote,
    Note,
    Newline,
    /// Inset whose children are spliced into the parent
    Branch,
    TextStyle,
    Table,
    Row,
    Cell,
    /// Synthesized wrapper produced by postprocessing stages
    Composite,
}

/// How a kind consumes its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Exactly one line
    Lone,
    /// Opening line, parameters and children up to an ending marker
    Bounded,
    /// Table body: rows, column records and parameter lines
    NestedList,
    /// `<tag k="v">` opening line, then bounded contents
    Attributed,
    /// Opening line, then undispatched text lines up to an ending marker
    Raw,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 26] = [
        ContainerKind::Text,
        ContainerKind::BlackBox,
        ContainerKind::Header,
        ContainerKind::Footer,
        ContainerKind::Layout,
        ContainerKind::Paragraph,
        ContainerKind::PlainLayout,
        ContainerKind::Heading,
        ContainerKind::Title,
        ContainerKind::Author,
        ContainerKind::BibEntry,
        ContainerKind::Inset,
        ContainerKind::Formula,
        ContainerKind::Label,
        ContainerKind::Reference,
        ContainerKind::Citation,
        ContainerKind::BibItem,
        ContainerKind::Footnote,
        ContainerKind::Note,
        ContainerKind::Newline,
        ContainerKind::Branch,
        ContainerKind::TextStyle,
        ContainerKind::Table,
        ContainerKind::Row,
        ContainerKind::Cell,
        ContainerKind::Composite,
    ];

    /// Name used in configuration files and tree output.
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Text => "text",
            ContainerKind::BlackBox => "black_box",
            ContainerKind::Header => "header",
            ContainerKind::Footer => "footer",
            ContainerKind::Layout => "layout",
            ContainerKind::Paragraph => "paragraph",
            ContainerKind::PlainLayout => "plain_layout",
            ContainerKind::Heading => "heading",
            ContainerKind::Title => "title",
            ContainerKind::Author => "author",
            ContainerKind::BibEntry => "bib_entry",
            ContainerKind::Inset => "inset",
            ContainerKind::Formula => "formula",
            ContainerKind::Label => "label",
            ContainerKind::Reference => "reference",
            ContainerKind::Citation => "citation",
            ContainerKind::BibItem => "bib_item",
            ContainerKind::Footnote => "footnote",
            ContainerKind::Note => "note",
            ContainerKind::Newline => "newline",
            ContainerKind::Branch => "branch",
            ContainerKind::TextStyle => "text_style",
            ContainerKind::Table => "table",
            ContainerKind::Row => "row",
            ContainerKind::Cell => "cell",
            ContainerKind::Composite => "composite",
        }
    }

    pub fn parser(self) -> ParserKind {
        match self {
            ContainerKind::Text
            | ContainerKind::BlackBox
            | ContainerKind::Footer
            | ContainerKind::Composite => ParserKind::Lone,
            ContainerKind::Table => ParserKind::NestedList,
            ContainerKind::Row | ContainerKind::Cell => ParserKind::Attributed,
            ContainerKind::Formula => ParserKind::Raw,
            _ => ParserKind::Bounded,
        }
    }

    /// Ending derived from the opening line, taking precedence over the
    /// configured ending. Style runs close with `<command> default`.
    pub fn ending_override(self, begin: &str) -> Option<String> {
        match self {
            ContainerKind::TextStyle => begin
                .split_whitespace()
                .next()
                .map(|command| format!("{command} default")),
            _ => None,
        }
    }

    /// Transparent kinds fan out into their children when materialized.
    pub fn is_transparent(self) -> bool {
        matches!(self, ContainerKind::Branch)
    }

    /// Every non-blank line inside the container is a parameter line.
    pub fn takes_all_parameters(self) -> bool {
        matches!(self, ContainerKind::Header)
    }

    /// Kinds whose leading `name value` lines are parameters rather than text.
    pub fn accepts_parameters(self) -> bool {
        matches!(
            self,
            ContainerKind::Header
                | ContainerKind::Inset
                | ContainerKind::Label
                | ContainerKind::Reference
                | ContainerKind::Citation
                | ContainerKind::BibItem
                | ContainerKind::Footnote
                | ContainerKind::Note
                | ContainerKind::Newline
                | ContainerKind::Branch
        )
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContainerKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown container kind '{s}'"))
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub kind: ContainerKind,
    /// Opening line, empty for synthesized containers
    pub begin: String,
    /// Raw parameter lines
    pub header: Vec<String>,
    pub parameters: Parameters,
    /// Auxiliary ordered records, such as table column definitions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Parameters>,
    pub contents: Vec<Container>,
    /// Closing line, for kinds that have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Pre-rendered markup computed during local processing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
    /// 1-based line where the container began (0 when synthesized)
    pub source_line: usize,
}

impl Container {
    pub fn new(kind: ContainerKind, begin: impl Into<String>, source_line: usize) -> Self {
        Self {
            kind,
            begin: begin.into(),
            header: Vec::new(),
            parameters: Parameters::new(),
            records: Vec::new(),
            contents: Vec::new(),
            end: None,
            rendered: None,
            source_line,
        }
    }

    /// A container built by a stage rather than read from input.
    pub fn synthesized(kind: ContainerKind, contents: Vec<Container>) -> Self {
        let mut container = Self::new(kind, "", 0);
        container.contents = contents;
        container
    }

    /// A synthesized passthrough line.
    pub fn text(line: impl Into<String>) -> Self {
        Self::new(ContainerKind::Text, line, 0)
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn set_parameter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(key.into(), value.into());
    }

    pub fn is_leaf(&self) -> bool {
        self.contents.is_empty()
    }

    /// Every input line this container consumed, in order.
    pub fn source_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_source_lines(&mut lines);
        lines
    }

    fn collect_source_lines(&self, lines: &mut Vec<String>) {
        // synthesized containers have no opening line
        if self.source_line != 0 || !self.begin.is_empty() {
            lines.push(self.begin.clone());
        }
        lines.extend(self.inner_lines());
        if let Some(end) = &self.end {
            lines.push(end.clone());
        }
    }

    /// The lines strictly between the opening and closing lines.
    pub fn inner_lines(&self) -> Vec<String> {
        let mut lines = self.header.clone();
        for child in &self.contents {
            child.collect_source_lines(&mut lines);
        }
        lines
    }

    /// Text of the passthrough lines below this container, joined without
    /// separators the way the format splits long lines.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, text: &mut String) {
        match self.kind {
            ContainerKind::Text => text.push_str(&self.begin),
            _ => {
                for child in &self.contents {
                    child.collect_text(text);
                }
            }
        }
    }

    /// Depth-first search over this container and its descendants.
    pub fn find_all(&self, kind: ContainerKind) -> Vec<&Container> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.kind == kind {
                found.push(node);
            }
        });
        found
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Container)) {
        visit(self);
        for child in &self.contents {
            child.walk(visit);
        }
    }

    /// Visit every descendant (not this container) mutably, parents first.
    pub fn for_each_descendant_mut(&mut self, visit: &mut impl FnMut(&mut Container)) {
        for child in &mut self.contents {
            visit(child);
            child.for_each_descendant_mut(visit);
        }
    }

    /// Short label used by tree views.
    pub fn display_label(&self) -> String {
        let label = match self.kind {
            ContainerKind::Text => self.begin.trim().to_string(),
            ContainerKind::Composite => format!("{} items", self.contents.len()),
            _ if self.begin.is_empty() => self.plain_text(),
            _ => self.begin.trim().to_string(),
        };
        truncate(&label, 30)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in ContainerKind::ALL {
            assert_eq!(kind.name().parse::<ContainerKind>(), Ok(kind));
        }
        assert!("chapter".parse::<ContainerKind>().is_err());
    }

    #[test]
    fn style_runs_close_with_default() {
        assert_eq!(
            ContainerKind::TextStyle.ending_override("\\emph on"),
            Some("\\emph default".to_string())
        );
        assert_eq!(ContainerKind::Paragraph.ending_override("\\emph on"), None);
    }

    #[test]
    fn source_lines_include_markers_and_header() {
        let mut inset = Container::new(ContainerKind::Label, "\\begin_inset CommandInset label", 2);
        inset.header = vec!["LatexCommand label".into(), "name \"a\"".into()];
        inset.end = Some("\\end_inset".into());

        let mut layout = Container::new(ContainerKind::Paragraph, "\\begin_layout Standard", 1);
        layout.contents = vec![Container::text("Hello"), inset];
        layout.end = Some("\\end_layout".into());

        assert_eq!(
            layout.source_lines(),
            vec![
                "\\begin_layout Standard",
                "Hello",
                "\\begin_inset CommandInset label",
                "LatexCommand label",
                "name \"a\"",
                "\\end_inset",
                "\\end_layout",
            ]
        );
        assert_eq!(layout.plain_text(), "Hello");
    }

    #[test]
    fn synthesized_wrappers_add_no_lines() {
        let composite = Container::synthesized(
            ContainerKind::Composite,
            vec![Container::new(ContainerKind::Text, "x", 4)],
        );
        assert_eq!(composite.source_lines(), vec!["x"]);
        assert_eq!(composite.display_label(), "1 items");
    }

    #[test]
    fn labels_are_truncated() {
        let long = Container::text("a".repeat(40));
        assert_eq!(long.display_label().chars().count(), 30);
    }
}
