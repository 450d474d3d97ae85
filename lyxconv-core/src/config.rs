//! Container configuration tables
//!
//! Three tables drive parsing: start markers (marker → kind), endings
//! (kind → closing marker) and parameter names (line keyword → parameter
//! key). [`ContainerConfig::standard`] carries the built-in tables for the
//! LyX format; `lyxconv-config` loads the same data from TOML so users can
//! extend it.

use crate::container::ContainerKind;
use std::collections::HashMap;

/// Start markers and ending of one container kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindDefinition {
    pub kind: ContainerKind,
    pub starts: Vec<String>,
    pub ending: Option<String>,
}

impl KindDefinition {
    pub fn new(kind: ContainerKind, starts: &[&str], ending: Option<&str>) -> Self {
        Self {
            kind,
            starts: starts.iter().map(|s| s.to_string()).collect(),
            ending: ending.map(str::to_string),
        }
    }
}

/// Configuration consumed by the dispatch table and the parsers.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerConfig {
    pub kinds: Vec<KindDefinition>,
    /// Parameter line keyword → parameter key
    pub parameters: HashMap<String, String>,
    /// Maximum container nesting before parsing gives up
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 200;

const END_LAYOUT: Option<&str> = Some("\\end_layout");
const END_INSET: Option<&str> = Some("\\end_inset");

impl ContainerConfig {
    /// The built-in tables for LyX documents.
    pub fn standard() -> Self {
        use ContainerKind::*;

        let kinds = vec![
            KindDefinition::new(
                BlackBox,
                &[
                    "#LyX",
                    "\\lyxformat",
                    "\\begin_document",
                    "\\begin_body",
                    "\\end_body",
                    "\\begin_deeper",
                    "\\end_deeper",
                    "\\lang",
                    "\\align",
                    "\\noindent",
                    "\\leftindent",
                    "\\paragraph_spacing",
                    "\\labelwidthstring",
                    "\\start_of_appendix",
                    "\\emph default",
                    "\\series default",
                    "\\shape default",
                    "\\family default",
                    "\\bar default",
                    "\\noun default",
                    "\\color",
                    "\\size",
                    "\\strikeout",
                    "\\uuline",
                    "\\uwave",
                    "\\xout",
                    "\\numeric",
                    "\\nospellcheck",
                ],
                None,
            ),
            KindDefinition::new(Header, &["\\begin_header"], Some("\\end_header")),
            KindDefinition::new(Footer, &["\\end_document"], None),
            KindDefinition::new(Layout, &["\\begin_layout"], END_LAYOUT),
            KindDefinition::new(Paragraph, &["\\begin_layout Standard"], END_LAYOUT),
            KindDefinition::new(PlainLayout, &["\\begin_layout Plain Layout"], END_LAYOUT),
            KindDefinition::new(
                Heading,
                &[
                    "\\begin_layout Part",
                    "\\begin_layout Part*",
                    "\\begin_layout Chapter",
                    "\\begin_layout Chapter*",
                    "\\begin_layout Section",
                    "\\begin_layout Section*",
                    "\\begin_layout Subsection",
                    "\\begin_layout Subsection*",
                    "\\begin_layout Subsubsection",
                    "\\begin_layout Subsubsection*",
                    "\\begin_layout Paragraph",
                    "\\begin_layout Paragraph*",
                    "\\begin_layout Subparagraph",
                    "\\begin_layout Subparagraph*",
                ],
                END_LAYOUT,
            ),
            KindDefinition::new(Title, &["\\begin_layout Title"], END_LAYOUT),
            KindDefinition::new(Author, &["\\begin_layout Author"], END_LAYOUT),
            KindDefinition::new(BibEntry, &["\\begin_layout Bibliography"], END_LAYOUT),
            KindDefinition::new(Inset, &["\\begin_inset"], END_INSET),
            KindDefinition::new(Formula, &["\\begin_inset Formula"], END_INSET),
            KindDefinition::new(Label, &["\\begin_inset CommandInset label"], END_INSET),
            KindDefinition::new(Reference, &["\\begin_inset CommandInset ref"], END_INSET),
            KindDefinition::new(Citation, &["\\begin_inset CommandInset citation"], END_INSET),
            KindDefinition::new(BibItem, &["\\begin_inset CommandInset bibitem"], END_INSET),
            KindDefinition::new(Footnote, &["\\begin_inset Foot"], END_INSET),
            KindDefinition::new(Note, &["\\begin_inset Note"], END_INSET),
            KindDefinition::new(Newline, &["\\begin_inset Newline"], END_INSET),
            KindDefinition::new(Branch, &["\\begin_inset Branch"], END_INSET),
            KindDefinition::new(
                TextStyle,
                &["\\emph", "\\series", "\\shape", "\\family", "\\bar", "\\noun"],
                None,
            ),
            KindDefinition::new(Table, &["<lyxtabular"], Some("</lyxtabular>")),
            KindDefinition::new(Row, &["<row"], Some("</row>")),
            KindDefinition::new(Cell, &["<cell"], Some("</cell>")),
        ];

        let parameters = [
            ("LatexCommand", "command"),
            ("name", "name"),
            ("reference", "reference"),
            ("key", "key"),
            ("label", "label"),
            ("status", "status"),
            ("literal", "literal"),
            ("before", "before"),
            ("after", "after"),
            ("plural", "plural"),
            ("caps", "caps"),
            ("noprefix", "noprefix"),
            ("nolink", "nolink"),
        ]
        .into_iter()
        .map(|(name, key)| (name.to_string(), key.to_string()))
        .collect();

        Self {
            kinds,
            parameters,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Configured ending marker of a kind.
    pub fn ending(&self, kind: ContainerKind) -> Option<&str> {
        self.kinds
            .iter()
            .find(|def| def.kind == kind && def.ending.is_some())
            .and_then(|def| def.ending.as_deref())
    }

    /// Parameter key for a line keyword, if it is a registered parameter.
    pub fn parameter_key(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Every (start marker, kind) pair, in registration order.
    pub fn start_entries(&self) -> impl Iterator<Item = (&str, ContainerKind)> {
        self.kinds
            .iter()
            .flat_map(|def| def.starts.iter().map(move |start| (start.as_str(), def.kind)))
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::standard()
    }
}
