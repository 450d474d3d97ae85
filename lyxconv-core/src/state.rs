//! Per-document pipeline state
//!
//! Created fresh for every conversion. The header's local processing step
//! publishes the document settings (numbering, language, paragraph style);
//! the postprocessing stages read those settings and keep their counters and
//! label table here.

use serde::Serialize;
use std::collections::HashMap;

/// Heading level of a LyX sectioning layout. `Part` is 0, `Chapter` 1,
/// `Section` 2 and so on down to `Subparagraph` at 6.
pub fn heading_level(layout: &str) -> Option<usize> {
    let level = match layout.trim_end_matches('*') {
        "Part" => 0,
        "Chapter" => 1,
        "Section" => 2,
        "Subsection" => 3,
        "Subsubsection" => 4,
        "Paragraph" => 5,
        "Subparagraph" => 6,
        _ => return None,
    };
    Some(level)
}

pub const CHAPTER_LEVEL: usize = 1;
pub const SECTION_LEVEL: usize = 2;
pub const DEFAULT_SECNUMDEPTH: usize = 3;

/// Document classes whose top numbered unit is the chapter.
const CHAPTER_CLASSES: &[&str] = &[
    "book", "report", "memoir", "scrbook", "scrreprt", "amsbook", "extbook", "extreport",
];

/// How consecutive paragraphs are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    #[default]
    Indent,
    Skip,
}

impl ParagraphStyle {
    pub fn from_separation(value: &str) -> Option<Self> {
        match value {
            "indent" => Some(ParagraphStyle::Indent),
            "skip" => Some(ParagraphStyle::Skip),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParagraphStyle::Indent => "indent",
            ParagraphStyle::Skip => "skip",
        }
    }
}

/// The most recent numbered element, as seen by labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedRef {
    pub anchor: String,
    pub number: String,
}

/// Settings and counters for one document conversion.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineState {
    /// Level of the outermost numbered heading
    pub number_start_level: usize,
    /// Deepest numbered level, relative to LaTeX's `secnumdepth`
    pub max_number_depth: usize,
    pub language: String,
    pub paragraph_style: ParagraphStyle,
    pub document_class: Option<String>,
    pub last_numbered: Option<NumberedRef>,
    pub bibliography_header_emitted: bool,
    pub header_seen: bool,
    heading_counters: Vec<usize>,
    footnotes: usize,
    bibitems: usize,
    labels: HashMap<String, NumberedRef>,
}

impl PipelineState {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            number_start_level: SECTION_LEVEL,
            max_number_depth: DEFAULT_SECNUMDEPTH,
            language: default_language.into(),
            paragraph_style: ParagraphStyle::default(),
            document_class: None,
            last_numbered: None,
            bibliography_header_emitted: false,
            header_seen: false,
            heading_counters: Vec::new(),
            footnotes: 0,
            bibitems: 0,
            labels: HashMap::new(),
        }
    }

    /// Adopt the document class, switching to chapter numbering for
    /// book-like classes.
    pub fn set_document_class(&mut self, class: &str) {
        self.number_start_level = if CHAPTER_CLASSES.contains(&class) {
            CHAPTER_LEVEL
        } else {
            SECTION_LEVEL
        };
        self.document_class = Some(class.to_string());
    }

    /// Level of the document's top sectioning unit, whether or not it is
    /// numbered.
    pub fn top_level(&self) -> usize {
        match self.document_class.as_deref() {
            Some(class) if CHAPTER_CLASSES.contains(&class) => CHAPTER_LEVEL,
            _ => SECTION_LEVEL,
        }
    }

    /// Whether a heading at `level` receives a number. `secnumdepth` counts
    /// from 0 at the section, so sections are numbered at depth 1 and above.
    pub fn numbers_level(&self, level: usize) -> bool {
        level >= self.number_start_level && level <= self.max_number_depth + 1
    }

    /// Advance the heading counters for `level` and return the dotted
    /// number, e.g. `2.1`.
    pub fn next_heading_number(&mut self, level: usize) -> String {
        let depth = level.saturating_sub(self.number_start_level);
        if self.heading_counters.len() <= depth {
            self.heading_counters.resize(depth + 1, 0);
        }
        self.heading_counters[depth] += 1;
        self.heading_counters.truncate(depth + 1);
        self.heading_counters
            .iter()
            .map(|counter| counter.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn next_footnote(&mut self) -> usize {
        self.footnotes += 1;
        self.footnotes
    }

    pub fn next_bibitem(&mut self) -> usize {
        self.bibitems += 1;
        self.bibitems
    }

    pub fn record_label(&mut self, name: impl Into<String>, target: NumberedRef) {
        self.labels.insert(name.into(), target);
    }

    pub fn label(&self, name: &str) -> Option<&NumberedRef> {
        self.labels.get(name)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new("english")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_levels_ignore_star() {
        assert_eq!(heading_level("Section"), Some(2));
        assert_eq!(heading_level("Subsection*"), Some(3));
        assert_eq!(heading_level("Standard"), None);
    }

    #[test]
    fn article_numbers_from_sections() {
        let mut state = PipelineState::default();
        state.set_document_class("article");
        assert!(!state.numbers_level(CHAPTER_LEVEL));
        assert!(state.numbers_level(SECTION_LEVEL));
        assert!(state.numbers_level(4));
        assert!(!state.numbers_level(5));
    }

    #[test]
    fn book_numbers_from_chapters() {
        let mut state = PipelineState::default();
        state.set_document_class("book");
        assert_eq!(state.number_start_level, CHAPTER_LEVEL);
        assert_eq!(state.top_level(), CHAPTER_LEVEL);
        assert_eq!(state.next_heading_number(1), "1");
        assert_eq!(state.next_heading_number(2), "1.1");
        assert_eq!(state.next_heading_number(2), "1.2");
        assert_eq!(state.next_heading_number(1), "2");
        assert_eq!(state.next_heading_number(2), "2.1");
    }

    #[test]
    fn skipped_levels_count_from_zero() {
        let mut state = PipelineState::default();
        assert_eq!(state.next_heading_number(3), "0.1");
    }

    #[test]
    fn counters_are_independent() {
        let mut state = PipelineState::default();
        assert_eq!(state.next_footnote(), 1);
        assert_eq!(state.next_footnote(), 2);
        assert_eq!(state.next_bibitem(), 1);
    }

    #[test]
    fn paragraph_separation_values() {
        assert_eq!(ParagraphStyle::from_separation("skip"), Some(ParagraphStyle::Skip));
        assert_eq!(ParagraphStyle::from_separation("other"), None);
    }
}
