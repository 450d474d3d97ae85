//! Local processing (pass 1)
//!
//! Runs once per container, right after its children were created and
//! processed, so the pass is bottom-up by construction. Only the document
//! header may write to the [`PipelineState`]; every other step derives
//! parameters from the container itself.

use crate::container::{Container, ContainerKind};
use crate::formula::FormulaTranslator;
use crate::state::{heading_level, ParagraphStyle, PipelineState, DEFAULT_SECNUMDEPTH};
use log::{debug, warn};

pub struct LocalProcessor<'a> {
    translator: &'a dyn FormulaTranslator,
    state: &'a mut PipelineState,
}

impl<'a> LocalProcessor<'a> {
    pub fn new(translator: &'a dyn FormulaTranslator, state: &'a mut PipelineState) -> Self {
        Self { translator, state }
    }

    pub fn state(&self) -> &PipelineState {
        &*self.state
    }

    pub fn process(&mut self, container: &mut Container) {
        match container.kind {
            ContainerKind::Header => publish_header(container, self.state),
            ContainerKind::Heading => process_heading(container),
            ContainerKind::Layout
            | ContainerKind::Paragraph
            | ContainerKind::PlainLayout
            | ContainerKind::Title
            | ContainerKind::Author
            | ContainerKind::BibEntry => record_layout(container),
            ContainerKind::Formula => process_formula(container, self.translator),
            ContainerKind::TextStyle => process_style(container),
            ContainerKind::Inset => record_inset_type(container),
            _ => {}
        }
    }
}

/// Remainder of the opening line after `skip` tokens.
fn opening_argument(container: &Container, skip: usize) -> String {
    container
        .begin
        .split_whitespace()
        .skip(skip)
        .collect::<Vec<_>>()
        .join(" ")
}

fn publish_header(header: &Container, state: &mut PipelineState) {
    if state.header_seen {
        warn!(
            "ignoring second document header at line {}",
            header.source_line
        );
        return;
    }
    state.header_seen = true;

    if let Some(class) = header.parameter("textclass") {
        state.set_document_class(class);
    }
    match header.parameter("secnumdepth").map(str::parse::<i64>) {
        // LyX writes -1 when numbering is turned off
        Some(Ok(depth)) if depth < 0 => {
            state.number_start_level = usize::MAX;
            state.max_number_depth = 0;
        }
        Some(Ok(depth)) => state.max_number_depth = depth as usize,
        Some(Err(_)) => warn!("invalid secnumdepth, using {DEFAULT_SECNUMDEPTH}"),
        None => {}
    }
    if let Some(language) = header.parameter("language") {
        state.language = language.to_string();
    }
    if let Some(separation) = header.parameter("paragraph_separation") {
        match ParagraphStyle::from_separation(separation) {
            Some(style) => state.paragraph_style = style,
            None => warn!("unknown paragraph separation '{separation}'"),
        }
    }
    debug!(
        "document settings: class {:?}, numbering levels {}..={}, language {}, {} paragraphs",
        state.document_class,
        state.number_start_level,
        state.max_number_depth + 1,
        state.language,
        state.paragraph_style.name()
    );
}

fn record_layout(container: &mut Container) {
    let layout = opening_argument(container, 1);
    container.set_parameter("layout", layout);
}

fn record_inset_type(container: &mut Container) {
    let inset = opening_argument(container, 1);
    container.set_parameter("inset", inset);
}

fn process_heading(container: &mut Container) {
    let layout = opening_argument(container, 1);
    let starred = layout.ends_with('*');
    match heading_level(&layout) {
        Some(level) => container.set_parameter("level", level.to_string()),
        None => warn!(
            "unknown heading layout '{layout}' at line {}",
            container.source_line
        ),
    }
    container.set_parameter("starred", starred.to_string());
    container.set_parameter("layout", layout);
}

fn process_formula(container: &mut Container, translator: &dyn FormulaTranslator) {
    let mut raw = opening_argument(container, 2);
    for line in container.inner_lines() {
        if !raw.is_empty() {
            raw.push('\n');
        }
        raw.push_str(&line);
    }
    container.rendered = Some(translator.translate(&raw));
    container.set_parameter("formula", raw);
}

fn process_style(container: &mut Container) {
    let mut tokens = container.begin.split_whitespace();
    let style = tokens
        .next()
        .map(|command| command.trim_start_matches('\\').to_string())
        .unwrap_or_default();
    let value = tokens.next().unwrap_or("on").to_string();
    container.set_parameter("style", style);
    container.set_parameter("value", value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::BasicFormulaTranslator;

    fn header(params: &[(&str, &str)]) -> Container {
        let mut header = Container::new(ContainerKind::Header, "\\begin_header", 3);
        for (key, value) in params {
            header.set_parameter(*key, *value);
        }
        header
    }

    #[test]
    fn header_publishes_settings_once() {
        let mut state = PipelineState::default();
        let translator = BasicFormulaTranslator;
        let mut processor = LocalProcessor::new(&translator, &mut state);

        let mut first = header(&[
            ("textclass", "book"),
            ("secnumdepth", "2"),
            ("language", "spanish"),
            ("paragraph_separation", "skip"),
        ]);
        processor.process(&mut first);
        let mut second = header(&[("textclass", "article"), ("language", "french")]);
        processor.process(&mut second);

        let state = processor.state();
        assert!(state.header_seen);
        assert_eq!(state.number_start_level, 1);
        assert_eq!(state.max_number_depth, 2);
        assert_eq!(state.language, "spanish");
        assert_eq!(state.paragraph_style, ParagraphStyle::Skip);
    }

    #[test]
    fn disabled_numbering() {
        let mut state = PipelineState::default();
        let translator = BasicFormulaTranslator;
        let mut processor = LocalProcessor::new(&translator, &mut state);
        processor.process(&mut header(&[("secnumdepth", "-1")]));
        assert!(!processor.state().numbers_level(2));
    }

    #[test]
    fn heading_levels_and_stars() {
        let mut heading = Container::new(ContainerKind::Heading, "\\begin_layout Subsection*", 1);
        process_heading(&mut heading);
        assert_eq!(heading.parameter("level"), Some("3"));
        assert_eq!(heading.parameter("starred"), Some("true"));
        assert_eq!(heading.parameter("layout"), Some("Subsection*"));
    }

    #[test]
    fn formula_text_is_translated() {
        let mut formula = Container::new(ContainerKind::Formula, "\\begin_inset Formula $x$", 1);
        process_formula(&mut formula, &BasicFormulaTranslator);
        assert_eq!(formula.parameter("formula"), Some("$x$"));
        assert_eq!(
            formula.rendered.as_deref(),
            Some("<span class=\"formula\"><i>x</i></span>")
        );
    }

    #[test]
    fn multi_line_formulas_join_content() {
        let mut formula = Container::new(ContainerKind::Formula, "\\begin_inset Formula \\[", 1);
        formula.contents = vec![Container::text("a"), Container::text("\\]")];
        process_formula(&mut formula, &BasicFormulaTranslator);
        assert_eq!(formula.parameter("formula"), Some("\\[\na\n\\]"));
        assert!(formula.rendered.unwrap().starts_with("<div"));
    }

    #[test]
    fn style_runs_record_value() {
        let mut style = Container::new(ContainerKind::TextStyle, "\\series bold", 1);
        process_style(&mut style);
        assert_eq!(style.parameter("style"), Some("series"));
        assert_eq!(style.parameter("value"), Some("bold"));
    }
}
