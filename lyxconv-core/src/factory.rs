//! Container factory
//!
//! The single recursion point of parsing: [`Factory::create_one`] resolves the
//! current line's kind, lets the kind's parser consume the container (the
//! parser calls back here for every child) and finally runs the local
//! processing step. Because children are complete before their parent's
//! parse returns, local processing is bottom-up.

use crate::config::ContainerConfig;
use crate::container::{Container, ContainerKind, Parameters};
use crate::dispatch::DispatchTable;
use crate::error::ConvertError;
use crate::formula::FormulaTranslator;
use crate::lines::LineSource;
use crate::parser;
use crate::process::LocalProcessor;
use crate::state::PipelineState;
use log::debug;

/// A style run that stopped at the closer of a run around it.
#[derive(Debug)]
struct CutStyle {
    /// Closing line of the enclosing run
    cut_by: String,
    ending: String,
    parameters: Parameters,
}

pub struct Factory<'a> {
    dispatch: &'a DispatchTable,
    config: &'a ContainerConfig,
    processor: LocalProcessor<'a>,
    depth: usize,
    processed: Vec<(ContainerKind, usize)>,
    /// Endings of the style runs being parsed, innermost last
    open_styles: Vec<String>,
    /// Set by the parser when the current run stopped at an enclosing closer
    cut_at: Option<String>,
    cut_styles: Vec<CutStyle>,
}

impl<'a> Factory<'a> {
    pub fn new(
        dispatch: &'a DispatchTable,
        config: &'a ContainerConfig,
        translator: &'a dyn FormulaTranslator,
        state: &'a mut PipelineState,
    ) -> Self {
        Self {
            dispatch,
            config,
            processor: LocalProcessor::new(translator, state),
            depth: 0,
            processed: Vec::new(),
            open_styles: Vec::new(),
            cut_at: None,
            cut_styles: Vec::new(),
        }
    }

    pub fn dispatch(&self) -> &DispatchTable {
        self.dispatch
    }

    pub fn config(&self) -> &ContainerConfig {
        self.config
    }

    pub fn state(&self) -> &PipelineState {
        self.processor.state()
    }

    /// Kind and opening line of every container, in the order local
    /// processing ran on them.
    pub fn processing_order(&self) -> &[(ContainerKind, usize)] {
        &self.processed
    }

    /// Materialize the container that starts at the current line.
    pub fn create_one(&mut self, source: &mut dyn LineSource) -> Result<Container, ConvertError> {
        let line = source.line_number();
        if self.depth >= self.config.max_depth {
            return Err(ConvertError::TooDeep {
                max_depth: self.config.max_depth,
                line,
            });
        }

        let begin = source.current_line().to_string();
        let kind = self.dispatch.resolve(&begin);
        let mut container = Container::new(kind, begin, line);
        let ending = kind.ending_override(&container.begin);

        // style runs see the runs around them, other containers start afresh
        let style_ending = ending.clone().filter(|_| kind == ContainerKind::TextStyle);
        let enclosing_styles = match &style_ending {
            Some(style_ending) => {
                self.open_styles.push(style_ending.clone());
                None
            }
            None => Some(std::mem::take(&mut self.open_styles)),
        };
        self.depth += 1;
        let parsed = parser::parse(self, source, &mut container, ending.as_deref());
        self.depth -= 1;
        match enclosing_styles {
            Some(styles) => self.open_styles = styles,
            None => {
                self.open_styles.pop();
            }
        }
        parsed?;

        self.processor.process(&mut container);
        self.processed.push((kind, line));
        if let (Some(ending), Some(cut_by)) = (style_ending, self.cut_at.take()) {
            self.cut_styles.push(CutStyle {
                cut_by,
                ending,
                parameters: container.parameters.clone(),
            });
        }
        Ok(container)
    }

    /// Whether `line` closes a style run around the innermost one.
    pub(crate) fn closes_enclosing_style(&self, line: &str) -> bool {
        match self.open_styles.split_last() {
            Some((_, enclosing)) => enclosing
                .iter()
                .any(|ending| parser::is_ending(line, ending)),
            None => false,
        }
    }

    /// Record that the innermost style run stopped at `line`.
    pub(crate) fn cut_style(&mut self, line: &str) {
        self.cut_at = Some(line.to_string());
    }

    /// Continue the style runs that `closer` cut, outermost first. The
    /// continuation is synthesized: it has no opening line of its own and
    /// ends with the cut run's closer.
    pub(crate) fn resume_styles(
        &mut self,
        source: &mut dyn LineSource,
        closer: &str,
    ) -> Result<Option<Container>, ConvertError> {
        let (cut, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.cut_styles)
            .into_iter()
            .partition(|style| style.cut_by == closer);
        self.cut_styles = kept;
        // innermost runs were cut first
        let mut runs = cut.into_iter().rev();
        match runs.next() {
            Some(run) => {
                let inner: Vec<_> = runs.collect();
                self.resume(source, &run, &inner).map(Some)
            }
            None => Ok(None),
        }
    }

    fn resume(
        &mut self,
        source: &mut dyn LineSource,
        run: &CutStyle,
        inner: &[CutStyle],
    ) -> Result<Container, ConvertError> {
        debug!("resuming {} at line {}", run.ending, source.line_number());
        let mut container = Container::synthesized(ContainerKind::TextStyle, Vec::new());
        container.parameters = run.parameters.clone();

        self.open_styles.push(run.ending.clone());
        self.depth += 1;
        let parsed = self.resume_into(source, &mut container, run, inner);
        self.depth -= 1;
        self.open_styles.pop();
        parsed?;

        if let Some(cut_by) = self.cut_at.take() {
            self.cut_styles.push(CutStyle {
                cut_by,
                ending: run.ending.clone(),
                parameters: run.parameters.clone(),
            });
        }
        Ok(container)
    }

    fn resume_into(
        &mut self,
        source: &mut dyn LineSource,
        container: &mut Container,
        run: &CutStyle,
        inner: &[CutStyle],
    ) -> Result<(), ConvertError> {
        if let Some((next, rest)) = inner.split_first() {
            let nested = self.resume(source, next, rest)?;
            container.contents.push(nested);
        }
        parser::parse_contents(self, source, container, &run.ending)
    }

    /// Materialize the next container, fanning transparent kinds out into
    /// their children. Their own lines stay in the tree as inert black boxes.
    pub fn create_some(
        &mut self,
        source: &mut dyn LineSource,
    ) -> Result<Vec<Container>, ConvertError> {
        let container = self.create_one(source)?;
        if !container.kind.is_transparent() {
            return Ok(vec![container]);
        }

        let inert = |line: &str| Container::new(ContainerKind::BlackBox, line, container.source_line);
        let mut siblings = vec![inert(&container.begin)];
        siblings.extend(container.header.iter().map(|line| inert(line)));
        siblings.extend(container.contents.iter().cloned());
        if let Some(end) = &container.end {
            siblings.push(inert(end));
        }
        Ok(siblings)
    }
}
