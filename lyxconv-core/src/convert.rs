//! Conversion driver
//!
//! Runs the whole pipeline over one input: the factory materializes every
//! top-level container (local processing happens inside it), the
//! postprocessor finalizes them in document order, and the chosen format
//! renders them. Output is buffered and only written once every step has
//! succeeded, so a failed conversion writes nothing.

use crate::config::ContainerConfig;
use crate::container::{Container, ContainerKind};
use crate::dispatch::DispatchTable;
use crate::error::ConvertError;
use crate::factory::Factory;
use crate::format::{RenderContext, RenderOptions};
use crate::formula::{BasicFormulaTranslator, FormulaTranslator};
use crate::lines::{LineSource, LineWriter, StringLines};
use crate::postprocess::Postprocessor;
use crate::registry::FormatRegistry;
use crate::stages::StageRegistry;
use crate::state::PipelineState;
use log::{debug, info};
use std::io::Write;

pub const DEFAULT_LANGUAGE: &str = "english";

/// Per-conversion options.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Name of the output format
    pub format: String,
    /// Leave the document header and footer out of the output
    pub filter_header_footer: bool,
    pub render: RenderOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: "html".to_string(),
            filter_header_footer: false,
            render: RenderOptions::default(),
        }
    }
}

impl ConvertOptions {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Default::default()
        }
    }
}

/// A parsed document, before or after postprocessing.
#[derive(Debug, Clone)]
pub struct Document {
    pub containers: Vec<Container>,
    pub state: PipelineState,
    /// Kind and opening line of each container in local processing order
    pub processing_order: Vec<(ContainerKind, usize)>,
}

/// Summary of a finished conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub top_level: usize,
    pub lines: usize,
    pub state: PipelineState,
}

/// Everything that is shared between conversions: configuration, dispatch
/// table, stages, formats and the formula translator. Read-only once built.
pub struct Converter {
    config: ContainerConfig,
    dispatch: DispatchTable,
    stages: StageRegistry,
    formats: FormatRegistry,
    translator: Box<dyn FormulaTranslator>,
    default_language: String,
}

impl Converter {
    /// Build a converter from container tables. Fails when two kinds share a
    /// start marker.
    pub fn new(config: ContainerConfig) -> Result<Self, ConvertError> {
        let dispatch = DispatchTable::new(config.start_entries())?;
        debug!("dispatch table with {} markers", dispatch.len());
        Ok(Self {
            config,
            dispatch,
            stages: StageRegistry::with_defaults(),
            formats: FormatRegistry::with_defaults(),
            translator: Box::new(BasicFormulaTranslator),
            default_language: DEFAULT_LANGUAGE.to_string(),
        })
    }

    /// Converter over the built-in LyX tables.
    pub fn standard() -> Result<Self, ConvertError> {
        Self::new(ContainerConfig::standard())
    }

    pub fn with_translator(mut self, translator: impl FormulaTranslator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    pub fn with_stages(mut self, stages: StageRegistry) -> Self {
        self.stages = stages;
        self
    }

    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    /// Pass 1: materialize every top-level container.
    pub fn parse(&self, source: &mut dyn LineSource) -> Result<Document, ConvertError> {
        let mut state = PipelineState::new(self.default_language.clone());
        let (containers, processing_order) = {
            let mut factory = Factory::new(
                &self.dispatch,
                &self.config,
                self.translator.as_ref(),
                &mut state,
            );
            let mut containers = Vec::new();
            let parsed = loop {
                if source.finished() {
                    break Ok(());
                }
                match factory.create_some(source) {
                    Ok(created) => containers.extend(created),
                    Err(err) => break Err(err),
                }
            };
            // a read error explains an early end of input better than
            // whatever the parser made of it
            if let Some(err) = source.take_error() {
                return Err(err.into());
            }
            parsed?;
            (containers, factory.processing_order().to_vec())
        };
        source.close();
        info!("parsed {} top-level containers", containers.len());
        Ok(Document {
            containers,
            state,
            processing_order,
        })
    }

    /// Pass 2: run the stages over the whole document, optionally dropping
    /// the header and footer first.
    pub fn postprocess(&self, document: Document, filter_header_footer: bool) -> Document {
        let Document {
            containers,
            mut state,
            processing_order,
        } = document;
        let containers = {
            let mut postprocessor = Postprocessor::new(&self.stages, &mut state);
            containers
                .into_iter()
                .filter(|node| {
                    !(filter_header_footer
                        && matches!(node.kind, ContainerKind::Header | ContainerKind::Footer))
                })
                .map(|node| postprocessor.postprocess(node))
                .collect()
        };
        Document {
            containers,
            state,
            processing_order,
        }
    }

    /// Render every top-level container with the named format.
    pub fn render(
        &self,
        document: &Document,
        format: &str,
        options: &RenderOptions,
    ) -> Result<String, ConvertError> {
        let format = self.formats.get(format)?;
        let context = RenderContext {
            state: &document.state,
            options,
        };
        let mut output = String::new();
        for container in &document.containers {
            output.push_str(&format.render(container, &context)?);
        }
        Ok(output)
    }
}

/// Convert everything `source` yields and write the result to `writer`.
pub fn convert<W: Write>(
    source: &mut dyn LineSource,
    writer: W,
    converter: &Converter,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    // fail on an unknown format before reading any input
    converter.formats().get(&options.format)?;

    let document = converter.parse(source)?;
    let lines = source.line_number().saturating_sub(1);
    let document = converter.postprocess(document, options.filter_header_footer);
    let output = converter.render(&document, &options.format, &options.render)?;

    let mut writer = LineWriter::new(writer);
    writer.write_text(&output)?;
    writer.close()?;

    Ok(ConvertReport {
        top_level: document.containers.len(),
        lines,
        state: document.state,
    })
}

/// Convert a string, returning the output text.
pub fn convert_str(
    text: &str,
    converter: &Converter,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    let mut source = StringLines::new(text);
    let mut output = Vec::new();
    convert(&mut source, &mut output, converter, options)?;
    String::from_utf8(output).map_err(|e| ConvertError::Render(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "#LyX 2.3 created this file.
\\lyxformat 544
\\begin_document
\\begin_header
\\textclass article
\\language english
\\secnumdepth 3
\\paragraph_separation indent
\\end_header

\\begin_body

\\begin_layout Section
Intro
\\end_layout

\\begin_layout Standard
Hello
\\end_layout

\\end_body
\\end_document";

    #[test]
    fn raw_output_reproduces_input() {
        let converter = Converter::standard().unwrap();
        let output = convert_str(DOC, &converter, &ConvertOptions::new("raw")).unwrap();
        assert_eq!(output, format!("{DOC}\n"));
    }

    #[test]
    fn html_output_is_a_page() {
        let converter = Converter::standard().unwrap();
        let output = convert_str(DOC, &converter, &ConvertOptions::new("html")).unwrap();
        assert!(output.starts_with("<!DOCTYPE html>"));
        assert!(output.contains("<h2 id=\"toc-1\"><span class=\"number\">1</span>Intro</h2>"));
        assert!(output.contains("<p>Hello</p>"));
        assert!(output.trim_end().ends_with("</html>"));
    }

    #[test]
    fn filtering_drops_the_page_wrapper() {
        let converter = Converter::standard().unwrap();
        let options = ConvertOptions {
            filter_header_footer: true,
            ..ConvertOptions::new("html")
        };
        let output = convert_str(DOC, &converter, &options).unwrap();
        assert!(!output.contains("<!DOCTYPE html>"));
        assert!(!output.contains("</html>"));
        assert!(output.contains("<p>Hello</p>"));
    }

    #[test]
    fn unknown_format_fails_first() {
        let converter = Converter::standard().unwrap();
        let err = convert_str(DOC, &converter, &ConvertOptions::new("pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::FormatNotFound(_)));
    }

    #[test]
    fn failed_conversion_writes_nothing() {
        let converter = Converter::standard().unwrap();
        let mut source = StringLines::new("\\begin_layout Standard\nnever closed");
        let mut output = Vec::new();
        let err = convert(&mut source, &mut output, &converter, &ConvertOptions::default())
            .unwrap_err();
        assert_eq!(err.line(), Some(1));
        assert!(output.is_empty());
    }

    #[test]
    fn report_counts_lines_and_containers() {
        let converter = Converter::standard().unwrap();
        let mut source = StringLines::new(DOC);
        let report =
            convert(&mut source, Vec::new(), &converter, &ConvertOptions::new("raw")).unwrap();
        assert_eq!(report.lines, DOC.lines().count());
        assert!(report.state.header_seen);
        assert_eq!(report.state.document_class.as_deref(), Some("article"));
    }

    #[test]
    fn ambiguous_configuration_is_rejected() {
        let mut config = ContainerConfig::standard();
        config.kinds.push(crate::config::KindDefinition::new(
            ContainerKind::Note,
            &["\\begin_layout Standard"],
            None,
        ));
        assert!(matches!(
            Converter::new(config),
            Err(ConvertError::AmbiguousMarker { .. })
        ));
    }
}
