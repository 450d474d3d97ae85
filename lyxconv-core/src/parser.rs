//! Parser variants
//!
//! Every container kind is consumed by one of five variants (see
//! [`ParserKind`]). Parsers start with the source positioned on the opening
//! line and leave it on the first line after the container. Children are
//! obtained from the [`Factory`], which calls back into this module for
//! nested containers.
//!
//! The ending of a bounded container is its configured ending unless the
//! caller passes an override; style runs are the one kind that derives an
//! override from their own opening line.
//!
//! Style runs may overlap: LyX writes `\emph on … \series bold … \emph
//! default … \series default`. A run that meets the closer of a run around
//! it stops there, leaving the line to its owner, and the factory resumes it
//! right after the owner closed.

use crate::container::{Container, ContainerKind, Parameters, ParserKind};
use crate::error::ConvertError;
use crate::factory::Factory;
use crate::lines::LineSource;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Table column definitions start with this tag.
const COLUMN_MARKER: &str = "<column";

static TAG_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<\s*([\w:-]+)((?:\s+[\w:-]+="[^"]*")*)\s*/?>"#).expect("tag pattern is valid")
});

static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([\w:-]+)="([^"]*)""#).expect("attribute pattern is valid"));

/// Consume `container` from `source` with the variant its kind selects.
pub fn parse(
    factory: &mut Factory<'_>,
    source: &mut dyn LineSource,
    container: &mut Container,
    ending: Option<&str>,
) -> Result<(), ConvertError> {
    match container.kind.parser() {
        ParserKind::Lone => {
            source.next_line();
            Ok(())
        }
        ParserKind::Bounded => {
            let ending = resolve_ending(factory, container, ending)?;
            source.next_line();
            parse_bounded(factory, source, container, &ending)
        }
        ParserKind::NestedList => {
            let ending = resolve_ending(factory, container, ending)?;
            container.parameters = parse_attributes(&container.begin, container.source_line);
            source.next_line();
            parse_nested_list(factory, source, container, &ending)
        }
        ParserKind::Attributed => {
            let ending = resolve_ending(factory, container, ending)?;
            container.parameters = parse_attributes(&container.begin, container.source_line);
            source.next_line();
            parse_bounded(factory, source, container, &ending)
        }
        ParserKind::Raw => {
            let ending = resolve_ending(factory, container, ending)?;
            source.next_line();
            parse_raw(source, container, &ending)
        }
    }
}

fn resolve_ending(
    factory: &Factory<'_>,
    container: &Container,
    ending: Option<&str>,
) -> Result<String, ConvertError> {
    ending
        .or_else(|| factory.config().ending(container.kind))
        .map(str::to_string)
        .ok_or(ConvertError::MissingEnding {
            kind: container.kind,
            line: container.source_line,
        })
}

fn unterminated(container: &Container) -> ConvertError {
    ConvertError::Unterminated {
        kind: container.kind,
        line: container.source_line,
        text: container.begin.clone(),
    }
}

pub(crate) fn is_ending(line: &str, ending: &str) -> bool {
    line.trim_start().starts_with(ending)
}

fn parse_bounded(
    factory: &mut Factory<'_>,
    source: &mut dyn LineSource,
    container: &mut Container,
    ending: &str,
) -> Result<(), ConvertError> {
    let mut block: Option<(String, Vec<String>)> = None;
    loop {
        if source.finished() {
            return Err(unterminated(container));
        }
        let line = source.current_line();
        if is_ending(line, ending) {
            container.end = Some(line.to_string());
            source.next_line();
            return Ok(());
        }
        if closes_implicitly(factory, container.kind, line) {
            // left for the enclosing layout to consume
            return Ok(());
        }
        if container.kind == ContainerKind::TextStyle && factory.closes_enclosing_style(line) {
            factory.cut_style(line);
            return Ok(());
        }

        if container.kind.takes_all_parameters() {
            let line = line.to_string();
            header_line(container, &mut block, line);
            source.next_line();
            continue;
        }

        if container.kind.accepts_parameters() && container.contents.is_empty() {
            if let Some((key, value)) = parameter_line(factory, line) {
                container.header.push(line.to_string());
                container.set_parameter(key, value);
                source.next_line();
                continue;
            }
        }

        let children = factory.create_some(source)?;
        let closed_style = children
            .last()
            .filter(|child| child.kind == ContainerKind::TextStyle)
            .and_then(|child| child.end.clone());
        container.contents.extend(children);
        if let Some(closer) = closed_style {
            if let Some(resumed) = factory.resume_styles(source, &closer)? {
                container.contents.push(resumed);
            }
        }
    }
}

/// Contents of an already opened container, up to `ending`. Used to
/// continue style runs that were cut by an overlapping run.
pub(crate) fn parse_contents(
    factory: &mut Factory<'_>,
    source: &mut dyn LineSource,
    container: &mut Container,
    ending: &str,
) -> Result<(), ConvertError> {
    parse_bounded(factory, source, container, ending)
}

/// Formula bodies are TeX, not LyX markup: every line is kept as text.
fn parse_raw(
    source: &mut dyn LineSource,
    container: &mut Container,
    ending: &str,
) -> Result<(), ConvertError> {
    loop {
        if source.finished() {
            return Err(unterminated(container));
        }
        let line = source.current_line();
        if is_ending(line, ending) {
            container.end = Some(line.to_string());
            source.next_line();
            return Ok(());
        }
        let text = Container::new(ContainerKind::Text, line, source.line_number());
        container.contents.push(text);
        source.next_line();
    }
}

/// Style runs end with their `<command> default` line, or silently with
/// the layout they live in.
fn closes_implicitly(factory: &Factory<'_>, kind: ContainerKind, line: &str) -> bool {
    kind == ContainerKind::TextStyle
        && factory
            .config()
            .ending(ContainerKind::Layout)
            .is_some_and(|layout_end| is_ending(line, layout_end))
}

/// `LatexCommand label` → `("command", "label")`, for registered names only.
fn parameter_line(factory: &Factory<'_>, line: &str) -> Option<(String, String)> {
    let (name, value) = split_parameter(line)?;
    let key = factory.config().parameter_key(name)?;
    Some((key.to_string(), value))
}

fn split_parameter(line: &str) -> Option<(&str, String)> {
    let line = line.trim();
    let (name, value) = match line.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (line, ""),
    };
    if name.is_empty() {
        return None;
    }
    Some((name, unquote(value).to_string()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Header lines are all parameters: `\textclass article` → `textclass`.
/// Blocks such as `\begin_preamble … \end_preamble` are collected whole
/// under their name.
fn header_line(container: &mut Container, block: &mut Option<(String, Vec<String>)>, line: String) {
    if let Some((name, lines)) = block.as_mut() {
        if line.trim() == format!("\\end_{name}") {
            let value = lines.join("\n");
            container.set_parameter(name.clone(), value);
            *block = None;
        } else {
            lines.push(line.clone());
        }
        container.header.push(line);
        return;
    }

    let trimmed = line.trim();
    if let Some(name) = trimmed.strip_prefix("\\begin_") {
        if !name.contains(char::is_whitespace) {
            *block = Some((name.to_string(), Vec::new()));
        }
    } else if let Some((name, value)) = split_parameter(trimmed) {
        container.set_parameter(name.trim_start_matches('\\'), value);
    }
    container.header.push(line);
}

fn parse_nested_list(
    factory: &mut Factory<'_>,
    source: &mut dyn LineSource,
    container: &mut Container,
    ending: &str,
) -> Result<(), ConvertError> {
    loop {
        if source.finished() {
            return Err(unterminated(container));
        }
        let line = source.current_line();
        if is_ending(line, ending) {
            container.end = Some(line.to_string());
            source.next_line();
            return Ok(());
        }

        if factory.dispatch().resolve(line) == ContainerKind::Row {
            let rows = factory.create_some(source)?;
            container.contents.extend(rows);
            continue;
        }

        let line = line.to_string();
        let number = source.line_number();
        if line.trim_start().starts_with(COLUMN_MARKER) {
            container.records.push(parse_attributes(&line, number));
        } else if line.trim_start().starts_with('<') {
            let attributes = parse_attributes(&line, number);
            container.parameters.extend(attributes);
        } else if let Some((name, value)) = split_parameter(&line) {
            container.set_parameter(name, value);
        }
        container.header.push(line);
        source.next_line();
    }
}

/// Flatten the `<tag k="v" …>` group of a line into parameters.
///
/// A line should carry exactly one group. Lines with none or several are
/// reported and parsed as well as possible: the last group wins.
pub fn parse_attributes(line: &str, number: usize) -> Parameters {
    let groups: Vec<_> = TAG_GROUP.captures_iter(line).collect();
    match groups.len() {
        1 => {}
        0 => warn!("line {number}: no attribute group in '{line}'"),
        count => warn!("line {number}: {count} attribute groups in '{line}', using the last"),
    }
    let mut parameters = Parameters::new();
    if let Some(group) = groups.last() {
        let attributes = group.get(2).map(|m| m.as_str()).unwrap_or("");
        for attribute in ATTRIBUTE.captures_iter(attributes) {
            parameters.insert(attribute[1].to_string(), attribute[2].to_string());
        }
    }
    parameters
}
