use super::Stage;
use crate::container::{Container, ContainerKind};
use crate::state::{NumberedRef, PipelineState};
use log::debug;

/// Numbers headings (`1`, `1.2`, …) within the document's numbering range
/// and makes them the current target for labels.
///
/// Labels inside the heading were finalized before the heading itself, so
/// they are re-targeted here to the number just assigned.
pub struct HeadingNumberingStage;

impl Stage for HeadingNumberingStage {
    fn name(&self) -> &str {
        "heading-numbering"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Heading
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        _previous: Option<&Container>,
        mut current: Container,
        _next: Option<&Container>,
    ) -> Container {
        let Some(level) = current.parameter("level").and_then(|l| l.parse::<usize>().ok()) else {
            return current;
        };
        if current.parameter("starred") == Some("true") || !state.numbers_level(level) {
            return current;
        }

        let number = state.next_heading_number(level);
        let target = NumberedRef {
            anchor: format!("toc-{number}"),
            number,
        };
        debug!("heading at line {} numbered {}", current.source_line, target.number);
        current.set_parameter("number", target.number.clone());
        current.set_parameter("anchor", target.anchor.clone());

        current.for_each_descendant_mut(&mut |node| {
            if node.kind == ContainerKind::Label {
                retarget(node, state, &target);
            }
        });
        state.last_numbered = Some(target);
        current
    }
}

fn retarget(label: &mut Container, state: &mut PipelineState, target: &NumberedRef) {
    label.set_parameter("number", target.number.clone());
    label.set_parameter("target", target.anchor.clone());
    if let Some(name) = label.parameter("name").map(str::to_string) {
        state.record_label(name, target.clone());
    }
}

/// Gives footnotes their running number.
pub struct FootnoteNumberingStage;

impl Stage for FootnoteNumberingStage {
    fn name(&self) -> &str {
        "footnote-numbering"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Footnote
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        _previous: Option<&Container>,
        current: Container,
        _next: Option<&Container>,
    ) -> Container {
        let number = state.next_footnote();
        current.with_parameter("number", number.to_string())
    }
}

/// Gives bibliography items their running number, used as the visible key
/// when no label is set.
pub struct BibItemNumberingStage;

impl Stage for BibItemNumberingStage {
    fn name(&self) -> &str {
        "bibitem-numbering"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::BibItem
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        _previous: Option<&Container>,
        current: Container,
        _next: Option<&Container>,
    ) -> Container {
        let number = state.next_bibitem();
        current.with_parameter("number", number.to_string())
    }
}
