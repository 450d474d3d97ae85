use super::Stage;
use crate::container::{Container, ContainerKind};
use crate::state::PipelineState;
use crate::translations::translate;

/// Puts a translated "Bibliography" heading before the first entry of the
/// bibliography.
///
/// The first entry is returned wrapped together with the new heading in a
/// composite; the flag in the pipeline state leaves every later entry alone.
pub struct BibliographyHeadingStage;

impl Stage for BibliographyHeadingStage {
    fn name(&self) -> &str {
        "bibliography-heading"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::BibEntry
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        previous: Option<&Container>,
        current: Container,
        _next: Option<&Container>,
    ) -> Container {
        if state.bibliography_header_emitted
            || previous.is_some_and(|node| node.kind == ContainerKind::BibEntry)
        {
            return current;
        }
        state.bibliography_header_emitted = true;

        let title = translate(&state.language, "Bibliography");
        let heading = Container::synthesized(ContainerKind::Heading, vec![Container::text(title)])
            .with_parameter("level", state.top_level().to_string())
            .with_parameter("starred", "true");
        Container::synthesized(ContainerKind::Composite, vec![heading, current])
    }
}
