use super::Stage;
use crate::container::{Container, ContainerKind};
use crate::state::PipelineState;
use log::debug;

/// Attaches the most recent numbered element to a label, so references to
/// the label can show its number and link to its anchor.
pub struct LabelNumberingStage;

impl Stage for LabelNumberingStage {
    fn name(&self) -> &str {
        "label-numbering"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Label
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        _previous: Option<&Container>,
        mut current: Container,
        _next: Option<&Container>,
    ) -> Container {
        let Some(target) = state.last_numbered.clone() else {
            return current;
        };
        current.set_parameter("number", target.number.clone());
        current.set_parameter("target", target.anchor.clone());
        if let Some(name) = current.parameter("name").map(str::to_string) {
            state.record_label(name, target);
        }
        current
    }
}

/// Resolves a reference against the labels seen so far. References to
/// labels further down the document keep showing their key.
pub struct ReferenceResolutionStage;

impl Stage for ReferenceResolutionStage {
    fn name(&self) -> &str {
        "reference-resolution"
    }

    fn kind(&self) -> ContainerKind {
        ContainerKind::Reference
    }

    fn postprocess(
        &self,
        state: &mut PipelineState,
        _previous: Option<&Container>,
        mut current: Container,
        _next: Option<&Container>,
    ) -> Container {
        let Some(key) = current.parameter("reference").map(str::to_string) else {
            return current;
        };
        match state.label(&key) {
            Some(target) => {
                current.set_parameter("number", target.number.clone());
                current.set_parameter("target", target.anchor.clone());
            }
            None => debug!(
                "reference '{key}' at line {} is not resolved",
                current.source_line
            ),
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NumberedRef;

    fn label(name: &str) -> Container {
        Container::new(ContainerKind::Label, "\\begin_inset CommandInset label", 1)
            .with_parameter("name", name)
    }

    fn reference(key: &str) -> Container {
        Container::new(ContainerKind::Reference, "\\begin_inset CommandInset ref", 1)
            .with_parameter("reference", key)
    }

    #[test]
    fn labels_take_the_last_numbered_element() {
        let mut state = PipelineState::default();
        state.last_numbered = Some(NumberedRef {
            anchor: "toc-2.1".into(),
            number: "2.1".into(),
        });
        let label = LabelNumberingStage.postprocess(&mut state, None, label("sec:a"), None);
        assert_eq!(label.parameter("number"), Some("2.1"));
        assert_eq!(label.parameter("target"), Some("toc-2.1"));
        assert!(state.label("sec:a").is_some());
    }

    #[test]
    fn labels_before_any_number_are_untouched() {
        let mut state = PipelineState::default();
        let label = LabelNumberingStage.postprocess(&mut state, None, label("sec:a"), None);
        assert_eq!(label.parameter("number"), None);
    }

    #[test]
    fn backward_references_resolve() {
        let mut state = PipelineState::default();
        state.record_label(
            "sec:a",
            NumberedRef {
                anchor: "toc-3".into(),
                number: "3".into(),
            },
        );
        let resolved =
            ReferenceResolutionStage.postprocess(&mut state, None, reference("sec:a"), None);
        assert_eq!(resolved.parameter("number"), Some("3"));
        assert_eq!(resolved.parameter("target"), Some("toc-3"));

        let unresolved =
            ReferenceResolutionStage.postprocess(&mut state, None, reference("sec:b"), None);
        assert_eq!(unresolved.parameter("number"), None);
    }
}
