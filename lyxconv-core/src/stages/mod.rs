//! Postprocessing stages
//!
//! A stage rewrites containers of one kind during the second pass. It gets
//! the previously finalized container in document order, the container
//! itself (owned, with its children already finalized) and a `next` slot
//! that is always `None`. The returned container takes the original's place
//! in its parent, so a stage may pass the node through, modify it or wrap
//! it in a new container.
//!
//! Stages keep no state of their own: counters, flags and the label table
//! live in [`PipelineState`].

mod bibliography;
mod numbering;
mod references;

pub use bibliography::BibliographyHeadingStage;
pub use numbering::{BibItemNumberingStage, FootnoteNumberingStage, HeadingNumberingStage};
pub use references::{LabelNumberingStage, ReferenceResolutionStage};

use crate::container::{Container, ContainerKind};
use crate::state::PipelineState;
use std::collections::HashMap;

pub trait Stage: Send + Sync {
    /// Short name used in logs and listings.
    fn name(&self) -> &str;

    /// The container kind this stage handles.
    fn kind(&self) -> ContainerKind;

    /// Rewrite `current`. `next` is reserved and never populated.
    fn postprocess(
        &self,
        state: &mut PipelineState,
        previous: Option<&Container>,
        current: Container,
        next: Option<&Container>,
    ) -> Container;
}

/// Stages grouped by kind, in registration order.
///
/// Built once and only read afterwards, so one registry can serve any
/// number of conversions.
#[derive(Default)]
pub struct StageRegistry {
    stages: HashMap<ContainerKind, Vec<Box<dyn Stage>>>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage after those already registered for its kind.
    pub fn register<S: Stage + 'static>(&mut self, stage: S) {
        self.stages
            .entry(stage.kind())
            .or_default()
            .push(Box::new(stage));
    }

    pub fn stages_for(&self, kind: ContainerKind) -> &[Box<dyn Stage>] {
        self.stages.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(kind, stage name)` pairs sorted by kind, in run order per kind.
    pub fn list_stages(&self) -> Vec<(ContainerKind, String)> {
        let mut kinds: Vec<_> = self.stages.keys().copied().collect();
        kinds.sort();
        kinds
            .into_iter()
            .flat_map(|kind| {
                self.stages_for(kind)
                    .iter()
                    .map(move |stage| (kind, stage.name().to_string()))
            })
            .collect()
    }

    /// Registry with the standard numbering, reference and bibliography
    /// stages.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HeadingNumberingStage);
        registry.register(LabelNumberingStage);
        registry.register(ReferenceResolutionStage);
        registry.register(FootnoteNumberingStage);
        registry.register(BibItemNumberingStage);
        registry.register(BibliographyHeadingStage);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag(&'static str);

    impl Stage for Tag {
        fn name(&self) -> &str {
            self.0
        }

        fn kind(&self) -> ContainerKind {
            ContainerKind::Note
        }

        fn postprocess(
            &self,
            _state: &mut PipelineState,
            _previous: Option<&Container>,
            current: Container,
            _next: Option<&Container>,
        ) -> Container {
            let seen = current.parameter("seen").unwrap_or("").to_string();
            current.with_parameter("seen", format!("{seen}{}", self.0))
        }
    }

    #[test]
    fn stages_run_in_registration_order() {
        let mut registry = StageRegistry::new();
        registry.register(Tag("a"));
        registry.register(Tag("b"));

        let mut state = PipelineState::default();
        let mut node = Container::new(ContainerKind::Note, "\\begin_inset Note", 1);
        for stage in registry.stages_for(ContainerKind::Note) {
            node = stage.postprocess(&mut state, None, node, None);
        }
        assert_eq!(node.parameter("seen"), Some("ab"));
        assert!(registry.stages_for(ContainerKind::Text).is_empty());
    }

    #[test]
    fn defaults_cover_numbered_kinds() {
        let registry = StageRegistry::with_defaults();
        let kinds: Vec<_> = registry.list_stages().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ContainerKind::Heading,
                ContainerKind::BibEntry,
                ContainerKind::Label,
                ContainerKind::Reference,
                ContainerKind::BibItem,
                ContainerKind::Footnote,
            ]
        );
    }
}
