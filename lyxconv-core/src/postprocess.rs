//! Postprocessing (pass 2)
//!
//! Walks each top-level container depth first, children before parents, and
//! runs the stages registered for every node's kind. The traversal cursor is
//! shared by the whole document: it is never reset between top-level
//! containers or when entering and leaving subtrees.
//!
//! Cursor rule: a node's stages see as `previous` the cursor value at the
//! moment the traversal entered the node. A finalized node without children
//! becomes the cursor; a node with children leaves the cursor at its last
//! finalized descendant. Given `A` (holding leaf `X`) followed by `B`, the
//! stages of `B` therefore see `X`.

use crate::container::Container;
use crate::stages::StageRegistry;
use crate::state::PipelineState;
use log::trace;

pub struct Postprocessor<'a> {
    registry: &'a StageRegistry,
    state: &'a mut PipelineState,
    cursor: Option<Container>,
}

impl<'a> Postprocessor<'a> {
    pub fn new(registry: &'a StageRegistry, state: &'a mut PipelineState) -> Self {
        Self {
            registry,
            state,
            cursor: None,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &*self.state
    }

    /// The most recently finalized leaf.
    pub fn cursor(&self) -> Option<&Container> {
        self.cursor.as_ref()
    }

    /// Finalize `node` and its subtree, returning the container that takes
    /// its place.
    pub fn postprocess(&mut self, mut node: Container) -> Container {
        let previous = self.cursor.clone();

        let children = std::mem::take(&mut node.contents);
        node.contents = children
            .into_iter()
            .map(|child| self.postprocess(child))
            .collect();

        for stage in self.registry.stages_for(node.kind) {
            trace!("stage {} on {} at line {}", stage.name(), node.kind, node.source_line);
            node = stage.postprocess(self.state, previous.as_ref(), node, None);
        }

        if node.contents.is_empty() {
            self.cursor = Some(node.clone());
        }
        node
    }
}
