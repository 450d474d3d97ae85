//! Start-marker dispatch
//!
//! Start markers are split into whitespace-delimited tokens and stored in a
//! prefix tree keyed token by token. Resolving a line walks the tree as deep
//! as the line's tokens allow and returns the kind registered at the deepest
//! node visited, so `\begin_layout Standard` beats `\begin_layout` and
//! `<row type` beats `<row`.
//!
//! A line token matches a marker token when both are equal, or when the line
//! token continues the marker token with `=` or `>`: `<row>` matches `<row`
//! and `type=1>` matches `type`. Lines that match nothing are plain text.

use crate::container::ContainerKind;
use crate::error::ConvertError;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Branch {
    kind: Option<ContainerKind>,
    children: HashMap<String, Branch>,
}

/// Prefix tree from start-marker tokens to container kinds.
///
/// Immutable after construction; resolution is a pure function of the line.
#[derive(Debug, Default)]
pub struct DispatchTable {
    root: Branch,
    markers: usize,
}

impl DispatchTable {
    /// Build a table from `(marker, kind)` pairs.
    ///
    /// The same marker registered twice for one kind is accepted; an identical
    /// marker registered for two different kinds is an error.
    pub fn new<'a, I>(entries: I) -> Result<Self, ConvertError>
    where
        I: IntoIterator<Item = (&'a str, ContainerKind)>,
    {
        let mut table = DispatchTable::default();
        for (marker, kind) in entries {
            table.insert(marker, kind)?;
        }
        Ok(table)
    }

    fn insert(&mut self, marker: &str, kind: ContainerKind) -> Result<(), ConvertError> {
        let mut branch = &mut self.root;
        for token in marker.split_whitespace() {
            branch = branch.children.entry(token.to_string()).or_default();
        }
        match branch.kind {
            Some(existing) if existing != kind => Err(ConvertError::AmbiguousMarker {
                marker: marker.to_string(),
                first: existing,
                second: kind,
            }),
            Some(_) => Ok(()),
            None => {
                branch.kind = Some(kind);
                self.markers += 1;
                Ok(())
            }
        }
    }

    /// Number of distinct markers registered.
    pub fn len(&self) -> usize {
        self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers == 0
    }

    /// Kind of the container opened by `line`.
    pub fn resolve(&self, line: &str) -> ContainerKind {
        let mut branch = &self.root;
        let mut found = ContainerKind::Text;
        for token in line.split_whitespace() {
            let Some(next) = Self::step(branch, token) else {
                break;
            };
            if let Some(kind) = next.kind {
                found = kind;
            }
            branch = next;
        }
        debug!("dispatch {:?} -> {}", line, found);
        found
    }

    fn step<'a>(branch: &'a Branch, token: &str) -> Option<&'a Branch> {
        if let Some(next) = branch.children.get(token) {
            return Some(next);
        }
        let stem = token.find(['=', '>']).map(|at| &token[..at])?;
        if stem.is_empty() {
            return None;
        }
        branch.children.get(stem)
    }

    /// Every registered marker with its kind, sorted by marker.
    pub fn markers(&self) -> Vec<(String, ContainerKind)> {
        let mut found = Vec::new();
        Self::collect(&self.root, &mut Vec::new(), &mut found);
        found.sort();
        found
    }

    fn collect<'a>(
        branch: &'a Branch,
        path: &mut Vec<&'a str>,
        found: &mut Vec<(String, ContainerKind)>,
    ) {
        if let Some(kind) = branch.kind {
            found.push((path.join(" "), kind));
        }
        for (token, child) in &branch.children {
            path.push(token);
            Self::collect(child, path, found);
            path.pop();
        }
    }
}
