//! Core tree types for parsed configurations.

use std::fmt;

use indexmap::IndexMap;

/// Name of the element every configuration tree hangs from.
pub const ROOT_NAME: &str = "root";

/// Whether an element is a section or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A section that may own further sections and values.
    Node,
    /// A single `key=value` entry.
    Leaf,
}

/// A section or value in a configuration tree.
///
/// Children are keyed by name and kept in insertion order, so enumerating
/// sections and values is deterministic. Re-inserting an existing name
/// replaces the element but keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    kind: ElementKind,
    /// Only populated for leaves.
    value: String,
    /// Always empty for leaves.
    children: IndexMap<String, Element>,
}

impl Element {
    /// Create an empty section.
    pub fn node(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Node,
            value: String::new(),
            children: IndexMap::new(),
        }
    }

    /// Create a value.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Leaf,
            value: value.into(),
            children: IndexMap::new(),
        }
    }

    /// Create the empty root section.
    pub fn root() -> Self {
        Self::node(ROOT_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The value of a leaf; empty for sections.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_node(&self) -> bool {
        self.kind == ElementKind::Node
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == ElementKind::Leaf
    }

    /// Insert `child` under `name`, replacing any existing child of that name.
    ///
    /// Returns `false` and leaves the element unchanged when called on a leaf.
    pub fn add_child(&mut self, name: impl Into<String>, child: Element) -> bool {
        if self.is_leaf() {
            return false;
        }
        self.children.insert(name.into(), child);
        true
    }

    /// Look up an immediate child by exact name.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.children.get(name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.get_mut(name)
    }

    /// Immediate children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.values()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Position of the child named `name`, if present.
    pub(crate) fn child_index(&self, name: &str) -> Option<usize> {
        self.children.get_index_of(name)
    }

    pub(crate) fn child_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_index_mut(index).map(|(_, child)| child)
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::root()
    }
}

/// Renders the tree one element per line: `name:` for sections and
/// `name:value` for leaves, indented two spaces per level.
///
/// Intended for diagnostics; the output cannot be parsed back.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending: Vec<(usize, &Element)> = vec![(0, self)];

        while let Some((depth, element)) = pending.pop() {
            let indent = depth * 2;
            match element.kind {
                ElementKind::Leaf => {
                    writeln!(f, "{:indent$}{}:{}", "", element.name, element.value)?;
                }
                ElementKind::Node => {
                    writeln!(f, "{:indent$}{}:", "", element.name)?;
                    pending.extend(element.children.values().rev().map(|c| (depth + 1, c)));
                }
            }
        }
        Ok(())
    }
}
