//! Content-model nodes
//!
//! This module implements the structural nodes governing which child
//! elements a complex type expects:
//! - a single element declaration, or
//! - a composite group (sequence, choice, all) of nested nodes.
//!
//! Every node exposes the same contract: consume the full ordered child
//! list of an XML element into named field values, and render named field
//! values back into a parent node. Nodes match children by tag name, so
//! callers hand over all children rather than pre-slicing them.

use indexmap::IndexMap;

use crate::documents::XmlNode;
use crate::error::Result;
use crate::marshal;
use crate::values::Value;

use super::{TypeGraph, TypeId};

/// Occurrence bounds for an element (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Check if at most one occurrence is allowed
    pub fn is_single(&self) -> bool {
        self.max == Some(1)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

/// Compositor of a composite content group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compositor {
    /// Ordered sequence of nodes
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of nodes
    All,
}

impl std::fmt::Display for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
            Self::All => write!(f, "all"),
        }
    }
}

/// A single element declaration
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element tag name
    pub name: String,
    /// The element's type
    pub type_id: TypeId,
    /// Occurrence bounds
    pub occurs: Occurs,
}

impl ElementDecl {
    /// Create an element declaration occurring exactly once
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        let name = name.into();
        debug_assert!(
            crate::names::is_valid_ncname(&name),
            "element name must be an NCName: {name:?}"
        );
        Self {
            name,
            type_id,
            occurs: Occurs::once(),
        }
    }

    /// Set the occurrence bounds
    pub fn with_occurs(mut self, occurs: Occurs) -> Self {
        self.occurs = occurs;
        self
    }

    /// Consume matching children into this element's field
    ///
    /// Children are matched by tag name. A repeated element collects into
    /// a list value; an absent element contributes nothing.
    pub fn parse_from(
        &self,
        children: &[XmlNode],
        graph: &TypeGraph,
    ) -> Result<IndexMap<String, Value>> {
        let mut matches = children.iter().filter(|c| c.local_name() == self.name);

        let mut result = IndexMap::new();
        if self.occurs.is_single() {
            if let Some(child) = matches.next() {
                let value = marshal::parse(graph, self.type_id, child)?.unwrap_or(Value::Nil);
                result.insert(self.name.clone(), value);
            }
        } else {
            let mut items = Vec::new();
            for child in matches {
                items.push(marshal::parse(graph, self.type_id, child)?.unwrap_or(Value::Nil));
            }
            if !items.is_empty() {
                result.insert(self.name.clone(), Value::List(items));
            }
        }
        Ok(result)
    }

    /// Render a field value as child element(s) of the parent
    ///
    /// Nil renders as absent; a list value renders one child per item.
    pub fn render_into(
        &self,
        parent: &mut XmlNode,
        value: &Value,
        graph: &TypeGraph,
    ) -> Result<()> {
        match value {
            Value::Nil => Ok(()),
            Value::List(items) => {
                for item in items {
                    self.render_one(parent, item, graph)?;
                }
                Ok(())
            }
            other => self.render_one(parent, other, graph),
        }
    }

    fn render_one(&self, parent: &mut XmlNode, value: &Value, graph: &TypeGraph) -> Result<()> {
        if value.is_nil() {
            return Ok(());
        }
        let mut child = XmlNode::new(self.name.clone());
        marshal::render(graph, self.type_id, &mut child, value, None)?;
        parent.append_child(child);
        Ok(())
    }

    /// Signature contribution of this element
    pub fn signature(&self, graph: &TypeGraph) -> String {
        let suffix = if self.occurs.is_single() { "" } else { "[]" };
        format!("{}: {}{}", self.name, graph.type_name(self.type_id), suffix)
    }
}

/// A composite content group
#[derive(Debug, Clone)]
pub struct GroupModel {
    /// The compositor
    pub compositor: Compositor,
    /// Nested content nodes, in declaration order
    pub children: Vec<ContentNode>,
}

impl GroupModel {
    /// Create a new group
    pub fn new(compositor: Compositor, children: Vec<ContentNode>) -> Self {
        Self {
            compositor,
            children,
        }
    }

    /// Create a sequence group
    pub fn sequence(children: Vec<ContentNode>) -> Self {
        Self::new(Compositor::Sequence, children)
    }

    /// Create a choice group
    pub fn choice(children: Vec<ContentNode>) -> Self {
        Self::new(Compositor::Choice, children)
    }

    /// Create an all group
    pub fn all(children: Vec<ContentNode>) -> Self {
        Self::new(Compositor::All, children)
    }
}

/// A content-model node: a single element or a composite group
#[derive(Debug, Clone)]
pub enum ContentNode {
    /// A single element declaration
    Element(ElementDecl),
    /// A composite group of nested nodes
    Group(GroupModel),
}

impl ContentNode {
    /// Shorthand for a single-element node
    pub fn element(name: impl Into<String>, type_id: TypeId) -> Self {
        ContentNode::Element(ElementDecl::new(name, type_id))
    }

    /// Shorthand for a sequence node
    pub fn sequence(children: Vec<ContentNode>) -> Self {
        ContentNode::Group(GroupModel::sequence(children))
    }

    /// Consume the full ordered child list into named field values
    ///
    /// Matching is by tag name, not document position; a choice group
    /// yields the first alternative that consumed anything.
    pub fn parse_children(
        &self,
        children: &[XmlNode],
        graph: &TypeGraph,
        _context_name: &str,
    ) -> Result<IndexMap<String, Value>> {
        match self {
            ContentNode::Element(decl) => decl.parse_from(children, graph),
            ContentNode::Group(group) => match group.compositor {
                Compositor::Sequence | Compositor::All => {
                    let mut result = IndexMap::new();
                    for child in &group.children {
                        result.extend(child.parse_children(children, graph, _context_name)?);
                    }
                    Ok(result)
                }
                Compositor::Choice => {
                    for child in &group.children {
                        let parsed = child.parse_children(children, graph, _context_name)?;
                        if !parsed.is_empty() {
                            return Ok(parsed);
                        }
                    }
                    Ok(IndexMap::new())
                }
            },
        }
    }

    /// Render the matching fields of a compound value into the parent
    pub fn render(&self, parent: &mut XmlNode, value: &Value, graph: &TypeGraph) -> Result<()> {
        match self {
            ContentNode::Element(decl) => {
                let field = value
                    .as_compound()
                    .and_then(|c| c.get(&decl.name))
                    .cloned()
                    .unwrap_or(Value::Nil);
                decl.render_into(parent, &field, graph)
            }
            ContentNode::Group(group) => match group.compositor {
                Compositor::Sequence | Compositor::All => {
                    for child in &group.children {
                        child.render(parent, value, graph)?;
                    }
                    Ok(())
                }
                Compositor::Choice => {
                    // first alternative with a present field wins
                    for child in &group.children {
                        if child.has_present_field(value) {
                            return child.render(parent, value, graph);
                        }
                    }
                    Ok(())
                }
            },
        }
    }

    fn has_present_field(&self, value: &Value) -> bool {
        match self {
            ContentNode::Element(decl) => value
                .as_compound()
                .and_then(|c| c.get(&decl.name))
                .map(|v| !v.is_nil())
                .unwrap_or(false),
            ContentNode::Group(group) => {
                group.children.iter().any(|c| c.has_present_field(value))
            }
        }
    }
}
