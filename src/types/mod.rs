//! The schema-derived type system
//!
//! This module contains the type graph: type definitions connected by
//! stable arena identifiers, the registry mapping qualified names to
//! types, reference resolution with inheritance composition, and the
//! content-model nodes governing element structure.
//!
//! Types reference each other by [`TypeId`] rather than by ownership, so
//! self-referential and mutually-referential schemas are representable
//! without reference cycles.

pub mod content;
pub mod graph;
pub mod resolver;

pub use content::{Compositor, ContentNode, ElementDecl, GroupModel, Occurs};
pub use graph::TypeGraph;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::names::QName;
use crate::scalars::{ScalarKind, ScalarValue};
use crate::values::{CallArgs, FieldTable};

use indexmap::IndexMap;

/// Stable handle of a type in the graph's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A type definition stored in one arena slot
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// Placeholder reference to a registered type; must not survive resolution
    Unresolved(QName),
    /// Placeholder named subtype of a base reference; must not survive resolution
    UnresolvedCustom {
        /// Name of the subtype being declared
        name: QName,
        /// The base type reference (possibly itself unresolved)
        base: TypeId,
    },
    /// Resolved named alias: a distinct type with the base's structure
    Alias {
        /// Name of the alias
        name: QName,
        /// The resolved base type
        base: TypeId,
    },
    /// Named leaf type converting one scalar value to and from XML text
    Simple(SimpleType),
    /// Named structured type with attributes, content and inheritance
    Complex(ComplexType),
    /// Ordered sequence of one scalar item type
    List(ListType),
    /// Ordered set of alternative item types (resolution only)
    Union(UnionType),
}

impl TypeDef {
    /// Check if this definition is still a placeholder
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            TypeDef::Unresolved(_) | TypeDef::UnresolvedCustom { .. }
        )
    }
}

/// A simple (scalar leaf) type
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Type name
    pub name: QName,
    /// The scalar codec for this type
    pub kind: ScalarKind,
}

impl SimpleType {
    /// Create a new simple type
    pub fn new(name: QName, kind: ScalarKind) -> Self {
        Self { name, kind }
    }

    /// Construct a value of this type from call arguments
    ///
    /// Accepts exactly one argument, positional or keyword-named `value`.
    /// Anything else fails with [`Error::Arity`] naming this type.
    pub fn instantiate(&self, args: CallArgs) -> Result<ScalarValue> {
        let total = args.positional.len() + args.keyword.len();
        if total != 1 {
            return Err(Error::Arity {
                type_name: self.name.local_name.clone(),
                detail: format!("takes exactly 1 argument ({} given)", total),
            });
        }

        if let Some((key, value)) = args.keyword.into_iter().next() {
            if key != "value" {
                return Err(Error::Arity {
                    type_name: self.name.local_name.clone(),
                    detail: format!("got an unexpected keyword argument '{}'", key),
                });
            }
            return Ok(value);
        }

        args.positional.into_iter().next().ok_or_else(|| Error::Arity {
            type_name: self.name.local_name.clone(),
            detail: "takes exactly 1 argument (0 given)".to_string(),
        })
    }
}

/// A list type wrapping one scalar item type
#[derive(Debug, Clone)]
pub struct ListType {
    /// The item type
    pub item: TypeId,
}

/// A union type wrapping alternative item types
///
/// Only graph resolution is defined for unions; marshaling through one
/// fails with [`Error::UnsupportedUnion`].
#[derive(Debug, Clone)]
pub struct UnionType {
    /// The alternative item types, in declaration order
    pub members: Vec<TypeId>,
}

/// An attribute declaration on a complex type
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: String,
    /// The attribute's (simple) type
    pub type_id: TypeId,
}

impl AttributeDecl {
    /// Create a new attribute declaration
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        let name = name.into();
        debug_assert!(
            crate::names::is_valid_ncname(&name),
            "attribute name must be an NCName: {name:?}"
        );
        Self { name, type_id }
    }

    /// Decode an attribute's text value via its own type
    pub fn parse(&self, graph: &TypeGraph, text: &str) -> Result<ScalarValue> {
        graph.scalar_kind(self.type_id)?.decode(text)
    }

    /// Encode a scalar value for this attribute
    pub fn encode(&self, graph: &TypeGraph, value: &ScalarValue) -> Result<String> {
        graph.scalar_kind(self.type_id)?.encode(value)
    }

    /// Signature contribution of this attribute
    pub fn signature(&self, graph: &TypeGraph) -> String {
        format!("{}: {}", self.name, graph.type_name(self.type_id))
    }
}

/// A complex (structured) type
#[derive(Debug, Clone)]
pub struct ComplexType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,
    /// Own content model, if any
    pub content: Option<ContentNode>,
    /// Own attribute declarations, in declaration order
    pub attributes: Vec<AttributeDecl>,
    /// Restriction base reference (resolved but not expanded)
    pub restriction: Option<TypeId>,
    /// Extension base reference (inherited structure)
    pub extension: Option<TypeId>,
    pub(crate) resolved: bool,
    pub(crate) effective: Option<EffectiveContent>,
}

impl ComplexType {
    /// Create a new complex type
    pub fn new(name: Option<QName>) -> Self {
        Self {
            name,
            content: None,
            attributes: Vec::new(),
            restriction: None,
            extension: None,
            resolved: false,
            effective: None,
        }
    }

    /// Set the content model
    pub fn with_content(mut self, content: ContentNode) -> Self {
        self.content = Some(content);
        self
    }

    /// Add an attribute declaration
    pub fn with_attribute(mut self, attr: AttributeDecl) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Set the extension base
    pub fn with_extension(mut self, base: TypeId) -> Self {
        self.extension = Some(base);
        self
    }

    /// Set the restriction base
    pub fn with_restriction(mut self, base: TypeId) -> Self {
        self.restriction = Some(base);
        self
    }

    /// Whether this type has completed reference resolution
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// The composed views, available once resolution has completed
    pub fn effective(&self) -> Option<&EffectiveContent> {
        self.effective.as_ref()
    }
}

/// Composed, extension-aware views of a complex type
///
/// Computed exactly once at the end of the resolution pass and immutable
/// afterwards. Base contributions always precede the type's own.
#[derive(Debug, Clone, Default)]
pub struct EffectiveContent {
    /// Effective attributes: extension's (recursively), then own
    pub attributes: Vec<AttributeDecl>,
    /// Effective content nodes paired with synthetic-or-real names
    pub content: Vec<(String, ContentNode)>,
    /// Depth-first flattening of the content nodes, insertion-ordered
    pub elements: IndexMap<String, ElementDecl>,
    /// Field table for compound values bound to this type
    pub fields: Arc<FieldTable>,
}
