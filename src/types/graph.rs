//! Type graph arena and registry
//!
//! The graph owns every type definition in an arena addressed by
//! [`TypeId`] and keeps the registry mapping qualified names to types.
//! After the resolution pass the graph is read-only: marshaling,
//! serialization and signature generation only take `&TypeGraph`, so a
//! resolved graph can be shared across threads freely.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::names::QName;
use crate::scalars::ScalarKind;
use crate::XSD_NAMESPACE;

use super::{ComplexType, EffectiveContent, ListType, SimpleType, TypeDef, TypeId, UnionType};

/// Arena of type definitions plus the qualified-name registry
#[derive(Debug, Default)]
pub struct TypeGraph {
    slots: Vec<TypeDef>,
    registry: IndexMap<QName, TypeId>,
}

impl TypeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with the built-in scalar types registered
    pub fn with_builtins() -> Self {
        let mut graph = Self::new();
        for kind in [
            ScalarKind::String,
            ScalarKind::Boolean,
            ScalarKind::Integer,
            ScalarKind::Decimal,
            ScalarKind::Double,
            ScalarKind::DateTime,
            ScalarKind::Date,
            ScalarKind::Time,
            ScalarKind::Base64Binary,
        ] {
            graph.add_simple(QName::namespaced(XSD_NAMESPACE, kind.name()), kind);
        }
        graph
    }

    /// Number of types in the arena
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert a definition, returning its arena handle
    pub fn insert(&mut self, def: TypeDef) -> TypeId {
        let id = TypeId::new(self.slots.len());
        self.slots.push(def);
        id
    }

    /// Register a qualified name for a type
    pub fn register(&mut self, qname: QName, id: TypeId) {
        self.registry.insert(qname, id);
    }

    /// Insert and register a simple type
    pub fn add_simple(&mut self, name: QName, kind: ScalarKind) -> TypeId {
        let id = self.insert(TypeDef::Simple(SimpleType::new(name.clone(), kind)));
        self.register(name, id);
        id
    }

    /// Insert a complex type, registering it when named
    pub fn add_complex(&mut self, complex: ComplexType) -> TypeId {
        let name = complex.name.clone();
        let id = self.insert(TypeDef::Complex(complex));
        if let Some(name) = name {
            self.register(name, id);
        }
        id
    }

    /// Insert an unresolved placeholder reference
    pub fn add_unresolved(&mut self, qname: QName) -> TypeId {
        self.insert(TypeDef::Unresolved(qname))
    }

    /// Insert an unresolved named-subtype placeholder
    pub fn add_custom(&mut self, name: QName, base: TypeId) -> TypeId {
        self.insert(TypeDef::UnresolvedCustom { name, base })
    }

    /// Insert a list type
    pub fn add_list(&mut self, item: TypeId) -> TypeId {
        self.insert(TypeDef::List(ListType { item }))
    }

    /// Insert a union type
    pub fn add_union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.insert(TypeDef::Union(UnionType { members }))
    }

    /// Registry contract: look up a type by qualified name
    pub fn get_type(&self, qname: &QName) -> Result<TypeId> {
        self.registry
            .get(qname)
            .copied()
            .ok_or_else(|| Error::TypeNotFound(qname.clone()))
    }

    /// The definition stored at a handle
    pub fn def(&self, id: TypeId) -> &TypeDef {
        &self.slots[id.index()]
    }

    pub(crate) fn def_mut(&mut self, id: TypeId) -> &mut TypeDef {
        &mut self.slots[id.index()]
    }

    /// Iterate over all arena handles
    pub fn ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.slots.len()).map(TypeId::new)
    }

    /// Follow alias indirection to the underlying type
    pub fn follow_alias(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // alias chains are short; the arena bound guards against a
        // malformed self-aliasing slot
        for _ in 0..self.slots.len() {
            match self.def(current) {
                TypeDef::Alias { base, .. } => current = *base,
                _ => return current,
            }
        }
        current
    }

    /// Human-readable name of a type
    pub fn type_name(&self, id: TypeId) -> String {
        match self.def(id) {
            TypeDef::Unresolved(qname) => qname.local_name.clone(),
            TypeDef::UnresolvedCustom { name, .. } | TypeDef::Alias { name, .. } => {
                name.local_name.clone()
            }
            TypeDef::Simple(s) => s.name.local_name.clone(),
            TypeDef::Complex(c) => c
                .name
                .as_ref()
                .map(|n| n.local_name.clone())
                .unwrap_or_else(|| "anonymous".to_string()),
            TypeDef::List(l) => format!("{}[]", self.type_name(l.item)),
            TypeDef::Union(_) => "union".to_string(),
        }
    }

    /// The scalar codec behind a (possibly aliased) simple type
    pub fn scalar_kind(&self, id: TypeId) -> Result<ScalarKind> {
        match self.def(self.follow_alias(id)) {
            TypeDef::Simple(s) => Ok(s.kind),
            other => Err(Error::Value(format!(
                "expected a simple type, found {}",
                match other {
                    TypeDef::Complex(_) => "a complex type",
                    TypeDef::List(_) => "a list type",
                    TypeDef::Union(_) => "a union type",
                    _ => "an unresolved reference",
                }
            ))),
        }
    }

    /// The composed views of a resolved complex type (through aliases)
    pub fn effective_of(&self, id: TypeId) -> Result<&EffectiveContent> {
        match self.def(self.follow_alias(id)) {
            TypeDef::Complex(c) => c.effective.as_ref().ok_or_else(|| {
                Error::Value(format!(
                    "type '{}' has not been resolved",
                    self.type_name(id)
                ))
            }),
            _ => Err(Error::Value(format!(
                "type '{}' is not a complex type",
                self.type_name(id)
            ))),
        }
    }
}
