//! Reference resolution and inheritance composition
//!
//! Resolution is a single pass over the graph: placeholder references are
//! replaced by their registry targets, custom placeholders become named
//! aliases, and every complex type gets its composed effective views.
//!
//! The `resolved` flag is set on a complex type *before* its references
//! are descended into, which both makes resolution idempotent and
//! terminates cycles: a type that extends or references itself (directly
//! or through a chain) finds the flag already set when the walk comes
//! back around.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::names::{FieldNameGenerator, QName};
use crate::values::FieldTable;

use super::content::{ContentNode, ElementDecl};
use super::{EffectiveContent, TypeDef, TypeGraph, TypeId};

/// Lightweight per-slot view used to release the arena borrow before
/// recursing
enum Shape {
    Unresolved(QName),
    Custom(QName, TypeId),
    Alias(TypeId),
    Concrete,
    Complex {
        resolved: bool,
        extension: Option<TypeId>,
        restriction: Option<TypeId>,
        attr_types: Vec<TypeId>,
    },
    List(TypeId),
    Union(Vec<TypeId>),
}

impl TypeGraph {
    /// Resolve a type and everything reachable from it
    ///
    /// Returns the canonical handle: for a placeholder reference this is
    /// the registry target, otherwise the given handle. Resolving an
    /// already-resolved type returns immediately.
    pub fn resolve(&mut self, id: TypeId) -> Result<TypeId> {
        let canonical = self.resolve_refs(id)?;
        self.finalize_views();
        Ok(canonical)
    }

    /// Resolve every declared type, publishing a fully resolved graph
    pub fn resolve_all(&mut self) -> Result<()> {
        // plain placeholder slots resolve through their targets, which are
        // all covered here
        let roots: Vec<TypeId> = self
            .ids()
            .filter(|&id| !matches!(self.def(id), TypeDef::Unresolved(_)))
            .collect();
        for id in roots {
            self.resolve_refs(id)?;
        }
        self.finalize_views();
        Ok(())
    }

    fn shape_of(&self, id: TypeId) -> Shape {
        match self.def(id) {
            TypeDef::Unresolved(qname) => Shape::Unresolved(qname.clone()),
            TypeDef::UnresolvedCustom { name, base } => Shape::Custom(name.clone(), *base),
            TypeDef::Alias { base, .. } => Shape::Alias(*base),
            TypeDef::Simple(_) => Shape::Concrete,
            TypeDef::Complex(ct) => Shape::Complex {
                resolved: ct.resolved,
                extension: ct.extension,
                restriction: ct.restriction,
                attr_types: ct.attributes.iter().map(|a| a.type_id).collect(),
            },
            TypeDef::List(l) => Shape::List(l.item),
            TypeDef::Union(u) => Shape::Union(u.members.clone()),
        }
    }

    fn resolve_refs(&mut self, id: TypeId) -> Result<TypeId> {
        match self.shape_of(id) {
            Shape::Unresolved(qname) => {
                let target = self
                    .get_type(&qname)
                    .map_err(|_| Error::UnresolvedReference(qname.clone()))?;
                debug!(qname = %qname, "resolving type reference");
                self.resolve_refs(target)
            }
            Shape::Custom(name, base) => {
                let base = self.resolve_refs(base)?;
                debug!(name = %name, "synthesizing named alias");
                *self.def_mut(id) = TypeDef::Alias { name, base };
                Ok(id)
            }
            Shape::Alias(base) => {
                let resolved = self.resolve_refs(base)?;
                if resolved != base {
                    if let TypeDef::Alias { base, .. } = self.def_mut(id) {
                        *base = resolved;
                    }
                }
                Ok(id)
            }
            Shape::Concrete => Ok(id),
            Shape::Complex {
                resolved,
                extension,
                restriction,
                attr_types,
            } => {
                if resolved {
                    return Ok(id);
                }
                // mark before descending so self-reference terminates
                let content = {
                    let TypeDef::Complex(ct) = self.def_mut(id) else {
                        unreachable!("shape checked above")
                    };
                    ct.resolved = true;
                    ct.content.take()
                };

                let extension = extension.map(|t| self.resolve_refs(t)).transpose()?;
                let restriction = restriction.map(|t| self.resolve_refs(t)).transpose()?;

                let mut resolved_attrs = Vec::with_capacity(attr_types.len());
                for t in attr_types {
                    resolved_attrs.push(self.resolve_refs(t)?);
                }

                let mut content = content;
                if let Some(node) = content.as_mut() {
                    self.resolve_content(node)?;
                }

                let TypeDef::Complex(ct) = self.def_mut(id) else {
                    unreachable!("shape checked above")
                };
                ct.extension = extension;
                ct.restriction = restriction;
                ct.content = content;
                for (attr, t) in ct.attributes.iter_mut().zip(resolved_attrs) {
                    attr.type_id = t;
                }
                Ok(id)
            }
            Shape::List(item) => {
                let item = self.resolve_refs(item)?;
                if let TypeDef::List(l) = self.def_mut(id) {
                    l.item = item;
                }
                Ok(id)
            }
            Shape::Union(members) => {
                let mut resolved = Vec::with_capacity(members.len());
                for m in members {
                    resolved.push(self.resolve_refs(m)?);
                }
                if let TypeDef::Union(u) = self.def_mut(id) {
                    u.members = resolved;
                }
                Ok(id)
            }
        }
    }

    fn resolve_content(&mut self, node: &mut ContentNode) -> Result<()> {
        match node {
            ContentNode::Element(decl) => {
                decl.type_id = self.resolve_refs(decl.type_id)?;
                Ok(())
            }
            ContentNode::Group(group) => {
                for child in &mut group.children {
                    self.resolve_content(child)?;
                }
                Ok(())
            }
        }
    }

    /// Compute effective views for every resolved complex type that does
    /// not have them yet
    fn finalize_views(&mut self) {
        let pending: Vec<TypeId> = self
            .ids()
            .filter(|&id| {
                matches!(self.def(id), TypeDef::Complex(ct) if ct.resolved && ct.effective.is_none())
            })
            .collect();

        for id in pending {
            let mut visiting = HashSet::new();
            let eff = self.compose_effective(id, &mut visiting);
            if let TypeDef::Complex(ct) = self.def_mut(id) {
                if ct.effective.is_none() {
                    ct.effective = Some(eff);
                }
            }
        }
        debug!(types = self.len(), "resolution pass complete");
    }

    /// Compose the extension-aware views of a complex type
    ///
    /// The visiting set truncates extension cycles, so each contributed
    /// item appears exactly once even when a type extends itself.
    fn compose_effective(&self, id: TypeId, visiting: &mut HashSet<TypeId>) -> EffectiveContent {
        let TypeDef::Complex(ct) = self.def(id) else {
            return EffectiveContent::default();
        };
        if let Some(eff) = &ct.effective {
            return eff.clone();
        }
        if !visiting.insert(id) {
            return EffectiveContent::default();
        }

        let mut attributes = Vec::new();
        let mut content: Vec<(String, ContentNode)> = Vec::new();
        let mut names = FieldNameGenerator::new();

        if let Some(ext) = ct.extension {
            let target = self.follow_alias(ext);
            let wrapper_name = names.next_name();
            match self.def(target) {
                // simple-content extension: one synthetic element wrapping
                // the scalar
                TypeDef::Simple(_) | TypeDef::List(_) => {
                    content.push((
                        wrapper_name.clone(),
                        ContentNode::Element(ElementDecl::new(wrapper_name, ext)),
                    ));
                }
                TypeDef::Complex(_) => {
                    let base = self.compose_effective(target, visiting);
                    attributes.extend(base.attributes);
                    content.extend(base.content);
                }
                _ => {}
            }
        }

        attributes.extend(ct.attributes.iter().cloned());

        if let Some(node) = &ct.content {
            content.push((names.next_name(), node.clone()));
        }

        visiting.remove(&id);

        let mut elements = IndexMap::new();
        for (_, node) in &content {
            flatten_elements(node, &mut elements);
        }

        let mut field_names: Vec<String> = elements.keys().cloned().collect();
        field_names.extend(attributes.iter().map(|a| a.name.clone()));
        let fields = Arc::new(FieldTable::new(self.type_name(id), field_names));

        EffectiveContent {
            attributes,
            content,
            elements,
            fields,
        }
    }
}

/// Depth-first flattening of a content node into (name, element) pairs
fn flatten_elements(node: &ContentNode, out: &mut IndexMap<String, ElementDecl>) {
    match node {
        ContentNode::Element(decl) => {
            out.insert(decl.name.clone(), decl.clone());
        }
        ContentNode::Group(group) => {
            for child in &group.children {
                flatten_elements(child, out);
            }
        }
    }
}
