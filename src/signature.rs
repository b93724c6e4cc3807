//! Structural signature generation
//!
//! A signature is a comma-joined, declaration-ordered list of a type's
//! effective elements and attributes. Elements whose type is the type
//! being signed are skipped so signatures terminate on cyclic schemas
//! (the printed signature is incomplete there, by choice).

use crate::types::{TypeDef, TypeGraph, TypeId};

/// Produce the structural signature of a type
pub fn signature(graph: &TypeGraph, id: TypeId) -> String {
    match graph.def(id) {
        TypeDef::Simple(simple) => simple.name.local_name.clone(),
        TypeDef::Alias { base, .. } => signature(graph, *base),
        TypeDef::List(list) => format!("{}[]", graph.type_name(list.item)),
        TypeDef::Union(_) => String::new(),
        TypeDef::Unresolved(_) | TypeDef::UnresolvedCustom { .. } => String::new(),
        TypeDef::Complex(_) => {
            let Ok(effective) = graph.effective_of(id) else {
                return String::new();
            };
            let this = graph.follow_alias(id);
            let mut parts = Vec::new();

            for (_, decl) in &effective.elements {
                // cyclic schemas: skip an element typed as the type
                // being signed
                if graph.follow_alias(decl.type_id) == this {
                    continue;
                }
                parts.push(decl.signature(graph));
            }

            for attr in &effective.attributes {
                parts.push(attr.signature(graph));
            }

            parts.join(", ")
        }
    }
}
