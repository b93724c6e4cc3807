//! # soapxsd
//!
//! Type-graph resolution and value marshaling for an XML-Schema-derived
//! type system, as used by wire protocol (SOAP-style) clients.
//!
//! Schema-declared type definitions — simple scalars, structured records,
//! lists, unions — become a resolved, queryable type graph; the graph then
//! drives lossless, ordering-preserving conversion between XML element
//! trees and structured program values in both directions, plus a
//! canonical serialized representation and structural signatures.
//!
//! ## Features
//!
//! - Reference resolution with forward references and cyclic
//!   self-reference
//! - Extension/restriction composition into effective attribute and
//!   content views
//! - XML -> value parsing and value -> XML rendering over the resolved
//!   graph
//! - Declaration-ordered serialization with a JSON view
//! - Structural signatures with cycle avoidance
//!
//! ## Example
//!
//! ```rust,ignore
//! use soapxsd::{marshal, ComplexType, ContentNode, QName, ScalarKind, TypeGraph, XmlNode};
//!
//! let mut graph = TypeGraph::new();
//! let string = graph.add_simple(QName::local("string"), ScalarKind::String);
//! let person = graph.add_complex(
//!     ComplexType::new(Some(QName::local("Person")))
//!         .with_content(ContentNode::element("name", string)),
//! );
//! graph.resolve(person)?;
//!
//! let node = XmlNode::from_str("<person><name>Alice</name></person>")?;
//! let value = marshal::parse(&graph, person, &node)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;

// XML tree collaborator
pub mod documents;

// Scalar codecs
pub mod scalars;

// Type graph, registry, resolution
pub mod types;

// Value model
pub mod values;

// Marshaling and derived representations
pub mod marshal;
pub mod serialize;
pub mod signature;

// Re-exports for convenience
pub use documents::XmlNode;
pub use error::{Error, Result};
pub use names::QName;
pub use scalars::{ScalarKind, ScalarValue};
pub use serialize::Serialized;
pub use types::{
    AttributeDecl, ComplexType, Compositor, ContentNode, ElementDecl, GroupModel, Occurs,
    TypeDef, TypeGraph, TypeId,
};
pub use values::{CallArgs, CompoundValue, Value};

/// Version of the soapxsd library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema instance namespace (`xsi:type`)
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
