//! Qualified names and field-name utilities
//!
//! This module provides the qualified name type used to address
//! schema-declared types, NCName validation, and the generator for
//! synthetic field names given to unnamed effective-content entries.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\-\.0-9]*$")
        .unwrap()
});

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    /// Clark notation: `{namespace}localName`, or just `localName`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.is_empty() && !name.contains(':') && NCNAME.is_match(name)
}

/// Generator for synthetic unique field names
///
/// Effective-content entries that carry no element name of their own
/// (composite groups, simple-content wrappers) are keyed by `_value_1`,
/// `_value_2`, ... in allocation order.
#[derive(Debug, Default)]
pub struct FieldNameGenerator {
    counter: u32,
}

impl FieldNameGenerator {
    /// Create a new generator starting at `_value_1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next synthetic field name
    pub fn next_name(&mut self) -> String {
        self.counter += 1;
        format!("_value_{}", self.counter)
    }
}
