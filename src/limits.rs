//! Limits for XML tree processing
//!
//! This module defines limits applied by the XML reader to prevent
//! resource exhaustion on hostile or malformed input.

use crate::error::{Error, Result};

/// Limits applied while reading XML trees
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum XML input size in bytes
    pub max_xml_size: usize,

    /// Maximum number of children per element
    pub max_children: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * 1024 * 1024, // 100 MB
            max_children: 100_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_children: 10_000,
        }
    }

    /// Check an element nesting depth against the limit
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            return Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )));
        }
        Ok(())
    }

    /// Check an input size against the limit
    pub fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            return Err(Error::LimitExceeded(format!(
                "XML size {} exceeds maximum {}",
                size, self.max_xml_size
            )));
        }
        Ok(())
    }

    /// Check a child count against the limit
    pub fn check_children(&self, count: usize) -> Result<()> {
        if count > self.max_children {
            return Err(Error::LimitExceeded(format!(
                "child count {} exceeds maximum {}",
                count, self.max_children
            )));
        }
        Ok(())
    }
}
