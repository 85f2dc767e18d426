//! Parsed source element tree
//!
//! The ingest core owns no wire format; upstream parsing hands the
//! fragments this core consumes over in this shape. Accessors normalize
//! whitespace and treat empty tokens as absent, so downstream decoding
//! never confuses "empty" with "present but blank".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of the parsed source document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder-style text setter
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style child appender (preserves document order)
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value, trimmed; empty attributes read as absent
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First child with the given element name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given element name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text content; empty text reads as absent
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Type discriminator: `xsi:type`, falling back to an unprefixed `type`
    pub fn type_discriminator(&self) -> Option<&str> {
        self.attr("xsi:type").or_else(|| self.attr("type"))
    }
}
