//! Named regions of a card.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::element::{Element, Walk};

/// The four slots a card is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Header,
    Hero,
    Body,
    Footer,
}

impl SectionKind {
    /// All slots, top to bottom.
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Header,
        SectionKind::Hero,
        SectionKind::Body,
        SectionKind::Footer,
    ];

    /// Returns the slot name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Hero => "hero",
            SectionKind::Body => "body",
            SectionKind::Footer => "footer",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section: an identifier plus an ordered list of root elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(default)]
    pub contents: Vec<Element>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            contents: Vec::new(),
        }
    }

    /// Appends a root element.
    pub fn with_element(mut self, element: Element) -> Self {
        self.contents.push(element);
        self
    }

    /// Returns a copy of this section with its roots replaced.
    pub fn with_contents(&self, contents: Vec<Element>) -> Section {
        Section {
            id: self.id.clone(),
            contents,
        }
    }

    /// Returns true if the section has no root elements.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Iterates over every element in the section, depth-first.
    pub fn walk(&self) -> Walk<'_> {
        Walk::over(&self.contents)
    }

    /// Finds an element anywhere in the section.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.walk().find(|element| element.id == id)
    }
}
