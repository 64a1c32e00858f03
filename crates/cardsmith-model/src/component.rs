//! The card ("bubble"): top-level editable document.
//!
//! ## Learning: Ownership as a Tree
//!
//! A `Component` owns its sections, sections own their elements, and
//! boxes own their children. There are no back-pointers and no shared
//! nodes, so the whole document is a plain value: cloning it is a deep
//! copy, and `==` is structural equality.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::element::{BoxLayout, Element};
use crate::section::{Section, SectionKind};
use crate::{ModelError, ModelResult};

/// Identifier of the seed box that keeps `body` from ever being empty.
pub const INITIAL_BOX_ID: &str = "initial_box";

/// Identifier given to a component created with [`Component::default`].
pub const INITIAL_COMPONENT_ID: &str = "initial_bubble";

/// Seed section identifiers. The body spelling matches cards already in storage.
pub const INITIAL_HEADER_ID: &str = "initial_header";
pub const INITIAL_HERO_ID: &str = "initial_hero";
pub const INITIAL_BODY_ID: &str = "inital_body";
pub const INITIAL_FOOTER_ID: &str = "initial_footer";

/// Container type of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    #[default]
    Bubble,
}

/// Width token of a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleSize {
    Nano,
    Micro,
    Kilo,
    #[default]
    Mega,
    Giga,
}

impl fmt::Display for BubbleSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BubbleSize::Nano => "nano",
            BubbleSize::Micro => "micro",
            BubbleSize::Kilo => "kilo",
            BubbleSize::Mega => "mega",
            BubbleSize::Giga => "giga",
        };
        f.write_str(name)
    }
}

/// An editable card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,

    #[serde(rename = "type", default)]
    pub kind: ComponentKind,

    #[serde(default)]
    pub size: BubbleSize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Section>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Section>,

    /// Always present, never empty
    pub body: Section,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Section>,
}

impl Component {
    /// Creates a seeded component: empty header/hero/footer and a body
    /// holding the single protected `initial_box`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ComponentKind::default(),
            size: BubbleSize::default(),
            header: Some(Section::new(INITIAL_HEADER_ID)),
            hero: Some(Section::new(INITIAL_HERO_ID)),
            body: Section::new(INITIAL_BODY_ID).with_element(Self::seed_box()),
            footer: Some(Section::new(INITIAL_FOOTER_ID)),
        }
    }

    /// The box every body starts with.
    pub fn seed_box() -> Element {
        Element::container(INITIAL_BOX_ID, BoxLayout::Vertical)
    }

    /// Sets the size token.
    pub fn with_size(mut self, size: BubbleSize) -> Self {
        self.size = size;
        self
    }

    // ==================== Sections ====================

    /// Returns the section in a slot, if present.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        match kind {
            SectionKind::Header => self.header.as_ref(),
            SectionKind::Hero => self.hero.as_ref(),
            SectionKind::Body => Some(&self.body),
            SectionKind::Footer => self.footer.as_ref(),
        }
    }

    /// Iterates over present sections, top to bottom.
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, &Section)> {
        SectionKind::ALL
            .into_iter()
            .filter_map(|kind| self.section(kind).map(|section| (kind, section)))
    }

    /// Looks up a section by its identifier.
    pub fn section_by_id(&self, id: &str) -> Option<(SectionKind, &Section)> {
        self.sections().find(|(_, section)| section.id == id)
    }

    /// Returns a copy with the section in `kind` replaced.
    pub fn with_section(&self, kind: SectionKind, section: Section) -> Component {
        let mut component = self.clone();
        match kind {
            SectionKind::Header => component.header = Some(section),
            SectionKind::Hero => component.hero = Some(section),
            SectionKind::Body => component.body = section,
            SectionKind::Footer => component.footer = Some(section),
        }
        component
    }

    // ==================== Elements ====================

    /// Iterates over every element of every section, depth-first.
    pub fn walk(&self) -> impl Iterator<Item = &Element> {
        self.sections().flat_map(|(_, section)| section.walk())
    }

    /// Finds an element anywhere in the component.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.walk().find(|element| element.id == id)
    }

    /// Finds an element together with the slot it lives in.
    pub fn locate(&self, id: &str) -> Option<(SectionKind, &Element)> {
        self.sections()
            .find_map(|(kind, section)| section.find(id).map(|element| (kind, element)))
    }

    /// Returns true if an element with this identifier exists.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Returns the total number of elements.
    pub fn element_count(&self) -> usize {
        self.walk().count()
    }

    // ==================== Integrity ====================

    /// Checks the structural invariants: unique identifiers and a
    /// non-empty body.
    pub fn validate(&self) -> ModelResult<()> {
        if self.body.is_empty() {
            return Err(ModelError::EmptyBody);
        }

        let mut seen = HashSet::new();
        for element in self.walk() {
            if !seen.insert(element.id.as_str()) {
                return Err(ModelError::DuplicateId(element.id.clone()));
            }
        }

        Ok(())
    }

    /// Reseeds an empty body with `initial_box`.
    pub fn normalized(mut self) -> Component {
        if self.body.is_empty() {
            self.body.contents.push(Self::seed_box());
        }
        self
    }
}

impl Default for Component {
    fn default() -> Self {
        Self::new(INITIAL_COMPONENT_ID)
    }
}
