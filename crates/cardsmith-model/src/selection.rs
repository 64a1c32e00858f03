//! The element currently targeted by the inspector.
//!
//! A selection is a *weak* reference: it holds a copy of the element's
//! details plus the identifiers of where it lives, never a borrow into the
//! tree. That keeps snapshots independent, at the cost of having to
//! refresh or clear the selection when the tree changes underneath it.

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::element::Element;

/// Current selection of an editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Selection {
    /// Nothing selected (the user clicked empty canvas)
    #[default]
    Empty,
    /// An element is selected
    Element {
        element: Element,
        #[serde(rename = "sectionId", default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
        #[serde(rename = "bubbleId", default, skip_serializing_if = "Option::is_none")]
        bubble_id: Option<String>,
    },
}

impl Selection {
    /// Selects an element without location hints.
    pub fn new(element: Element) -> Self {
        Selection::Element {
            element,
            section_id: None,
            bubble_id: None,
        }
    }

    /// Selects an element located in a given section and component.
    pub fn located(
        element: Element,
        section_id: Option<String>,
        bubble_id: Option<String>,
    ) -> Self {
        Selection::Element {
            element,
            section_id,
            bubble_id,
        }
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    /// Returns the selected element's details.
    pub fn element(&self) -> Option<&Element> {
        match self {
            Selection::Empty => None,
            Selection::Element { element, .. } => Some(element),
        }
    }

    /// Returns the selected element's identifier.
    pub fn element_id(&self) -> Option<&str> {
        self.element().map(|element| element.id.as_str())
    }

    /// Returns the section identifier, if known.
    pub fn section_id(&self) -> Option<&str> {
        match self {
            Selection::Element { section_id, .. } => section_id.as_deref(),
            Selection::Empty => None,
        }
    }

    /// Returns the component identifier, if known.
    pub fn bubble_id(&self) -> Option<&str> {
        match self {
            Selection::Element { bubble_id, .. } => bubble_id.as_deref(),
            Selection::Empty => None,
        }
    }

    /// Returns true if `id` is the selected element.
    pub fn is_selected(&self, id: &str) -> bool {
        self.element_id() == Some(id)
    }

    /// Returns this selection pointing at fresh details, keeping location.
    pub fn refreshed(&self, element: Element) -> Selection {
        match self {
            Selection::Empty => Selection::new(element),
            Selection::Element {
                section_id,
                bubble_id,
                ..
            } => Selection::Element {
                element,
                section_id: section_id.clone(),
                bubble_id: bubble_id.clone(),
            },
        }
    }

    /// Returns an empty selection if the selected element is no longer in
    /// `component`, otherwise an unchanged copy.
    pub fn revalidated(&self, component: &Component) -> Selection {
        match self.element_id() {
            Some(id) if !component.contains(id) => Selection::Empty,
            _ => self.clone(),
        }
    }
}
