//! # Cardsmith Model
//!
//! Typed card documents and the snapshot history they are edited through.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `Component` owns its sections, which own their `Element` trees
//! - Lookups like `find()` return borrowed references (`&Element`)
//! - Edits never mutate a tree in place: they build a new value
//!
//! ### Making Invalid States Unrepresentable
//! - Only `ElementKind::Box` has a `contents` field
//! - `Component::body` is not optional, unlike the other sections
//! - `History` cannot be constructed empty

mod component;
mod element;
mod history;
mod section;
mod selection;

pub use component::{
    BubbleSize, Component, ComponentKind, INITIAL_BODY_ID, INITIAL_BOX_ID, INITIAL_COMPONENT_ID,
    INITIAL_FOOTER_ID, INITIAL_HEADER_ID, INITIAL_HERO_ID,
};
pub use element::{
    Attributes, BoxLayout, ButtonAction, Element, ElementKind, ElementPatch, ElementType, Walk,
};
pub use history::History;
pub use section::{Section, SectionKind};
pub use selection::Selection;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by malformed documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown element type: {0}")]
    UnknownKind(String),

    #[error("Element {id} of type {kind} is missing field `{field}`")]
    MissingField {
        id: String,
        kind: ElementType,
        field: &'static str,
    },

    #[error("Duplicate element id: {0}")]
    DuplicateId(String),

    #[error("Body section must contain at least one element")]
    EmptyBody,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_creation() {
        let component = Component::default();
        assert_eq!(component.element_count(), 1);
        assert!(component.contains(INITIAL_BOX_ID));
    }

    #[test]
    fn test_nested_tree_from_json() {
        let json = r#"{
            "id": "card",
            "type": "bubble",
            "size": "kilo",
            "hero": { "id": "initial_hero", "contents": [
                { "id": "v1", "type": "video", "url": "https://example.com/v.mp4",
                  "previewUrl": "https://example.com/v.png" }
            ]},
            "body": { "id": "inital_body", "contents": [
                { "id": "initial_box", "type": "box", "contents": [
                    { "id": "row", "type": "box", "layout": "baseline", "contents": [
                        { "id": "star", "type": "icon", "url": "https://example.com/s.png" },
                        { "id": "score", "type": "text", "text": "4.5", "weight": "bold" }
                    ]}
                ]}
            ]}
        }"#;

        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.size, BubbleSize::Kilo);
        assert_eq!(component.element_count(), 5);
        assert!(component.validate().is_ok());

        let (slot, video) = component.locate("v1").unwrap();
        assert_eq!(slot, SectionKind::Hero);
        assert_eq!(
            video.kind,
            ElementKind::Video {
                url: "https://example.com/v.mp4".into(),
                preview_url: Some("https://example.com/v.png".into()),
            }
        );

        let score = component.find("score").unwrap();
        assert_eq!(score.attributes.get("weight"), Some(&serde_json::json!("bold")));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ModelError::DuplicateId("x".into()).to_string(),
            "Duplicate element id: x"
        );
        assert_eq!(
            ModelError::MissingField {
                id: "b1".into(),
                kind: ElementType::Button,
                field: "action"
            }
            .to_string(),
            "Element b1 of type button is missing field `action`"
        );
    }
}
