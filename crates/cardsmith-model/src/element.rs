//! Card elements: the nodes of the document tree.
//!
//! ## Learning: Sum Types Instead of Type Strings
//!
//! The persisted card format tags every node with a free-form `type`
//! string, and only `box` nodes are allowed to carry `contents`. Here the
//! tag becomes [`ElementKind`], and `contents` only exists on the
//! `Box` variant. "A text node with children" simply cannot be built.
//!
//! The JSON shape stays flat (`{"id": .., "type": "text", "text": ..}`),
//! so (de)serialization goes through a loose intermediate struct that
//! re-stamps the tree on the way in.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{ModelError, ModelResult};

/// Opaque visual payload (margins, padding, colors, sizing...).
///
/// The edit engine never interprets these; it only carries them along.
pub type Attributes = Map<String, Value>;

/// Keys owned by the element itself rather than its visual attributes.
const RESERVED_KEYS: &[&str] = &[
    "id",
    "type",
    "layout",
    "contents",
    "text",
    "action",
    "url",
    "previewUrl",
];

/// The discriminant of an element, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Box,
    Text,
    Button,
    Separator,
    Video,
    Image,
    Icon,
}

impl ElementType {
    /// All element types, in palette order.
    pub const ALL: [ElementType; 7] = [
        ElementType::Box,
        ElementType::Text,
        ElementType::Button,
        ElementType::Separator,
        ElementType::Video,
        ElementType::Image,
        ElementType::Icon,
    ];

    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Box => "box",
            ElementType::Text => "text",
            ElementType::Button => "button",
            ElementType::Separator => "separator",
            ElementType::Video => "video",
            ElementType::Image => "image",
            ElementType::Icon => "icon",
        }
    }

    /// Returns true for the only kind allowed to own children.
    pub fn is_container(&self) -> bool {
        matches!(self, ElementType::Box)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::UnknownKind(s.to_string()))
    }
}

/// Orientation of a box's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxLayout {
    #[default]
    Vertical,
    Horizontal,
    /// Children share a text baseline (used for icon + text rows)
    Baseline,
}

impl BoxLayout {
    /// Returns the wire name of this layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxLayout::Vertical => "vertical",
            BoxLayout::Horizontal => "horizontal",
            BoxLayout::Baseline => "baseline",
        }
    }
}

/// What happens when a button is tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ButtonAction {
    /// Open a link
    Uri {
        #[serde(default)]
        label: String,
        #[serde(default)]
        uri: String,
    },
    /// Send a chat message on the user's behalf
    Message {
        #[serde(default)]
        label: String,
        #[serde(default)]
        text: String,
    },
    /// Send a postback event
    Postback {
        #[serde(default)]
        label: String,
        #[serde(default)]
        data: String,
    },
}

impl ButtonAction {
    /// Creates a link action.
    pub fn uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        ButtonAction::Uri {
            label: label.into(),
            uri: uri.into(),
        }
    }

    /// Returns the button label.
    pub fn label(&self) -> &str {
        match self {
            ButtonAction::Uri { label, .. }
            | ButtonAction::Message { label, .. }
            | ButtonAction::Postback { label, .. } => label,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            ButtonAction::Uri { label, uri } => {
                json!({ "type": "uri", "label": label, "uri": uri })
            }
            ButtonAction::Message { label, text } => {
                json!({ "type": "message", "label": label, "text": text })
            }
            ButtonAction::Postback { label, data } => {
                json!({ "type": "postback", "label": label, "data": data })
            }
        }
    }
}

/// Kind-specific payload of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Box {
        layout: BoxLayout,
        contents: Vec<Element>,
    },
    Text {
        text: String,
    },
    Button {
        action: ButtonAction,
    },
    Separator,
    Video {
        url: String,
        preview_url: Option<String>,
    },
    Image {
        url: String,
    },
    Icon {
        url: String,
    },
}

impl ElementKind {
    /// Returns the discriminant.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Box { .. } => ElementType::Box,
            ElementKind::Text { .. } => ElementType::Text,
            ElementKind::Button { .. } => ElementType::Button,
            ElementKind::Separator => ElementType::Separator,
            ElementKind::Video { .. } => ElementType::Video,
            ElementKind::Image { .. } => ElementType::Image,
            ElementKind::Icon { .. } => ElementType::Icon,
        }
    }
}

/// A single node in a card.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawElement")]
pub struct Element {
    /// Identifier, unique within one component
    pub id: String,
    /// Kind and kind-specific fields
    pub kind: ElementKind,
    /// Visual attributes, carried opaquely
    pub attributes: Attributes,
}

impl Element {
    /// Creates an element with no visual attributes.
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            attributes: Attributes::new(),
        }
    }

    /// Creates an empty box.
    pub fn container(id: impl Into<String>, layout: BoxLayout) -> Self {
        Self::new(
            id,
            ElementKind::Box {
                layout,
                contents: Vec::new(),
            },
        )
    }

    /// Creates a text element.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Text { text: text.into() })
    }

    /// Creates a button.
    pub fn button(id: impl Into<String>, action: ButtonAction) -> Self {
        Self::new(id, ElementKind::Button { action })
    }

    /// Creates a separator.
    pub fn separator(id: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Separator)
    }

    /// Creates a video.
    pub fn video(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            id,
            ElementKind::Video {
                url: url.into(),
                preview_url: None,
            },
        )
    }

    /// Creates an image.
    pub fn image(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Image { url: url.into() })
    }

    /// Creates an icon.
    pub fn icon(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Icon { url: url.into() })
    }

    /// Generates a fresh identifier for a new element of the given type.
    ///
    /// Uniqueness within a component is the caller's job; the v4 UUID
    /// suffix just makes collisions practically impossible.
    pub fn generate_id(kind: ElementType) -> String {
        format!("{}_{}", kind, Uuid::new_v4().simple())
    }

    /// Sets a visual attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Appends a child. Leaf elements are returned unchanged.
    pub fn with_child(mut self, child: Element) -> Self {
        if let ElementKind::Box { contents, .. } = &mut self.kind {
            contents.push(child);
        }
        self
    }

    // ==================== Accessors ====================

    /// Returns the discriminant.
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Returns true if this element may own children.
    pub fn is_container(&self) -> bool {
        self.element_type().is_container()
    }

    /// Returns the children of a box, `None` for leaf kinds.
    pub fn contents(&self) -> Option<&[Element]> {
        match &self.kind {
            ElementKind::Box { contents, .. } => Some(contents),
            _ => None,
        }
    }

    /// Returns the layout of a box.
    pub fn layout(&self) -> Option<BoxLayout> {
        match &self.kind {
            ElementKind::Box { layout, .. } => Some(*layout),
            _ => None,
        }
    }

    /// Returns a copy of this box with its children replaced.
    ///
    /// Leaf kinds have no children to replace and are returned as-is.
    pub fn with_contents(&self, contents: Vec<Element>) -> Element {
        match &self.kind {
            ElementKind::Box { layout, .. } => Element {
                id: self.id.clone(),
                kind: ElementKind::Box {
                    layout: *layout,
                    contents,
                },
                attributes: self.attributes.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Iterates over this element and all of its descendants, depth-first.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![self],
        }
    }

    /// Finds a descendant (or self) by identifier.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.walk().find(|element| element.id == id)
    }

    /// Returns the number of nodes in this subtree, self included.
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    // ==================== Wire Form ====================

    /// Returns the flat JSON object form of this element.
    pub fn to_fields(&self) -> Attributes {
        let mut fields = Attributes::new();
        fields.insert("id".into(), Value::String(self.id.clone()));
        fields.insert("type".into(), Value::String(self.element_type().as_str().into()));

        match &self.kind {
            ElementKind::Box { layout, contents } => {
                fields.insert("layout".into(), Value::String(layout.as_str().into()));
                fields.insert(
                    "contents".into(),
                    Value::Array(
                        contents
                            .iter()
                            .map(|child| Value::Object(child.to_fields()))
                            .collect(),
                    ),
                );
            }
            ElementKind::Text { text } => {
                fields.insert("text".into(), Value::String(text.clone()));
            }
            ElementKind::Button { action } => {
                fields.insert("action".into(), action.to_value());
            }
            ElementKind::Separator => {}
            ElementKind::Video { url, preview_url } => {
                fields.insert("url".into(), Value::String(url.clone()));
                if let Some(preview) = preview_url {
                    fields.insert("previewUrl".into(), Value::String(preview.clone()));
                }
            }
            ElementKind::Image { url } | ElementKind::Icon { url } => {
                fields.insert("url".into(), Value::String(url.clone()));
            }
        }

        for (key, value) in &self.attributes {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                fields.insert(key.clone(), value.clone());
            }
        }

        fields
    }

    /// Builds an element from its flat JSON object form.
    pub fn from_fields(fields: Attributes) -> ModelResult<Element> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Returns a shallow merge of this element and `patch`.
    ///
    /// Fields present in the patch win, absent fields are kept. The
    /// identifier never changes. A patch that switches `type` goes through
    /// the same re-stamping as loading, so a box turned into text loses
    /// its `contents`.
    pub fn merged(&self, patch: &ElementPatch) -> ModelResult<Element> {
        let mut fields = self.to_fields();
        for (key, value) in &patch.fields {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("id".into(), Value::String(self.id.clone()));
        Self::from_fields(fields)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_fields().serialize(serializer)
    }
}

/// Loose form of an element as it appears in stored JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    layout: Option<BoxLayout>,
    #[serde(default)]
    contents: Option<Vec<Element>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    action: Option<ButtonAction>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(flatten)]
    attributes: Attributes,
}

impl TryFrom<RawElement> for Element {
    type Error = ModelError;

    fn try_from(raw: RawElement) -> Result<Self, Self::Error> {
        let element_type: ElementType = raw.kind.parse()?;

        // Only boxes keep `contents`; everything else is re-stamped away.
        let kind = match element_type {
            ElementType::Box => ElementKind::Box {
                layout: raw.layout.unwrap_or_default(),
                contents: raw.contents.unwrap_or_default(),
            },
            ElementType::Text => ElementKind::Text {
                text: raw.text.unwrap_or_default(),
            },
            ElementType::Button => ElementKind::Button {
                action: raw.action.ok_or_else(|| ModelError::MissingField {
                    id: raw.id.clone(),
                    kind: element_type,
                    field: "action",
                })?,
            },
            ElementType::Separator => ElementKind::Separator,
            ElementType::Video => ElementKind::Video {
                url: raw.url.unwrap_or_default(),
                preview_url: raw.preview_url,
            },
            ElementType::Image => ElementKind::Image {
                url: raw.url.unwrap_or_default(),
            },
            ElementType::Icon => ElementKind::Icon {
                url: raw.url.unwrap_or_default(),
            },
        };

        Ok(Element {
            id: raw.id,
            kind,
            attributes: raw.attributes,
        })
    }
}

/// Partial element details used by updates.
///
/// Serialized flat, like an element: `{"id": "t1", "text": "hello"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// Identifier of the element to update
    pub id: String,
    /// Fields to override
    #[serde(flatten)]
    pub fields: Attributes,
}

impl ElementPatch {
    /// Creates an empty patch for the given element.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Attributes::new(),
        }
    }

    /// Sets one field.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns true if the patch overrides nothing.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<&Element> for ElementPatch {
    /// A patch carrying every field of `element`: applying it replaces the
    /// node wholesale.
    fn from(element: &Element) -> Self {
        let mut fields = element.to_fields();
        fields.remove("id");
        Self {
            id: element.id.clone(),
            fields,
        }
    }
}

/// Depth-first, pre-order iterator over an element tree.
pub struct Walk<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Walk<'a> {
    /// Walks a sequence of sibling roots in order.
    pub fn over(roots: &'a [Element]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        if let Some(children) = element.contents() {
            self.stack.extend(children.iter().rev());
        }
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Element {
        Element::container("root", BoxLayout::Vertical)
            .with_child(Element::text("t1", "hello"))
            .with_child(
                Element::container("row", BoxLayout::Baseline)
                    .with_child(Element::icon("i1", "https://example.com/star.png"))
                    .with_child(Element::text("t2", "rating")),
            )
            .with_child(Element::separator("s1"))
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.walk().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "t1", "row", "i1", "t2", "s1"]);
        assert_eq!(tree.count(), 6);
    }

    #[test]
    fn test_with_child_ignores_leaves() {
        let text = Element::text("t1", "hello").with_child(Element::separator("s1"));
        assert!(text.contents().is_none());
        assert_eq!(text.count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let element = Element::text("t1", "hello").with_attribute("margin", "md");
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(
            value,
            json!({ "id": "t1", "type": "text", "text": "hello", "margin": "md" })
        );
    }

    #[test]
    fn test_leaf_contents_are_dropped_on_load() {
        let element: Element = serde_json::from_value(json!({
            "id": "t1",
            "type": "text",
            "text": "hello",
            "contents": [{ "id": "x", "type": "separator" }]
        }))
        .unwrap();

        assert_eq!(element.element_type(), ElementType::Text);
        assert!(element.contents().is_none());
        assert!(!element.attributes.contains_key("contents"));
    }

    #[test]
    fn test_box_defaults() {
        let element: Element =
            serde_json::from_value(json!({ "id": "b", "type": "box" })).unwrap();
        assert_eq!(element.layout(), Some(BoxLayout::Vertical));
        assert_eq!(element.contents(), Some(&[][..]));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Element, _> =
            serde_json::from_value(json!({ "id": "n", "type": "null" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_button_requires_action() {
        let result: Result<Element, _> =
            serde_json::from_value(json!({ "id": "b1", "type": "button" }));
        assert!(result.is_err());

        let button: Element = serde_json::from_value(json!({
            "id": "b1",
            "type": "button",
            "action": { "type": "uri", "label": "Open", "uri": "https://example.com" },
            "style": "primary"
        }))
        .unwrap();
        assert_eq!(
            button.kind,
            ElementKind::Button {
                action: ButtonAction::uri("Open", "https://example.com")
            }
        );
        assert_eq!(button.attributes.get("style"), Some(&json!("primary")));
    }

    #[test]
    fn test_merge_overrides_and_preserves() {
        let element = Element::text("t1", "hello").with_attribute("color", "#000000");
        let patch = ElementPatch::new("t1").set("text", "bye").set("size", "xl");

        let merged = element.merged(&patch).unwrap();
        assert_eq!(merged.kind, ElementKind::Text { text: "bye".into() });
        assert_eq!(merged.attributes.get("color"), Some(&json!("#000000")));
        assert_eq!(merged.attributes.get("size"), Some(&json!("xl")));
    }

    #[test]
    fn test_merge_keeps_identifier() {
        let element = Element::text("t1", "hello");
        let patch = ElementPatch::new("t1").set("id", "other");
        assert_eq!(element.merged(&patch).unwrap().id, "t1");
    }

    #[test]
    fn test_merge_type_change_restamps() {
        let element = sample_tree();
        let patch = ElementPatch::new("root").set("type", "text").set("text", "flat");

        let merged = element.merged(&patch).unwrap();
        assert_eq!(merged.element_type(), ElementType::Text);
        assert!(merged.contents().is_none());
        assert!(!merged.attributes.contains_key("layout"));
    }

    #[test]
    fn test_full_patch_replaces_node() {
        let old = Element::text("t1", "hello").with_attribute("color", "#111111");
        let new = Element::text("t1", "world").with_attribute("color", "#222222");

        let merged = old.merged(&ElementPatch::from(&new)).unwrap();
        assert_eq!(merged, new);
    }

    #[test]
    fn test_reserved_attributes_are_not_serialized_twice() {
        let mut element = Element::image("img", "https://example.com/a.png");
        element.attributes.insert("url".into(), json!("shadowed"));

        let fields = element.to_fields();
        assert_eq!(fields.get("url"), Some(&json!("https://example.com/a.png")));
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let a = Element::generate_id(ElementType::Text);
        let b = Element::generate_id(ElementType::Text);
        assert!(a.starts_with("text_"));
        assert_ne!(a, b);
    }
}
