//! Editor actions.
//!
//! ## Learning: Commands as Data
//!
//! Every change to the editor is described by an [`EditorAction`] value
//! before anything happens. Because actions are plain serde types they can
//! be logged, replayed from a script, or sent across a channel. The wire
//! form is the one the web client dispatches:
//!
//! ```json
//! { "type": "DELETE_ELEMENT", "payload": { "sectionId": "inital_body", "elementId": "t1" } }
//! ```

use cardsmith_model::{Component, Element, ElementPatch};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::state::Device;
use crate::{CoreError, CoreResult};

/// Everything the editor can be asked to do.
///
/// `CHANGE_CLICKED_ELEMENT` and `TOGGLE_LIVE_MODE` may be sent without a
/// `payload`, and a clicked element of type `null` (or with an empty id)
/// clears the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum EditorAction {
    /// Insert an element at a section root or into a box
    #[serde(rename_all = "camelCase")]
    AddElement {
        section_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_id: Option<String>,
        element_details: Element,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bubble_id: Option<String>,
    },

    /// Shallow-merge new details into an element
    #[serde(rename_all = "camelCase")]
    UpdateElement {
        section_id: String,
        element_details: ElementPatch,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bubble_id: Option<String>,
    },

    /// Remove an element and its subtree
    #[serde(rename_all = "camelCase")]
    DeleteElement {
        section_id: String,
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bubble_id: Option<String>,
    },

    /// Select an element, or clear the selection when no details are given
    #[serde(rename_all = "camelCase")]
    ChangeClickedElement {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element_details: Option<Element>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bubble_id: Option<String>,
    },

    /// Switch the preview device
    ChangeDevice { device: Device },

    /// Flip preview mode
    TogglePreviewMode,

    /// Flip live mode, or force it to `value`
    ToggleLiveMode {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<bool>,
    },

    /// Replace the whole card and start a fresh history
    #[serde(rename_all = "camelCase")]
    LoadComponent {
        component: Component,
        #[serde(default)]
        with_live: bool,
    },

    Undo,
    Redo,
}

/// Tags whose payload is all optional.
const OPTIONAL_PAYLOAD: [&str; 2] = ["CHANGE_CLICKED_ELEMENT", "TOGGLE_LIVE_MODE"];

impl Serialize for EditorAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EditorAction::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for EditorAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = Map::<String, Value>::deserialize(deserializer)?;
        let tag = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        if OPTIONAL_PAYLOAD.contains(&tag.as_str()) {
            let payload = raw
                .entry("payload")
                .or_insert_with(|| Value::Object(Map::new()));
            if payload.is_null() {
                *payload = Value::Object(Map::new());
            }
            if tag == "CHANGE_CLICKED_ELEMENT" {
                clear_empty_selection(payload);
            }
        }

        EditorAction::deserialize(Value::Object(raw)).map_err(serde::de::Error::custom)
    }
}

/// Drops an `elementDetails` that is the empty-selection placeholder.
fn clear_empty_selection(payload: &mut Value) {
    let Some(payload) = payload.as_object_mut() else {
        return;
    };
    let is_placeholder = payload
        .get("elementDetails")
        .and_then(Value::as_object)
        .is_some_and(|details| {
            details.get("type").and_then(Value::as_str) == Some("null")
                || details.get("id").and_then(Value::as_str) == Some("")
        });
    if is_placeholder {
        payload.remove("elementDetails");
    }
}

impl EditorAction {
    /// Parses an action from its JSON wire form.
    ///
    /// An unknown `type` tag or a malformed payload is a programmer error
    /// and surfaces as [`CoreError::InvalidAction`].
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidAction(e.to_string()))
    }

    /// Returns the JSON wire form.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(|e| CoreError::InvalidAction(e.to_string()))
    }

    /// Returns the action's display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorAction::AddElement { .. } => "Add Element",
            EditorAction::UpdateElement { .. } => "Update Element",
            EditorAction::DeleteElement { .. } => "Delete Element",
            EditorAction::ChangeClickedElement { .. } => "Change Clicked Element",
            EditorAction::ChangeDevice { .. } => "Change Device",
            EditorAction::TogglePreviewMode => "Toggle Preview Mode",
            EditorAction::ToggleLiveMode { .. } => "Toggle Live Mode",
            EditorAction::LoadComponent { .. } => "Load Component",
            EditorAction::Undo => "Undo",
            EditorAction::Redo => "Redo",
        }
    }

    /// Returns the component this action is scoped to, if it names one.
    ///
    /// The editor ignores it; the workspace uses it for routing.
    pub fn bubble_id(&self) -> Option<&str> {
        match self {
            EditorAction::AddElement { bubble_id, .. }
            | EditorAction::UpdateElement { bubble_id, .. }
            | EditorAction::DeleteElement { bubble_id, .. }
            | EditorAction::ChangeClickedElement { bubble_id, .. } => bubble_id.as_deref(),
            _ => None,
        }
    }

    /// Returns true for actions that only touch UI flags, not the card.
    pub fn is_mode_change(&self) -> bool {
        matches!(
            self,
            EditorAction::ChangeDevice { .. }
                | EditorAction::TogglePreviewMode
                | EditorAction::ToggleLiveMode { .. }
        )
    }

    /// Returns true for undo/redo.
    pub fn is_history_navigation(&self) -> bool {
        matches!(self, EditorAction::Undo | EditorAction::Redo)
    }
}
