//! Editor snapshots.

use cardsmith_model::{Component, Selection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device the card is being previewed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Device::Desktop => "desktop",
            Device::Tablet => "tablet",
            Device::Mobile => "mobile",
        };
        f.write_str(name)
    }
}

/// Coarse editor state derived from the preview/live flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Edit chrome visible, card editable
    Editing,
    /// Read-only preview of the card
    Previewing,
    /// Live rendering without edit chrome (embedded view)
    LiveOnly,
}

/// One snapshot of the editor: what the history records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// The card being edited
    pub component: Component,
    /// Inspector target
    pub selection: Selection,
    /// Preview device
    pub device: Device,
    /// Preview toggle
    pub preview_mode: bool,
    /// Live rendering toggle
    pub live_mode: bool,
}

impl EditorState {
    /// Creates a state editing `component` with nothing selected.
    pub fn new(component: Component) -> Self {
        Self {
            component,
            ..Self::default()
        }
    }

    /// Returns the mode implied by the flags.
    ///
    /// Preview always wins; live alone means embedded rendering.
    pub fn mode(&self) -> EditorMode {
        if self.preview_mode {
            EditorMode::Previewing
        } else if self.live_mode {
            EditorMode::LiveOnly
        } else {
            EditorMode::Editing
        }
    }

    /// Returns true if the card can be edited in this state.
    pub fn is_editable(&self) -> bool {
        self.mode() == EditorMode::Editing
    }

    /// Takes device, preview and live flags from `other`, keeping the card
    /// and selection.
    pub fn copy_modes_from(&mut self, other: &EditorState) {
        self.device = other.device;
        self.preview_mode = other.preview_mode;
        self.live_mode = other.live_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes() {
        let mut state = EditorState::default();
        assert_eq!(state.mode(), EditorMode::Editing);
        assert!(state.is_editable());

        state.live_mode = true;
        assert_eq!(state.mode(), EditorMode::LiveOnly);

        state.preview_mode = true;
        assert_eq!(state.mode(), EditorMode::Previewing);
        assert!(!state.is_editable());
    }

    #[test]
    fn test_copy_modes_keeps_card() {
        let mut state = EditorState::new(Component::new("card"));
        let other = EditorState {
            device: Device::Mobile,
            preview_mode: true,
            live_mode: true,
            ..EditorState::default()
        };

        state.copy_modes_from(&other);
        assert_eq!(state.component.id, "card");
        assert_eq!(state.device, Device::Mobile);
        assert_eq!(state.mode(), EditorMode::Previewing);
    }

    #[test]
    fn test_serialized_keys() {
        let value = serde_json::to_value(EditorState::default()).unwrap();
        assert_eq!(value["device"], "desktop");
        assert_eq!(value["previewMode"], false);
        assert_eq!(value["selection"]["state"], "empty");
    }
}
