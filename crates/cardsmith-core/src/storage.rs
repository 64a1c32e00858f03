//! Reading and writing cards as JSON.
//!
//! Loading is where untrusted documents enter the editor, so it is also
//! where they are cleaned up: leaves lose any `contents` they carry, an
//! empty body gets its seed box back, and duplicate ids are rejected.

use std::path::Path;

use cardsmith_model::{Component, ModelError};

use crate::CoreResult;

/// Parses a card from JSON.
pub fn component_from_json(json: &str) -> CoreResult<Component> {
    let component: Component = serde_json::from_str(json).map_err(ModelError::from)?;
    let component = component.normalized();
    component.validate()?;
    Ok(component)
}

/// Serializes a card as pretty-printed JSON.
pub fn component_to_json(component: &Component) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(component).map_err(ModelError::from)?)
}

/// Loads a card from a file.
pub fn load_component(path: impl AsRef<Path>) -> CoreResult<Component> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let component = component_from_json(&json)?;
    tracing::debug!(path = %path.display(), id = %component.id, "Loaded component");
    Ok(component)
}

/// Saves a card to a file.
pub fn save_component(path: impl AsRef<Path>, component: &Component) -> CoreResult<()> {
    let path = path.as_ref();
    let json = component_to_json(component)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), id = %component.id, "Saved component");
    Ok(())
}
