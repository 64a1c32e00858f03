//! Several cards open side by side.
//!
//! A [`Workspace`] keeps one [`Editor`] per card, keyed by the card's id,
//! and routes actions to the right one: by the action's `bubbleId` when it
//! names one, otherwise to the active card. All editors share the
//! workspace's event bus, so one subscription sees everything.

use std::collections::HashMap;

use cardsmith_model::{Component, Element};
use uuid::Uuid;

use crate::action::EditorAction;
use crate::config::Config;
use crate::editor::Editor;
use crate::event::{EditorEvent, EventBus};
use crate::state::EditorState;
use crate::{CoreError, CoreResult};

/// Open cards and the one being edited.
pub struct Workspace {
    /// All open editors, by card id
    editors: HashMap<String, Editor>,

    /// Order of cards (for tabs)
    order: Vec<String>,

    /// Currently active card
    active: Option<String>,

    /// Settings handed to every new editor
    config: Config,

    /// Shared by every editor
    event_bus: EventBus,
}

impl Workspace {
    /// Creates an empty workspace.
    pub fn new(config: Config) -> Self {
        Self {
            editors: HashMap::new(),
            order: Vec::new(),
            active: None,
            config,
            event_bus: EventBus::new(),
        }
    }

    // ==================== Opening & Closing ====================

    /// Opens a card and makes it active.
    ///
    /// If a card with the same id is already open, it is focused and the
    /// given copy is ignored.
    pub fn open(&mut self, component: Component) -> String {
        let id = component.id.clone();

        if !self.editors.contains_key(&id) {
            let mut editor = Editor::with_component(component, self.config.clone());
            editor.attach_event_bus(self.event_bus.clone());
            self.editors.insert(id.clone(), editor);
            self.order.push(id.clone());
            self.event_bus.emit(EditorEvent::ComponentLoaded {
                bubble_id: id.clone(),
            });
        }

        self.active = Some(id.clone());
        id
    }

    /// Opens a fresh seeded card with a generated id.
    pub fn create(&mut self) -> String {
        let id = format!("bubble_{}", Uuid::new_v4().simple());
        let component = Component::new(id).with_size(self.config.editor.default_size);
        self.open(component)
    }

    /// Closes a card.
    pub fn close(&mut self, id: &str) -> CoreResult<()> {
        if self.editors.remove(id).is_none() {
            return Err(CoreError::ComponentNotFound(id.to_string()));
        }
        self.order.retain(|open| open != id);

        if self.active.as_deref() == Some(id) {
            self.active = self.order.last().cloned();
        }

        Ok(())
    }

    // ==================== Access ====================

    /// Returns an editor by card id.
    pub fn get(&self, id: &str) -> Option<&Editor> {
        self.editors.get(id)
    }

    /// Returns a mutable editor by card id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Editor> {
        self.editors.get_mut(id)
    }

    /// Returns the active editor.
    pub fn active(&self) -> Option<&Editor> {
        self.active.as_deref().and_then(|id| self.editors.get(id))
    }

    /// Returns a mutable reference to the active editor.
    pub fn active_mut(&mut self) -> Option<&mut Editor> {
        let id = self.active.as_deref()?;
        self.editors.get_mut(id)
    }

    /// Returns the active card's id.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Sets the active card. Unknown ids are ignored.
    pub fn set_active(&mut self, id: &str) {
        if self.editors.contains_key(id) {
            self.active = Some(id.to_string());
        }
    }

    /// Returns the open card ids in tab order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Returns the number of open cards.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns true if no cards are open.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    // ==================== Routing ====================

    /// Picks the card an action is for.
    fn route(&self, bubble_id: Option<&str>) -> CoreResult<String> {
        match bubble_id {
            Some(id) if self.editors.contains_key(id) => Ok(id.to_string()),
            Some(id) => Err(CoreError::ComponentNotFound(id.to_string())),
            None => self.active.clone().ok_or(CoreError::NoActiveComponent),
        }
    }

    /// Dispatches an action to the card it names, or the active one.
    ///
    /// Loading a card with a different id into an editor renames its tab.
    pub fn dispatch(&mut self, action: EditorAction) -> CoreResult<&EditorState> {
        let id = self.route(action.bubble_id())?;

        if let EditorAction::LoadComponent { component, .. } = &action {
            if component.id != id && self.editors.contains_key(&component.id) {
                return Err(CoreError::InvalidOperation(format!(
                    "Component {} is already open",
                    component.id
                )));
            }
        }

        let editor = self
            .editors
            .get_mut(&id)
            .ok_or_else(|| CoreError::ComponentNotFound(id.clone()))?;
        editor.dispatch(action)?;

        let current = editor.bubble_id().to_string();
        if current != id {
            self.rename(&id, current.clone());
        }

        self.editors
            .get(&current)
            .map(Editor::state)
            .ok_or(CoreError::ComponentNotFound(current))
    }

    /// Drops an element into a card, checking placement rules.
    pub fn drop_element(
        &mut self,
        bubble_id: Option<&str>,
        section_id: &str,
        target_id: Option<&str>,
        element: Element,
    ) -> CoreResult<&EditorState> {
        let id = self.route(bubble_id)?;
        let editor = self
            .editors
            .get_mut(&id)
            .ok_or(CoreError::ComponentNotFound(id))?;
        editor.drop_element(section_id, target_id, element)
    }

    fn rename(&mut self, from: &str, to: String) {
        if let Some(editor) = self.editors.remove(from) {
            self.editors.insert(to.clone(), editor);
        }
        for open in &mut self.order {
            if open == from {
                *open = to.clone();
            }
        }
        if self.active.as_deref() == Some(from) {
            self.active = Some(to);
        }
    }

    // ==================== Events ====================

    /// Subscribes to events from every open card.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventHandler;
    use cardsmith_model::{INITIAL_BODY_ID, INITIAL_BOX_ID};

    fn add_text(id: &str, bubble_id: Option<&str>) -> EditorAction {
        EditorAction::AddElement {
            section_id: INITIAL_BODY_ID.into(),
            target_id: Some(INITIAL_BOX_ID.into()),
            element_details: Element::text(id, "hi"),
            bubble_id: bubble_id.map(str::to_string),
        }
    }

    #[test]
    fn test_open_and_close() {
        let mut workspace = Workspace::default();
        assert!(workspace.is_empty());

        let a = workspace.open(Component::new("a"));
        let b = workspace.open(Component::new("b"));
        assert_eq!(workspace.ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(workspace.active_id(), Some(b.as_str()));

        workspace.close(&b).unwrap();
        assert_eq!(workspace.active_id(), Some(a.as_str()));
        assert!(matches!(
            workspace.close("b"),
            Err(CoreError::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_reopen_focuses_existing() {
        let mut workspace = Workspace::default();
        workspace.open(Component::new("a"));
        workspace.dispatch(add_text("t1", None)).unwrap();
        workspace.open(Component::new("b"));

        workspace.open(Component::new("a"));
        assert_eq!(workspace.len(), 2);
        assert_eq!(workspace.active_id(), Some("a"));
        assert!(workspace.active().is_some_and(|e| e.component().contains("t1")));
    }

    #[test]
    fn test_create_generates_ids() {
        let mut workspace = Workspace::default();
        let first = workspace.create();
        let second = workspace.create();
        assert_ne!(first, second);
        assert!(first.starts_with("bubble_"));
    }

    #[test]
    fn test_routes_by_bubble_id() {
        let mut workspace = Workspace::default();
        workspace.open(Component::new("a"));
        workspace.open(Component::new("b"));

        workspace.dispatch(add_text("t1", Some("a"))).unwrap();
        workspace.dispatch(add_text("t2", None)).unwrap();

        assert!(workspace.get("a").is_some_and(|e| e.component().contains("t1")));
        assert!(workspace.get("b").is_some_and(|e| e.component().contains("t2")));
        assert!(workspace.get("b").is_some_and(|e| !e.component().contains("t1")));
    }

    #[test]
    fn test_routing_errors() {
        let mut workspace = Workspace::default();
        assert!(matches!(
            workspace.dispatch(EditorAction::Undo),
            Err(CoreError::NoActiveComponent)
        ));

        workspace.open(Component::new("a"));
        assert!(matches!(
            workspace.dispatch(add_text("t1", Some("ghost"))),
            Err(CoreError::ComponentNotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_load_renames_tab() {
        let mut workspace = Workspace::default();
        workspace.open(Component::new("a"));

        workspace
            .dispatch(EditorAction::LoadComponent {
                component: Component::new("renamed"),
                with_live: false,
            })
            .unwrap();

        assert_eq!(workspace.ids(), &["renamed".to_string()]);
        assert_eq!(workspace.active_id(), Some("renamed"));
        assert!(workspace.get("a").is_none());
    }

    #[test]
    fn test_load_refuses_duplicate_open_card() {
        let mut workspace = Workspace::default();
        workspace.open(Component::new("a"));
        workspace.open(Component::new("b"));

        let result = workspace.dispatch(EditorAction::LoadComponent {
            component: Component::new("a"),
            with_live: false,
        });
        assert!(matches!(result, Err(CoreError::InvalidOperation(_))));
    }

    #[test]
    fn test_shared_event_bus() {
        let mut workspace = Workspace::default();
        let mut events = EventHandler::new(workspace.subscribe());

        workspace.open(Component::new("a"));
        workspace.open(Component::new("b"));
        workspace.dispatch(add_text("t1", Some("a"))).unwrap();

        let inserted: Vec<_> = events
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                EditorEvent::ElementInserted { bubble_id, .. } => Some(bubble_id),
                _ => None,
            })
            .collect();
        assert_eq!(inserted, vec!["a".to_string()]);
    }

    #[test]
    fn test_drop_element_routes() {
        let mut workspace = Workspace::default();
        workspace.open(Component::new("a"));
        workspace.open(Component::new("b"));

        workspace
            .drop_element(Some("a"), INITIAL_BODY_ID, Some(INITIAL_BOX_ID), Element::separator("s1"))
            .unwrap();
        assert!(workspace.get("a").is_some_and(|e| e.component().contains("s1")));

        assert!(matches!(
            workspace.drop_element(None, INITIAL_BODY_ID, None, Element::icon("i1", "x.png")),
            Err(CoreError::Placement(_))
        ));
    }
}
