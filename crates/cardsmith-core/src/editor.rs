//! Main editor orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Editor` acts as a facade over the reducer, the history log, the
//! placement policy and the event bus. External code dispatches actions
//! and reads snapshots; it never touches the subsystems directly.

use cardsmith_model::{Component, Element, History, Selection};

use crate::action::EditorAction;
use crate::config::Config;
use crate::event::{EditorEvent, EventBus, Notification};
use crate::policy::PlacementPolicy;
use crate::reducer::{self, Recording, Reduction};
use crate::state::EditorState;
use crate::CoreResult;

/// One card being edited, with its undo log.
///
/// ## Thread Safety
///
/// `Editor` is designed to be owned by a single caller (the UI thread)
/// and threaded explicitly. Other parts of the program learn about
/// changes through [`Editor::subscribe`].
pub struct Editor {
    /// Snapshot log; the cursor entry is the live state
    history: History<EditorState>,

    /// Editor configuration
    config: Config,

    /// Rules checked by `drop_element`
    policy: PlacementPolicy,

    /// Event bus for notifications
    event_bus: EventBus,
}

impl Editor {
    /// Creates an editor on a fresh seeded card with default settings.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an editor on a fresh seeded card.
    pub fn with_config(config: Config) -> Self {
        let component = Component::default().with_size(config.editor.default_size);
        Self::with_component(component, config)
    }

    /// Creates an editor on an existing card.
    pub fn with_component(component: Component, config: Config) -> Self {
        let state = EditorState {
            component: component.normalized(),
            selection: Selection::Empty,
            device: config.editor.default_device,
            preview_mode: false,
            live_mode: config.editor.initial_live_mode,
        };

        Self {
            history: History::new(state, config.history.limit),
            config,
            policy: PlacementPolicy::new(),
            event_bus: EventBus::new(),
        }
    }

    // ==================== Accessors ====================

    /// Returns the live snapshot.
    pub fn state(&self) -> &EditorState {
        self.history.current()
    }

    /// Returns the card being edited.
    pub fn component(&self) -> &Component {
        &self.state().component
    }

    /// Returns the current selection.
    pub fn selection(&self) -> &Selection {
        &self.state().selection
    }

    /// Returns the card's identifier.
    pub fn bubble_id(&self) -> &str {
        &self.component().id
    }

    /// Returns the undo log.
    pub fn history(&self) -> &History<EditorState> {
        &self.history
    }

    /// Returns the editor configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the placement policy, for registering custom rules.
    pub fn policy_mut(&mut self) -> &mut PlacementPolicy {
        &mut self.policy
    }

    // ==================== Actions ====================

    /// Applies an action and returns the resulting snapshot.
    ///
    /// Card edits and selections always become a new undo step. Mode
    /// changes do too unless `history.record_mode_changes` is off, in which
    /// case the new flags are written into every step, so undo and redo
    /// never move them. Loading a card starts a new history.
    pub fn dispatch(&mut self, action: EditorAction) -> CoreResult<&EditorState> {
        tracing::debug!(
            action = action.display_name(),
            bubble_id = %self.bubble_id(),
            "Dispatching action"
        );

        match action {
            EditorAction::Undo => return Ok(self.undo()),
            EditorAction::Redo => return Ok(self.redo()),
            _ => {}
        }

        let Reduction {
            state,
            recording,
            events,
        } = reducer::reduce(self.history.current(), &action)?;

        match recording {
            Recording::Record => self.history.record(state),
            Recording::ModeChange if self.config.history.record_mode_changes => {
                self.history.record(state)
            }
            Recording::ModeChange => {
                for snapshot in self.history.iter_mut() {
                    snapshot.copy_modes_from(&state);
                }
            }
            Recording::Reset => self.history.reset(state),
        }

        for event in events {
            self.emit(event);
        }

        Ok(self.history.current())
    }

    /// Inserts a dropped element after checking the placement rules.
    ///
    /// A refused drop leaves the card untouched, emits a warning
    /// notification and returns [`crate::CoreError::Placement`].
    pub fn drop_element(
        &mut self,
        section_id: &str,
        target_id: Option<&str>,
        element: Element,
    ) -> CoreResult<&EditorState> {
        if self.config.placement.enforce {
            let checked = self.policy.check(
                self.component(),
                section_id,
                target_id,
                element.element_type(),
            );
            if let Err(violation) = checked {
                tracing::warn!(section_id, ?target_id, %violation, "Rejected drop");
                self.emit(EditorEvent::Notification(Notification::warning(
                    "Cannot place element",
                    violation.to_string(),
                )));
                return Err(violation.into());
            }
        }

        let bubble_id = self.bubble_id().to_string();
        self.dispatch(EditorAction::AddElement {
            section_id: section_id.to_string(),
            target_id: target_id.map(str::to_string),
            element_details: element,
            bubble_id: Some(bubble_id),
        })
    }

    // ==================== History ====================

    /// Steps back one snapshot. At the start of the log this is a no-op.
    pub fn undo(&mut self) -> &EditorState {
        if self.history.undo().is_some() {
            self.emit_history_moved();
        } else {
            tracing::debug!("Nothing to undo");
        }
        self.history.current()
    }

    /// Steps forward one snapshot. At the end of the log this is a no-op.
    pub fn redo(&mut self) -> &EditorState {
        if self.history.redo().is_some() {
            self.emit_history_moved();
        } else {
            tracing::debug!("Nothing to redo");
        }
        self.history.current()
    }

    /// Returns true if undo would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if redo would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Events ====================

    /// Subscribes to editor events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EditorEvent> {
        self.event_bus.subscribe()
    }

    /// Sends future events to `bus` instead of the editor's own bus.
    pub fn attach_event_bus(&mut self, bus: EventBus) {
        self.event_bus = bus;
    }

    fn emit(&self, event: EditorEvent) {
        self.event_bus.emit(event);
    }

    fn emit_history_moved(&self) {
        self.emit(EditorEvent::HistoryMoved {
            bubble_id: self.bubble_id().to_string(),
            index: self.history.current_index(),
            len: self.history.len(),
        });
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
