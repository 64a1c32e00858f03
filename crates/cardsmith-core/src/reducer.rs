//! State transitions.
//!
//! [`reduce`] maps a snapshot and an action to the next snapshot. It never
//! touches history: the returned [`Recording`] tells the caller how the new
//! snapshot should enter it, and the returned events say what to announce.
//! Undo and redo are history moves, not transitions, so they are refused.

use cardsmith_model::Selection;

use crate::action::EditorAction;
use crate::engine::{self, DeleteOutcome};
use crate::event::{EditorEvent, Notification};
use crate::state::EditorState;
use crate::{CoreError, CoreResult};

/// How a new snapshot enters history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recording {
    /// A card edit or selection: always a new undo step
    Record,
    /// A device/preview/live change: a step only if configured so
    ModeChange,
    /// A freshly loaded card: history starts over
    Reset,
}

/// Output of [`reduce`].
#[derive(Debug, Clone)]
pub struct Reduction {
    pub state: EditorState,
    pub recording: Recording,
    pub events: Vec<EditorEvent>,
}

impl Reduction {
    fn new(state: EditorState, recording: Recording) -> Self {
        Self {
            state,
            recording,
            events: Vec::new(),
        }
    }

    fn emit(mut self, event: EditorEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Computes the snapshot that follows `state` under `action`.
pub fn reduce(state: &EditorState, action: &EditorAction) -> CoreResult<Reduction> {
    let bubble_id = state.component.id.clone();

    let reduction = match action {
        EditorAction::AddElement {
            section_id,
            target_id,
            element_details,
            ..
        } => {
            let inserted = engine::try_insert(
                &state.component,
                section_id,
                target_id.as_deref(),
                element_details.clone(),
            );

            match inserted {
                Some(component) => {
                    let next = EditorState {
                        component,
                        ..state.clone()
                    };
                    Reduction::new(next, Recording::Record).emit(EditorEvent::ElementInserted {
                        bubble_id,
                        section_id: section_id.clone(),
                        element_id: element_details.id.clone(),
                    })
                }
                None => {
                    tracing::debug!(%section_id, ?target_id, "Insert matched no container");
                    Reduction::new(state.clone(), Recording::Record)
                }
            }
        }

        EditorAction::UpdateElement {
            section_id,
            element_details,
            ..
        } => {
            let (component, merged) = engine::update(&state.component, section_id, element_details)?;
            let Some(merged) = merged else {
                return Ok(Reduction::new(state.clone(), Recording::Record));
            };

            let selection = if state.selection.is_selected(&merged.id) {
                state.selection.refreshed(merged)
            } else {
                state.selection.clone()
            };
            let next = EditorState {
                component,
                selection,
                ..state.clone()
            };
            Reduction::new(next, Recording::Record).emit(EditorEvent::ElementUpdated {
                bubble_id,
                section_id: section_id.clone(),
                element_id: element_details.id.clone(),
            })
        }

        EditorAction::DeleteElement {
            section_id,
            element_id,
            ..
        } => {
            let (component, outcome) = engine::delete(&state.component, section_id, element_id);
            match outcome {
                DeleteOutcome::Deleted => {
                    let selection = state.selection.revalidated(&component);
                    let cleared = selection.is_empty() && !state.selection.is_empty();
                    let next = EditorState {
                        component,
                        selection,
                        ..state.clone()
                    };

                    let mut reduction = Reduction::new(next, Recording::Record)
                        .emit(EditorEvent::ElementDeleted {
                            bubble_id: bubble_id.clone(),
                            section_id: section_id.clone(),
                            element_id: element_id.clone(),
                        })
                        .emit(EditorEvent::Notification(Notification::success(
                            "Deleted",
                            "The element was removed from the card",
                        )));
                    if cleared {
                        reduction = reduction.emit(EditorEvent::SelectionChanged {
                            bubble_id,
                            element_id: None,
                        });
                    }
                    reduction
                }
                DeleteOutcome::Protected => {
                    tracing::info!(%section_id, %element_id, "Refused to delete protected element");
                    Reduction::new(state.clone(), Recording::Record).emit(EditorEvent::Notification(
                        Notification::info("Cannot delete", "Cannot delete the last body element"),
                    ))
                }
                DeleteOutcome::NotFound => {
                    tracing::debug!(%section_id, %element_id, "Delete matched no element");
                    Reduction::new(state.clone(), Recording::Record)
                }
            }
        }

        EditorAction::ChangeClickedElement {
            element_details,
            section_id,
            bubble_id: selected_bubble,
        } => {
            let selection = engine::select(
                element_details.clone(),
                section_id.clone(),
                selected_bubble.clone(),
            );
            let element_id = selection.element_id().map(str::to_string);
            let next = EditorState {
                selection,
                ..state.clone()
            };
            Reduction::new(next, Recording::Record).emit(EditorEvent::SelectionChanged {
                bubble_id,
                element_id,
            })
        }

        EditorAction::ChangeDevice { device } => {
            let next = EditorState {
                device: *device,
                ..state.clone()
            };
            Reduction::new(next, Recording::ModeChange).emit(EditorEvent::DeviceChanged(*device))
        }

        EditorAction::TogglePreviewMode => {
            let preview_mode = !state.preview_mode;
            let next = EditorState {
                preview_mode,
                ..state.clone()
            };
            Reduction::new(next, Recording::ModeChange)
                .emit(EditorEvent::PreviewModeChanged(preview_mode))
        }

        EditorAction::ToggleLiveMode { value } => {
            let live_mode = value.unwrap_or(!state.live_mode);
            let next = EditorState {
                live_mode,
                ..state.clone()
            };
            Reduction::new(next, Recording::ModeChange).emit(EditorEvent::LiveModeChanged(live_mode))
        }

        EditorAction::LoadComponent {
            component,
            with_live,
        } => {
            let component = component.clone().normalized();
            let bubble_id = component.id.clone();
            let next = EditorState {
                component,
                selection: Selection::Empty,
                device: state.device,
                preview_mode: false,
                live_mode: *with_live,
            };
            Reduction::new(next, Recording::Reset).emit(EditorEvent::ComponentLoaded { bubble_id })
        }

        EditorAction::Undo | EditorAction::Redo => {
            return Err(CoreError::InvalidOperation(format!(
                "{} moves history and has no transition",
                action.display_name()
            )));
        }
    };

    Ok(reduction)
}
