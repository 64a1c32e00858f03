//! # Cardsmith Core
//!
//! Edit engine, undo/redo editor and multi-card workspace.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Workspace                          │
//! │  ┌─────────────────────────┐  ┌────────────────────────┐  │
//! │  │  Editor (card "a")      │  │  Editor (card "b")     │  │
//! │  │  ┌───────────────────┐  │  │          ...           │  │
//! │  │  │ History<State>    │  │  └────────────────────────┘  │
//! │  │  └───────────────────┘  │                              │
//! │  │   dispatch(action)      │                              │
//! │  │     │                   │                              │
//! │  │     ▼                   │                              │
//! │  │  reducer ──► engine     │       ┌──────────────┐       │
//! │  │     │       (pure)      │ ────► │   EventBus   │       │
//! │  │  policy (drops only)    │       └──────────────┘       │
//! │  └─────────────────────────┘                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod action;
pub mod config;
pub mod editor;
pub mod engine;
pub mod event;
pub mod policy;
pub mod reducer;
pub mod state;
pub mod storage;
pub mod workspace;

pub use action::EditorAction;
pub use config::{Config, ConfigError};
pub use editor::Editor;
pub use engine::DeleteOutcome;
pub use event::{EditorEvent, EventBus, EventHandler, Notification, NotificationLevel};
pub use policy::{DropContext, PlacementPolicy, PlacementRule, PlacementViolation};
pub use reducer::{Recording, Reduction, reduce};
pub use state::{Device, EditorMode, EditorState};
pub use storage::{component_from_json, component_to_json, load_component, save_component};
pub use workspace::Workspace;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Model error: {0}")]
    Model(#[from] cardsmith_model::ModelError),

    #[error("Placement refused: {0}")]
    Placement(#[from] PlacementViolation),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("No active component")]
    NoActiveComponent,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
