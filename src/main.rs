//! # Cardsmith - Card Editor Engine
//!
//! Replays editor actions against a card from the command line.
//!
//! ## Quick Start
//!
//! ```bash
//! # Print a fresh seeded card
//! cargo run
//!
//! # Apply a script of actions (one JSON action per line) to a card
//! cargo run -- card.json --actions edits.jsonl --output edited.json
//!
//! # Dump the whole undo log instead of the final card
//! cargo run -- card.json -a edits.jsonl --history
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardsmith_core::{
    Config, CoreError, Editor, EditorAction, EditorEvent, EventHandler, NotificationLevel,
    component_to_json, load_component,
};

/// Cardsmith - replay editor actions against a card
#[derive(Parser, Debug)]
#[command(name = "cardsmith")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Card to edit (JSON); a fresh seeded card when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Actions to apply, one JSON action per line
    #[arg(short, long, value_name = "FILE")]
    actions: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the undo log instead of the final card
    #[arg(long)]
    history: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What a script run did.
#[derive(Debug, Default, PartialEq, Eq)]
struct ScriptSummary {
    /// Actions that went through
    applied: usize,
    /// Drops refused by placement rules
    rejected: usize,
}

/// Applies a JSON-lines script to `editor`.
///
/// Blank lines and lines starting with `#` are skipped. A drop refused by
/// the placement rules is counted and skipped; any other failure stops the
/// script with the offending line number.
fn apply_script(editor: &mut Editor, script: &str) -> anyhow::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let action = EditorAction::from_json(line)
            .with_context(|| format!("line {line_no}: could not parse action"))?;
        let name = action.display_name();

        let result = match action {
            EditorAction::AddElement {
                section_id,
                target_id,
                element_details,
                ..
            } => editor
                .drop_element(&section_id, target_id.as_deref(), element_details)
                .map(|_| ()),
            action => editor.dispatch(action).map(|_| ()),
        };

        match result {
            Ok(()) => summary.applied += 1,
            Err(CoreError::Placement(violation)) => {
                tracing::warn!("line {}: skipped {}: {}", line_no, name, violation);
                summary.rejected += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("line {line_no}: {name} failed")),
        }
    }

    Ok(summary)
}

/// Logs queued notifications.
fn report(events: &mut EventHandler) {
    for event in events.drain() {
        match event {
            EditorEvent::Notification(note) => match note.level {
                NotificationLevel::Warning => {
                    tracing::warn!("{}: {}", note.title, note.description)
                }
                NotificationLevel::Info | NotificationLevel::Success => {
                    tracing::info!("{}: {}", note.title, note.description)
                }
            },
            other => tracing::trace!(?other, "Editor event"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides -v
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Cardsmith v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load(),
    };

    let mut editor = match &args.file {
        Some(path) => {
            let component = load_component(path)
                .with_context(|| format!("failed to load card {}", path.display()))?;
            Editor::with_component(component, config)
        }
        None => Editor::with_config(config),
    };
    let mut events = EventHandler::new(editor.subscribe());

    if let Some(path) = &args.actions {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read actions {}", path.display()))?;
        let summary = apply_script(&mut editor, &script)
            .with_context(|| format!("in {}", path.display()))?;
        report(&mut events);
        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected,
            "Script finished"
        );
    }

    let output = if args.history {
        serde_json::to_string_pretty(editor.history()).context("failed to serialize history")?
    } else {
        component_to_json(editor.component())?
    };

    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{output}"),
    }

    Ok(())
}
