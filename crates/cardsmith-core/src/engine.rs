//! The edit engine: pure structural edits on a card.
//!
//! Every function here takes a `&Component` and returns a new one. The
//! input is never touched, which is what lets the editor keep old
//! snapshots around for undo without copying defensively.
//!
//! ## Learning: One Recursion, Many Edits
//!
//! Insert, update and delete all boil down to "find the first node that
//! matches, then rebuild the path from the root down to it". That walk
//! lives in a single private combinator, [`rewrite`], driven by a visitor
//! closure that decides what happens to each node.

use cardsmith_model::{
    Component, Element, ElementPatch, INITIAL_BOX_ID, ModelResult, SectionKind, Selection,
};

/// What the visitor wants done with a node.
enum Visit {
    /// Leave the node alone and look inside it
    Continue,
    /// Swap the node for another one
    Replace(Element),
    /// Drop the node and its whole subtree
    Remove,
}

/// Rebuilds `elements` with the first node the visitor acts on changed.
///
/// Nodes are visited depth-first, pre-order. Returns `None` when the
/// visitor never acted, so callers can tell a no-op from an edit without
/// comparing trees.
fn rewrite<F>(elements: &[Element], visit: &mut F) -> Option<Vec<Element>>
where
    F: FnMut(&Element) -> Visit,
{
    for (index, element) in elements.iter().enumerate() {
        match visit(element) {
            Visit::Replace(replacement) => {
                let mut rebuilt = elements.to_vec();
                rebuilt[index] = replacement;
                return Some(rebuilt);
            }
            Visit::Remove => {
                let mut rebuilt = elements.to_vec();
                rebuilt.remove(index);
                return Some(rebuilt);
            }
            Visit::Continue => {
                let Some(children) = element.contents() else {
                    continue;
                };
                if let Some(children) = rewrite(children, visit) {
                    let mut rebuilt = elements.to_vec();
                    rebuilt[index] = element.with_contents(children);
                    return Some(rebuilt);
                }
            }
        }
    }
    None
}

/// Runs [`rewrite`] over one section of a component.
fn rewrite_section<F>(component: &Component, section_id: &str, mut visit: F) -> Option<Component>
where
    F: FnMut(&Element) -> Visit,
{
    let (kind, section) = component.section_by_id(section_id)?;
    let contents = rewrite(&section.contents, &mut visit)?;
    Some(component.with_section(kind, section.with_contents(contents)))
}

// ==================== Insert ====================

/// Inserts `element` into a section, or `None` if nothing matched.
///
/// Without a target the element is appended to the section's roots.
/// With one, it is appended to the first box whose id is `target_id`.
pub fn try_insert(
    component: &Component,
    section_id: &str,
    target_id: Option<&str>,
    element: Element,
) -> Option<Component> {
    let Some(target_id) = target_id else {
        let (kind, section) = component.section_by_id(section_id)?;
        let mut contents = section.contents.clone();
        contents.push(element);
        return Some(component.with_section(kind, section.with_contents(contents)));
    };

    let mut pending = Some(element);
    rewrite_section(component, section_id, |node| {
        if node.id == target_id && node.is_container() {
            if let Some(child) = pending.take() {
                return Visit::Replace(node.clone().with_child(child));
            }
        }
        Visit::Continue
    })
}

/// Inserts `element` into a section.
///
/// A missing section, a missing target, or a target that cannot hold
/// children all leave the card unchanged. Placement rules (which kinds
/// may go where) are the caller's business; see [`crate::policy`].
pub fn insert(
    component: &Component,
    section_id: &str,
    target_id: Option<&str>,
    element: Element,
) -> Component {
    try_insert(component, section_id, target_id, element).unwrap_or_else(|| {
        tracing::debug!(section_id, ?target_id, "Insert matched no container");
        component.clone()
    })
}

// ==================== Update ====================

/// Shallow-merges `patch` into the first node of the section with the
/// patch's id.
///
/// Returns the new card and the merged element, or the unchanged card and
/// `None` when nothing matched. Fails only when the merge produces an
/// element that cannot exist (unknown `type`, malformed field).
pub fn update(
    component: &Component,
    section_id: &str,
    patch: &ElementPatch,
) -> ModelResult<(Component, Option<Element>)> {
    let current = component
        .section_by_id(section_id)
        .and_then(|(_, section)| section.find(&patch.id));

    let Some(current) = current else {
        tracing::debug!(section_id, element_id = %patch.id, "Update matched no element");
        return Ok((component.clone(), None));
    };

    let merged = current.merged(patch)?;
    let mut pending = Some(merged.clone());
    let updated = rewrite_section(component, section_id, |node| {
        if node.id == patch.id {
            pending.take().map_or(Visit::Continue, Visit::Replace)
        } else {
            Visit::Continue
        }
    });

    Ok((updated.unwrap_or_else(|| component.clone()), Some(merged)))
}

// ==================== Delete ====================

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The node and its subtree were removed
    Deleted,
    /// The node is protected; the card is unchanged
    Protected,
    /// No node with that id in the section
    NotFound,
}

/// Returns true if deleting `element_id` from the section must be refused.
///
/// The seed box is always protected, and so is whatever element is the
/// last one left at the root of the body.
pub fn is_protected(component: &Component, section_id: &str, element_id: &str) -> bool {
    if element_id == INITIAL_BOX_ID {
        return true;
    }

    match component.section_by_id(section_id) {
        Some((SectionKind::Body, body)) => {
            body.contents.len() == 1 && body.contents[0].id == element_id
        }
        _ => false,
    }
}

/// Removes the node `element_id` (with its whole subtree) from a section.
pub fn delete(component: &Component, section_id: &str, element_id: &str) -> (Component, DeleteOutcome) {
    if is_protected(component, section_id, element_id) {
        return (component.clone(), DeleteOutcome::Protected);
    }

    let removed = rewrite_section(component, section_id, |node| {
        if node.id == element_id {
            Visit::Remove
        } else {
            Visit::Continue
        }
    });

    match removed {
        Some(component) => (component, DeleteOutcome::Deleted),
        None => (component.clone(), DeleteOutcome::NotFound),
    }
}

// ==================== Select ====================

/// Builds the selection for a click on `element`, or the empty selection
/// for a click on bare canvas.
pub fn select(
    element: Option<Element>,
    section_id: Option<String>,
    bubble_id: Option<String>,
) -> Selection {
    match element {
        Some(element) => Selection::located(element, section_id, bubble_id),
        None => Selection::Empty,
    }
}
