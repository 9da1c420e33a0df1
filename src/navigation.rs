//! Back/forward stepping over a history view

use crate::domain::SelectableTarget;

/// Which list a navigation step walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationView {
    /// Items under active contexts, in display order
    #[default]
    History,
    /// Pinned items only
    Pinned,
    /// Every item, most-recent-first
    All,
}

/// Step `delta` positions from `current` through `items`.
///
/// A current target that is not in the list counts as the first item.
/// Stepping clamps at both ends. Returns None for an empty list.
pub fn step<T: AsRef<SelectableTarget>>(
    items: &[T],
    current: Option<&SelectableTarget>,
    delta: isize,
) -> Option<SelectableTarget> {
    let last = items.len().checked_sub(1)?;
    let index = current
        .and_then(|c| items.iter().position(|i| i.as_ref() == c))
        .unwrap_or(0);

    let next = (index as isize)
        .saturating_add(delta)
        .clamp(0, last as isize) as usize;
    Some(items[next].as_ref().clone())
}
