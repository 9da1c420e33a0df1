//! Error taxonomy for the selection history
//!
//! None of these are fatal. The tracker absorbs them into outcome values and
//! logs them; they only surface as "the item doesn't show up" or "the item is
//! shown as unresolved".

use crate::domain::{ContextKey, SelectableTarget};

/// Error type for selection history operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigatorError {
    /// The context id no longer maps to any live asset
    #[error("Context could not be resolved: {0}")]
    ContextUnresolvable(ContextKey),

    /// The target does not currently resolve to a live object
    #[error("Target does not resolve to a live object: {0}")]
    TargetUnresolvable(SelectableTarget),

    /// A persisted history entry failed to parse
    #[error("Malformed history record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Every slot is taken by a pinned item
    #[error("History is full of pinned items ({pinned} pinned, limit {limit})")]
    HistoryFull { pinned: usize, limit: usize },

    /// Textual target could not be parsed
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}
