//! Core domain types for selnav

mod context;
mod item;
mod target;

pub use context::{ContextKey, ContextKind, SelectionContext};
pub use item::{HistoryItem, ResolutionState};
pub use target::SelectableTarget;
