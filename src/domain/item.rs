use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::context::ContextKey;
use super::target::SelectableTarget;

/// Whether a history item currently maps to a live object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// Target maps to a live object
    #[default]
    Resolved,
    /// Context is inactive or the object is temporarily missing; retried on
    /// every reconcile pass
    UnresolvedContextual,
    /// Project asset confirmed gone; the item is removed by reconcile
    UnresolvedPermanent,
}

impl std::fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionState::Resolved => write!(f, "resolved"),
            ResolutionState::UnresolvedContextual => write!(f, "unresolved"),
            ResolutionState::UnresolvedPermanent => write!(f, "missing"),
        }
    }
}

/// One entry in the selection history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// What was selected
    pub target: SelectableTarget,

    /// Owning context (the registry owns the record itself)
    pub context: ContextKey,

    /// Pinned items are exempt from eviction
    #[serde(default)]
    pub is_pinned: bool,

    /// Last click on this item, for repeat-action detection
    #[serde(default)]
    pub last_interaction: Option<DateTime<Utc>>,

    /// Result of the most recent resolution attempt
    #[serde(default)]
    pub state: ResolutionState,

    /// Name reported by the host the last time the target resolved
    #[serde(default)]
    pub display_name: Option<String>,
}

impl HistoryItem {
    pub fn new(target: SelectableTarget, context: ContextKey) -> Self {
        Self {
            target,
            context,
            is_pinned: false,
            last_interaction: None,
            state: ResolutionState::Resolved,
            display_name: None,
        }
    }

    pub fn with_pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.state == ResolutionState::Resolved
    }

    /// Label for listings: the host's name if known, else the last path segment
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or_else(|| self.target.short_name())
    }

    /// Record an interaction and report whether it repeats the previous one
    /// within `window`.
    pub fn touch(&mut self, now: DateTime<Utc>, window: Duration) -> bool {
        let is_repeat = self
            .last_interaction
            .map(|last| now >= last && now - last <= window)
            .unwrap_or(false);
        self.last_interaction = Some(now);
        is_repeat
    }
}

impl AsRef<SelectableTarget> for HistoryItem {
    fn as_ref(&self) -> &SelectableTarget {
        &self.target
    }
}
