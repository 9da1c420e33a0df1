//! Boundary traits implemented by the host editor
//!
//! Resolution is always a fresh lookup. A scene member may exist one moment
//! and vanish the next when its scene is closed, so nothing here hands out
//! cached references.

use crate::domain::{ContextKey, SelectableTarget};

/// What the host reports about a target that currently maps to a live object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedObject {
    /// Display name of the object
    pub name: String,

    /// Whether the object is a folder asset
    pub is_folder: bool,
}

impl ResolvedObject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
        }
    }

    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
        }
    }
}

/// Materializes scene and prefab contexts on first reference
pub trait ContextResolver {
    /// Return the context's display name, or None if the underlying asset no
    /// longer exists.
    fn resolve_context(&self, key: &ContextKey) -> Option<String>;
}

/// Looks up the live object behind a target
pub trait TargetResolver {
    fn resolve_target(&self, target: &SelectableTarget) -> Option<ResolvedObject>;
}

/// The host's selection system
pub trait SelectionHost {
    /// Pull-style accessor for the currently active target
    fn current_active_target(&self) -> SelectableTarget;

    /// Programmatically change the active selection
    fn set_active_selection(&mut self, target: &SelectableTarget);

    /// Open or otherwise act on a target (repeat click on a history item)
    fn activate(&mut self, _target: &SelectableTarget) {}
}

/// String key/value persistence offered by the host
pub trait PreferenceStore {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    fn delete_key(&mut self, key: &str) -> anyhow::Result<()>;
}
