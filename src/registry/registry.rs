//! Context registry for project, scene and prefab contexts
//!
//! Records are created lazily and never removed. A closed scene becomes
//! inactive but keeps its record so that reopening it restores its history.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{ContextKey, ContextKind, SelectionContext};
use crate::error::NavigatorError;
use crate::host::ContextResolver;

/// Registry of every context that has been referenced by history
pub struct ContextRegistry {
    /// All registered contexts, keyed by kind + id
    contexts: HashMap<ContextKey, SelectionContext>,

    /// Registration order (first seen first), the project is always first
    order: Vec<ContextKey>,

    /// Ids of the scenes the host most recently reported as open
    active_scenes: HashSet<String>,

    /// Ids of the prefabs the host most recently reported as being edited
    active_prefabs: HashSet<String>,

    /// Materializes contexts that are not registered yet
    resolver: Box<dyn ContextResolver>,
}

impl ContextRegistry {
    /// Create a registry holding only the project context
    pub fn new(resolver: Box<dyn ContextResolver>) -> Self {
        let project = SelectionContext::project();
        let key = project.key.clone();

        let mut contexts = HashMap::new();
        contexts.insert(key.clone(), project);

        Self {
            contexts,
            order: vec![key],
            active_scenes: HashSet::new(),
            active_prefabs: HashSet::new(),
            resolver,
        }
    }

    /// Return the registered context, or ask the resolver to materialize it.
    ///
    /// Fails with `ContextUnresolvable` when the resolver reports nothing
    /// (e.g. the scene asset was deleted).
    pub fn resolve(&mut self, key: &ContextKey) -> Result<&SelectionContext, NavigatorError> {
        if !self.contexts.contains_key(key) {
            let name = self
                .resolver
                .resolve_context(key)
                .ok_or_else(|| NavigatorError::ContextUnresolvable(key.clone()))?;

            debug!("Registered context {} ({})", key, name);
            self.order.push(key.clone());
            self.contexts
                .insert(key.clone(), SelectionContext::new(key.clone(), name));
        }

        self.contexts
            .get(key)
            .ok_or_else(|| NavigatorError::ContextUnresolvable(key.clone()))
    }

    /// Convenience wrapper over [`resolve`](Self::resolve) taking the id and
    /// kind separately
    pub fn resolve_id(
        &mut self,
        context_id: &str,
        kind: ContextKind,
    ) -> Result<&SelectionContext, NavigatorError> {
        self.resolve(&ContextKey::new(kind, context_id))
    }

    /// Replace the active set for one kind of context.
    ///
    /// Only updates what `is_active` reports; history is not touched. The
    /// project is always active, so reports for it are ignored.
    pub fn mark_active<I, S>(&mut self, kind: ContextKind, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: HashSet<String> = ids.into_iter().map(Into::into).collect();
        match kind {
            ContextKind::Project => {}
            ContextKind::Scene => {
                debug!("Active scenes: {:?}", ids);
                self.active_scenes = ids;
            }
            ContextKind::Prefab => {
                debug!("Active prefabs: {:?}", ids);
                self.active_prefabs = ids;
            }
        }
    }

    /// Project is always active; scenes and prefabs are active iff their id
    /// is in the most recently reported active set
    pub fn is_active(&self, key: &ContextKey) -> bool {
        match key.kind {
            ContextKind::Project => true,
            ContextKind::Scene => self.active_scenes.contains(&key.id),
            ContextKind::Prefab => self.active_prefabs.contains(&key.id),
        }
    }

    /// Get a registered context without resolving
    pub fn get(&self, key: &ContextKey) -> Option<&SelectionContext> {
        self.contexts.get(key)
    }

    /// All registered contexts in first-seen order
    pub fn contexts(&self) -> impl Iterator<Item = &SelectionContext> {
        self.order.iter().filter_map(|key| self.contexts.get(key))
    }

    /// Display name for a context, falling back to its key
    pub fn name_of(&self, key: &ContextKey) -> String {
        self.contexts
            .get(key)
            .map(|ctx| ctx.name.clone())
            .unwrap_or_else(|| key.to_string())
    }

    /// Get the number of registered contexts (including the project)
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Check if only the project context is registered
    pub fn is_empty(&self) -> bool {
        self.contexts.len() <= 1
    }
}

impl std::fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRegistry")
            .field("contexts", &self.order)
            .field("active_scenes", &self.active_scenes)
            .field("active_prefabs", &self.active_prefabs)
            .finish()
    }
}
