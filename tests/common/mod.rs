//! Shared test utilities: a fake editor world and selection host

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use selnav::config::HistorySettings;
use selnav::history::SelectionHistoryTracker;
use selnav::host::{ContextResolver, ResolvedObject, SelectionHost, TargetResolver};
use selnav::navigator::SelectionNavigator;
use selnav::store::MemoryStore;
use selnav::{ContextKey, SelectableTarget};

#[derive(Default)]
struct WorldState {
    contexts: HashSet<String>,
    live: HashSet<SelectableTarget>,
}

/// Editor state shared between a test and the resolvers it hands out
#[derive(Clone, Default)]
pub struct FakeWorld(Rc<RefCell<WorldState>>);

impl FakeWorld {
    /// World with scenes "main" and "menu" and prefab "enemy"
    pub fn new() -> Self {
        let world = Self::default();
        for id in ["main", "menu", "enemy"] {
            world.add_context(id);
        }
        world
    }

    pub fn add_context(&self, id: &str) {
        self.0.borrow_mut().contexts.insert(id.to_string());
    }

    pub fn delete_context(&self, id: &str) {
        self.0.borrow_mut().contexts.remove(id);
    }

    pub fn add(&self, target: &SelectableTarget) {
        self.0.borrow_mut().live.insert(target.clone());
    }

    pub fn delete(&self, target: &SelectableTarget) {
        self.0.borrow_mut().live.remove(target);
    }

    pub fn tracker(&self, settings: HistorySettings) -> SelectionHistoryTracker {
        SelectionHistoryTracker::new(settings, Box::new(self.clone()), Box::new(self.clone()))
    }
}

impl ContextResolver for FakeWorld {
    fn resolve_context(&self, key: &ContextKey) -> Option<String> {
        let state = self.0.borrow();
        state.contexts.contains(&key.id).then(|| key.id.clone())
    }
}

impl TargetResolver for FakeWorld {
    fn resolve_target(&self, target: &SelectableTarget) -> Option<ResolvedObject> {
        let state = self.0.borrow();
        state
            .live
            .contains(target)
            .then(|| ResolvedObject::named(target.short_name()))
    }
}

/// Selection host that records every programmatic call
#[derive(Debug, Default)]
pub struct FakeHost {
    pub selected: SelectableTarget,
    pub set_calls: Vec<SelectableTarget>,
    pub activated: Vec<SelectableTarget>,
}

impl SelectionHost for FakeHost {
    fn current_active_target(&self) -> SelectableTarget {
        self.selected.clone()
    }

    fn set_active_selection(&mut self, target: &SelectableTarget) {
        self.selected = target.clone();
        self.set_calls.push(target.clone());
    }

    fn activate(&mut self, target: &SelectableTarget) {
        self.activated.push(target.clone());
    }
}

pub fn navigator(
    world: &FakeWorld,
    max: usize,
    store: &MemoryStore,
) -> SelectionNavigator<FakeHost> {
    SelectionNavigator::new(
        FakeHost::default(),
        world.tracker(HistorySettings::with_max_size(max)),
        Box::new(store.clone()),
    )
}

/// The user selects `target` in the editor; the host then reports the change
pub fn user_select(
    navigator: &mut SelectionNavigator<FakeHost>,
    world: &FakeWorld,
    target: &SelectableTarget,
) {
    world.add(target);
    navigator.host_mut().selected = target.clone();
    navigator.on_active_selection_changed();
}

pub fn asset(id: &str) -> SelectableTarget {
    SelectableTarget::asset(id)
}

pub fn history_ids(navigator: &SelectionNavigator<FakeHost>) -> Vec<String> {
    navigator
        .tracker()
        .all_items()
        .iter()
        .map(|i| i.target.to_string())
        .collect()
}
