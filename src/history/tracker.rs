//! Selection history tracker
//!
//! Bounded, deduplicated, pin-aware recency list. Each recorded target is
//! tagged with its context, which the context registry resolves (and creates
//! on first reference).
//!
//! ## Capacity
//!
//! `max_history_size` bounds the number of unpinned items. Before inserting,
//! the oldest unpinned items are evicted until there is room. Pinned items
//! are never evicted and sit outside that window, but once the pinned items
//! alone fill it, new selections are refused with `HistoryFull`.
//!
//! Re-selecting an item that is already recorded does not move it to the
//! front.

use std::fmt::Write as _;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::list::HistoryList;
use super::record::HistoryRecord;
use crate::config::HistorySettings;
use crate::domain::{
    ContextKey, ContextKind, HistoryItem, ResolutionState, SelectableTarget, SelectionContext,
};
use crate::error::NavigatorError;
use crate::host::{ContextResolver, ResolvedObject, TargetResolver};
use crate::navigation::NavigationView;
use crate::registry::ContextRegistry;

/// Payload-free invalidation signal sent to subscribers whenever history
/// changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryChanged;

/// What `record_selection` did with a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Selection was cleared; the current pointer was reset
    Cleared,
    /// A new item was inserted at the head
    Recorded,
    /// The target was already in history; left in place
    AlreadyRecorded,
    /// The target's kind is excluded by settings; only the current pointer moved
    Filtered,
    /// The recording attempt was dropped (unresolvable context, history full)
    Dropped(NavigatorError),
}

/// Result of a reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub resolved: usize,
    pub unresolved: usize,
    pub removed: usize,
}

/// Result of restoring saved history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub duplicates: usize,
    pub malformed: usize,
    pub unresolved_contexts: usize,
    pub over_capacity: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.duplicates + self.malformed + self.unresolved_contexts + self.over_capacity
    }
}

/// History of one context, ready for display
#[derive(Debug, Clone)]
pub struct ContextSection<'a> {
    pub context: &'a SelectionContext,
    pub is_active: bool,
    pub items: Vec<&'a HistoryItem>,
}

/// Owns the history list, the context registry and the resolvers
pub struct SelectionHistoryTracker {
    settings: HistorySettings,
    registry: ContextRegistry,
    resolver: Box<dyn TargetResolver>,
    list: HistoryList,

    /// Target the host currently has selected, recorded or not
    current: Option<SelectableTarget>,

    subscribers: Vec<Sender<HistoryChanged>>,
}

impl SelectionHistoryTracker {
    pub fn new(
        settings: HistorySettings,
        contexts: Box<dyn ContextResolver>,
        targets: Box<dyn TargetResolver>,
    ) -> Self {
        Self {
            settings: settings.normalized(),
            registry: ContextRegistry::new(contexts),
            resolver: targets,
            list: HistoryList::new(),
            current: None,
            subscribers: Vec::new(),
        }
    }

    // ======== Recording ========

    /// Record a selection reported by the host.
    ///
    /// Failures never propagate: they are logged and reported through the
    /// returned outcome.
    pub fn record_selection(&mut self, target: SelectableTarget) -> RecordOutcome {
        let Some(key) = target.context_key() else {
            self.current = None;
            return RecordOutcome::Cleared;
        };

        if let Err(err) = self.registry.resolve(&key).map(|_| ()) {
            warn!("Dropped selection {}: {}", target, err);
            self.current = None;
            return RecordOutcome::Dropped(err);
        }

        let resolved = self.resolver.resolve_target(&target);
        if !self.is_recordable(&target, resolved.as_ref()) {
            debug!("Not recording {} (excluded by settings)", target);
            self.current = Some(target);
            return RecordOutcome::Filtered;
        }

        if self.list.contains(&target) {
            debug!("{} is already in history", target);
            self.current = Some(target);
            return RecordOutcome::AlreadyRecorded;
        }

        if let Err(err) = self.make_room() {
            debug!("Not recording {}: {}", target, err);
            self.current = Some(target);
            return RecordOutcome::Dropped(err);
        }

        let item = new_item(target.clone(), key, resolved);
        self.list.push_front(item);
        debug!("Recorded {}", target);
        self.current = Some(target);
        self.notify();
        RecordOutcome::Recorded
    }

    fn is_recordable(&self, target: &SelectableTarget, resolved: Option<&ResolvedObject>) -> bool {
        match target {
            SelectableTarget::ProjectAsset { .. } => {
                self.settings.record_folders || !resolved.is_some_and(|o| o.is_folder)
            }
            SelectableTarget::SceneMember { .. } => self.settings.record_scene_members,
            SelectableTarget::PrefabMember { .. } => self.settings.record_prefab_members,
            SelectableTarget::Invalid => false,
        }
    }

    /// Evict until one more unpinned item fits
    fn make_room(&mut self) -> Result<(), NavigatorError> {
        let limit = self.settings.max_history_size;
        let pinned = self.list.pinned_count();
        if pinned >= limit {
            return Err(NavigatorError::HistoryFull { pinned, limit });
        }
        self.evict_unpinned_above(limit - 1);
        Ok(())
    }

    /// Evict oldest unpinned items until at most `keep` remain
    fn evict_unpinned_above(&mut self, keep: usize) -> usize {
        let mut evicted = 0;
        while self.list.unpinned_count() > keep {
            match self.list.evict_oldest_unpinned() {
                Some(item) => {
                    debug!("Evicted {}", item.target);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }

    // ======== Mutators ========

    /// Flip the pin on `target`. Returns the new pin state, or None if the
    /// target is not in history.
    pub fn toggle_pin(&mut self, target: &SelectableTarget) -> Option<bool> {
        let item = self.list.get_mut(target)?;
        item.is_pinned = !item.is_pinned;
        let is_pinned = item.is_pinned;

        debug!("{} {}", if is_pinned { "Pinned" } else { "Unpinned" }, target);
        self.notify();
        Some(is_pinned)
    }

    /// Toggle the pin on the current selection.
    ///
    /// If the current selection was filtered out and never recorded, it is
    /// inserted as a pinned item. Returns the new pin state, or None if there
    /// is no current selection or it could not be pinned.
    pub fn toggle_pin_current(&mut self) -> Option<bool> {
        let target = self.current.clone()?;
        if self.list.contains(&target) {
            return self.toggle_pin(&target);
        }

        let key = target.context_key()?;
        if let Err(err) = self.registry.resolve(&key).map(|_| ()) {
            warn!("Cannot pin {}: {}", target, err);
            return None;
        }

        let limit = self.settings.max_history_size;
        let pinned = self.list.pinned_count();
        if pinned >= limit {
            let err = NavigatorError::HistoryFull { pinned, limit };
            debug!("Cannot pin {}: {}", target, err);
            return None;
        }

        let resolved = self.resolver.resolve_target(&target);
        let item = new_item(target.clone(), key, resolved).with_pinned(true);
        self.list.push_front(item);
        debug!("Pinned unrecorded selection {}", target);
        self.notify();
        Some(true)
    }

    /// Remove an item that is confirmed gone
    pub fn remove(&mut self, target: &SelectableTarget) -> Option<HistoryItem> {
        let item = self.list.remove(target)?;
        debug!("Removed {}", target);
        self.notify();
        Some(item)
    }

    /// Drop every item, pinned or not
    pub fn clear(&mut self) {
        if self.list.is_empty() {
            return;
        }
        self.list.clear();
        self.notify();
    }

    /// Drop every unpinned item, returning how many were removed
    pub fn clear_unpinned(&mut self) -> usize {
        let removed = self.list.retain_pinned();
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Record an interaction with `target` at `now`. Returns whether it
    /// repeats the previous interaction within the double-click window, or
    /// None if the target is not in history.
    pub fn touch(&mut self, target: &SelectableTarget, now: DateTime<Utc>) -> Option<bool> {
        let window = self.settings.double_click_window();
        self.list.get_mut(target).map(|item| item.touch(now, window))
    }

    /// Move the current-selection pointer without recording
    pub fn set_current(&mut self, target: Option<SelectableTarget>) {
        self.current = target.filter(SelectableTarget::is_valid);
    }

    // ======== Reconcile ========

    /// Re-resolve every item.
    ///
    /// Items in inactive contexts are marked unresolved without a lookup.
    /// Project assets that no longer resolve are gone for good and removed;
    /// scene and prefab members stay and are retried on the next pass.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut changed = false;
        let mut gone = Vec::new();

        for item in self.list.iter_mut() {
            let before = (item.state, item.display_name.clone());

            if !item.context.is_project() && !self.registry.is_active(&item.context) {
                item.state = ResolutionState::UnresolvedContextual;
                report.unresolved += 1;
            } else {
                match self.resolver.resolve_target(&item.target) {
                    Some(object) => {
                        item.state = ResolutionState::Resolved;
                        item.display_name = Some(object.name);
                        report.resolved += 1;
                    }
                    None if item.context.is_project() => {
                        item.state = ResolutionState::UnresolvedPermanent;
                        gone.push(item.target.clone());
                    }
                    None => {
                        let err = NavigatorError::TargetUnresolvable(item.target.clone());
                        debug!("{}", err);
                        item.state = ResolutionState::UnresolvedContextual;
                        report.unresolved += 1;
                    }
                }
            }

            changed |= before != (item.state, item.display_name.clone());
        }

        for target in gone {
            if self.list.remove(&target).is_some() {
                debug!("Removed missing asset {}", target);
                report.removed += 1;
            }
        }

        if changed {
            self.notify();
        }
        report
    }

    // ======== Views ========

    /// Items of one context, most-recent-first
    pub fn items_in(&self, context: &ContextKey) -> Vec<&HistoryItem> {
        self.list.items_in(context)
    }

    /// Every item, most-recent-first
    pub fn all_items(&self) -> &[HistoryItem] {
        self.list.items()
    }

    /// Pinned items, most-recent-first
    pub fn pinned_items(&self) -> Vec<&HistoryItem> {
        self.list.pinned().collect()
    }

    pub fn get(&self, target: &SelectableTarget) -> Option<&HistoryItem> {
        self.list.get(target)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The host's current selection as last reported
    pub fn current(&self) -> Option<&SelectableTarget> {
        self.current.as_ref()
    }

    /// History item for the current selection, if it was recorded
    pub fn current_item(&self) -> Option<&HistoryItem> {
        self.current.as_ref().and_then(|t| self.list.get(t))
    }

    /// History grouped by context: scenes and prefabs in first-seen order,
    /// then the project. Contexts without items are skipped, inactive ones
    /// too unless `show_inactive_contexts` is set.
    pub fn sections(&self) -> Vec<ContextSection<'_>> {
        let mut sections = Vec::new();
        let mut project = None;

        for context in self.registry.contexts() {
            if !self.list.has_items_in(&context.key) {
                continue;
            }
            let is_active = self.registry.is_active(&context.key);
            if !is_active && !self.settings.show_inactive_contexts {
                continue;
            }

            let section = ContextSection {
                context,
                is_active,
                items: self.list.items_in(&context.key),
            };
            if context.key.is_project() {
                project = Some(section);
            } else {
                sections.push(section);
            }
        }

        sections.extend(project);
        sections
    }

    /// Items listed under active sections, in display order
    pub fn visible_items(&self) -> Vec<&HistoryItem> {
        self.sections()
            .into_iter()
            .filter(|s| s.is_active)
            .flat_map(|s| s.items)
            .collect()
    }

    /// Items a navigation view steps through
    pub fn view_items(&self, view: NavigationView) -> Vec<&HistoryItem> {
        match view {
            NavigationView::History => self.visible_items(),
            NavigationView::Pinned => self.pinned_items(),
            NavigationView::All => self.list.items().iter().collect(),
        }
    }

    /// Text listing of every context's items followed by the flattened
    /// history
    pub fn dump(&self) -> String {
        let mut out = String::new();

        for section in self.sections() {
            let state = if section.is_active { "" } else { " (inactive)" };
            let _ = writeln!(out, "[{}]{}", section.context.name, state);
            for item in section.items {
                let _ = writeln!(out, " - {}", describe(item));
            }
        }

        let _ = writeln!(out, "<All History>");
        for item in self.list.items() {
            let _ = writeln!(out, " - {}", describe(item));
        }
        out
    }

    // ======== Contexts ========

    pub fn registry(&self) -> &ContextRegistry {
        &self.registry
    }

    /// Forward the host's active-context report to the registry
    pub fn mark_active<I, S>(&mut self, kind: ContextKind, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.mark_active(kind, ids);
    }

    // ======== Settings ========

    pub fn settings(&self) -> &HistorySettings {
        &self.settings
    }

    /// Replace settings; a smaller limit takes effect immediately
    pub fn set_settings(&mut self, settings: HistorySettings) {
        self.settings = settings.normalized();
        let evicted = self.evict_unpinned_above(self.settings.max_history_size);
        if evicted > 0 {
            debug!("Evicted {} items after lowering the history size", evicted);
            self.notify();
        }
    }

    // ======== Persistence ========

    /// Records for every item, most-recent-first
    pub fn to_records(&self) -> Vec<HistoryRecord> {
        self.list
            .items()
            .iter()
            .filter_map(HistoryRecord::from_item)
            .collect()
    }

    /// Append saved records (most-recent-first) behind the current history.
    ///
    /// Applies the same duplicate suppression and unpinned window as live
    /// recording. Pinned records are always kept, even past the limit.
    /// Records whose context no longer resolves are skipped.
    pub fn load_records<I>(&mut self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = HistoryRecord>,
    {
        let mut report = LoadReport::default();
        let limit = self.settings.max_history_size;

        for record in records {
            let target = record.target();
            if self.list.contains(&target) {
                report.duplicates += 1;
                continue;
            }

            let key = record.context_key();
            if let Err(err) = self.registry.resolve(&key).map(|_| ()) {
                warn!("Skipped saved item {}: {}", target, err);
                report.unresolved_contexts += 1;
                continue;
            }

            if !record.is_pinned && self.list.unpinned_count() >= limit {
                report.over_capacity += 1;
                continue;
            }

            let resolved = if self.registry.is_active(&key) {
                self.resolver.resolve_target(&target)
            } else {
                None
            };
            let item = new_item(target, key, resolved).with_pinned(record.is_pinned);
            self.list.push_back(item);
            report.loaded += 1;
        }

        if report.loaded > 0 {
            info!("Restored {} history items", report.loaded);
            self.notify();
        }
        report
    }

    // ======== Notifications ========

    /// Subscribe to change notifications. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<HistoryChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self) {
        self.subscribers.retain(|tx| tx.send(HistoryChanged).is_ok());
    }
}

impl std::fmt::Debug for SelectionHistoryTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionHistoryTracker")
            .field("settings", &self.settings)
            .field("registry", &self.registry)
            .field("list", &self.list)
            .field("current", &self.current)
            .finish()
    }
}

fn new_item(
    target: SelectableTarget,
    key: ContextKey,
    resolved: Option<ResolvedObject>,
) -> HistoryItem {
    let mut item = HistoryItem::new(target, key);
    match resolved {
        Some(object) => item.display_name = Some(object.name),
        None => item.state = ResolutionState::UnresolvedContextual,
    }
    item
}

fn describe(item: &HistoryItem) -> String {
    let mut line = item.label().to_string();
    if item.is_pinned {
        line.push_str(" *");
    }
    if !item.is_resolved() {
        line.push_str(&format!(" ({})", item.state));
    }
    line
}

#[cfg(test)]
mod tests;
