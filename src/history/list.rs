//! Partitioned recency list
//!
//! Items live once in the flattened view (most-recent-first); each context
//! additionally keeps its own ordered sub-list of targets. Both views are
//! updated together, so an item is always in exactly one partition and
//! appears exactly once overall.

use std::collections::HashMap;

use crate::domain::{ContextKey, HistoryItem, SelectableTarget};

#[derive(Debug, Clone, Default)]
pub struct HistoryList {
    /// Flattened view, most-recent-first
    items: Vec<HistoryItem>,

    /// Per-context sub-lists, most-recent-first
    partitions: HashMap<ContextKey, Vec<SelectableTarget>>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn pinned_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_pinned).count()
    }

    pub fn unpinned_count(&self) -> usize {
        self.items.len() - self.pinned_count()
    }

    pub fn contains(&self, target: &SelectableTarget) -> bool {
        self.position(target).is_some()
    }

    /// Index of `target` in the flattened view
    pub fn position(&self, target: &SelectableTarget) -> Option<usize> {
        self.items.iter().position(|i| &i.target == target)
    }

    pub fn get(&self, target: &SelectableTarget) -> Option<&HistoryItem> {
        self.items.iter().find(|i| &i.target == target)
    }

    pub fn get_mut(&mut self, target: &SelectableTarget) -> Option<&mut HistoryItem> {
        self.items.iter_mut().find(|i| &i.target == target)
    }

    /// Insert as the most recent item. Returns false (and does nothing) if
    /// the target is already present.
    pub fn push_front(&mut self, item: HistoryItem) -> bool {
        if self.contains(&item.target) {
            return false;
        }
        self.partitions
            .entry(item.context.clone())
            .or_default()
            .insert(0, item.target.clone());
        self.items.insert(0, item);
        true
    }

    /// Insert as the oldest item (used when restoring saved history, which is
    /// stored most-recent-first). Returns false if already present.
    pub fn push_back(&mut self, item: HistoryItem) -> bool {
        if self.contains(&item.target) {
            return false;
        }
        self.partitions
            .entry(item.context.clone())
            .or_default()
            .push(item.target.clone());
        self.items.push(item);
        true
    }

    /// Remove `target` from both views
    pub fn remove(&mut self, target: &SelectableTarget) -> Option<HistoryItem> {
        let index = self.position(target)?;
        let item = self.items.remove(index);
        self.unlink(&item);
        Some(item)
    }

    /// Remove the least-recently-inserted unpinned item
    pub fn evict_oldest_unpinned(&mut self) -> Option<HistoryItem> {
        let index = self.items.iter().rposition(|i| !i.is_pinned)?;
        let item = self.items.remove(index);
        self.unlink(&item);
        Some(item)
    }

    /// Flattened view, most-recent-first
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Items of one context, most-recent-first
    pub fn items_in(&self, context: &ContextKey) -> Vec<&HistoryItem> {
        self.partitions
            .get(context)
            .map(|targets| targets.iter().filter_map(|t| self.get(t)).collect())
            .unwrap_or_default()
    }

    /// Contexts that currently own at least one item
    pub fn has_items_in(&self, context: &ContextKey) -> bool {
        self.partitions
            .get(context)
            .is_some_and(|targets| !targets.is_empty())
    }

    pub fn pinned(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().filter(|i| i.is_pinned)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut HistoryItem> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.partitions.clear();
    }

    /// Drop every unpinned item, returning how many were removed
    pub fn retain_pinned(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.is_pinned);
        for targets in self.partitions.values_mut() {
            targets.clear();
        }
        for item in &self.items {
            if let Some(targets) = self.partitions.get_mut(&item.context) {
                targets.push(item.target.clone());
            }
        }
        self.partitions.retain(|_, targets| !targets.is_empty());
        before - self.items.len()
    }

    fn unlink(&mut self, item: &HistoryItem) {
        if let Some(targets) = self.partitions.get_mut(&item.context) {
            targets.retain(|t| t != &item.target);
            if targets.is_empty() {
                self.partitions.remove(&item.context);
            }
        }
    }
}
