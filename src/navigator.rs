//! Host-facing entry point
//!
//! Wires a [`SelectionHistoryTracker`] to the host's selection system and
//! preference store. Selection changes reported by the host are recorded,
//! while selections the navigator makes itself are not: `select` raises a
//! single-shot flag that swallows the next change notification.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{ContextKind, SelectableTarget};
use crate::history::{
    decode_records, encode_records, LoadReport, RecordOutcome, SelectionHistoryTracker,
};
use crate::host::{PreferenceStore, SelectionHost};
use crate::navigation::{step, NavigationView};

/// Preference key holding the serialized history
pub const HISTORY_PREF_KEY: &str = "selnav.history";

/// What a click on a history item did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The item became the active selection
    Selected,
    /// Repeat click within the double-click window; the host was asked to
    /// open the target
    Activated,
}

pub struct SelectionNavigator<H: SelectionHost> {
    host: H,
    tracker: SelectionHistoryTracker,
    store: Box<dyn PreferenceStore>,

    /// Set while a programmatic selection change is in flight
    suppress_next_recording: bool,
}

impl<H: SelectionHost> SelectionNavigator<H> {
    pub fn new(host: H, tracker: SelectionHistoryTracker, store: Box<dyn PreferenceStore>) -> Self {
        Self {
            host,
            tracker,
            store,
            suppress_next_recording: false,
        }
    }

    /// Create a navigator and restore saved history from the store
    pub fn open(host: H, tracker: SelectionHistoryTracker, store: Box<dyn PreferenceStore>) -> Self {
        let mut navigator = Self::new(host, tracker, store);
        navigator.load_from_persistence();
        navigator
    }

    // ======== Host callbacks ========

    /// The host's active selection changed. Returns None when the change
    /// was caused by the navigator itself.
    pub fn on_active_selection_changed(&mut self) -> Option<RecordOutcome> {
        if self.suppress_next_recording {
            self.suppress_next_recording = false;
            debug!("Skipping programmatic selection change");
            return None;
        }
        let target = self.host.current_active_target();
        Some(self.tracker.record_selection(target))
    }

    /// The host opened or closed scenes or prefab edit sessions
    pub fn on_active_contexts_changed<I, S>(&mut self, kind: ContextKind, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tracker.mark_active(kind, ids);
    }

    // ======== Navigation ========

    /// Make `target` the host's active selection without recording it
    pub fn select(&mut self, target: &SelectableTarget) {
        // Hosts don't report a change when the selection stays the same, so
        // a raised flag would swallow the next real one
        if self.host.current_active_target() != *target {
            self.suppress_next_recording = true;
            self.host.set_active_selection(target);
        }
        self.tracker.set_current(Some(target.clone()));
    }

    /// Step through `view` and select the result
    pub fn navigate(&mut self, view: NavigationView, delta: isize) -> Option<SelectableTarget> {
        let next = step(
            &self.tracker.view_items(view),
            self.tracker.current(),
            delta,
        )?;
        self.select(&next);
        Some(next)
    }

    pub fn back(&mut self) -> Option<SelectableTarget> {
        self.navigate(NavigationView::History, 1)
    }

    pub fn forward(&mut self) -> Option<SelectableTarget> {
        self.navigate(NavigationView::History, -1)
    }

    /// Click on a history item
    pub fn click(&mut self, target: &SelectableTarget) -> ClickOutcome {
        self.click_at(target, Utc::now())
    }

    /// Click on a history item at a given time
    pub fn click_at(&mut self, target: &SelectableTarget, now: DateTime<Utc>) -> ClickOutcome {
        let is_repeat = self.tracker.touch(target, now).unwrap_or(false);
        self.select(target);

        if is_repeat {
            debug!("Activating {}", target);
            self.host.activate(target);
            ClickOutcome::Activated
        } else {
            ClickOutcome::Selected
        }
    }

    pub fn toggle_pin_current(&mut self) -> Option<bool> {
        self.tracker.toggle_pin_current()
    }

    // ======== Persistence ========

    /// Append saved history behind whatever is already recorded.
    ///
    /// Malformed lines and records whose context is gone are skipped and
    /// logged; loading itself never fails.
    pub fn load_from_persistence(&mut self) -> LoadReport {
        let Some(data) = self.store.get_string(HISTORY_PREF_KEY) else {
            debug!("No saved history");
            return LoadReport::default();
        };

        let (records, errors) = decode_records(&data);
        for err in &errors {
            warn!("Skipping saved history line: {}", err);
        }

        let mut report = self.tracker.load_records(records);
        report.malformed = errors.len();
        if report.skipped() > 0 {
            info!(
                "Loaded {} history items, skipped {}",
                report.loaded,
                report.skipped()
            );
        }
        report
    }

    /// Write the full history, pinned flags included, to the store
    pub fn save_to_persistence(&mut self) -> Result<()> {
        let data = encode_records(&self.tracker.to_records());
        self.store
            .set_string(HISTORY_PREF_KEY, &data)
            .context("Failed to save selection history")
    }

    /// Save, clear and load again
    pub fn reload(&mut self) -> Result<LoadReport> {
        self.save_to_persistence()?;
        self.tracker.clear();
        Ok(self.load_from_persistence())
    }

    /// Remove saved history from the store
    pub fn forget_saved_history(&mut self) -> Result<()> {
        self.store
            .delete_key(HISTORY_PREF_KEY)
            .context("Failed to delete saved selection history")
    }

    /// Save history and hand the host back
    pub fn dispose(mut self) -> Result<H> {
        self.save_to_persistence()?;
        Ok(self.host)
    }

    // ======== Accessors ========

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tracker(&self) -> &SelectionHistoryTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SelectionHistoryTracker {
        &mut self.tracker
    }

    /// Whether the next selection change will be ignored
    pub fn is_suppressing(&self) -> bool {
        self.suppress_next_recording
    }
}
