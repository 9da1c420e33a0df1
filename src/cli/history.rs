//! History command implementations

use anyhow::{bail, Result};
use std::path::PathBuf;

use selnav::config::HistorySettings;
use selnav::history::{RecordOutcome, SelectionHistoryTracker};
use selnav::navigation::NavigationView;
use selnav::navigator::SelectionNavigator;
use selnav::store::JsonFileStore;
use selnav::{ContextKind, HistoryItem, SelectableTarget};

use super::fs_host::{CliHost, ProjectDir};

/// Everything needed to rebuild the navigator for one invocation
#[derive(Debug, Clone)]
pub struct Session {
    pub project: PathBuf,
    pub store: PathBuf,
    pub settings: HistorySettings,
    pub open_scenes: Vec<String>,
    pub edit_prefab: Option<String>,
}

impl Session {
    /// Build the navigator, mark open contexts and load saved history
    pub fn open(&self) -> Result<SelectionNavigator<CliHost>> {
        let project = ProjectDir::new(&self.project);
        let tracker = SelectionHistoryTracker::new(
            self.settings.clone(),
            Box::new(project.clone()),
            Box::new(project),
        );
        let store = JsonFileStore::open(&self.store)?;

        let mut navigator = SelectionNavigator::new(CliHost::new(), tracker, Box::new(store));
        navigator.on_active_contexts_changed(ContextKind::Scene, self.open_scenes.iter().cloned());
        navigator.on_active_contexts_changed(ContextKind::Prefab, self.edit_prefab.iter().cloned());
        navigator.load_from_persistence();
        Ok(navigator)
    }
}

/// Report a selection as if the user had made it in the editor
pub fn record_command(session: &Session, target: &str) -> Result<()> {
    let target: SelectableTarget = target.parse()?;
    let mut navigator = session.open()?;

    navigator.host_mut().user_select(target.clone());
    match navigator.on_active_selection_changed() {
        Some(RecordOutcome::Recorded) => println!("Recorded {}", target),
        Some(RecordOutcome::AlreadyRecorded) => println!("Already in history: {}", target),
        Some(RecordOutcome::Filtered) => println!("Not recorded (excluded by settings): {}", target),
        Some(RecordOutcome::Cleared) => println!("Selection cleared"),
        Some(RecordOutcome::Dropped(err)) => println!("Not recorded: {}", err),
        None => {}
    }

    navigator.save_to_persistence()
}

/// Toggle the pin on a target, recording it first if needed
pub fn pin_command(session: &Session, target: &str) -> Result<()> {
    let target: SelectableTarget = target.parse()?;
    let mut navigator = session.open()?;

    navigator.select(&target);
    match navigator.toggle_pin_current() {
        Some(true) => println!("Pinned {}", target),
        Some(false) => println!("Unpinned {}", target),
        None => bail!("Cannot pin {}", target),
    }

    navigator.save_to_persistence()
}

pub fn remove_command(session: &Session, target: &str) -> Result<()> {
    let target: SelectableTarget = target.parse()?;
    let mut navigator = session.open()?;

    if navigator.tracker_mut().remove(&target).is_none() {
        println!("Not in history: {}", target);
        return Ok(());
    }
    println!("Removed {}", target);

    navigator.save_to_persistence()
}

/// List history grouped by context, or flat with `--pinned` / `--all`
pub fn list_command(session: &Session, pinned: bool, all: bool) -> Result<()> {
    let navigator = session.open()?;
    let tracker = navigator.tracker();

    if tracker.is_empty() {
        println!("History is empty.");
        return Ok(());
    }

    if pinned {
        let items = tracker.pinned_items();
        println!("Pinned ({}):\n", items.len());
        for item in items {
            print_item(item);
        }
        return Ok(());
    }

    if all {
        println!("History ({}):\n", tracker.len());
        for item in tracker.all_items() {
            print_item(item);
        }
        return Ok(());
    }

    for section in tracker.sections() {
        let state = if section.is_active { "" } else { " (closed)" };
        println!("{} [{}]{}", section.context.name, section.context.key, state);
        for item in section.items {
            print_item(item);
        }
        println!();
    }

    Ok(())
}

pub fn reconcile_command(session: &Session) -> Result<()> {
    let mut navigator = session.open()?;
    let report = navigator.tracker_mut().reconcile();

    println!(
        "Resolved: {}, unresolved: {}, removed: {}",
        report.resolved, report.unresolved, report.removed
    );

    navigator.save_to_persistence()
}

/// Step through history starting from `from` (or the most recent item)
pub fn step_command(
    session: &Session,
    delta: isize,
    from: Option<String>,
    pinned: bool,
) -> Result<()> {
    let from = from.map(|s| s.parse::<SelectableTarget>()).transpose()?;
    let mut navigator = session.open()?;

    navigator.tracker_mut().set_current(from);
    let view = if pinned {
        NavigationView::Pinned
    } else {
        NavigationView::History
    };

    match navigator.navigate(view, delta) {
        Some(target) => println!("{}", target),
        None => println!("Nothing to navigate."),
    }
    Ok(())
}

pub fn clear_command(session: &Session, keep_pinned: bool) -> Result<()> {
    let mut navigator = session.open()?;

    if keep_pinned {
        let removed = navigator.tracker_mut().clear_unpinned();
        println!("Removed {} items", removed);
    } else {
        navigator.tracker_mut().clear();
        println!("History cleared");
    }

    navigator.save_to_persistence()
}

fn print_item(item: &HistoryItem) {
    let pin = if item.is_pinned { "*" } else { " " };
    let state = if item.is_resolved() {
        String::new()
    } else {
        format!(" [{}]", item.state)
    };
    println!(
        "  {} {:<48} {}{}",
        pin,
        item.target.to_string(),
        item.label(),
        state
    );
}
