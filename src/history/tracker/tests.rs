use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::TimeZone;

use super::*;

/// Fake editor state shared between the test and the resolvers
#[derive(Default)]
struct World {
    contexts: HashSet<String>,
    live: HashSet<SelectableTarget>,
    folders: HashSet<SelectableTarget>,
}

#[derive(Clone, Default)]
struct Shared(Rc<RefCell<World>>);

impl ContextResolver for Shared {
    fn resolve_context(&self, key: &ContextKey) -> Option<String> {
        let world = self.0.borrow();
        world.contexts.contains(&key.id).then(|| key.id.clone())
    }
}

impl TargetResolver for Shared {
    fn resolve_target(&self, target: &SelectableTarget) -> Option<ResolvedObject> {
        let world = self.0.borrow();
        if world.folders.contains(target) {
            Some(ResolvedObject::folder(target.short_name()))
        } else if world.live.contains(target) {
            Some(ResolvedObject::named(target.short_name()))
        } else {
            None
        }
    }
}

impl Shared {
    fn add_context(&self, id: &str) {
        self.0.borrow_mut().contexts.insert(id.to_string());
    }

    fn add(&self, target: &SelectableTarget) {
        self.0.borrow_mut().live.insert(target.clone());
    }

    fn add_folder(&self, target: &SelectableTarget) {
        self.0.borrow_mut().folders.insert(target.clone());
    }

    fn delete(&self, target: &SelectableTarget) {
        self.0.borrow_mut().live.remove(target);
    }
}

fn tracker_with(settings: HistorySettings) -> (SelectionHistoryTracker, Shared) {
    let world = Shared::default();
    for id in ["main", "menu", "enemy"] {
        world.add_context(id);
    }
    let tracker =
        SelectionHistoryTracker::new(settings, Box::new(world.clone()), Box::new(world.clone()));
    (tracker, world)
}

fn tracker(max: usize) -> (SelectionHistoryTracker, Shared) {
    tracker_with(HistorySettings::with_max_size(max))
}

fn asset(id: &str) -> SelectableTarget {
    SelectableTarget::asset(id)
}

fn record_live(
    tracker: &mut SelectionHistoryTracker,
    world: &Shared,
    target: SelectableTarget,
) -> RecordOutcome {
    world.add(&target);
    tracker.record_selection(target)
}

fn ids(items: &[&HistoryItem]) -> Vec<String> {
    items.iter().map(|i| i.target.to_string()).collect()
}

fn all_ids(tracker: &SelectionHistoryTracker) -> Vec<String> {
    tracker
        .all_items()
        .iter()
        .map(|i| i.target.to_string())
        .collect()
}

#[test]
fn test_records_most_recent_first_and_evicts_oldest() {
    let (mut tracker, world) = tracker(3);
    for id in ["A", "B", "C", "D"] {
        assert_eq!(record_live(&mut tracker, &world, asset(id)), RecordOutcome::Recorded);
    }

    assert_eq!(all_ids(&tracker), vec!["asset:D", "asset:C", "asset:B"]);
    assert_eq!(tracker.current(), Some(&asset("D")));
}

#[test]
fn test_pinned_items_survive_eviction() {
    let (mut tracker, world) = tracker(3);
    for id in ["A", "B", "C", "D"] {
        record_live(&mut tracker, &world, asset(id));
    }

    assert_eq!(tracker.toggle_pin(&asset("B")), Some(true));
    record_live(&mut tracker, &world, asset("E"));

    assert_eq!(all_ids(&tracker), vec!["asset:E", "asset:D", "asset:C", "asset:B"]);
    assert!(tracker.get(&asset("B")).unwrap().is_pinned);

    record_live(&mut tracker, &world, asset("F"));
    assert_eq!(all_ids(&tracker), vec!["asset:F", "asset:E", "asset:D", "asset:B"]);
}

#[test]
fn test_reselect_does_not_reorder() {
    let (mut tracker, world) = tracker(5);
    for id in ["A", "B", "C"] {
        record_live(&mut tracker, &world, asset(id));
    }

    assert_eq!(
        tracker.record_selection(asset("A")),
        RecordOutcome::AlreadyRecorded
    );
    assert_eq!(all_ids(&tracker), vec!["asset:C", "asset:B", "asset:A"]);
    assert_eq!(tracker.current(), Some(&asset("A")));
}

#[test]
fn test_invalid_selection_clears_current() {
    let (mut tracker, world) = tracker(5);
    record_live(&mut tracker, &world, asset("A"));

    assert_eq!(
        tracker.record_selection(SelectableTarget::Invalid),
        RecordOutcome::Cleared
    );
    assert_eq!(tracker.current(), None);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_history_full_of_pins_refuses_new_items() {
    let (mut tracker, world) = tracker(2);
    record_live(&mut tracker, &world, asset("A"));
    record_live(&mut tracker, &world, asset("B"));
    tracker.toggle_pin(&asset("A"));
    tracker.toggle_pin(&asset("B"));

    let outcome = record_live(&mut tracker, &world, asset("C"));
    assert_eq!(
        outcome,
        RecordOutcome::Dropped(NavigatorError::HistoryFull { pinned: 2, limit: 2 })
    );
    assert_eq!(tracker.len(), 2);
    assert_eq!(tracker.current(), Some(&asset("C")));
}

#[test]
fn test_unresolvable_context_is_dropped() {
    let (mut tracker, _world) = tracker(5);
    let target = SelectableTarget::scene_member("deleted", "Player");

    let outcome = tracker.record_selection(target.clone());
    assert_eq!(
        outcome,
        RecordOutcome::Dropped(NavigatorError::ContextUnresolvable(ContextKey::scene(
            "deleted"
        )))
    );
    assert!(tracker.is_empty());
    assert_eq!(tracker.current(), None);
}

#[test]
fn test_filters_leave_history_untouched() {
    let (mut tracker, world) = tracker_with(HistorySettings {
        record_folders: false,
        ..HistorySettings::default()
    });

    let folder = asset("Assets/Textures");
    world.add_folder(&folder);
    assert_eq!(tracker.record_selection(folder.clone()), RecordOutcome::Filtered);

    // Prefab members are off by default
    let gun = SelectableTarget::prefab_member("enemy", "Root/Gun");
    assert_eq!(
        record_live(&mut tracker, &world, gun.clone()),
        RecordOutcome::Filtered
    );

    assert!(tracker.is_empty());
    assert_eq!(tracker.current(), Some(&gun));
}

#[test]
fn test_pinning_filtered_current_inserts_it() {
    let (mut tracker, world) = tracker(5);
    let gun = SelectableTarget::prefab_member("enemy", "Root/Gun");
    record_live(&mut tracker, &world, gun.clone());
    assert!(tracker.is_empty());

    assert_eq!(tracker.toggle_pin_current(), Some(true));
    let item = tracker.current_item().unwrap();
    assert!(item.is_pinned);
    assert_eq!(item.context, ContextKey::prefab("enemy"));

    assert_eq!(tracker.toggle_pin_current(), Some(false));
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_partitions_group_by_context() {
    let (mut tracker, world) = tracker(10);
    tracker.mark_active(ContextKind::Scene, ["main"]);

    record_live(&mut tracker, &world, asset("a"));
    record_live(&mut tracker, &world, SelectableTarget::scene_member("main", "Player"));
    record_live(&mut tracker, &world, SelectableTarget::scene_member("main", "Camera"));

    assert_eq!(
        ids(&tracker.items_in(&ContextKey::scene("main"))),
        vec!["scene:main:Camera", "scene:main:Player"]
    );
    assert_eq!(ids(&tracker.items_in(&ContextKey::project())), vec!["asset:a"]);
    assert!(tracker.items_in(&ContextKey::scene("menu")).is_empty());
}

#[test]
fn test_reconcile_removes_deleted_assets_but_keeps_inactive_scene_members() {
    let (mut tracker, world) = tracker(10);
    tracker.mark_active(ContextKind::Scene, ["main"]);

    let player = SelectableTarget::scene_member("main", "Player");
    record_live(&mut tracker, &world, asset("a"));
    record_live(&mut tracker, &world, player.clone());

    world.delete(&asset("a"));
    tracker.mark_active(ContextKind::Scene, Vec::<String>::new());

    let report = tracker.reconcile();
    assert_eq!(report.removed, 1);
    assert_eq!(report.unresolved, 1);
    assert!(tracker.get(&asset("a")).is_none());

    let item = tracker.get(&player).unwrap();
    assert_eq!(item.state, ResolutionState::UnresolvedContextual);

    // Reopening the scene resolves it again
    tracker.mark_active(ContextKind::Scene, ["main"]);
    let report = tracker.reconcile();
    assert_eq!(report.resolved, 1);
    assert!(tracker.get(&player).unwrap().is_resolved());
}

#[test]
fn test_sections_order_and_inactive_visibility() {
    let (mut tracker, world) = tracker(10);
    tracker.mark_active(ContextKind::Scene, ["main", "menu"]);

    record_live(&mut tracker, &world, asset("a"));
    record_live(&mut tracker, &world, SelectableTarget::scene_member("menu", "Button"));
    record_live(&mut tracker, &world, SelectableTarget::scene_member("main", "Player"));

    let names: Vec<_> = tracker
        .sections()
        .iter()
        .map(|s| s.context.key.to_string())
        .collect();
    assert_eq!(names, vec!["scene:menu", "scene:main", "project"]);

    tracker.mark_active(ContextKind::Scene, ["main"]);
    let sections = tracker.sections();
    assert_eq!(sections.len(), 3);
    assert!(!sections[0].is_active);

    // Only active sections are navigable
    assert_eq!(
        ids(&tracker.visible_items()),
        vec!["scene:main:Player", "asset:a"]
    );

    let mut settings = tracker.settings().clone();
    settings.show_inactive_contexts = false;
    tracker.set_settings(settings);
    assert_eq!(tracker.sections().len(), 2);
}

#[test]
fn test_lowering_limit_evicts_immediately() {
    let (mut tracker, world) = tracker(5);
    for id in ["A", "B", "C", "D"] {
        record_live(&mut tracker, &world, asset(id));
    }
    tracker.toggle_pin(&asset("A"));

    let rx = tracker.subscribe();
    tracker.set_settings(HistorySettings::with_max_size(1));

    assert_eq!(all_ids(&tracker), vec!["asset:D", "asset:A"]);
    assert!(rx.try_recv().is_ok());
}

#[test]
fn test_clear_variants() {
    let (mut tracker, world) = tracker(5);
    for id in ["A", "B", "C"] {
        record_live(&mut tracker, &world, asset(id));
    }
    tracker.toggle_pin(&asset("B"));

    assert_eq!(tracker.clear_unpinned(), 2);
    assert_eq!(all_ids(&tracker), vec!["asset:B"]);

    tracker.clear();
    assert!(tracker.is_empty());
}

#[test]
fn test_subscribers_are_notified_and_dropped_receivers_pruned() {
    let (mut tracker, world) = tracker(5);
    let rx = tracker.subscribe();
    let dropped = tracker.subscribe();
    drop(dropped);

    record_live(&mut tracker, &world, asset("A"));
    assert_eq!(rx.try_recv(), Ok(HistoryChanged));
    assert_eq!(tracker.subscribers.len(), 1);

    // Repeat selection changes nothing
    tracker.record_selection(asset("A"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_touch_detects_repeat_within_window() {
    let (mut tracker, world) = tracker(5);
    record_live(&mut tracker, &world, asset("A"));

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(tracker.touch(&asset("A"), t0), Some(false));
    assert_eq!(
        tracker.touch(&asset("A"), t0 + chrono::Duration::milliseconds(200)),
        Some(true)
    );
    assert_eq!(
        tracker.touch(&asset("A"), t0 + chrono::Duration::seconds(5)),
        Some(false)
    );
    assert_eq!(tracker.touch(&asset("missing"), t0), None);
}

#[test]
fn test_load_records_applies_dedup_and_capacity() {
    let (mut tracker, _world) = tracker(2);
    let records = vec![
        HistoryRecord::from_item(&HistoryItem::new(asset("a"), ContextKey::project())).unwrap(),
        HistoryRecord::from_item(&HistoryItem::new(asset("a"), ContextKey::project())).unwrap(),
        HistoryRecord::from_item(
            &HistoryItem::new(asset("p"), ContextKey::project()).with_pinned(true),
        )
        .unwrap(),
        HistoryRecord::from_item(&HistoryItem::new(asset("b"), ContextKey::project())).unwrap(),
        HistoryRecord::from_item(&HistoryItem::new(asset("c"), ContextKey::project())).unwrap(),
        HistoryRecord::from_item(&HistoryItem::new(
            SelectableTarget::scene_member("gone", "X"),
            ContextKey::scene("gone"),
        ))
        .unwrap(),
    ];

    let report = tracker.load_records(records);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.over_capacity, 1);
    assert_eq!(report.unresolved_contexts, 1);
    assert_eq!(report.skipped(), 3);
    assert_eq!(all_ids(&tracker), vec!["asset:a", "asset:p", "asset:b"]);
}

#[test]
fn test_dump_lists_sections_and_history() {
    let (mut tracker, world) = tracker(5);
    tracker.mark_active(ContextKind::Scene, ["main"]);
    record_live(&mut tracker, &world, SelectableTarget::scene_member("main", "World/Player"));
    record_live(&mut tracker, &world, asset("Assets/a.png"));
    tracker.toggle_pin(&asset("Assets/a.png"));

    let dump = tracker.dump();
    assert!(dump.contains("[main]\n - Player\n"));
    assert!(dump.contains("[Project]\n - a.png *\n"));
    assert!(dump.contains("<All History>\n - a.png *\n - Player\n"));
}

#[test]
fn test_pinned_oldest_outlasts_a_full_window_of_new_items() {
    let max = 3;
    let (mut tracker, world) = tracker(max);
    for id in ["A", "B", "C"] {
        record_live(&mut tracker, &world, asset(id));
    }
    tracker.toggle_pin(&asset("A"));

    for id in ["D", "E", "F"] {
        assert_eq!(record_live(&mut tracker, &world, asset(id)), RecordOutcome::Recorded);
    }

    assert_eq!(all_ids(&tracker), vec!["asset:F", "asset:E", "asset:D", "asset:A"]);
    assert!(tracker.get(&asset("A")).unwrap().is_pinned);
}

#[test]
fn test_long_mixed_sequence_keeps_window_and_pins() {
    let max = 4;
    let (mut tracker, world) = tracker(max);
    let mut pinned: HashSet<SelectableTarget> = HashSet::new();
    // Unpinning never evicts, so the window may overflow by one per unpin
    // until the next insert trims it
    let mut unpins_since_insert = 0;
    let mut seed: u64 = 0x5eed;

    for _ in 0..500 {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let n = (seed >> 33) as usize;

        match n % 5 {
            0..=2 => {
                let outcome =
                    record_live(&mut tracker, &world, asset(&format!("item{}", n % 12)));
                if outcome == RecordOutcome::Recorded {
                    assert!(tracker.list.unpinned_count() <= max);
                    unpins_since_insert = 0;
                }
            }
            _ if tracker.is_empty() => {}
            _ => {
                let target = tracker.all_items()[n % tracker.len()].target.clone();
                match tracker.toggle_pin(&target) {
                    Some(true) => {
                        pinned.insert(target);
                    }
                    Some(false) => {
                        pinned.remove(&target);
                        unpins_since_insert += 1;
                    }
                    None => panic!("listed item {} not found", target),
                }
            }
        }

        assert!(tracker.list.unpinned_count() <= max + unpins_since_insert);
        for target in &pinned {
            let item = tracker.get(target).expect("pinned item was lost");
            assert!(item.is_pinned);
        }
        assert_eq!(tracker.list.pinned_count(), pinned.len());
    }
}
