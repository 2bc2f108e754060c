//! Live queries over stored events.

mod recorder;

use std::sync::Arc;

use mate_stores::model::{MateEvent, StorageEvent};
use mate_stores::{upsert, IndexPath, ResultsController, SortDescriptor, StorageManager};
use recorder::Recorder;

fn event(id: i64, title: &str, category_id: i64) -> MateEvent {
    MateEvent {
        event_id: id,
        title: title.into(),
        description: String::new(),
        category_id,
        start_date: None,
        location: String::new(),
        attendee_count: 0,
        price_cents: 0,
    }
}

fn save(storage: &StorageManager, events: &[MateEvent]) {
    let context = storage.view_storage();
    for event in events {
        upsert::<StorageEvent>(context, event).unwrap();
    }
    context.try_save().unwrap();
}

fn ids(controller: &ResultsController<StorageEvent>) -> Vec<i64> {
    controller
        .fetched_objects()
        .iter()
        .map(|event| event.event_id)
        .collect()
}

fn by_id(storage: &StorageManager) -> ResultsController<StorageEvent> {
    ResultsController::new(
        storage.clone(),
        None,
        None,
        vec![SortDescriptor::ascending(|event: &StorageEvent| event.event_id)],
    )
}

#[test]
fn fetch_sorts_and_predicate_filters() {
    let storage = StorageManager::new();
    save(&storage, &[event(3, "c", 1), event(1, "a", 1), event(2, "b", 1)]);

    let controller = by_id(&storage);
    controller.perform_fetch().unwrap();
    assert_eq!(ids(&controller), vec![1, 2, 3]);

    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());
    controller
        .set_predicate(Some(Arc::new(|event: &StorageEvent| event.event_id != 2)))
        .unwrap();

    assert_eq!(ids(&controller), vec![1, 3]);
    assert_eq!(recorder.take(), vec!["reset"]);
}

#[test]
fn nothing_is_visible_before_fetch() {
    let storage = StorageManager::new();
    save(&storage, &[event(1, "a", 1)]);

    let controller = by_id(&storage);
    assert!(controller.is_empty());

    controller.perform_fetch().unwrap();
    assert_eq!(controller.number_of_objects(), 1);
}

#[test]
fn saves_are_forwarded_as_ordered_changes() {
    let storage = StorageManager::new();
    save(&storage, &[event(1, "a", 1), event(2, "b", 1)]);

    let controller = by_id(&storage);
    controller.perform_fetch().unwrap();
    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());

    save(&storage, &[event(3, "c", 1)]);
    assert_eq!(recorder.take(), vec!["will_change", "insert 3 at 2", "did_change"]);

    save(&storage, &[event(2, "b, renamed", 1)]);
    assert_eq!(recorder.take(), vec!["will_change", "update 2 at 1", "did_change"]);

    storage.view_storage().delete_object::<StorageEvent>(1);
    storage.view_storage().try_save().unwrap();
    assert_eq!(recorder.take(), vec!["will_change", "delete 1 at 0", "did_change"]);
    assert_eq!(ids(&controller), vec![2, 3]);
}

#[test]
fn unchanged_upsert_emits_nothing() {
    let storage = StorageManager::new();
    save(&storage, &[event(1, "a", 1)]);

    let controller = by_id(&storage);
    controller.perform_fetch().unwrap();
    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());

    save(&storage, &[event(1, "a", 1)]);
    assert!(recorder.take().is_empty());
}

#[test]
fn resorting_reports_a_move() {
    let storage = StorageManager::new();
    save(&storage, &[event(1, "b", 1), event(2, "c", 1)]);

    let controller = ResultsController::new(
        storage.clone(),
        None,
        None,
        vec![SortDescriptor::ascending(|event: &StorageEvent| event.title.clone())],
    );
    controller.perform_fetch().unwrap();
    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());

    save(&storage, &[event(2, "a", 1)]);
    assert_eq!(ids(&controller), vec![2, 1]);
    // Event 2 stays in the stable run, so it is updated in place; event 1 moves.
    assert_eq!(
        recorder.take(),
        vec!["will_change", "move 1 0->1", "update 2 at 0", "did_change"]
    );
}

#[test]
fn sections_follow_the_section_key() {
    let storage = StorageManager::new();
    save(
        &storage,
        &[event(1, "a", 2), event(2, "b", 1), event(3, "c", 2)],
    );

    let controller = ResultsController::new(
        storage.clone(),
        None,
        Some(Arc::new(|event: &StorageEvent| format!("category {}", event.category_id))),
        vec![
            SortDescriptor::ascending(|event: &StorageEvent| event.category_id),
            SortDescriptor::ascending(|event: &StorageEvent| event.event_id),
        ],
    );
    controller.perform_fetch().unwrap();

    let sections = controller.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].name, "category 1");
    assert_eq!(sections[0].number_of_objects, 1);
    assert_eq!(sections[1].name, "category 2");
    assert_eq!(sections[1].number_of_objects, 2);

    assert_eq!(controller.object(IndexPath::new(1, 1)).unwrap().event_id, 3);
    assert_eq!(controller.object_index(IndexPath::new(1, 0)), Some(1));
    assert_eq!(controller.object(IndexPath::new(2, 0)), None);

    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());
    save(&storage, &[event(4, "d", 3)]);
    assert_eq!(
        recorder.take(),
        vec!["will_change", "section+ 2 category 3", "insert 4 at 0", "did_change"]
    );
}

#[test]
fn stopped_controller_receives_nothing() {
    let storage = StorageManager::new();
    let controller = by_id(&storage);
    controller.perform_fetch().unwrap();
    let recorder = Arc::new(Recorder::default());
    controller.start_forwarding_events(recorder.clone());
    controller.stop_forwarding_events();

    save(&storage, &[event(1, "a", 1)]);
    assert!(recorder.take().is_empty());
    assert_eq!(ids(&controller), vec![1]);
}
