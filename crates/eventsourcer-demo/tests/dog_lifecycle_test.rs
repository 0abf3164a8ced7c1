//! End-to-end lifecycle of the `Dog` aggregate: draft, command, collect,
//! persist, replay.

use eventsourcer_core::aggregate::{AggregateRoot, AggregateStatus};
use eventsourcer_core::command::EventEmitter;
use eventsourcer_core::event::{Event, Payload};
use eventsourcer_demo::domain::dog::Dog;
use eventsourcer_event_store::list::ListEventStore;
use eventsourcer_test_support::{FixedClock, RecordingListener};
use uuid::Uuid;

// --- in-memory lifecycle ---

#[test]
fn test_roxie_learns_roll_over_and_replays() {
    let clock = FixedClock::standard();
    let emitter = EventEmitter::new(&clock);
    let dog_id = Uuid::new_v4();

    let mut dog = Dog::draft(dog_id, "Roxie", &emitter).unwrap();
    assert_eq!(dog.pending_events().len(), 1);
    let created = &dog.pending_events()[0];
    assert_eq!(created.name(), "DogCreated");
    assert_eq!(created.version(), 0);
    assert_eq!(
        created.payload(),
        &Payload::new().with("name", "Roxie").unwrap()
    );

    dog.add_trick("roll over", &emitter).unwrap();
    assert_eq!(dog.pending_events().len(), 2);
    let added = dog.pending_events().back().unwrap();
    assert_eq!(added.name(), "TrickAdded");
    assert_eq!(added.version(), 1);
    assert_eq!(
        added.payload(),
        &Payload::new().with("trick", "roll over").unwrap()
    );

    let events: Vec<Event> = dog.collect_events().collect();
    assert!(dog.collect_events().next().is_none());

    let mut projected = Dog::default();
    assert_eq!(projected.status(), AggregateStatus::Uninitialized);
    projected.replay(&events).unwrap();
    assert_eq!(projected.name(), "Roxie");
    assert_eq!(projected.tricks(), ["roll over"]);
    assert!(projected.pending_events().is_empty());
    assert_eq!(projected.aggregate_id(), Some(dog_id));
}

#[test]
fn test_listener_observes_events_in_emission_order() {
    let clock = FixedClock::standard();
    let listener = RecordingListener::new();
    let emitter = EventEmitter::<Dog>::new(&clock).with_listener(&listener);

    let mut dog = Dog::draft(Uuid::new_v4(), "Roxie", &emitter).unwrap();
    dog.learn_tricks(["sit", "roll over"], &emitter).unwrap();

    let versions: Vec<u64> = listener.events().iter().map(Event::version).collect();
    assert_eq!(versions, vec![0, 1, 2]);
}

// --- through the list event store ---

#[test]
fn test_saved_dog_loads_with_same_state() {
    let clock = FixedClock::standard();
    let emitter = EventEmitter::new(&clock);
    let store = ListEventStore::build();
    let dog_id = Uuid::new_v4();
    let mut dog = Dog::draft(dog_id, "Roxie", &emitter).unwrap();
    dog.add_trick("roll over", &emitter).unwrap();

    let written = store.save(&mut dog).unwrap();
    let loaded: Dog = store.load(dog_id).unwrap();

    assert_eq!(written, 2);
    assert_eq!(loaded, dog);
    assert_eq!(store.get(dog_id).unwrap().len(), 2);
}

#[test]
fn test_stale_copy_cannot_overwrite_newer_history() {
    let clock = FixedClock::standard();
    let emitter = EventEmitter::new(&clock);
    let store = ListEventStore::build();
    let dog_id = Uuid::new_v4();
    let mut dog = Dog::draft(dog_id, "Roxie", &emitter).unwrap();
    store.save(&mut dog).unwrap();

    let mut first: Dog = store.load(dog_id).unwrap();
    let mut second: Dog = store.load(dog_id).unwrap();
    first.add_trick("sit", &emitter).unwrap();
    second.add_trick("beg", &emitter).unwrap();
    store.save(&mut first).unwrap();

    assert!(store.save(&mut second).is_err());
    let loaded: Dog = store.load(dog_id).unwrap();
    assert_eq!(loaded.tricks(), ["sit"]);
}

#[test]
fn test_empty_put_and_unknown_get_are_harmless() {
    let store = ListEventStore::build();
    let dog_id = Uuid::new_v4();

    store.put(Vec::<Event>::new()).unwrap();

    assert!(store.get(dog_id).unwrap().is_empty());
    assert!(store.load::<Dog>(dog_id).is_err());
}
