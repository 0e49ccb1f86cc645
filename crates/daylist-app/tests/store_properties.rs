#![allow(missing_docs)]

use daylist_app::{MemoryStore, STORAGE_KEY, TaskStore};
use daylist_core::{Filter, Priority, SortOrder, Task, TaskId, ViewQuery, is_overdue, project};
use std::cell::Cell;
use time::macros::{date, datetime};
use time::{Date, Duration, OffsetDateTime};

const NOW: OffsetDateTime = datetime!(2024-06-15 18:30 UTC);

fn open(storage: &MemoryStore) -> TaskStore<&MemoryStore> {
    let tick = Cell::new(0_i64);
    TaskStore::load(storage)
        .unwrap_or_else(|err| panic!("must load store: {err}"))
        .with_clock(move || {
            tick.set(tick.get() + 1);
            NOW - Duration::days(30) + Duration::minutes(tick.get())
        })
}

fn add(store: &mut TaskStore<&MemoryStore>, text: &str, priority: Priority, due: Option<Date>) -> Task {
    store
        .add(text, priority, due)
        .unwrap_or_else(|err| panic!("must add {text}: {err}"))
}

fn populated(storage: &MemoryStore) -> TaskStore<&MemoryStore> {
    let mut store = open(storage);
    let fixtures = [
        ("pay rent", Priority::High, Some(date!(2024 - 06 - 01))),
        ("water plants", Priority::Low, None),
        ("file taxes", Priority::High, Some(date!(2024 - 06 - 15))),
        ("book flights", Priority::Medium, Some(date!(2024 - 07 - 02))),
        ("call plumber", Priority::Medium, None),
        ("renew passport", Priority::Low, Some(date!(2024 - 05 - 20))),
    ];
    for (text, priority, due) in fixtures {
        add(&mut store, text, priority, due);
    }
    let ids: Vec<TaskId> = store.all().iter().map(|task| task.id).collect();
    store
        .toggle_complete(ids[5])
        .unwrap_or_else(|err| panic!("toggle: {err}"));
    store
        .toggle_complete(ids[2])
        .unwrap_or_else(|err| panic!("toggle: {err}"));
    store
}

#[test]
fn every_add_lands_at_front_with_fresh_id() {
    let storage = MemoryStore::new();
    let mut store = open(&storage);
    for n in 0..20 {
        let before: Vec<TaskId> = store.all().iter().map(|task| task.id).collect();
        let task = add(&mut store, &format!("task {n}"), Priority::Medium, None);
        assert_eq!(store.all().len(), before.len() + 1);
        assert_eq!(store.all()[0].id, task.id);
        assert!(!before.contains(&task.id));
    }
}

#[test]
fn blank_inputs_never_change_collection() {
    let storage = MemoryStore::new();
    let mut store = populated(&storage);
    let snapshot = store.all().to_vec();
    let writes = storage.write_count();
    for blank in ["", " ", "\t\n", "   \r\n  "] {
        assert!(store.add(blank, Priority::High, None).is_err());
    }
    assert_eq!(store.all(), snapshot.as_slice());
    assert_eq!(storage.write_count(), writes);
}

#[test]
fn due_date_sort_orders_dated_then_undated() {
    let storage = MemoryStore::new();
    let mut store = populated(&storage);
    store.set_sort_order(SortOrder::DueDate);
    let visible = store.visible(NOW);

    let first_undated = visible
        .iter()
        .position(|task| task.due_date.is_none())
        .unwrap_or(visible.len());
    assert!(visible[first_undated..].iter().all(|task| task.due_date.is_none()));
    let dated: Vec<Date> = visible[..first_undated]
        .iter()
        .filter_map(|task| task.due_date)
        .collect();
    assert_eq!(dated.len(), first_undated);
    assert!(dated.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn overdue_count_skips_completed_and_due_today() {
    let storage = MemoryStore::new();
    let store = populated(&storage);
    let summary = store.stats(NOW);

    for task in store.all() {
        if task.completed || task.due_date == Some(NOW.date()) {
            assert!(!is_overdue(task, NOW), "{} must not be overdue", task.text);
        }
    }
    // "renew passport" is the only incomplete task due before today.
    assert_eq!(summary.overdue, 1);
    assert_eq!(summary.active + summary.completed, store.all().len());
}

#[test]
fn blob_round_trip_preserves_default_projection() {
    let storage = MemoryStore::new();
    let store = populated(&storage);
    let query = ViewQuery::default();
    let before: Vec<Task> = project(store.all(), &query, NOW).into_iter().cloned().collect();

    let reopened = TaskStore::load(&storage).unwrap_or_else(|err| panic!("reload: {err}"));
    let after: Vec<Task> = project(reopened.all(), &query, NOW)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(before, after);
    assert!(
        storage
            .raw(STORAGE_KEY)
            .is_some_and(|blob| blob.contains("\"dueDate\":\"2024-06-01\""))
    );
}

#[test]
fn filters_and_search_compose() {
    let storage = MemoryStore::new();
    let mut store = populated(&storage);

    store.set_filter(Filter::Overdue);
    let overdue: Vec<&str> = store.visible(NOW).into_iter().map(|task| task.text.as_str()).collect();
    assert_eq!(overdue, vec!["renew passport"]);

    store.set_filter(Filter::Active);
    store.set_search_query("PL");
    let active: Vec<&str> = store.visible(NOW).into_iter().map(|task| task.text.as_str()).collect();
    assert_eq!(active, vec!["call plumber", "water plants"]);
}
