use chrono::NaiveDate;
use dailyhabits_core::{FixedClock, HabitService, KvStore, LoadStatus, SqliteKvStore};
use serde_json::json;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[test]
fn habits_survive_a_restart_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("popup.sqlite3");
    let today = day("2024-12-31");

    let id = {
        let store = SqliteKvStore::open(&path).unwrap();
        let mut service = HabitService::new(store).with_clock(FixedClock::new(today));
        service.load();
        let id = service.create_habit("Stretch").unwrap();
        service.create_habit("Floss").unwrap();
        service.toggle_completion_today(&id).unwrap();
        service.toggle_dark_mode().unwrap();
        id
    };

    let store = SqliteKvStore::open(&path).unwrap();
    let mut service = HabitService::new(store).with_clock(FixedClock::new(today));
    assert_eq!(service.load(), LoadStatus::Loaded { habits: 2 });
    assert!(service.dark_mode());

    let names: Vec<_> = service.habits().iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Stretch", "Floss"]);
    let habit = service.habit(&id).unwrap();
    assert!(habit.is_completed_on(today));
    assert_eq!(habit.streak, 1);
}

#[test]
fn sqlite_store_reads_records_written_by_other_hosts() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO kv_entries (key, value) VALUES ('habits', ?1);",
            [json!([
                { "id": "1", "name": "Example Habit", "completions": [], "streak": 0 }
            ])
            .to_string()],
        )
        .unwrap();

    let mut service = HabitService::new(store);
    assert_eq!(service.load(), LoadStatus::Loaded { habits: 1 });
    assert_eq!(service.habits()[0].id.as_str(), "1");
    assert!(!service.dark_mode());
}

#[test]
fn deleting_last_habit_stores_an_empty_list() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    let mut service = HabitService::new(store);
    let id = service.create_habit("Read").unwrap();
    service.delete_habit(&id).unwrap();

    let stored = service.store().unwrap().get(&["habits"]).unwrap();
    assert_eq!(stored["habits"], json!([]));
}
