use chrono::NaiveDate;
use dailyhabits_core::{Habit, HabitId};
use serde_json::json;

#[test]
fn habit_new_sets_defaults() {
    let habit = Habit::new("Read");

    assert!(!habit.id.as_str().is_empty());
    assert_eq!(habit.name, "Read");
    assert!(habit.completions.is_empty());
    assert_eq!(habit.streak, 0);
}

#[test]
fn habit_serializes_with_stored_wire_fields() {
    let mut habit = Habit::with_id(HabitId::from("abc"), "Read");
    habit.toggle_completion(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

    let value = serde_json::to_value(&habit).unwrap();
    assert_eq!(
        value,
        json!({ "id": "abc", "name": "Read", "completions": ["2024-05-10"], "streak": 1 })
    );

    let decoded: Habit = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, habit);
}

#[test]
fn missing_completions_and_streak_default() {
    let habit: Habit = serde_json::from_value(json!({ "id": "7", "name": "Walk" })).unwrap();
    assert!(habit.completions.is_empty());
    assert_eq!(habit.streak, 0);
}

#[test]
fn completions_serialize_in_date_order() {
    let mut habit = Habit::with_id(HabitId::from("x"), "Run");
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    habit.completions.insert(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    habit.toggle_completion(today);

    let value = serde_json::to_value(&habit).unwrap();
    assert_eq!(value["completions"], json!(["2023-12-31", "2024-01-01"]));
    assert_eq!(value["streak"], 2);
}
