//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `dailyhabits_core` linkage without a popup host.
//! - Summarize the store at `DAILYHABITS_DB_PATH` when it is set.

use dailyhabits_core::{HabitService, LoadStatus, SqliteKvStore};

const DB_PATH_ENV: &str = "DAILYHABITS_DB_PATH";

fn main() {
    println!("dailyhabits_core ping={}", dailyhabits_core::ping());
    println!(
        "dailyhabits_core version={}",
        dailyhabits_core::core_version()
    );

    let Some(path) = std::env::var(DB_PATH_ENV)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
    else {
        return;
    };

    let store = match SqliteKvStore::open(path.trim()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("dailyhabits store error={err}");
            std::process::exit(1);
        }
    };

    let mut service = HabitService::new(store);
    let today = service.today();
    match service.load() {
        LoadStatus::Loaded { habits } => {
            let completed = service
                .habits()
                .iter()
                .filter(|habit| habit.is_completed_on(today))
                .count();
            let best_streak = service
                .habits()
                .iter()
                .map(|habit| habit.streak)
                .max()
                .unwrap_or(0);
            println!(
                "dailyhabits store habits={habits} completed_today={completed} best_streak={best_streak} dark_mode={}",
                service.dark_mode()
            );
        }
        LoadStatus::Unavailable => println!("dailyhabits store status=unavailable"),
    }
}
