//! Consecutive-day streak calculation.
//!
//! # Invariants
//! - The walk starts at `today` and moves back exactly one calendar day per
//!   step; dates after `today` are never visited.
//! - A missing `today` yields `0`.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Counts the unbroken run of completed days ending at `today`.
///
/// Walks backward one day at a time, so cost grows with the streak length.
/// Stops at `NaiveDate::MIN` when the calendar runs out.
pub fn compute_streak(completions: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = Some(today);

    while let Some(day) = cursor.filter(|day| completions.contains(day)) {
        count += 1;
        cursor = day.pred_opt();
    }

    count
}

#[cfg(test)]
mod tests {
    use super::compute_streak;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
    }

    fn dates(values: &[&str]) -> BTreeSet<NaiveDate> {
        values.iter().map(|value| date(value)).collect()
    }

    #[test]
    fn empty_completions_have_no_streak() {
        assert_eq!(compute_streak(&BTreeSet::new(), date("2024-05-10")), 0);
    }

    #[test]
    fn yesterday_and_today_count_two() {
        let completions = dates(&["2024-05-09", "2024-05-10"]);
        assert_eq!(compute_streak(&completions, date("2024-05-10")), 2);
    }

    #[test]
    fn gap_at_yesterday_breaks_the_run() {
        let completions = dates(&["2024-05-08", "2024-05-10"]);
        assert_eq!(compute_streak(&completions, date("2024-05-10")), 1);
    }

    #[test]
    fn missing_today_yields_zero_even_with_history() {
        let completions = dates(&["2024-05-07", "2024-05-08", "2024-05-09"]);
        assert_eq!(compute_streak(&completions, date("2024-05-10")), 0);
    }

    #[test]
    fn future_dates_never_contribute() {
        let completions = dates(&["2024-05-10", "2024-05-11", "2024-05-12"]);
        assert_eq!(compute_streak(&completions, date("2024-05-10")), 1);
    }

    #[test]
    fn walk_crosses_leap_day_and_month_boundary() {
        let completions = dates(&["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert_eq!(compute_streak(&completions, date("2024-03-01")), 3);
    }

    #[test]
    fn walk_crosses_year_boundary() {
        let completions = dates(&["2023-12-30", "2023-12-31", "2024-01-01"]);
        assert_eq!(compute_streak(&completions, date("2024-01-01")), 3);
    }

    #[test]
    fn non_leap_year_has_no_february_29() {
        // 2023-02-28 -> 2023-03-01 are adjacent days.
        let completions = dates(&["2023-02-28", "2023-03-01"]);
        assert_eq!(compute_streak(&completions, date("2023-03-01")), 2);
    }

    #[test]
    fn walk_stops_at_minimum_date() {
        let completions: BTreeSet<NaiveDate> = [NaiveDate::MIN].into_iter().collect();
        assert_eq!(compute_streak(&completions, NaiveDate::MIN), 1);
    }
}
