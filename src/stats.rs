use crate::models::{CompletionMap, DayCompletion, Habit};
use chrono::{Datelike, Duration, Local, Months, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn is_completed(completions: &CompletionMap, habit_id: &str, date: NaiveDate) -> bool {
    completions
        .get(&date_key(date))
        .and_then(|day| day.get(habit_id))
        .copied()
        .unwrap_or(false)
}

/// Consecutive completed days ending at `today`. An uncompleted `today`
/// is skipped rather than counted, so a streak that ended yesterday still
/// reads as unbroken. The walk stops at the first day with no completion,
/// which bounds it by the earliest entry in the map.
pub fn streak_at(today: NaiveDate, completions: &CompletionMap, habit_id: &str) -> u32 {
    let mut day = today;
    if !is_completed(completions, habit_id, day) {
        day = day - Duration::days(1);
    }

    let mut streak = 0;
    while is_completed(completions, habit_id, day) {
        streak += 1;
        day = day - Duration::days(1);
    }
    streak
}

/// Share of completed days in the inclusive range
/// `[today - window_days, today]`, rounded to the nearest whole percent.
pub fn completion_rate_at(
    today: NaiveDate,
    completions: &CompletionMap,
    habit_id: &str,
    window_days: u32,
) -> u32 {
    let day_count = window_days as u64 + 1;
    let completed = (0..day_count)
        .map(|offset| today - Duration::days(offset as i64))
        .filter(|date| is_completed(completions, habit_id, *date))
        .count();

    (completed as f64 / day_count as f64 * 100.0).round() as u32
}

pub fn today_completions_at(
    today: NaiveDate,
    habits: &[Habit],
    completions: &CompletionMap,
) -> usize {
    habits
        .iter()
        .filter(|habit| is_completed(completions, &habit.id, today))
        .count()
}

/// Per-day completion counts for every calendar day of the month
/// containing `reference`, against the habit count at call time.
pub fn monthly_completions_at(
    reference: NaiveDate,
    habits: &[Habit],
    completions: &CompletionMap,
) -> Vec<DayCompletion> {
    let start = reference.with_day(1).unwrap_or(reference);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(reference);

    let mut days = Vec::with_capacity(31);
    let mut day = start;
    while day <= end {
        days.push(DayCompletion {
            date: date_key(day),
            completions: today_completions_at(day, habits, completions),
            total: habits.len(),
        });
        day = day + Duration::days(1);
    }
    days
}
