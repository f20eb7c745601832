//! Consecutive-day streak and daily-goal progress bookkeeping.

use chrono::NaiveDate;

use crate::calendar;
use crate::domain::StreakData;

/// Record one gradable interaction (card graded, question answered,
/// match found) and return the updated streak record.
///
/// The streak grows by one only when the previous study day was exactly
/// yesterday; any longer gap restarts it at 1. The daily counter resets
/// on the first activity of a new calendar day and then increments by
/// exactly one per call.
pub fn record_activity(data: &StreakData, today: NaiveDate) -> StreakData {
  let yesterday = calendar::add_days(today, -1);
  let mut next = data.clone();

  if next.last_study_date != Some(today) {
    if next.last_study_date == Some(yesterday) {
      next.current_streak = next.current_streak.saturating_add(1).max(1);
    } else {
      next.current_streak = 1;
    }
    next.last_study_date = Some(today);
  }

  if next.daily_progress_date != Some(today) {
    next.daily_progress_date = Some(today);
    next.daily_progress_count = 0;
  }
  next.daily_progress_count += 1;

  next
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_first_ever_activity() {
    let updated = record_activity(&StreakData::default(), date(2025, 7, 1));
    assert_eq!(updated.current_streak, 1);
    assert_eq!(updated.last_study_date, Some(date(2025, 7, 1)));
    assert_eq!(updated.daily_progress_date, Some(date(2025, 7, 1)));
    assert_eq!(updated.daily_progress_count, 1);
  }

  #[test]
  fn test_consecutive_day_extends_streak() {
    let data = StreakData {
      last_study_date: Some(date(2025, 7, 1)),
      current_streak: 4,
      daily_progress_date: Some(date(2025, 7, 1)),
      daily_progress_count: 15,
    };
    let updated = record_activity(&data, date(2025, 7, 2));
    assert_eq!(updated.current_streak, 5);
    assert_eq!(updated.daily_progress_count, 1);
  }

  #[test]
  fn test_gap_resets_streak() {
    let data = StreakData {
      last_study_date: Some(date(2025, 7, 1)),
      current_streak: 9,
      ..Default::default()
    };
    let updated = record_activity(&data, date(2025, 7, 4));
    assert_eq!(updated.current_streak, 1);
  }

  #[test]
  fn test_same_day_leaves_streak_alone() {
    let data = StreakData {
      last_study_date: Some(date(2025, 7, 2)),
      current_streak: 3,
      daily_progress_date: Some(date(2025, 7, 2)),
      daily_progress_count: 7,
    };
    let updated = record_activity(&data, date(2025, 7, 2));
    assert_eq!(updated.current_streak, 3);
    assert_eq!(updated.daily_progress_count, 8);
  }

  #[test]
  fn test_counter_increments_once_per_call() {
    let mut data = StreakData::default();
    let today = date(2025, 7, 2);
    for expected in 1..=5 {
      data = record_activity(&data, today);
      assert_eq!(data.daily_progress_count, expected);
    }
    assert_eq!(data.current_streak, 1);
  }

  #[test]
  fn test_stale_counter_resets_even_when_streak_continues() {
    // Studied yesterday, but the daily counter is from two days ago.
    let data = StreakData {
      last_study_date: Some(date(2025, 7, 1)),
      current_streak: 2,
      daily_progress_date: Some(date(2025, 6, 30)),
      daily_progress_count: 40,
    };
    let updated = record_activity(&data, date(2025, 7, 2));
    assert_eq!(updated.current_streak, 3);
    assert_eq!(updated.daily_progress_count, 1);
  }

  #[test]
  fn test_zero_streak_yesterday_bumps_to_one_not_zero() {
    let data = StreakData {
      last_study_date: Some(date(2025, 7, 1)),
      current_streak: 0,
      ..Default::default()
    };
    let updated = record_activity(&data, date(2025, 7, 2));
    assert_eq!(updated.current_streak, 1);
  }
}
