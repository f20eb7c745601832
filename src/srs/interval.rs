//! Review interval calculation.
//!
//! A deliberately simplified SM-2 variant: growth is a fixed per-difficulty
//! multiplier instead of a learned ease factor, and wrong answers shrink
//! the interval rather than resetting repetition history.

use crate::config;
use crate::domain::Difficulty;

/// Round a raw interval and clamp it into the allowed range.
fn clamp_interval(value: f64) -> u32 {
  let rounded = value.round() as i64;
  rounded.clamp(
    config::MIN_INTERVAL_DAYS as i64,
    config::MAX_INTERVAL_DAYS as i64,
  ) as u32
}

/// Next review interval in days given the current interval, whether the
/// answer was correct, and the card's difficulty.
pub fn next_interval(current_days: u32, correct: bool, difficulty: Difficulty) -> u32 {
  if !correct {
    if current_days <= 1 {
      return config::MIN_INTERVAL_DAYS;
    }
    return clamp_interval(current_days as f64 * config::WRONG_SHRINK_FACTOR);
  }

  if current_days == 0 {
    // First successful review.
    return match difficulty {
      Difficulty::Easy => 2,
      _ => 1,
    };
  }

  let current = current_days as f64;
  let mut growth = (current + 1.0).max(current * difficulty.interval_multiplier());
  if difficulty == Difficulty::Easy {
    growth = growth.max(current + 2.0);
  }
  clamp_interval(growth)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_first_correct_review() {
    assert_eq!(next_interval(0, true, Difficulty::Easy), 2);
    assert_eq!(next_interval(0, true, Difficulty::Medium), 1);
    assert_eq!(next_interval(0, true, Difficulty::Hard), 1);
  }

  #[test]
  fn test_wrong_at_floor_stays_at_floor() {
    assert_eq!(next_interval(0, false, Difficulty::Medium), 1);
    assert_eq!(next_interval(1, false, Difficulty::Medium), 1);
    assert_eq!(next_interval(1, false, Difficulty::Easy), 1);
  }

  #[test]
  fn test_wrong_shrinks_interval() {
    // 10 * 0.45 = 4.5, rounds to 5
    assert_eq!(next_interval(10, false, Difficulty::Medium), 5);
    assert_eq!(next_interval(4, false, Difficulty::Hard), 2);
    assert_eq!(next_interval(120, false, Difficulty::Easy), 54);
  }

  #[test]
  fn test_medium_growth() {
    assert_eq!(next_interval(1, true, Difficulty::Medium), 2);
    assert_eq!(next_interval(2, true, Difficulty::Medium), 4);
    assert_eq!(next_interval(5, true, Difficulty::Medium), 10);
  }

  #[test]
  fn test_easy_growth_floored_at_plus_two() {
    // 1 * 2.4 = 2.4, but easy growth never adds less than 2 days
    assert_eq!(next_interval(1, true, Difficulty::Easy), 3);
    assert_eq!(next_interval(10, true, Difficulty::Easy), 24);
  }

  #[test]
  fn test_hard_growth_at_least_one_day() {
    // 1 * 1.45 = 1.45 < current + 1
    assert_eq!(next_interval(1, true, Difficulty::Hard), 2);
    assert_eq!(next_interval(10, true, Difficulty::Hard), 15);
  }

  #[test]
  fn test_growth_clamped_at_maximum() {
    assert_eq!(next_interval(120, true, Difficulty::Easy), 120);
    assert_eq!(next_interval(100, true, Difficulty::Medium), 120);
  }

  #[test]
  fn test_correct_never_shrinks_wrong_never_grows() {
    for days in 1..=config::MAX_INTERVAL_DAYS {
      for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let grown = next_interval(days, true, difficulty);
        let shrunk = next_interval(days, false, difficulty);
        assert!(grown >= days, "correct review shrank {days} to {grown}");
        assert!(shrunk <= days, "wrong review grew {days} to {shrunk}");
        assert!((config::MIN_INTERVAL_DAYS..=config::MAX_INTERVAL_DAYS).contains(&grown));
        assert!((config::MIN_INTERVAL_DAYS..=config::MAX_INTERVAL_DAYS).contains(&shrunk));
      }
    }
  }

  #[test]
  fn test_interval_sequence_from_new_card() {
    // New card answered correctly on consecutive reviews at Medium.
    let mut days = 0;
    let mut seen = Vec::new();
    for _ in 0..4 {
      days = next_interval(days, true, Difficulty::Medium);
      seen.push(days);
    }
    assert_eq!(seen, vec![1, 2, 4, 8]);
  }
}
