//! Derived statistics over a pack's card state.

use chrono::NaiveDate;

use crate::domain::card_state::is_flashcard_id;
use crate::domain::{MasteryLevel, PackCardStates, flashcard_id};

/// Number of flashcards in a pack whose review is due. Only cards that
/// have actually been studied count; unseen cards are "new", not "due".
pub fn count_due_cards(states: &PackCardStates, today: NaiveDate) -> usize {
  states
    .iter()
    .filter(|(card_id, state)| {
      is_flashcard_id(card_id) && state.seen > 0 && state.is_due(today)
    })
    .count()
}

/// Per-level card counts for a deck of `card_count` flashcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MasterySummary {
  pub new: usize,
  pub familiar: usize,
  pub mastered: usize,
}

/// Count how many of a pack's flashcards sit at each mastery level.
/// Cards with no recorded state count as new.
pub fn mastery_summary(card_count: usize, states: &PackCardStates) -> MasterySummary {
  let mut summary = MasterySummary::default();
  for index in 0..card_count {
    let level = states
      .get(&flashcard_id(index))
      .map(|state| state.level)
      .unwrap_or_default();
    match level {
      MasteryLevel::New => summary.new += 1,
      MasteryLevel::Familiar => summary.familiar += 1,
      MasteryLevel::Mastered => summary.mastered += 1,
    }
  }
  summary
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardState;
  use crate::domain::question_id;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_due_count_empty() {
    assert_eq!(count_due_cards(&PackCardStates::new(), date(2025, 7, 1)), 0);
  }

  #[test]
  fn test_due_count_ignores_unseen_and_questions() {
    let today = date(2025, 7, 1);
    let mut states = PackCardStates::new();
    // Seen and overdue: counts.
    states.insert(
      flashcard_id(0),
      CardState { seen: 3, next_review_date: Some(date(2025, 6, 28)), ..Default::default() },
    );
    // Never seen: does not count even though it has no date.
    states.insert(flashcard_id(1), CardState::default());
    // Question entry: never counts toward the flashcard due badge.
    states.insert(
      question_id(0),
      CardState { seen: 5, next_review_date: Some(date(2025, 6, 1)), ..Default::default() },
    );
    // Seen but scheduled for later: does not count.
    states.insert(
      flashcard_id(2),
      CardState { seen: 2, next_review_date: Some(date(2025, 9, 1)), ..Default::default() },
    );
    assert_eq!(count_due_cards(&states, today), 1);
  }

  #[test]
  fn test_mastery_summary_unseen_cards_are_new() {
    let mut states = PackCardStates::new();
    states.insert(
      flashcard_id(0),
      CardState { seen: 2, level: MasteryLevel::Familiar, ..Default::default() },
    );
    states.insert(
      flashcard_id(3),
      CardState { seen: 8, level: MasteryLevel::Mastered, ..Default::default() },
    );
    let summary = mastery_summary(5, &states);
    assert_eq!(summary, MasterySummary { new: 3, familiar: 1, mastered: 1 });
  }

  #[test]
  fn test_mastery_summary_empty_deck() {
    assert_eq!(mastery_summary(0, &PackCardStates::new()), MasterySummary::default());
  }
}
