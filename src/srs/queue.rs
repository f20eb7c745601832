//! Session queue construction.
//!
//! Cards are partitioned into weighted buckets by due-ness and mastery,
//! each bucket is shuffled, and the session's five algorithm slots each
//! draw one card from their bucket. The rest of the pack follows in its
//! original order, with not-yet-due cards deferred to the very end.
//! Every card appears in the queue exactly once.
//!
//! This ordering governs flashcard and write modes; quiz and match modes
//! use their own simpler orderings.

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{
  CardBucket, Difficulty, MasteryLevel, PackCardStates, SessionAlgorithm, flashcard_id,
};

/// Order a pack's cards for a review session using the thread-local RNG.
/// Returns the original card indices in play order.
pub fn order_cards(
  card_count: usize,
  states: &PackCardStates,
  algo: &SessionAlgorithm,
  today: NaiveDate,
) -> Vec<usize> {
  order_cards_with(card_count, states, algo, today, &mut rand::rng())
}

/// Deterministic variant of [`order_cards`] for callers that supply
/// their own RNG.
pub fn order_cards_with<R: Rng + ?Sized>(
  card_count: usize,
  states: &PackCardStates,
  algo: &SessionAlgorithm,
  today: NaiveDate,
  rng: &mut R,
) -> Vec<usize> {
  if card_count == 0 {
    return Vec::new();
  }

  let mut new_bucket = Vec::new();
  let mut familiar = Vec::new();
  let mut retry = Vec::new();
  let mut remaster = Vec::new();
  let mut hard = Vec::new();
  let mut random = Vec::new();
  let mut is_deferred = vec![false; card_count];
  let mut deferred = Vec::new();

  for index in 0..card_count {
    let state = states.get(&flashcard_id(index));
    let due = match state {
      None => true,
      Some(cs) => cs.seen == 0 || cs.is_due(today),
    };
    if due {
      match state.map(|cs| cs.level).unwrap_or_default() {
        MasteryLevel::New => new_bucket.push(index),
        MasteryLevel::Familiar => familiar.push(index),
        MasteryLevel::Mastered => remaster.push(index),
      }
      // Retry and Hard are additive: a due card can sit in these on top
      // of its mastery bucket.
      if let Some(cs) = state {
        if cs.wrong > 0 {
          retry.push(index);
        }
        if cs.difficulty == Difficulty::Hard {
          hard.push(index);
        }
      }
    } else {
      is_deferred[index] = true;
      deferred.push(index);
    }
    random.push(index);
  }

  for bucket in [
    &mut new_bucket,
    &mut familiar,
    &mut retry,
    &mut remaster,
    &mut hard,
    &mut random,
  ] {
    bucket.shuffle(rng);
  }

  let mut used = vec![false; card_count];
  let mut queue = Vec::with_capacity(card_count);

  for slot in algo.slots {
    let pool = match slot {
      CardBucket::New => &new_bucket,
      CardBucket::Familiar => &familiar,
      CardBucket::Retry => &retry,
      CardBucket::Remaster => &remaster,
      CardBucket::Hard => &hard,
      CardBucket::Random => &random,
    };
    let pool = if pool.is_empty() { &random } else { pool };
    if let Some(&index) = pool.iter().find(|&&i| !used[i]) {
      used[index] = true;
      queue.push(index);
    }
  }

  // Stable remainder: unused due cards in pack order, deferred cards last.
  for index in 0..card_count {
    if !used[index] && !is_deferred[index] {
      used[index] = true;
      queue.push(index);
    }
  }
  for index in deferred {
    if !used[index] {
      used[index] = true;
      queue.push(index);
    }
  }

  queue
}
