//! Session ordering algorithm: five ordered bucket selectors that decide
//! which kind of card fills each of the first five queue positions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A bucket a queue slot can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardBucket {
  /// Due cards never seen before.
  New,
  /// Due cards at the familiar level.
  Familiar,
  /// Due cards that have been answered wrong at least once.
  Retry,
  /// Due cards that were mastered and are back for review.
  Remaster,
  /// Due cards the user marked hard.
  Hard,
  /// Any card in the pack, due or not.
  Random,
}

impl CardBucket {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "new" => Some(Self::New),
      "familiar" => Some(Self::Familiar),
      "retry" => Some(Self::Retry),
      "remaster" => Some(Self::Remaster),
      "hard" => Some(Self::Hard),
      "random" => Some(Self::Random),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Familiar => "familiar",
      Self::Retry => "retry",
      Self::Remaster => "remaster",
      Self::Hard => "hard",
      Self::Random => "random",
    }
  }
}

/// An ordered 5-slot sequence of bucket selectors, chosen via a named
/// preset or customized slot by slot. Persisted per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAlgorithm {
  pub slots: [CardBucket; 5],
}

impl SessionAlgorithm {
  pub const PRESET_NAMES: [&'static str; 5] =
    ["balanced", "random", "lastminute", "fixmistakes", "hardfirst"];

  pub fn new(slots: [CardBucket; 5]) -> Self {
    Self { slots }
  }

  /// Look up a named preset.
  pub fn from_preset(name: &str) -> Option<Self> {
    use CardBucket::*;
    let slots = match name {
      "balanced" => [New, New, Familiar, Retry, Remaster],
      "random" => [Random, Random, Random, Random, Random],
      "lastminute" => [New, New, New, New, Retry],
      "fixmistakes" => [New, Retry, New, Retry, Retry],
      "hardfirst" => [Hard, Hard, Retry, New, Familiar],
      _ => return None,
    };
    Some(Self { slots })
  }

  /// The preset name this algorithm matches, if any.
  pub fn preset_name(&self) -> Option<&'static str> {
    Self::PRESET_NAMES
      .iter()
      .find(|name| Self::from_preset(name) == Some(*self))
      .copied()
  }
}

impl Default for SessionAlgorithm {
  fn default() -> Self {
    Self::from_preset("balanced").expect("balanced preset exists")
  }
}

impl Serialize for SessionAlgorithm {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let names: Vec<&str> = self.slots.iter().map(|s| s.as_str()).collect();
    names.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for SessionAlgorithm {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    // Anything that is not five recognizable slot names falls back to
    // the default algorithm.
    let names = Vec::<String>::deserialize(deserializer)?;
    if names.len() != 5 {
      return Ok(Self::default());
    }
    let mut slots = [CardBucket::Random; 5];
    for (i, name) in names.iter().enumerate() {
      match CardBucket::from_str(name) {
        Some(bucket) => slots[i] = bucket,
        None => return Ok(Self::default()),
      }
    }
    Ok(Self { slots })
  }
}
