use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{self, date_serde};
use crate::config;

/// Coarse mastery bucket derived from review history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MasteryLevel {
  #[default]
  New,
  Familiar,
  Mastered,
}

impl MasteryLevel {
  /// Parse a persisted level string. Unknown strings normalize to `New`
  /// so a corrupt cache entry never poisons the scheduler.
  pub fn from_str(s: &str) -> Self {
    match s {
      "familiar" => Self::Familiar,
      "mastered" => Self::Mastered,
      _ => Self::New,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::New => "new",
      Self::Familiar => "familiar",
      Self::Mastered => "mastered",
    }
  }

  /// Recompute the level from review history: mastered once the interval
  /// reaches the threshold, familiar after any exposure, new otherwise.
  pub fn from_history(seen: u32, interval_days: u32) -> Self {
    if interval_days >= config::MASTERY_THRESHOLD_DAYS {
      Self::Mastered
    } else if seen > 0 {
      Self::Familiar
    } else {
      Self::New
    }
  }
}

impl Serialize for MasteryLevel {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for MasteryLevel {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Self::from_str(&raw))
  }
}

/// User-assigned difficulty of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  /// Parse a persisted difficulty string. Unknown strings normalize to
  /// `Medium`.
  pub fn from_str(s: &str) -> Self {
    match s {
      "easy" => Self::Easy,
      "hard" => Self::Hard,
      _ => Self::Medium,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  /// Interval growth multiplier applied after a correct review.
  pub fn interval_multiplier(&self) -> f64 {
    match self {
      Self::Easy => config::EASY_MULTIPLIER,
      Self::Medium => config::MEDIUM_MULTIPLIER,
      Self::Hard => config::HARD_MULTIPLIER,
    }
  }
}

impl Serialize for Difficulty {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Difficulty {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(Self::from_str(&raw))
  }
}

/// Per-card review record, scoped to a single pack.
///
/// Every field is `#[serde(default)]` so a partially written or
/// hand-edited cache row deserializes to a usable state instead of
/// failing the whole pack.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardState {
  #[serde(default)]
  pub seen: u32,
  #[serde(default)]
  pub correct: u32,
  #[serde(default)]
  pub wrong: u32,
  #[serde(default)]
  pub level: MasteryLevel,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub interval_days: u32,
  #[serde(with = "date_serde", default)]
  pub last_review_date: Option<NaiveDate>,
  #[serde(with = "date_serde", default)]
  pub next_review_date: Option<NaiveDate>,
}

impl CardState {
  /// Whether the card's scheduled review has arrived (an unscheduled
  /// card is always due).
  pub fn is_due(&self, today: NaiveDate) -> bool {
    calendar::is_due(self.next_review_date, today)
  }
}

/// Opaque id for the flashcard at `index` within its pack.
pub fn flashcard_id(index: usize) -> String {
  format!("fc_{index}")
}

/// Opaque id for the test question at `index` within its pack.
pub fn question_id(index: usize) -> String {
  format!("q_{index}")
}

/// Whether a card id belongs to the flashcard id space.
pub fn is_flashcard_id(card_id: &str) -> bool {
  card_id.starts_with("fc_")
}
