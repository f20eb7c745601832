use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::date_serde;
use crate::config;
use crate::domain::card_state::CardState;

/// Card states for one pack, keyed by opaque card id (`fc_<i>`, `q_<i>`).
pub type PackCardStates = HashMap<String, CardState>;

/// Consecutive-day study streak and per-day progress counter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreakData {
  #[serde(with = "date_serde", default)]
  pub last_study_date: Option<NaiveDate>,
  #[serde(default)]
  pub current_streak: u32,
  #[serde(with = "date_serde", default)]
  pub daily_progress_date: Option<NaiveDate>,
  #[serde(default)]
  pub daily_progress_count: u32,
}

/// The complete serializable progress state exchanged between the device
/// cache and the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
  #[serde(default = "default_daily_goal")]
  pub daily_goal: u32,
  #[serde(default)]
  pub streak_data: StreakData,
  /// Per-pack card states, keyed by pack id.
  #[serde(default)]
  pub card_states: HashMap<String, PackCardStates>,
  /// IANA timezone name, or empty when none is known.
  #[serde(default)]
  pub timezone: String,
}

impl Default for ProgressSnapshot {
  fn default() -> Self {
    Self {
      daily_goal: config::DEFAULT_DAILY_GOAL,
      streak_data: StreakData::default(),
      card_states: HashMap::new(),
      timezone: String::new(),
    }
  }
}

fn default_daily_goal() -> u32 {
  config::DEFAULT_DAILY_GOAL
}

/// Clamp a user-set daily goal into its valid range.
pub fn clamp_daily_goal(goal: u32) -> u32 {
  goal.clamp(config::MIN_DAILY_GOAL, config::MAX_DAILY_GOAL)
}
