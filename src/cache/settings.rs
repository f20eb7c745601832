//! Per-user settings: daily goal, streak record, timezone, and the
//! persisted session algorithm. Stored as a key/value table namespaced
//! by user id; malformed values read back as defaults.

use rusqlite::{Connection, OptionalExtension, Result, params};

use crate::config;
use crate::domain::{SessionAlgorithm, StreakData, clamp_daily_goal};

const KEY_DAILY_GOAL: &str = "daily_goal";
const KEY_STREAK: &str = "streak_data";
const KEY_TIMEZONE: &str = "timezone";
const KEY_ALGORITHM: &str = "session_algorithm";

fn get_setting(conn: &Connection, user_id: &str, key: &str) -> Result<Option<String>> {
  conn
    .query_row(
      "SELECT value FROM user_settings WHERE user_id = ?1 AND key = ?2",
      params![user_id, key],
      |row| row.get(0),
    )
    .optional()
}

fn set_setting(conn: &Connection, user_id: &str, key: &str, value: &str) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO user_settings (user_id, key, value)
    VALUES (?1, ?2, ?3)
    ON CONFLICT (user_id, key) DO UPDATE SET value = excluded.value
    "#,
    params![user_id, key, value],
  )?;
  Ok(())
}

/// The user's daily goal, defaulting when unset or unreadable.
pub fn daily_goal(conn: &Connection, user_id: &str) -> Result<u32> {
  let goal = get_setting(conn, user_id, KEY_DAILY_GOAL)?
    .and_then(|raw| raw.parse::<u32>().ok())
    .filter(|&g| g > 0)
    .map(clamp_daily_goal)
    .unwrap_or(config::DEFAULT_DAILY_GOAL);
  Ok(goal)
}

/// Persist the daily goal, clamped into its valid range.
pub fn set_daily_goal(conn: &Connection, user_id: &str, goal: u32) -> Result<()> {
  set_setting(conn, user_id, KEY_DAILY_GOAL, &clamp_daily_goal(goal).to_string())
}

/// The user's streak record, defaulting when unset or unreadable.
pub fn streak_data(conn: &Connection, user_id: &str) -> Result<StreakData> {
  let data = match get_setting(conn, user_id, KEY_STREAK)? {
    Some(raw) => match serde_json::from_str(&raw) {
      Ok(parsed) => parsed,
      Err(e) => {
        tracing::warn!("Resetting malformed streak record for {}: {}", user_id, e);
        StreakData::default()
      }
    },
    None => StreakData::default(),
  };
  Ok(data)
}

pub fn set_streak_data(conn: &Connection, user_id: &str, data: &StreakData) -> Result<()> {
  let raw = serde_json::to_string(data)
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
  set_setting(conn, user_id, KEY_STREAK, &raw)
}

/// The last validated IANA timezone name, or empty when none is known.
pub fn timezone(conn: &Connection, user_id: &str) -> Result<String> {
  Ok(get_setting(conn, user_id, KEY_TIMEZONE)?.unwrap_or_default())
}

pub fn set_timezone(conn: &Connection, user_id: &str, tz_name: &str) -> Result<()> {
  set_setting(conn, user_id, KEY_TIMEZONE, tz_name)
}

/// The persisted session algorithm, defaulting when unset or unreadable.
pub fn session_algorithm(conn: &Connection, user_id: &str) -> Result<SessionAlgorithm> {
  let algo = get_setting(conn, user_id, KEY_ALGORITHM)?
    .and_then(|raw| serde_json::from_str(&raw).ok())
    .unwrap_or_default();
  Ok(algo)
}

pub fn set_session_algorithm(
  conn: &Connection,
  user_id: &str,
  algo: &SessionAlgorithm,
) -> Result<()> {
  let raw = serde_json::to_string(algo)
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
  set_setting(conn, user_id, KEY_ALGORITHM, &raw)
}
