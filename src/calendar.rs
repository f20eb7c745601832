//! Calendar-day and timezone helpers.
//!
//! The scheduler works in whole calendar days, not wall-clock deltas: a
//! card is due when its review date has arrived in the user's timezone,
//! and day arithmetic is plain date math with no DST ambiguity. Degraded
//! input (unknown zone name, garbled date string) always resolves to a
//! safe default rather than an error.

use chrono::{Days, Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Date format used everywhere a date crosses a serialization boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve an IANA timezone name. Empty, padded, or unknown names
/// resolve to `None`.
pub fn resolve_timezone(name: &str) -> Option<Tz> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return None;
  }
  trimmed.parse::<Tz>().ok()
}

/// Current calendar date in the named timezone, falling back to the
/// environment's local zone when the name is empty or unknown.
pub fn today_in(tz_name: &str) -> NaiveDate {
  match resolve_timezone(tz_name) {
    Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
    None => Local::now().date_naive(),
  }
}

/// Add a signed number of calendar days to a date.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
  let result = if days >= 0 {
    date.checked_add_days(Days::new(days as u64))
  } else {
    date.checked_sub_days(Days::new(days.unsigned_abs()))
  };
  result.unwrap_or(date)
}

/// Parse a `YYYY-MM-DD` date string. Anything else is treated as "no
/// date".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// A card with no scheduled date is always due; otherwise it is due once
/// its date equals or precedes today.
pub fn is_due(date: Option<NaiveDate>, today: NaiveDate) -> bool {
  match date {
    None => true,
    Some(d) => d <= today,
  }
}

/// Serde representation for optional calendar dates: `Some` serializes
/// as `YYYY-MM-DD`, `None` as the empty string, and unparseable input
/// deserializes as `None`.
pub mod date_serde {
  use super::{DATE_FORMAT, parse_date};
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match date {
      Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
      None => serializer.serialize_str(""),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
  }
}
