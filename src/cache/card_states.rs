//! Card-state rows: one JSON-encoded [`CardState`] per (user, pack, card).

use rusqlite::{Connection, Result, params};
use std::collections::HashMap;

use crate::domain::{CardState, PackCardStates};

/// Load every card state cached for one pack. A row that no longer
/// parses is skipped with a warning; it must never poison the pack.
pub fn load_pack_states(conn: &Connection, user_id: &str, pack_id: &str) -> Result<PackCardStates> {
  let mut stmt =
    conn.prepare("SELECT card_id, state FROM card_states WHERE user_id = ?1 AND pack_id = ?2")?;
  let rows = stmt.query_map(params![user_id, pack_id], |row| {
    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
  })?;

  let mut states = PackCardStates::new();
  for row in rows {
    let (card_id, raw) = row?;
    match serde_json::from_str::<CardState>(&raw) {
      Ok(state) => {
        states.insert(card_id, state);
      }
      Err(e) => {
        tracing::warn!("Dropping malformed card state for {}/{}: {}", pack_id, card_id, e);
      }
    }
  }
  Ok(states)
}

/// Load one card's state, if cached and readable.
pub fn load_card_state(
  conn: &Connection,
  user_id: &str,
  pack_id: &str,
  card_id: &str,
) -> Result<Option<CardState>> {
  use rusqlite::OptionalExtension;
  let raw: Option<String> = conn
    .query_row(
      "SELECT state FROM card_states WHERE user_id = ?1 AND pack_id = ?2 AND card_id = ?3",
      params![user_id, pack_id, card_id],
      |row| row.get(0),
    )
    .optional()?;
  Ok(raw.and_then(|raw| match serde_json::from_str(&raw) {
    Ok(state) => Some(state),
    Err(e) => {
      tracing::warn!("Dropping malformed card state for {}/{}: {}", pack_id, card_id, e);
      None
    }
  }))
}

/// Upsert a single card's state.
pub fn save_card_state(
  conn: &Connection,
  user_id: &str,
  pack_id: &str,
  card_id: &str,
  state: &CardState,
) -> Result<()> {
  let raw = serde_json::to_string(state)
    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
  conn.execute(
    r#"
    INSERT INTO card_states (user_id, pack_id, card_id, state)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (user_id, pack_id, card_id) DO UPDATE SET state = excluded.state
    "#,
    params![user_id, pack_id, card_id, raw],
  )?;
  Ok(())
}

/// Replace a pack's entire cached state with the given map.
pub fn replace_pack_states(
  conn: &Connection,
  user_id: &str,
  pack_id: &str,
  states: &PackCardStates,
) -> Result<()> {
  delete_pack_states(conn, user_id, pack_id)?;
  for (card_id, state) in states {
    save_card_state(conn, user_id, pack_id, card_id, state)?;
  }
  Ok(())
}

/// Drop every cached card state for one pack.
pub fn delete_pack_states(conn: &Connection, user_id: &str, pack_id: &str) -> Result<()> {
  conn.execute(
    "DELETE FROM card_states WHERE user_id = ?1 AND pack_id = ?2",
    params![user_id, pack_id],
  )?;
  Ok(())
}

/// Pack ids that have any cached card state for this user.
pub fn tracked_pack_ids(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
  let mut stmt = conn
    .prepare("SELECT DISTINCT pack_id FROM card_states WHERE user_id = ?1 ORDER BY pack_id")?;
  let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
  rows.collect()
}

/// Load the card states of every tracked pack, keyed by pack id. Packs
/// whose every row is malformed come back empty and are dropped.
pub fn load_all_pack_states(
  conn: &Connection,
  user_id: &str,
) -> Result<HashMap<String, PackCardStates>> {
  let mut all = HashMap::new();
  for pack_id in tracked_pack_ids(conn, user_id)? {
    let states = load_pack_states(conn, user_id, &pack_id)?;
    if !states.is_empty() {
      all.insert(pack_id, states);
    }
  }
  Ok(all)
}

/// Delete cached state for every pack not in `known`, returning the
/// purged pack ids.
pub fn retain_packs(conn: &Connection, user_id: &str, known: &[String]) -> Result<Vec<String>> {
  let mut removed = Vec::new();
  for pack_id in tracked_pack_ids(conn, user_id)? {
    if !known.contains(&pack_id) {
      delete_pack_states(conn, user_id, &pack_id)?;
      removed.push(pack_id);
    }
  }
  Ok(removed)
}
