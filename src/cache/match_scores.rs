//! Match-mode high scores: the fastest completion times per pack.
//! Device-local only; never part of the remote snapshot.

use rusqlite::{Connection, Result, params};

use crate::config;

/// Fastest recorded times for a pack, ascending, at most
/// [`config::MATCH_SCORE_LIMIT`] entries.
pub fn top_scores(conn: &Connection, user_id: &str, pack_id: &str) -> Result<Vec<i64>> {
  let mut stmt = conn.prepare(
    "SELECT time_ms FROM match_scores WHERE user_id = ?1 AND pack_id = ?2
     ORDER BY time_ms ASC LIMIT ?3",
  )?;
  let rows = stmt.query_map(
    params![user_id, pack_id, config::MATCH_SCORE_LIMIT as i64],
    |row| row.get::<_, i64>(0),
  )?;
  rows.collect()
}

/// Record a match completion time, prune beyond the retention limit,
/// and return the updated leaderboard.
pub fn record_score(
  conn: &Connection,
  user_id: &str,
  pack_id: &str,
  time_ms: i64,
) -> Result<Vec<i64>> {
  conn.execute(
    "INSERT INTO match_scores (user_id, pack_id, time_ms) VALUES (?1, ?2, ?3)",
    params![user_id, pack_id, time_ms],
  )?;
  conn.execute(
    r#"
    DELETE FROM match_scores
    WHERE user_id = ?1 AND pack_id = ?2 AND rowid NOT IN (
      SELECT rowid FROM match_scores
      WHERE user_id = ?1 AND pack_id = ?2
      ORDER BY time_ms ASC LIMIT ?3
    )
    "#,
    params![user_id, pack_id, config::MATCH_SCORE_LIMIT as i64],
  )?;
  top_scores(conn, user_id, pack_id)
}

/// 1-based leaderboard rank of a time within the given scores.
pub fn score_rank(scores: &[i64], time_ms: i64) -> usize {
  scores
    .iter()
    .position(|&s| s == time_ms)
    .map(|i| i + 1)
    .unwrap_or(scores.len())
}

/// Drop every recorded score for one pack.
pub fn delete_pack_scores(conn: &Connection, user_id: &str, pack_id: &str) -> Result<()> {
  conn.execute(
    "DELETE FROM match_scores WHERE user_id = ?1 AND pack_id = ?2",
    params![user_id, pack_id],
  )?;
  Ok(())
}
