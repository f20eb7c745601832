use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS card_states (
      user_id TEXT NOT NULL,
      pack_id TEXT NOT NULL,
      card_id TEXT NOT NULL,
      state TEXT NOT NULL,
      PRIMARY KEY (user_id, pack_id, card_id)
    );

    CREATE TABLE IF NOT EXISTS user_settings (
      user_id TEXT NOT NULL,
      key TEXT NOT NULL,
      value TEXT NOT NULL,
      PRIMARY KEY (user_id, key)
    );

    CREATE TABLE IF NOT EXISTS match_scores (
      user_id TEXT NOT NULL,
      pack_id TEXT NOT NULL,
      time_ms INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_card_states_user_pack
      ON card_states(user_id, pack_id);
    CREATE INDEX IF NOT EXISTS idx_match_scores_user_pack
      ON match_scores(user_id, pack_id);
    "#,
  )?;
  Ok(())
}
