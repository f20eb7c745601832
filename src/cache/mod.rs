//! Device-local progress cache.
//!
//! A small SQLite database holding per-pack card states, per-user
//! settings, and match scores. Rows are namespaced by user id, mirroring
//! the per-user storage keys of the hosting client. The cache is the
//! device's source of truth; the remote snapshot is only ever merged in
//! through the reconciler.

pub mod card_states;
pub mod match_scores;
pub mod schema;
pub mod settings;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use schema::run_migrations;

/// Shared handle to the cache connection.
pub type CachePool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them.
pub trait LogOnError<T> {
  /// Log the error at warn level and return None.
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default.
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

/// Error returned when the cache lock cannot be acquired.
#[derive(Debug)]
pub struct CacheLockError;

impl std::fmt::Display for CacheLockError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Progress cache unavailable")
  }
}

impl std::error::Error for CacheLockError {}

/// Try to acquire the cache lock, returning an error if poisoned.
pub fn try_lock(pool: &CachePool) -> std::result::Result<MutexGuard<'_, Connection>, CacheLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Cache mutex poisoned - a thread panicked while holding the lock");
    CacheLockError
  })
}

/// Open (or create) the cache database at `path` and run migrations.
pub fn open_cache(path: &Path) -> Result<CachePool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }
  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}
