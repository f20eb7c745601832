//! Test utilities: a tempdir-backed cache environment and a scripted
//! remote store that records what the reconciler sends it.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::Connection;
use tempfile::TempDir;

use crate::cache::{self, CachePool};
use crate::domain::ProgressSnapshot;
use crate::sync::{RemoteError, RemoteStore};

/// Test environment with a real cache database in a temporary
/// directory, initialized through the authoritative migrations.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence).
  pub temp: TempDir,
  /// Cache pool backed by the temporary database.
  pub pool: CachePool,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let pool = cache::open_cache(&temp.path().join("progress.db"))?;
    Ok(Self { temp, pool })
  }

  /// Lock and return the cache connection.
  pub fn conn(&self) -> MutexGuard<'_, Connection> {
    cache::try_lock(&self.pool).expect("cache lock")
  }
}

/// Scripted [`RemoteStore`]: serves a configurable pull response,
/// records every successful push, and can simulate latency and
/// failures. Counters expose what the reconciler actually did.
#[derive(Default)]
pub struct ScriptedRemote {
  pull_response: Mutex<Option<ProgressSnapshot>>,
  pushes: Mutex<Vec<(String, ProgressSnapshot)>>,
  push_delay: Mutex<Duration>,
  fail_pulls: AtomicBool,
  fail_pushes: AtomicBool,
  push_attempts: AtomicUsize,
  active_pushes: AtomicUsize,
  max_concurrent: AtomicUsize,
}

impl ScriptedRemote {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot the next pull should return (`None` = first-use user).
  pub fn set_pull_response(&self, snapshot: Option<ProgressSnapshot>) {
    *self.pull_response.lock().unwrap() = snapshot;
  }

  pub fn fail_pulls(&self, fail: bool) {
    self.fail_pulls.store(fail, Ordering::SeqCst);
  }

  pub fn fail_pushes(&self, fail: bool) {
    self.fail_pushes.store(fail, Ordering::SeqCst);
  }

  /// Simulated latency for each push.
  pub fn set_push_delay(&self, delay: Duration) {
    *self.push_delay.lock().unwrap() = delay;
  }

  /// Successful pushes, oldest first.
  pub fn pushes(&self) -> Vec<(String, ProgressSnapshot)> {
    self.pushes.lock().unwrap().clone()
  }

  /// Pushes started, successful or not.
  pub fn push_attempts(&self) -> usize {
    self.push_attempts.load(Ordering::SeqCst)
  }

  /// Highest number of pushes ever in flight at once.
  pub fn max_concurrent_pushes(&self) -> usize {
    self.max_concurrent.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl RemoteStore for ScriptedRemote {
  async fn pull(&self, _user_id: &str) -> Result<Option<ProgressSnapshot>, RemoteError> {
    if self.fail_pulls.load(Ordering::SeqCst) {
      return Err(RemoteError::new("scripted pull failure"));
    }
    Ok(self.pull_response.lock().unwrap().clone())
  }

  async fn push(&self, user_id: &str, snapshot: ProgressSnapshot) -> Result<(), RemoteError> {
    self.push_attempts.fetch_add(1, Ordering::SeqCst);
    let active = self.active_pushes.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_concurrent.fetch_max(active, Ordering::SeqCst);

    let delay = *self.push_delay.lock().unwrap();
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
    self.active_pushes.fetch_sub(1, Ordering::SeqCst);

    if self.fail_pushes.load(Ordering::SeqCst) {
      return Err(RemoteError::new("scripted push failure"));
    }
    self.pushes.lock().unwrap().push((user_id.to_string(), snapshot));
    Ok(())
  }
}
