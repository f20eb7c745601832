//! Merge and sync engine.
//!
//! Pulls the remote snapshot on session start and merges it into the
//! local cache under field-level precedence rules (remote never blindly
//! overwrites local). Pushes local changes back after a debounce window,
//! coalescing bursts of mutations into one request and never running two
//! pushes at once: a mutation arriving mid-push re-arms the debounce
//! once the in-flight push completes.
//!
//! Per user session the push side walks
//! `Idle -> Pending -> InFlight -> (InFlightQueued -> Pending)* -> Idle`.
//! A failed push is logged and abandoned; the next mutation's debounce
//! cycle carries the latest state, so nothing is lost, only delayed.

use rusqlite::{Connection, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::{self, CachePool, LogOnError};
use crate::calendar;
use crate::config;
use crate::domain::ProgressSnapshot;
use crate::sync::remote::{PushScope, RemoteStore};

/// Push state for one user session.
#[derive(Debug, Clone, PartialEq)]
enum SyncState {
  Idle,
  /// Debounce timer armed; `generation` invalidates stale timers when
  /// the window is re-armed by a newer mutation.
  Pending { generation: u64, scope: PushScope },
  InFlight,
  /// A mutation arrived while a push was in flight; re-arm afterwards.
  InFlightQueued { scope: PushScope },
}

struct Inner<R: RemoteStore> {
  pool: CachePool,
  remote: R,
  sessions: Mutex<HashMap<String, SyncState>>,
  generation: AtomicU64,
  debounce: Duration,
}

/// Cheaply cloneable handle to the merge/sync engine.
pub struct Reconciler<R: RemoteStore> {
  inner: Arc<Inner<R>>,
}

impl<R: RemoteStore> Clone for Reconciler<R> {
  fn clone(&self) -> Self {
    Self { inner: Arc::clone(&self.inner) }
  }
}

impl<R: RemoteStore + 'static> Reconciler<R> {
  pub fn new(pool: CachePool, remote: R) -> Self {
    Self {
      inner: Arc::new(Inner {
        pool,
        remote,
        sessions: Mutex::new(HashMap::new()),
        generation: AtomicU64::new(0),
        debounce: Duration::from_millis(config::SYNC_DEBOUNCE_MS),
      }),
    }
  }

  /// The remote store this reconciler pushes to.
  pub fn remote(&self) -> &R {
    &self.inner.remote
  }

  /// Fetch the remote snapshot and merge it into the local cache.
  /// Returns whether a snapshot was applied. A failed pull leaves local
  /// state as the sole source of truth for this session.
  pub async fn pull_and_merge(&self, user_id: &str) -> bool {
    let snapshot = match self.inner.remote.pull(user_id).await {
      Ok(Some(snapshot)) => snapshot,
      Ok(None) => {
        tracing::debug!("No remote progress snapshot for {}", user_id);
        return false;
      }
      Err(e) => {
        tracing::warn!("Could not load remote study progress: {}", e);
        return false;
      }
    };

    let merged = cache::try_lock(&self.inner.pool)
      .map_err(|e| e.to_string())
      .and_then(|conn| merge_snapshot(&conn, user_id, &snapshot).map_err(|e| e.to_string()));
    match merged {
      Ok(()) => true,
      Err(e) => {
        tracing::warn!("Could not merge remote study progress: {}", e);
        false
      }
    }
  }

  /// Request a push of local state. Debounced: the push goes out
  /// `SYNC_DEBOUNCE_MS` after the *last* request, with scopes coalesced.
  pub fn queue_push(&self, user_id: &str, scope: PushScope) {
    let rearmed = {
      let mut sessions = self.inner.sessions.lock().unwrap_or_else(|e| e.into_inner());
      let entry = sessions.entry(user_id.to_string()).or_insert(SyncState::Idle);
      match entry.clone() {
        SyncState::Idle => {
          let generation = self.inner.next_generation();
          *entry = SyncState::Pending { generation, scope };
          Some(generation)
        }
        SyncState::Pending { scope: prev, .. } => {
          let generation = self.inner.next_generation();
          *entry = SyncState::Pending { generation, scope: prev.merge(scope) };
          Some(generation)
        }
        SyncState::InFlight => {
          *entry = SyncState::InFlightQueued { scope };
          None
        }
        SyncState::InFlightQueued { scope: prev } => {
          *entry = SyncState::InFlightQueued { scope: prev.merge(scope) };
          None
        }
      }
    };
    if let Some(generation) = rearmed {
      Inner::spawn_debounce(&self.inner, user_id.to_string(), generation);
    }
  }
}

impl<R: RemoteStore + 'static> Inner<R> {
  fn next_generation(&self) -> u64 {
    self.generation.fetch_add(1, Ordering::Relaxed) + 1
  }

  fn spawn_debounce(inner: &Arc<Self>, user_id: String, generation: u64) {
    let inner = Arc::clone(inner);
    match tokio::runtime::Handle::try_current() {
      Ok(handle) => {
        handle.spawn(async move {
          Inner::debounce_then_flush(inner, user_id, generation).await;
        });
      }
      // Without a runtime the push is skipped, never an error: the next
      // mutation re-attempts with the latest state.
      Err(_) => tracing::warn!("Progress sync skipped: no async runtime"),
    }
  }

  async fn debounce_then_flush(inner: Arc<Self>, user_id: String, generation: u64) {
    tokio::time::sleep(inner.debounce).await;

    // Only the newest timer for this session may fire; anything else
    // was superseded by a later mutation.
    let scope = {
      let mut sessions = inner.sessions.lock().unwrap_or_else(|e| e.into_inner());
      match sessions.get(&user_id).cloned() {
        Some(SyncState::Pending { generation: current, scope }) if current == generation => {
          sessions.insert(user_id.clone(), SyncState::InFlight);
          scope
        }
        _ => return,
      }
    };

    let snapshot = cache::try_lock(&inner.pool)
      .map_err(|e| e.to_string())
      .and_then(|conn| local_snapshot(&conn, &user_id, &scope).map_err(|e| e.to_string()))
      .log_warn("Could not read local progress snapshot");

    if let Some(snapshot) = snapshot {
      tracing::debug!("Pushing study progress for {}", user_id);
      if let Err(e) = inner.remote.push(&user_id, snapshot).await {
        tracing::warn!("Could not sync study progress: {}", e);
      }
    }

    let rearmed = {
      let mut sessions = inner.sessions.lock().unwrap_or_else(|e| e.into_inner());
      match sessions.get(&user_id).cloned() {
        Some(SyncState::InFlightQueued { scope }) => {
          let generation = inner.next_generation();
          sessions.insert(user_id.clone(), SyncState::Pending { generation, scope });
          Some(generation)
        }
        _ => {
          sessions.insert(user_id.clone(), SyncState::Idle);
          None
        }
      }
    };
    if let Some(generation) = rearmed {
      Inner::spawn_debounce(&inner, user_id, generation);
    }
  }
}

/// Apply a pulled remote snapshot to the local cache under the merge
/// precedence rules. Applying the same snapshot twice is a no-op the
/// second time.
pub(crate) fn merge_snapshot(
  conn: &Connection,
  user_id: &str,
  remote: &ProgressSnapshot,
) -> Result<()> {
  // Timezone: adopt only a name that actually resolves.
  if calendar::resolve_timezone(&remote.timezone).is_some() {
    cache::settings::set_timezone(conn, user_id, remote.timezone.trim())?;
  }

  // Daily goal: adopt when present and positive (clamped on write).
  if remote.daily_goal > 0 {
    cache::settings::set_daily_goal(conn, user_id, remote.daily_goal)?;
  }

  // Streak: adopt wholesale only when local has never studied, or the
  // remote's daily progress is at least as far along. The remote must
  // not regress a more advanced local state.
  let local_streak = cache::settings::streak_data(conn, user_id)?;
  let remote_streak = &remote.streak_data;
  let adopt_streak = local_streak.last_study_date.is_none()
    || (remote_streak.daily_progress_date.is_some()
      && remote_streak.daily_progress_date >= local_streak.daily_progress_date
      && remote_streak.daily_progress_count >= local_streak.daily_progress_count);
  if adopt_streak {
    cache::settings::set_streak_data(conn, user_id, remote_streak)?;
  }

  // Card states: per pack, remote only fills a blank local cache. Once
  // this device has any state for a pack, local is authoritative and a
  // stale remote read must not clobber in-progress edits.
  for (pack_id, remote_states) in &remote.card_states {
    if pack_id.is_empty() || remote_states.is_empty() {
      continue;
    }
    let local_states = cache::card_states::load_pack_states(conn, user_id, pack_id)?;
    if local_states.is_empty() {
      cache::card_states::replace_pack_states(conn, user_id, pack_id, remote_states)?;
    }
  }

  Ok(())
}

/// Assemble the outgoing snapshot from the local cache. Packs with no
/// remaining readable state are omitted rather than pushed as empty.
pub(crate) fn local_snapshot(
  conn: &Connection,
  user_id: &str,
  scope: &PushScope,
) -> Result<ProgressSnapshot> {
  let mut snapshot = ProgressSnapshot {
    daily_goal: cache::settings::daily_goal(conn, user_id)?,
    streak_data: cache::settings::streak_data(conn, user_id)?,
    timezone: cache::settings::timezone(conn, user_id)?,
    card_states: HashMap::new(),
  };

  match scope {
    PushScope::AllPacks => {
      snapshot.card_states = cache::card_states::load_all_pack_states(conn, user_id)?;
    }
    PushScope::Pack(pack_id) => {
      let states = cache::card_states::load_pack_states(conn, user_id, pack_id)?;
      if !states.is_empty() {
        snapshot.card_states.insert(pack_id.clone(), states);
      }
    }
  }

  Ok(snapshot)
}
