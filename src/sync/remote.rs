//! Contract with the remote progress store.
//!
//! The server is a passive snapshot store, not a conflict arbiter: the
//! core pulls a snapshot, merges it locally, and pushes its own state
//! back. The wire format behind this trait is the collaborator's
//! concern.

use async_trait::async_trait;

use crate::domain::ProgressSnapshot;

/// Error from a pull or push attempt. Always treated as transient: the
/// reconciler logs it and moves on, it never surfaces as fatal.
#[derive(Debug, Clone)]
pub struct RemoteError {
  message: String,
}

impl RemoteError {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

impl std::fmt::Display for RemoteError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl std::error::Error for RemoteError {}

/// The remote progress store the reconciler talks to.
#[async_trait]
pub trait RemoteStore: Send + Sync {
  /// Fetch the user's remote snapshot. Idempotent and side-effect-free;
  /// `Ok(None)` when the user has never synced.
  async fn pull(&self, user_id: &str) -> Result<Option<ProgressSnapshot>, RemoteError>;

  /// Persist a snapshot fragment. `snapshot.card_states` carries either
  /// one pack or all packs depending on the push scope.
  async fn push(&self, user_id: &str, snapshot: ProgressSnapshot) -> Result<(), RemoteError>;
}

/// How much card state an outgoing push carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushScope {
  /// Fast path: only the pack currently being studied.
  Pack(String),
  /// Everything, used after bulk changes such as pack deletion.
  AllPacks,
}

impl PushScope {
  /// Coalesce two queued scopes: pushes for two different packs widen
  /// to all packs so neither mutation is dropped.
  pub fn merge(self, other: PushScope) -> PushScope {
    match (self, other) {
      (PushScope::Pack(a), PushScope::Pack(b)) if a == b => PushScope::Pack(a),
      _ => PushScope::AllPacks,
    }
  }
}
