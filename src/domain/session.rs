//! Explicit study-session context.
//!
//! The scheduler has no ambient "current user" or "current pack": every
//! call that touches per-pack state receives this context.

/// Identifies whose progress and which pack a scheduler call operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyContext {
  /// Stable per-user identifier; namespaces the local cache and
  /// authorizes pull/push calls.
  pub user_id: String,
  /// The pack the current study session is working through.
  pub pack_id: String,
}

impl StudyContext {
  pub fn new(user_id: impl Into<String>, pack_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      pack_id: pack_id.into(),
    }
  }
}
