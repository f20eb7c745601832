//! Cross-device progress reconciliation: the remote snapshot contract,
//! pull-merge precedence rules, and the debounced single-flight push.

pub mod reconciler;
pub mod remote;

pub use reconciler::Reconciler;
pub use remote::{PushScope, RemoteError, RemoteStore};
