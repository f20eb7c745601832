//! Spaced-repetition review scheduler and cross-device progress
//! reconciler for the study client.
//!
//! Library only: the host UI drives it through [`scheduler::StudyScheduler`]
//! with an explicit [`domain::StudyContext`], and supplies the remote
//! snapshot store behind [`sync::RemoteStore`].

pub mod cache;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod scheduler;
pub mod srs;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
