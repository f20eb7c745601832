//! Core data model for the review scheduler.

pub mod algorithm;
pub mod card_state;
pub mod progress;
pub mod session;

pub use algorithm::{CardBucket, SessionAlgorithm};
pub use card_state::{CardState, Difficulty, MasteryLevel, flashcard_id, question_id};
pub use progress::{PackCardStates, ProgressSnapshot, StreakData, clamp_daily_goal};
pub use session::StudyContext;
