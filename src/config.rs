//! Scheduler configuration constants.
//!
//! This module centralizes all tunable values so the review scheduler,
//! queue builder, and reconciler never carry magic numbers inline.

// ==================== Spaced Repetition ====================

/// Shortest review interval the scheduler will ever produce, in days.
pub const MIN_INTERVAL_DAYS: u32 = 1;

/// Longest review interval the scheduler will ever produce, in days.
pub const MAX_INTERVAL_DAYS: u32 = 120;

/// Interval growth multiplier for cards marked Easy.
pub const EASY_MULTIPLIER: f64 = 2.4;

/// Interval growth multiplier for cards marked Medium.
pub const MEDIUM_MULTIPLIER: f64 = 2.0;

/// Interval growth multiplier for cards marked Hard.
pub const HARD_MULTIPLIER: f64 = 1.45;

/// Shrink factor applied to the current interval on a wrong answer.
pub const WRONG_SHRINK_FACTOR: f64 = 0.45;

/// Interval at which a card counts as mastered, in days.
pub const MASTERY_THRESHOLD_DAYS: u32 = 14;

// ==================== Daily Goal ====================

/// Daily goal used when the user never set one.
pub const DEFAULT_DAILY_GOAL: u32 = 20;

/// Lower bound for a user-set daily goal.
pub const MIN_DAILY_GOAL: u32 = 1;

/// Upper bound for a user-set daily goal.
pub const MAX_DAILY_GOAL: u32 = 500;

// ==================== Sync ====================

/// Debounce window between the last local mutation and the outgoing push.
pub const SYNC_DEBOUNCE_MS: u64 = 700;

// ==================== Match Mode ====================

/// Number of fastest match times kept per pack.
pub const MATCH_SCORE_LIMIT: usize = 10;
