//! The study scheduler service.
//!
//! Front door for the host UI: card grading and viewing, difficulty
//! edits, streak and daily-goal accounting, session queue construction,
//! and pack cache hygiene. Every mutation is applied to the local cache
//! synchronously, in event order, and then queues a debounced remote
//! sync through the reconciler.
//!
//! The public API never fails: a broken cache read degrades to a
//! default value with a warning, per the no-fatal-errors contract of
//! this core.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::cache::{self, CachePool, LogOnError};
use crate::calendar;
use crate::config;
use crate::domain::{
  CardState, Difficulty, MasteryLevel, PackCardStates, ProgressSnapshot, SessionAlgorithm,
  StreakData, StudyContext,
};
use crate::srs::{self, MasterySummary};
use crate::sync::reconciler::{self, Reconciler};
use crate::sync::{PushScope, RemoteStore};

pub struct StudyScheduler<R: RemoteStore + 'static> {
  pool: CachePool,
  reconciler: Reconciler<R>,
}

impl<R: RemoteStore + 'static> StudyScheduler<R> {
  pub fn new(pool: CachePool, remote: R) -> Self {
    let reconciler = Reconciler::new(pool.clone(), remote);
    Self { pool, reconciler }
  }

  pub fn reconciler(&self) -> &Reconciler<R> {
    &self.reconciler
  }

  /// Run a cache operation, degrading to the default on any failure.
  fn with_cache<T: Default>(
    &self,
    context: &str,
    op: impl FnOnce(&Connection) -> rusqlite::Result<T>,
  ) -> T {
    cache::try_lock(&self.pool)
      .map_err(|e| e.to_string())
      .and_then(|conn| op(&conn).map_err(|e| e.to_string()))
      .log_warn_default(context)
  }

  // ==================== Calendar ====================

  /// Today's calendar date in the user's configured timezone (or the
  /// environment default when none is set).
  pub fn today(&self, user_id: &str) -> NaiveDate {
    calendar::today_in(&self.timezone(user_id))
  }

  /// The user's stored timezone name, empty when none is known.
  pub fn timezone(&self, user_id: &str) -> String {
    self.with_cache("Could not read timezone", |conn| {
      cache::settings::timezone(conn, user_id)
    })
  }

  /// Store the device timezone. An unknown zone name is ignored; the
  /// scheduler keeps using the environment default.
  pub fn set_timezone(&self, user_id: &str, tz_name: &str) {
    if calendar::resolve_timezone(tz_name).is_none() {
      tracing::warn!("Ignoring unknown timezone {:?}", tz_name);
      return;
    }
    self.with_cache("Could not store timezone", |conn| {
      cache::settings::set_timezone(conn, user_id, tz_name.trim())
    });
  }

  // ==================== Card mutations ====================

  /// Grade a card. Updates counters, reschedules the next review via
  /// the interval calculator, recomputes the mastery level, records
  /// daily activity, and queues a pack-scoped sync.
  pub fn mark_reviewed(&self, ctx: &StudyContext, card_id: &str, correct: bool) -> CardState {
    let today = self.today(&ctx.user_id);
    let state = self.with_cache("Could not record card review", |conn| {
      Self::apply_review(conn, ctx, card_id, correct, today)
    });
    self
      .reconciler
      .queue_push(&ctx.user_id, PushScope::Pack(ctx.pack_id.clone()));
    state
  }

  /// Flip a card without grading it. Counts an exposure and an activity
  /// but leaves the review schedule alone; a new card becomes familiar,
  /// a mastered card stays mastered.
  pub fn mark_viewed(&self, ctx: &StudyContext, card_id: &str) -> CardState {
    let today = self.today(&ctx.user_id);
    let state = self.with_cache("Could not record card view", |conn| {
      Self::apply_view(conn, ctx, card_id, today)
    });
    self
      .reconciler
      .queue_push(&ctx.user_id, PushScope::Pack(ctx.pack_id.clone()));
    state
  }

  /// Set a card's difficulty. Pure metadata: counters and the review
  /// schedule are untouched, and no activity is recorded.
  pub fn set_difficulty(
    &self,
    ctx: &StudyContext,
    card_id: &str,
    difficulty: Difficulty,
  ) -> CardState {
    let state = self.with_cache("Could not set card difficulty", |conn| {
      let mut entry =
        cache::card_states::load_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id)?
          .unwrap_or_default();
      entry.difficulty = difficulty;
      cache::card_states::save_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id, &entry)?;
      Ok(entry)
    });
    self
      .reconciler
      .queue_push(&ctx.user_id, PushScope::Pack(ctx.pack_id.clone()));
    state
  }

  fn apply_review(
    conn: &Connection,
    ctx: &StudyContext,
    card_id: &str,
    correct: bool,
    today: NaiveDate,
  ) -> rusqlite::Result<CardState> {
    let mut entry = cache::card_states::load_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id)?
      .unwrap_or_default();
    entry.seen += 1;
    if correct {
      entry.correct += 1;
    } else {
      entry.wrong += 1;
    }
    entry.interval_days = srs::next_interval(entry.interval_days, correct, entry.difficulty);
    entry.last_review_date = Some(today);
    entry.next_review_date = Some(calendar::add_days(today, entry.interval_days as i64));
    entry.level = MasteryLevel::from_history(entry.seen, entry.interval_days);
    cache::card_states::save_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id, &entry)?;
    Self::record_streak(conn, &ctx.user_id, today)?;
    Ok(entry)
  }

  fn apply_view(
    conn: &Connection,
    ctx: &StudyContext,
    card_id: &str,
    today: NaiveDate,
  ) -> rusqlite::Result<CardState> {
    let mut entry = cache::card_states::load_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id)?
      .unwrap_or_default();
    entry.seen += 1;
    entry.last_review_date = Some(today);
    if entry.level != MasteryLevel::Mastered {
      entry.level = MasteryLevel::Familiar;
    }
    cache::card_states::save_card_state(conn, &ctx.user_id, &ctx.pack_id, card_id, &entry)?;
    Self::record_streak(conn, &ctx.user_id, today)?;
    Ok(entry)
  }

  fn record_streak(
    conn: &Connection,
    user_id: &str,
    today: NaiveDate,
  ) -> rusqlite::Result<StreakData> {
    let updated = srs::record_activity(&cache::settings::streak_data(conn, user_id)?, today);
    cache::settings::set_streak_data(conn, user_id, &updated)?;
    Ok(updated)
  }

  // ==================== Streak & daily goal ====================

  /// Record one gradable interaction outside the card store (e.g. a
  /// pair found in match mode) and queue a pack-scoped sync.
  pub fn record_activity(&self, ctx: &StudyContext) -> StreakData {
    let today = self.today(&ctx.user_id);
    let data = self.with_cache("Could not record study activity", |conn| {
      Self::record_streak(conn, &ctx.user_id, today)
    });
    self
      .reconciler
      .queue_push(&ctx.user_id, PushScope::Pack(ctx.pack_id.clone()));
    data
  }

  pub fn streak(&self, user_id: &str) -> StreakData {
    self.with_cache("Could not read streak data", |conn| {
      cache::settings::streak_data(conn, user_id)
    })
  }

  /// Today's gradable-interaction count; zero once the calendar day
  /// rolls over.
  pub fn daily_progress(&self, user_id: &str) -> u32 {
    let data = self.streak(user_id);
    if data.daily_progress_date == Some(self.today(user_id)) {
      data.daily_progress_count
    } else {
      0
    }
  }

  pub fn daily_goal(&self, user_id: &str) -> u32 {
    cache::try_lock(&self.pool)
      .map_err(|e| e.to_string())
      .and_then(|conn| cache::settings::daily_goal(&conn, user_id).map_err(|e| e.to_string()))
      .log_warn("Could not read daily goal")
      .unwrap_or(config::DEFAULT_DAILY_GOAL)
  }

  /// Update the daily goal. Non-positive input is ignored; valid input
  /// is clamped and queued for an all-packs sync.
  pub fn set_daily_goal(&self, user_id: &str, goal: u32) {
    if goal == 0 {
      tracing::warn!("Ignoring non-positive daily goal");
      return;
    }
    self.with_cache("Could not store daily goal", |conn| {
      cache::settings::set_daily_goal(conn, user_id, goal)
    });
    self.reconciler.queue_push(user_id, PushScope::AllPacks);
  }

  // ==================== Session algorithm & queue ====================

  pub fn session_algorithm(&self, user_id: &str) -> SessionAlgorithm {
    self.with_cache("Could not read session algorithm", |conn| {
      cache::settings::session_algorithm(conn, user_id)
    })
  }

  /// Persist the user's session algorithm (device-local, not synced).
  pub fn set_session_algorithm(&self, user_id: &str, algo: &SessionAlgorithm) {
    self.with_cache("Could not store session algorithm", |conn| {
      cache::settings::set_session_algorithm(conn, user_id, algo)
    });
  }

  /// Build the review-session queue for a pack of `card_count`
  /// flashcards using the persisted session algorithm. Returns original
  /// card indices in play order, each exactly once.
  pub fn build_queue(&self, ctx: &StudyContext, card_count: usize) -> Vec<usize> {
    let today = self.today(&ctx.user_id);
    let algo = self.session_algorithm(&ctx.user_id);
    let states = self.pack_states(ctx);
    srs::order_cards(card_count, &states, &algo, today)
  }

  // ==================== Derived stats ====================

  fn pack_states(&self, ctx: &StudyContext) -> PackCardStates {
    self.with_cache("Could not load pack card states", |conn| {
      cache::card_states::load_pack_states(conn, &ctx.user_id, &ctx.pack_id)
    })
  }

  /// Number of studied flashcards due in this pack.
  pub fn due_count(&self, ctx: &StudyContext) -> usize {
    srs::count_due_cards(&self.pack_states(ctx), self.today(&ctx.user_id))
  }

  /// Number of studied flashcards due across every cached pack.
  pub fn total_due(&self, user_id: &str) -> usize {
    let today = self.today(user_id);
    self
      .with_cache("Could not load cached packs", |conn| {
        cache::card_states::load_all_pack_states(conn, user_id)
      })
      .values()
      .map(|states| srs::count_due_cards(states, today))
      .sum()
  }

  /// Per-level flashcard counts for a pack of `card_count` cards.
  pub fn mastery_summary(&self, ctx: &StudyContext, card_count: usize) -> MasterySummary {
    srs::mastery_summary(card_count, &self.pack_states(ctx))
  }

  // ==================== Match scores ====================

  /// Record a match completion time; returns the updated leaderboard
  /// and the 1-based rank of this time on it.
  pub fn record_match_score(&self, ctx: &StudyContext, time_ms: i64) -> (Vec<i64>, usize) {
    let scores = self.with_cache("Could not record match score", |conn| {
      cache::match_scores::record_score(conn, &ctx.user_id, &ctx.pack_id, time_ms)
    });
    let rank = cache::match_scores::score_rank(&scores, time_ms);
    (scores, rank)
  }

  pub fn match_scores(&self, ctx: &StudyContext) -> Vec<i64> {
    self.with_cache("Could not load match scores", |conn| {
      cache::match_scores::top_scores(conn, &ctx.user_id, &ctx.pack_id)
    })
  }

  // ==================== Pack hygiene ====================

  /// Purge a deleted pack's cached state and scores, then queue an
  /// all-packs push so the remote snapshot drops the pack too.
  pub fn remove_pack(&self, ctx: &StudyContext) {
    self.with_cache("Could not purge pack caches", |conn| {
      cache::card_states::delete_pack_states(conn, &ctx.user_id, &ctx.pack_id)?;
      cache::match_scores::delete_pack_scores(conn, &ctx.user_id, &ctx.pack_id)
    });
    self.reconciler.queue_push(&ctx.user_id, PushScope::AllPacks);
  }

  /// Prune cached state for packs no longer in the catalog. Returns the
  /// purged pack ids.
  pub fn retain_packs(&self, user_id: &str, known: &[String]) -> Vec<String> {
    self.with_cache("Could not prune pack caches", |conn| {
      let removed = cache::card_states::retain_packs(conn, user_id, known)?;
      for pack_id in &removed {
        cache::match_scores::delete_pack_scores(conn, user_id, pack_id)?;
      }
      Ok(removed)
    })
  }

  // ==================== Sync ====================

  /// Pull the remote snapshot and merge it (sign-in, app foreground).
  pub async fn hydrate(&self, user_id: &str) -> bool {
    self.reconciler.pull_and_merge(user_id).await
  }

  /// Queue an explicit full reconciliation (all packs).
  pub fn request_sync(&self, user_id: &str) {
    self.reconciler.queue_push(user_id, PushScope::AllPacks);
  }

  /// The complete local progress snapshot, as a push would send it.
  pub fn snapshot(&self, user_id: &str) -> ProgressSnapshot {
    cache::try_lock(&self.pool)
      .map_err(|e| e.to_string())
      .and_then(|conn| {
        reconciler::local_snapshot(&conn, user_id, &PushScope::AllPacks).map_err(|e| e.to_string())
      })
      .log_warn("Could not assemble local snapshot")
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::flashcard_id;
  use crate::testing::{ScriptedRemote, TestEnv};
  use std::time::Duration;

  fn scheduler(env: &TestEnv) -> StudyScheduler<ScriptedRemote> {
    let scheduler = StudyScheduler::new(env.pool.clone(), ScriptedRemote::new());
    scheduler.set_timezone("u1", "UTC");
    scheduler
  }

  fn ctx() -> StudyContext {
    StudyContext::new("u1", "pack-1")
  }

  #[test]
  fn test_first_correct_review_schedules_tomorrow() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let today = scheduler.today("u1");

    let state = scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);
    assert_eq!(state.seen, 1);
    assert_eq!(state.correct, 1);
    assert_eq!(state.wrong, 0);
    assert_eq!(state.interval_days, 1);
    assert_eq!(state.level, MasteryLevel::Familiar);
    assert_eq!(state.last_review_date, Some(today));
    assert_eq!(state.next_review_date, Some(calendar::add_days(today, 1)));
  }

  #[test]
  fn test_interval_progression_over_repeated_reviews() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(3);

    let mut intervals = Vec::new();
    for _ in 0..3 {
      intervals.push(scheduler.mark_reviewed(&ctx, &id, true).interval_days);
    }
    assert_eq!(intervals, vec![1, 2, 4]);
  }

  #[test]
  fn test_mastery_reached_and_lost() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(0);

    let mut state = CardState::default();
    for _ in 0..6 {
      state = scheduler.mark_reviewed(&ctx, &id, true);
    }
    // 1 -> 2 -> 4 -> 8 -> 16 -> 32
    assert!(state.interval_days >= config::MASTERY_THRESHOLD_DAYS);
    assert_eq!(state.level, MasteryLevel::Mastered);

    // A failing review shrinks the interval back below the threshold.
    let failed = scheduler.mark_reviewed(&ctx, &id, false);
    assert!(failed.interval_days < state.interval_days);
    assert!(failed.interval_days < config::MASTERY_THRESHOLD_DAYS);
    assert_eq!(failed.level, MasteryLevel::Familiar);
  }

  #[test]
  fn test_mark_viewed_counts_exposure_without_scheduling() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(1);

    let state = scheduler.mark_viewed(&ctx, &id);
    assert_eq!(state.seen, 1);
    assert_eq!(state.correct, 0);
    assert_eq!(state.level, MasteryLevel::Familiar);
    assert_eq!(state.interval_days, 0);
    assert!(state.next_review_date.is_none());
  }

  #[test]
  fn test_mark_viewed_never_downgrades_mastered() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(0);

    for _ in 0..6 {
      scheduler.mark_reviewed(&ctx, &id, true);
    }
    let state = scheduler.mark_viewed(&ctx, &id);
    assert_eq!(state.level, MasteryLevel::Mastered);
  }

  #[test]
  fn test_set_difficulty_is_pure_metadata() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(2);

    scheduler.mark_reviewed(&ctx, &id, true);
    let before_streak = scheduler.streak("u1");
    let state = scheduler.set_difficulty(&ctx, &id, Difficulty::Hard);

    assert_eq!(state.difficulty, Difficulty::Hard);
    assert_eq!(state.seen, 1);
    assert_eq!(state.interval_days, 1);
    // No activity recorded for a difficulty edit.
    assert_eq!(scheduler.streak("u1"), before_streak);
  }

  #[test]
  fn test_difficulty_feeds_interval_growth() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();
    let id = flashcard_id(0);

    scheduler.set_difficulty(&ctx, &id, Difficulty::Easy);
    let state = scheduler.mark_reviewed(&ctx, &id, true);
    // First successful review of an easy card jumps to two days.
    assert_eq!(state.interval_days, 2);
  }

  #[test]
  fn test_activity_and_daily_progress() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    assert_eq!(scheduler.daily_progress("u1"), 0);
    scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);
    scheduler.record_activity(&ctx);
    assert_eq!(scheduler.daily_progress("u1"), 2);
    assert_eq!(scheduler.streak("u1").current_streak, 1);
  }

  #[test]
  fn test_daily_goal_rules() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);

    assert_eq!(scheduler.daily_goal("u1"), config::DEFAULT_DAILY_GOAL);
    scheduler.set_daily_goal("u1", 50);
    assert_eq!(scheduler.daily_goal("u1"), 50);
    scheduler.set_daily_goal("u1", 0);
    assert_eq!(scheduler.daily_goal("u1"), 50);
    scheduler.set_daily_goal("u1", 99_999);
    assert_eq!(scheduler.daily_goal("u1"), config::MAX_DAILY_GOAL);
  }

  #[test]
  fn test_build_queue_uses_persisted_algorithm() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    scheduler.set_session_algorithm("u1", &SessionAlgorithm::from_preset("hardfirst").unwrap());
    scheduler.set_difficulty(&ctx, &flashcard_id(6), Difficulty::Hard);

    let queue = scheduler.build_queue(&ctx, 10);
    assert_eq!(queue.len(), 10);
    // The only hard card fills the first hard slot.
    assert_eq!(queue[0], 6);
  }

  #[test]
  fn test_due_counts() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);
    // Reviewed today, due tomorrow: not due now.
    assert_eq!(scheduler.due_count(&ctx), 0);

    let other = StudyContext::new("u1", "pack-2");
    scheduler.mark_viewed(&other, &flashcard_id(0));
    // Viewed but never scheduled: due immediately.
    assert_eq!(scheduler.due_count(&other), 1);
    assert_eq!(scheduler.total_due("u1"), 1);
  }

  #[test]
  fn test_mastery_summary_counts() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);
    let summary = scheduler.mastery_summary(&ctx, 4);
    assert_eq!(summary.new, 3);
    assert_eq!(summary.familiar, 1);
    assert_eq!(summary.mastered, 0);
  }

  #[test]
  fn test_match_score_flow() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    let (scores, rank) = scheduler.record_match_score(&ctx, 42_000);
    assert_eq!(scores, vec![42_000]);
    assert_eq!(rank, 1);
    let (scores, rank) = scheduler.record_match_score(&ctx, 31_000);
    assert_eq!(scores, vec![31_000, 42_000]);
    assert_eq!(rank, 1);
    assert_eq!(scheduler.match_scores(&ctx), vec![31_000, 42_000]);
  }

  #[test]
  fn test_retain_packs_prunes_unknown() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);

    scheduler.mark_viewed(&StudyContext::new("u1", "kept"), &flashcard_id(0));
    scheduler.mark_viewed(&StudyContext::new("u1", "gone"), &flashcard_id(0));

    let removed = scheduler.retain_packs("u1", &["kept".to_string()]);
    assert_eq!(removed, vec!["gone"]);
    let snapshot = scheduler.snapshot("u1");
    assert!(snapshot.card_states.contains_key("kept"));
    assert!(!snapshot.card_states.contains_key("gone"));
  }

  #[test]
  fn test_snapshot_assembles_full_state() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    scheduler.set_daily_goal("u1", 35);
    scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);

    let snapshot = scheduler.snapshot("u1");
    assert_eq!(snapshot.daily_goal, 35);
    assert_eq!(snapshot.timezone, "UTC");
    assert_eq!(snapshot.streak_data.current_streak, 1);
    assert_eq!(snapshot.card_states["pack-1"][&flashcard_id(0)].seen, 1);
  }

  #[test]
  fn test_unknown_timezone_is_ignored() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    scheduler.set_timezone("u1", "Atlantis/Sunken_City");
    assert_eq!(scheduler.timezone("u1"), "UTC");
  }

  #[tokio::test(start_paused = true)]
  async fn test_grading_queues_pack_scoped_push() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);
    let ctx = ctx();

    scheduler.mark_reviewed(&ctx, &flashcard_id(0), true);
    tokio::time::sleep(Duration::from_secs(1)).await;

    let pushes = scheduler.reconciler().remote().pushes();
    assert_eq!(pushes.len(), 1);
    let (user, snapshot) = &pushes[0];
    assert_eq!(user, "u1");
    assert_eq!(snapshot.card_states.len(), 1);
    assert!(snapshot.card_states.contains_key("pack-1"));
    assert_eq!(snapshot.streak_data.daily_progress_count, 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_remove_pack_pushes_remaining_packs() {
    let env = TestEnv::new().unwrap();
    let scheduler = scheduler(&env);

    scheduler.mark_viewed(&StudyContext::new("u1", "pack-1"), &flashcard_id(0));
    scheduler.mark_viewed(&StudyContext::new("u1", "pack-2"), &flashcard_id(0));
    tokio::time::sleep(Duration::from_secs(1)).await;

    scheduler.remove_pack(&StudyContext::new("u1", "pack-2"));
    tokio::time::sleep(Duration::from_secs(1)).await;

    let pushes = scheduler.reconciler().remote().pushes();
    let last = &pushes.last().unwrap().1;
    assert!(last.card_states.contains_key("pack-1"));
    assert!(!last.card_states.contains_key("pack-2"));
    assert_eq!(scheduler.due_count(&StudyContext::new("u1", "pack-2")), 0);
  }

  #[tokio::test]
  async fn test_hydrate_merges_remote_snapshot() {
    let env = TestEnv::new().unwrap();
    let remote = ScriptedRemote::new();
    let mut snapshot = ProgressSnapshot { daily_goal: 44, ..Default::default() };
    snapshot
      .card_states
      .entry("pack-7".to_string())
      .or_default()
      .insert(flashcard_id(0), CardState { seen: 2, ..Default::default() });
    remote.set_pull_response(Some(snapshot));

    let scheduler = StudyScheduler::new(env.pool.clone(), remote);
    assert!(scheduler.hydrate("u1").await);
    assert_eq!(scheduler.daily_goal("u1"), 44);
    assert_eq!(scheduler.snapshot("u1").card_states["pack-7"][&flashcard_id(0)].seen, 2);
  }
}
