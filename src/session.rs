//! Transient attempt session tracker.
//!
//! Holds the in-progress attempts keyed by (user, quiz), independent of
//! durable storage. Sessions live from `open` until `take`/`close`; a process
//! restart loses them, which downstream surfaces as `NoActiveSession`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::error::AttemptError;

/// One in-progress attempt. Answers accumulate client-side and arrive only at
/// submission, so the tracker records just who, which quiz and since when.
#[derive(Clone, Debug)]
pub struct AttemptSession {
    pub user_id: i32,
    pub quiz_id: i32,
    pub started_at: DateTime<Utc>,
}

impl AttemptSession {
    /// Seconds since the attempt started, clamped to >= 0 against clock skew.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    /// Seconds left within the time limit. Reaching zero is a signal for the
    /// caller to submit, not an action taken here.
    pub fn remaining_seconds(&self, time_limit_seconds: i64, now: DateTime<Utc>) -> i64 {
        (time_limit_seconds - self.elapsed_seconds(now)).max(0)
    }
}

/// Keyed in-memory store of open sessions. The single mutex is the
/// per-(user, quiz) mutual-exclusion point: `open` and `take` are
/// check-and-set operations under it, so two racing submits observe exactly
/// one winner.
#[derive(Clone, Default)]
pub struct SessionTracker {
    inner: Arc<Mutex<HashMap<(i32, i32), AttemptSession>>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(i32, i32), AttemptSession>> {
        // The map holds plain data; a panic elsewhere cannot leave it in a
        // half-written state worth refusing over.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a session for (user, quiz), failing with `AlreadyOpen` if one
    /// exists — the caller resumes instead of duplicating.
    pub fn open(&self, user_id: i32, quiz_id: i32) -> Result<AttemptSession, AttemptError> {
        let mut map = self.lock();
        if map.contains_key(&(user_id, quiz_id)) {
            return Err(AttemptError::AlreadyOpen);
        }
        let session = AttemptSession {
            user_id,
            quiz_id,
            started_at: Utc::now(),
        };
        map.insert((user_id, quiz_id), session.clone());
        Ok(session)
    }

    pub fn get(&self, user_id: i32, quiz_id: i32) -> Option<AttemptSession> {
        self.lock().get(&(user_id, quiz_id)).cloned()
    }

    /// Atomically remove and return the session. Of two racing submits only
    /// one gets `Some`; the other sees the key gone.
    pub fn take(&self, user_id: i32, quiz_id: i32) -> Option<AttemptSession> {
        self.lock().remove(&(user_id, quiz_id))
    }

    /// Put a taken session back after a failed durable write so a retry can
    /// resubmit. Never clobbers a session opened in the meantime.
    pub fn restore(&self, session: AttemptSession) {
        self.lock()
            .entry((session.user_id, session.quiz_id))
            .or_insert(session);
    }

    /// Remove the session if present. Idempotent.
    pub fn close(&self, user_id: i32, quiz_id: i32) {
        self.lock().remove(&(user_id, quiz_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn open_then_get_then_close() {
        let tracker = SessionTracker::new();
        let session = tracker.open(1, 2).unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(session.quiz_id, 2);

        let found = tracker.get(1, 2).unwrap();
        assert_eq!(found.started_at, session.started_at);

        tracker.close(1, 2);
        assert!(tracker.get(1, 2).is_none());
        // Closing again is not an error.
        tracker.close(1, 2);
    }

    #[test]
    fn second_open_fails_with_already_open() {
        let tracker = SessionTracker::new();
        tracker.open(1, 2).unwrap();
        assert!(matches!(
            tracker.open(1, 2),
            Err(AttemptError::AlreadyOpen)
        ));
        // Other keys are unaffected.
        tracker.open(1, 3).unwrap();
        tracker.open(2, 2).unwrap();
    }

    #[test]
    fn take_yields_the_session_exactly_once() {
        let tracker = SessionTracker::new();
        tracker.open(1, 2).unwrap();

        assert!(tracker.take(1, 2).is_some());
        assert!(tracker.take(1, 2).is_none());
    }

    #[test]
    fn restore_does_not_clobber_a_newer_session() {
        let tracker = SessionTracker::new();
        let old = tracker.open(1, 2).unwrap();
        let taken = tracker.take(1, 2).unwrap();
        assert_eq!(taken.started_at, old.started_at);

        // A new attempt opened while the durable write was in flight.
        let newer = tracker.open(1, 2).unwrap();
        tracker.restore(taken);

        let kept = tracker.get(1, 2).unwrap();
        assert_eq!(kept.started_at, newer.started_at);
    }

    #[test]
    fn elapsed_and_remaining_are_clamped() {
        let now = Utc::now();
        let session = AttemptSession {
            user_id: 1,
            quiz_id: 2,
            started_at: now - Duration::seconds(90),
        };

        assert_eq!(session.elapsed_seconds(now), 90);
        assert_eq!(session.remaining_seconds(120, now), 30);
        assert_eq!(session.remaining_seconds(60, now), 0);

        // started_at in the future (clock skew) must not go negative.
        let skewed = AttemptSession {
            user_id: 1,
            quiz_id: 2,
            started_at: now + Duration::seconds(10),
        };
        assert_eq!(skewed.elapsed_seconds(now), 0);
        assert_eq!(skewed.remaining_seconds(60, now), 60);
    }
}
