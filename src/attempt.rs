//! Attempt lifecycle controller: start -> in progress -> submit.
//!
//! Orchestrates eligibility checks, the transient session tracker, the pure
//! scoring engine and the atomic durable write. Timeouts are advisory: the
//! controller reports remaining time and the caller decides to auto-submit.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::error::AttemptError;
use crate::models::{AnswerRecord, AttemptRecord, NewAttempt, QuizDefinition, ScoringResult};
use crate::scoring;
use crate::session::{AttemptSession, SessionTracker};
use crate::store::{AttemptStore, NewAnswer, QuizStore};

/// An attempt that is open for taking, either freshly started or resumed.
#[derive(Clone, Debug)]
pub struct OpenAttempt {
    pub quiz: QuizDefinition,
    pub session: AttemptSession,
    pub remaining_seconds: i64,
    pub resumed: bool,
}

/// A finalized submission: the durable attempt id plus the full scoring
/// result for immediate display.
#[derive(Clone, Debug)]
pub struct SubmittedAttempt {
    pub attempt_id: i32,
    pub result: ScoringResult,
}

#[derive(Clone)]
pub struct AttemptController {
    quizzes: Arc<dyn QuizStore>,
    attempts: Arc<dyn AttemptStore>,
    sessions: SessionTracker,
}

impl AttemptController {
    pub fn new(
        quizzes: Arc<dyn QuizStore>,
        attempts: Arc<dyn AttemptStore>,
        sessions: SessionTracker,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            sessions,
        }
    }

    /// Start a new attempt.
    ///
    /// Fails with `AlreadyOpen` when a session exists for (user, quiz) — the
    /// caller is expected to resume rather than duplicate. Fails with
    /// `MaxAttemptsExceeded` when the durable attempt count has reached the
    /// quiz policy; no session is created in that case. Two racing starts are
    /// arbitrated by the tracker: one opens, the other gets `AlreadyOpen`.
    pub async fn start(&self, user_id: i32, quiz_id: i32) -> Result<OpenAttempt, AttemptError> {
        let quiz = self.quizzes.get_active_quiz(quiz_id).await?;

        if self.sessions.get(user_id, quiz.id).is_some() {
            return Err(AttemptError::AlreadyOpen);
        }

        let prior = self.attempts.count_attempts(user_id, quiz.id).await?;
        if prior >= i64::from(quiz.max_attempts) {
            return Err(AttemptError::MaxAttemptsExceeded {
                limit: quiz.max_attempts,
            });
        }

        let session = self.sessions.open(user_id, quiz.id)?;
        tracing::info!(user_id, quiz_id = quiz.id, "attempt started");

        let remaining = session.remaining_seconds(quiz.time_limit_seconds(), Utc::now());
        Ok(OpenAttempt {
            quiz,
            session,
            remaining_seconds: remaining,
            resumed: false,
        })
    }

    /// Recompute the state of an open attempt. A remaining time of zero tells
    /// the caller to submit immediately with whatever answers it holds.
    pub async fn resume(&self, user_id: i32, quiz_id: i32) -> Result<OpenAttempt, AttemptError> {
        let quiz = self.quizzes.get_active_quiz(quiz_id).await?;
        let session = self
            .sessions
            .get(user_id, quiz.id)
            .ok_or(AttemptError::NoActiveSession)?;

        let remaining = session.remaining_seconds(quiz.time_limit_seconds(), Utc::now());
        Ok(OpenAttempt {
            quiz,
            session,
            remaining_seconds: remaining,
            resumed: true,
        })
    }

    /// Submit the accumulated answers for scoring and persistence.
    ///
    /// Requires an open session; a stale browser, a double submission or a
    /// restarted server all surface as `NoActiveSession`. The attempt row and
    /// its answer batch commit in one transaction; on a persistence failure
    /// the session is restored so the same answers can be resubmitted.
    pub async fn submit(
        &self,
        user_id: i32,
        quiz_id: i32,
        submitted: &HashMap<i32, i32>,
    ) -> Result<SubmittedAttempt, AttemptError> {
        let quiz = self.quizzes.get_active_quiz(quiz_id).await?;

        // Conditional delete: exactly one of two racing submits gets the
        // session, the other observes NoActiveSession.
        let session = self
            .sessions
            .take(user_id, quiz.id)
            .ok_or(AttemptError::NoActiveSession)?;

        let now = Utc::now();
        let result = scoring::score(&quiz, submitted);

        let attempt = NewAttempt {
            user_id,
            quiz_id: quiz.id,
            score: result.score,
            total_marks: result.total_marks,
            percentage: result.percentage,
            time_taken: session.elapsed_seconds(now).min(i64::from(i32::MAX)) as i32,
            is_passed: result.is_passed,
            started_at: session.started_at,
            completed_at: now,
        };
        let answers: Vec<NewAnswer> = result
            .questions
            .iter()
            .map(|q| NewAnswer {
                question_id: q.question_id,
                selected_choice_id: q.selected_choice_id,
                is_correct: q.is_correct,
                marks_obtained: q.marks_obtained,
            })
            .collect();

        match self.attempts.create_attempt(&attempt, &answers).await {
            Ok(attempt_id) => {
                tracing::info!(
                    user_id,
                    quiz_id = quiz.id,
                    attempt_id,
                    score = result.score,
                    total_marks = result.total_marks,
                    is_passed = result.is_passed,
                    "attempt submitted"
                );
                Ok(SubmittedAttempt { attempt_id, result })
            }
            Err(err) => {
                tracing::warn!(user_id, quiz_id = quiz.id, %err, "attempt write failed, session restored");
                self.sessions.restore(session);
                Err(err)
            }
        }
    }

    /// Read back a persisted attempt with its answer rows for review.
    pub async fn result(
        &self,
        attempt_id: i32,
    ) -> Result<(AttemptRecord, Vec<AnswerRecord>), AttemptError> {
        let attempt = self.attempts.get_attempt(attempt_id).await?;
        let answers = self.attempts.get_attempt_answers(attempt_id).await?;
        Ok((attempt, answers))
    }

    /// The tracker handle, shared with whoever constructs the controller.
    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }
}
