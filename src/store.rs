//! Persistence seams for the attempt lifecycle. The controller only ever
//! talks to these traits; `db::Db` implements them against Postgres and the
//! integration tests implement them in memory.

use async_trait::async_trait;

use crate::error::AttemptError;
use crate::models::{AnswerRecord, AttemptRecord, NewAttempt, QuizDefinition};

/// Read-only access to quiz definitions.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Fetch a quiz with questions and choices in display order. Absent and
    /// inactive quizzes both signal `NotFound`.
    async fn get_active_quiz(&self, quiz_id: i32) -> Result<QuizDefinition, AttemptError>;
}

/// Durable attempt records. `create_attempt` must commit the attempt and its
/// whole answer batch atomically or not at all.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn count_attempts(&self, user_id: i32, quiz_id: i32) -> Result<i64, AttemptError>;

    async fn create_attempt(
        &self,
        attempt: &NewAttempt,
        answers: &[NewAnswer],
    ) -> Result<i32, AttemptError>;

    async fn get_attempt(&self, attempt_id: i32) -> Result<AttemptRecord, AttemptError>;

    async fn get_attempt_answers(
        &self,
        attempt_id: i32,
    ) -> Result<Vec<AnswerRecord>, AttemptError>;
}

/// One answer row to write alongside its parent attempt.
#[derive(Clone, Debug)]
pub struct NewAnswer {
    pub question_id: i32,
    pub selected_choice_id: Option<i32>,
    pub is_correct: bool,
    pub marks_obtained: i32,
}
