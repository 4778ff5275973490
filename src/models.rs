// Domain model structs shared by the scoring engine, the attempt lifecycle
// controller and the persistence layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A quiz as seen by the attempt lifecycle: ordered questions plus the
/// attempt policy (time limit, passing score, max attempts).
#[derive(Clone, Debug)]
pub struct QuizDefinition {
    pub id: i32,
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub time_limit_minutes: i32,
    pub passing_score: i32,
    pub max_attempts: i32,
    pub is_active: bool,
    pub questions: Vec<Question>,
}

impl QuizDefinition {
    pub fn total_marks(&self) -> i32 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    pub fn time_limit_seconds(&self) -> i64 {
        i64::from(self.time_limit_minutes) * 60
    }
}

#[derive(Clone, Debug)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub marks: i32,
    pub ord: i32,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug)]
pub struct Choice {
    pub id: i32,
    pub text: String,
    pub is_correct: bool,
    pub ord: i32,
}

/// Input for the atomic quiz loader. Ordering keys are assigned from the
/// position in the vectors.
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub time_limit_minutes: i32,
    pub passing_score: i32,
    pub max_attempts: i32,
    pub questions: Vec<NewQuestion>,
}

pub struct NewQuestion {
    pub text: String,
    pub marks: i32,
    pub choices: Vec<NewChoice>,
}

pub struct NewChoice {
    pub text: String,
    pub is_correct: bool,
}

/// Outcome of scoring one question. Unanswered questions and answers
/// referencing a choice outside the question both come back with
/// `selected_choice_id: None` and zero marks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionScore {
    pub question_id: i32,
    pub selected_choice_id: Option<i32>,
    pub is_correct: bool,
    pub marks_obtained: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoringResult {
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub is_passed: bool,
    pub questions: Vec<QuestionScore>,
}

/// A finalized attempt ready for the durable write.
#[derive(Clone, Debug)]
pub struct NewAttempt {
    pub user_id: i32,
    pub quiz_id: i32,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub time_taken: i32,
    pub is_passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// A persisted attempt row. Immutable once written.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct AttemptRecord {
    pub id: i32,
    pub user_id: i32,
    pub quiz_id: i32,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: f64,
    pub time_taken: i32,
    pub is_passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// A persisted answer row, joined with its question text for review display.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct AnswerRecord {
    pub question_id: i32,
    pub question_text: String,
    pub selected_choice_id: Option<i32>,
    pub is_correct: bool,
    pub marks_obtained: i32,
}
