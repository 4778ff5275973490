use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    attempt::OpenAttempt,
    error::AttemptError,
    extractors::AuthGuard,
    models::{AnswerRecord, AttemptRecord, QuizDefinition, ScoringResult},
    rejections::AppError,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/{public_id}/start", post(start_attempt))
        .route("/quiz/{public_id}/resume", get(resume_attempt))
        .route("/quiz/{public_id}/submit", post(submit_attempt))
        .route("/attempt/{attempt_id}", get(attempt_result))
}

/// Quiz snapshot handed to a taker. Never carries `is_correct`.
#[derive(Serialize)]
struct QuizView {
    public_id: String,
    title: String,
    description: String,
    time_limit_minutes: i32,
    passing_score: i32,
    total_marks: i32,
    questions: Vec<QuestionView>,
}

#[derive(Serialize)]
struct QuestionView {
    id: i32,
    text: String,
    marks: i32,
    choices: Vec<ChoiceView>,
}

#[derive(Serialize)]
struct ChoiceView {
    id: i32,
    text: String,
}

impl From<QuizDefinition> for QuizView {
    fn from(quiz: QuizDefinition) -> Self {
        let total_marks = quiz.total_marks();
        QuizView {
            public_id: quiz.public_id,
            title: quiz.title,
            description: quiz.description,
            time_limit_minutes: quiz.time_limit_minutes,
            passing_score: quiz.passing_score,
            total_marks,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| QuestionView {
                    id: q.id,
                    text: q.text,
                    marks: q.marks,
                    choices: q
                        .choices
                        .into_iter()
                        .map(|c| ChoiceView { id: c.id, text: c.text })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct OpenAttemptView {
    quiz: QuizView,
    remaining_seconds: i64,
    resumed: bool,
    /// When true the client should submit its accumulated answers right away.
    expired: bool,
}

impl From<OpenAttempt> for OpenAttemptView {
    fn from(open: OpenAttempt) -> Self {
        OpenAttemptView {
            remaining_seconds: open.remaining_seconds,
            resumed: open.resumed,
            expired: open.remaining_seconds == 0,
            quiz: open.quiz.into(),
        }
    }
}

#[derive(Deserialize)]
struct SubmitBody {
    /// question id -> chosen choice id; an empty map is a valid submission.
    #[serde(default)]
    answers: HashMap<i32, i32>,
}

#[derive(Serialize)]
struct SubmitView {
    attempt_id: i32,
    #[serde(flatten)]
    result: ScoringResult,
}

#[derive(Serialize)]
struct AttemptResultView {
    attempt: AttemptRecord,
    answers: Vec<AnswerRecord>,
}

pub(crate) async fn start_attempt(
    AuthGuard(user_id): AuthGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<OpenAttemptView>, AppError> {
    let quiz_id = state.db.resolve_quiz_id(&public_id).await?;

    let open = match state.attempts.start(user_id, quiz_id).await {
        Ok(open) => open,
        // An attempt is already in progress: hand back its state instead of
        // failing, so the client lands in the take-quiz flow.
        Err(AttemptError::AlreadyOpen) => {
            tracing::info!(user_id, quiz_id, "open attempt found, resuming");
            state.attempts.resume(user_id, quiz_id).await?
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(open.into()))
}

pub(crate) async fn resume_attempt(
    AuthGuard(user_id): AuthGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<OpenAttemptView>, AppError> {
    let quiz_id = state.db.resolve_quiz_id(&public_id).await?;
    let open = state.attempts.resume(user_id, quiz_id).await?;

    Ok(Json(open.into()))
}

pub(crate) async fn submit_attempt(
    AuthGuard(user_id): AuthGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<SubmitView>, AppError> {
    let quiz_id = state.db.resolve_quiz_id(&public_id).await?;
    let submitted = state.attempts.submit(user_id, quiz_id, &body.answers).await?;

    Ok(Json(SubmitView {
        attempt_id: submitted.attempt_id,
        result: submitted.result,
    }))
}

pub(crate) async fn attempt_result(
    AuthGuard(user_id): AuthGuard,
    State(state): State<AppState>,
    Path(attempt_id): Path<i32>,
) -> Result<Json<AttemptResultView>, AppError> {
    let (attempt, answers) = state.attempts.result(attempt_id).await?;

    // Another user's attempt is indistinguishable from a missing one.
    if attempt.user_id != user_id {
        return Err(AttemptError::NotFound.into());
    }

    Ok(Json(AttemptResultView { attempt, answers }))
}
