use async_trait::async_trait;

use super::Db;
use crate::error::AttemptError;
use crate::models::{AnswerRecord, AttemptRecord, NewAttempt};
use crate::store::{AttemptStore, NewAnswer};

impl Db {
    pub async fn count_attempts(&self, user_id: i32, quiz_id: i32) -> Result<i64, AttemptError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_attempts WHERE user_id = $1 AND quiz_id = $2",
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Insert the attempt row and its whole answer batch in one transaction.
    /// Either everything commits or nothing does; a crash mid-write never
    /// leaves an attempt with a partial answer set.
    pub async fn create_attempt(
        &self,
        attempt: &NewAttempt,
        answers: &[NewAnswer],
    ) -> Result<i32, AttemptError> {
        let mut tx = self.pool.begin().await?;

        let attempt_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO quiz_attempts (user_id, quiz_id, score, total_marks, percentage,
                                       time_taken, is_passed, started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(attempt.user_id)
        .bind(attempt.quiz_id)
        .bind(attempt.score)
        .bind(attempt.total_marks)
        .bind(attempt.percentage)
        .bind(attempt.time_taken)
        .bind(attempt.is_passed)
        .bind(attempt.started_at)
        .bind(attempt.completed_at)
        .fetch_one(&mut *tx)
        .await?;

        if !answers.is_empty() {
            let question_ids: Vec<i32> = answers.iter().map(|a| a.question_id).collect();
            let selected: Vec<Option<i32>> =
                answers.iter().map(|a| a.selected_choice_id).collect();
            let correct: Vec<bool> = answers.iter().map(|a| a.is_correct).collect();
            let marks: Vec<i32> = answers.iter().map(|a| a.marks_obtained).collect();

            sqlx::query(
                r#"
                INSERT INTO answers (attempt_id, question_id, selected_choice_id, is_correct, marks_obtained)
                SELECT $1, q, s, c, m
                FROM UNNEST($2::INT4[], $3::INT4[], $4::BOOL[], $5::INT4[]) AS t(q, s, c, m)
                "#,
            )
            .bind(attempt_id)
            .bind(&question_ids)
            .bind(&selected)
            .bind(&correct)
            .bind(&marks)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            attempt_id,
            user_id = attempt.user_id,
            quiz_id = attempt.quiz_id,
            answers = answers.len(),
            "attempt persisted"
        );
        Ok(attempt_id)
    }

    pub async fn get_attempt(&self, attempt_id: i32) -> Result<AttemptRecord, AttemptError> {
        let attempt: AttemptRecord = sqlx::query_as(
            r#"
            SELECT id, user_id, quiz_id, score, total_marks, percentage,
                   time_taken, is_passed, started_at, completed_at
            FROM quiz_attempts
            WHERE id = $1
            "#,
        )
        .bind(attempt_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AttemptError::NotFound)?;

        Ok(attempt)
    }

    /// Answer rows for review, in question display order.
    pub async fn get_attempt_answers(
        &self,
        attempt_id: i32,
    ) -> Result<Vec<AnswerRecord>, AttemptError> {
        let answers: Vec<AnswerRecord> = sqlx::query_as(
            r#"
            SELECT a.question_id, q.question_text, a.selected_choice_id,
                   a.is_correct, a.marks_obtained
            FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE a.attempt_id = $1
            ORDER BY q.ord, q.id
            "#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}

#[async_trait]
impl AttemptStore for Db {
    async fn count_attempts(&self, user_id: i32, quiz_id: i32) -> Result<i64, AttemptError> {
        Db::count_attempts(self, user_id, quiz_id).await
    }

    async fn create_attempt(
        &self,
        attempt: &NewAttempt,
        answers: &[NewAnswer],
    ) -> Result<i32, AttemptError> {
        Db::create_attempt(self, attempt, answers).await
    }

    async fn get_attempt(&self, attempt_id: i32) -> Result<AttemptRecord, AttemptError> {
        Db::get_attempt(self, attempt_id).await
    }

    async fn get_attempt_answers(
        &self,
        attempt_id: i32,
    ) -> Result<Vec<AnswerRecord>, AttemptError> {
        Db::get_attempt_answers(self, attempt_id).await
    }
}
