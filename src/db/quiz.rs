use async_trait::async_trait;
use ulid::Ulid;

use super::models::{ChoiceRow, QuestionRow, QuizRow};
use super::Db;
use crate::error::AttemptError;
use crate::models::{Choice, NewQuiz, Question, QuizDefinition};
use crate::names;
use crate::store::QuizStore;

impl Db {
    /// Fetch an active quiz with its questions and choices, both ordered by
    /// ordering key with ties broken by id. Absent and inactive quizzes both
    /// come back as `NotFound`.
    pub async fn get_active_quiz(&self, quiz_id: i32) -> Result<QuizDefinition, AttemptError> {
        let quiz: QuizRow = sqlx::query_as(
            r#"
            SELECT id, public_id, title, description, time_limit_minutes,
                   passing_score, max_attempts, is_active
            FROM quizzes
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AttemptError::NotFound)?;

        let questions: Vec<QuestionRow> = sqlx::query_as(
            "SELECT id, question_text, marks, ord FROM questions WHERE quiz_id = $1 ORDER BY ord, id",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let choices: Vec<ChoiceRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.question_id, c.choice_text, c.is_correct, c.ord
            FROM choices c
            JOIN questions q ON q.id = c.question_id
            WHERE q.quiz_id = $1
            ORDER BY c.ord, c.id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let questions = questions
            .into_iter()
            .map(|q| Question {
                choices: choices
                    .iter()
                    .filter(|c| c.question_id == q.id)
                    .map(|c| Choice {
                        id: c.id,
                        text: c.choice_text.clone(),
                        is_correct: c.is_correct,
                        ord: c.ord,
                    })
                    .collect(),
                id: q.id,
                text: q.question_text,
                marks: q.marks,
                ord: q.ord,
            })
            .collect();

        Ok(QuizDefinition {
            id: quiz.id,
            public_id: quiz.public_id,
            title: quiz.title,
            description: quiz.description,
            time_limit_minutes: quiz.time_limit_minutes,
            passing_score: quiz.passing_score,
            max_attempts: quiz.max_attempts,
            is_active: quiz.is_active,
            questions,
        })
    }

    /// Sum of question marks, computed on demand rather than cached.
    pub async fn total_marks(&self, quiz_id: i32) -> Result<i32, AttemptError> {
        let total: i32 =
            sqlx::query_scalar("SELECT COALESCE(SUM(marks), 0)::INT FROM questions WHERE quiz_id = $1")
                .bind(quiz_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Resolve a public_id (ULID) to the internal quiz id.
    pub async fn resolve_quiz_id(&self, public_id: &str) -> Result<i32, AttemptError> {
        let id: i32 = sqlx::query_scalar("SELECT id FROM quizzes WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AttemptError::NotFound)?;

        Ok(id)
    }

    /// Insert a quiz with all its questions and choices atomically in a
    /// transaction, using UNNEST batch inserts to avoid N+1 round-trips.
    /// Policy values outside the allowed ranges are clamped in. Returns the
    /// public_id (ULID) of the newly created quiz.
    pub async fn insert_quiz(&self, quiz: NewQuiz) -> Result<String, AttemptError> {
        let public_id = Ulid::new().to_string();
        let time_limit = quiz
            .time_limit_minutes
            .clamp(names::MIN_TIME_LIMIT_MINUTES, names::MAX_TIME_LIMIT_MINUTES);
        let passing_score = quiz.passing_score.clamp(0, 100);
        let max_attempts = quiz.max_attempts.max(1);

        let mut tx = self.pool.begin().await?;

        let quiz_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes (public_id, title, description, time_limit_minutes,
                                 passing_score, max_attempts)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&public_id)
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(time_limit)
        .bind(passing_score)
        .bind(max_attempts)
        .fetch_one(&mut *tx)
        .await?;

        if quiz.questions.is_empty() {
            tx.commit().await?;
            tracing::info!(quiz_id, "new quiz created");
            return Ok(public_id);
        }

        // Batch INSERT all questions via UNNEST, ordering keys from position
        let q_texts: Vec<String> = quiz.questions.iter().map(|q| q.text.clone()).collect();
        let q_marks: Vec<i32> = quiz.questions.iter().map(|q| q.marks.max(1)).collect();
        let q_ords: Vec<i32> = (0..quiz.questions.len() as i32).collect();

        sqlx::query(
            r#"
            INSERT INTO questions (quiz_id, question_text, marks, ord)
            SELECT $1, t, m, o
            FROM UNNEST($2::TEXT[], $3::INT4[], $4::INT4[]) AS u(t, m, o)
            "#,
        )
        .bind(quiz_id)
        .bind(&q_texts)
        .bind(&q_marks)
        .bind(&q_ords)
        .execute(&mut *tx)
        .await?;

        // Retrieve question IDs in insertion order
        let question_ids: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM questions WHERE quiz_id = $1 ORDER BY ord, id")
                .bind(quiz_id)
                .fetch_all(&mut *tx)
                .await?;

        // Batch INSERT all choices via UNNEST
        let mut c_texts = Vec::new();
        let mut c_correct = Vec::new();
        let mut c_ords = Vec::new();
        let mut c_question_ids = Vec::new();

        for (q, &q_id) in quiz.questions.iter().zip(question_ids.iter()) {
            for (ord, choice) in q.choices.iter().enumerate() {
                c_texts.push(choice.text.clone());
                c_correct.push(choice.is_correct);
                c_ords.push(ord as i32);
                c_question_ids.push(q_id);
            }
        }

        if !c_texts.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO choices (question_id, choice_text, is_correct, ord)
                SELECT q, t, c, o
                FROM UNNEST($1::INT4[], $2::TEXT[], $3::BOOL[], $4::INT4[]) AS u(q, t, c, o)
                "#,
            )
            .bind(&c_question_ids)
            .bind(&c_texts)
            .bind(&c_correct)
            .bind(&c_ords)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            quiz_id,
            questions = quiz.questions.len(),
            "new quiz created"
        );
        Ok(public_id)
    }
}

#[async_trait]
impl QuizStore for Db {
    async fn get_active_quiz(&self, quiz_id: i32) -> Result<QuizDefinition, AttemptError> {
        Db::get_active_quiz(self, quiz_id).await
    }
}
