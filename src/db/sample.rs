use super::Db;
use crate::error::AttemptError;
use crate::models::{NewChoice, NewQuestion, NewQuiz};

impl Db {
    /// Seed one demo quiz so a fresh deployment has something to attempt.
    /// Skipped when any quiz already exists.
    pub async fn load_sample_data(&self) -> Result<(), AttemptError> {
        let has_quizzes: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM quizzes)")
            .fetch_one(&self.pool)
            .await?;

        if has_quizzes {
            tracing::info!("sample data skipped, quizzes already present");
            return Ok(());
        }

        let public_id = self.insert_quiz(sample_quiz()).await?;
        tracing::info!(%public_id, "sample quiz loaded");
        Ok(())
    }
}

fn sample_quiz() -> NewQuiz {
    let question = |text: &str, marks: i32, correct: &str, wrong: [&str; 3]| NewQuestion {
        text: text.to_string(),
        marks,
        choices: std::iter::once(NewChoice {
            text: correct.to_string(),
            is_correct: true,
        })
        .chain(wrong.iter().map(|w| NewChoice {
            text: w.to_string(),
            is_correct: false,
        }))
        .collect(),
    };

    NewQuiz {
        title: "General Knowledge".to_string(),
        description: "A short warm-up quiz covering a bit of everything.".to_string(),
        time_limit_minutes: 10,
        passing_score: 50,
        max_attempts: 3,
        questions: vec![
            question(
                "What is the capital of France?",
                1,
                "Paris",
                ["London", "Berlin", "Madrid"],
            ),
            question(
                "Which planet is known as the Red Planet?",
                1,
                "Mars",
                ["Venus", "Jupiter", "Saturn"],
            ),
            question(
                "What is 12 × 12?",
                2,
                "144",
                ["122", "124", "148"],
            ),
            question(
                "Who wrote 'Romeo and Juliet'?",
                1,
                "William Shakespeare",
                ["Charles Dickens", "Jane Austen", "Mark Twain"],
            ),
        ],
    }
}
