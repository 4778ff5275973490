use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quizdeck::attempt::AttemptController;
use quizdeck::error::AttemptError;
use quizdeck::models::{
    AnswerRecord, AttemptRecord, Choice, NewAttempt, Question, QuizDefinition,
};
use quizdeck::session::SessionTracker;
use quizdeck::store::{AttemptStore, NewAnswer, QuizStore};

/// In-memory stand-in for the Postgres-backed stores, with a switch to make
/// durable writes fail for retry-path tests.
#[derive(Default)]
pub struct MemoryStore {
    quizzes: Mutex<HashMap<i32, QuizDefinition>>,
    attempts: Mutex<Vec<(AttemptRecord, Vec<AnswerRecord>)>>,
    next_id: AtomicI32,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_quiz(&self, quiz: QuizDefinition) {
        self.quizzes.lock().unwrap().insert(quiz.id, quiz);
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn get_active_quiz(&self, quiz_id: i32) -> Result<QuizDefinition, AttemptError> {
        self.quizzes
            .lock()
            .unwrap()
            .get(&quiz_id)
            .filter(|q| q.is_active)
            .cloned()
            .ok_or(AttemptError::NotFound)
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn count_attempts(&self, user_id: i32, quiz_id: i32) -> Result<i64, AttemptError> {
        let count = self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a.user_id == user_id && a.quiz_id == quiz_id)
            .count();
        Ok(count as i64)
    }

    async fn create_attempt(
        &self,
        attempt: &NewAttempt,
        answers: &[NewAnswer],
    ) -> Result<i32, AttemptError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AttemptError::Persistence("injected write failure".to_string()));
        }

        let quizzes = self.quizzes.lock().unwrap();
        let quiz = quizzes.get(&attempt.quiz_id);
        let question_text = |question_id: i32| {
            quiz.and_then(|q| q.questions.iter().find(|qu| qu.id == question_id))
                .map(|qu| qu.text.clone())
                .unwrap_or_default()
        };

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = AttemptRecord {
            id,
            user_id: attempt.user_id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: attempt.percentage,
            time_taken: attempt.time_taken,
            is_passed: attempt.is_passed,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
        };
        let rows = answers
            .iter()
            .map(|a| AnswerRecord {
                question_id: a.question_id,
                question_text: question_text(a.question_id),
                selected_choice_id: a.selected_choice_id,
                is_correct: a.is_correct,
                marks_obtained: a.marks_obtained,
            })
            .collect();

        self.attempts.lock().unwrap().push((record, rows));
        Ok(id)
    }

    async fn get_attempt(&self, attempt_id: i32) -> Result<AttemptRecord, AttemptError> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a.id == attempt_id)
            .map(|(a, _)| a.clone())
            .ok_or(AttemptError::NotFound)
    }

    async fn get_attempt_answers(
        &self,
        attempt_id: i32,
    ) -> Result<Vec<AnswerRecord>, AttemptError> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .find(|(a, _)| a.id == attempt_id)
            .map(|(_, rows)| rows.clone())
            .ok_or(AttemptError::NotFound)
    }
}

/// A quiz with one question per entry of `marks`, each with a correct choice
/// (id = question id * 10) and a wrong one (id = question id * 10 + 1).
pub fn quiz_with_marks(
    quiz_id: i32,
    passing_score: i32,
    max_attempts: i32,
    marks: &[i32],
) -> QuizDefinition {
    let questions = marks
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let question_id = quiz_id * 100 + i as i32 + 1;
            Question {
                id: question_id,
                text: format!("Question {}", i + 1),
                marks: m,
                ord: i as i32,
                choices: vec![
                    Choice {
                        id: question_id * 10,
                        text: "right".to_string(),
                        is_correct: true,
                        ord: 0,
                    },
                    Choice {
                        id: question_id * 10 + 1,
                        text: "wrong".to_string(),
                        is_correct: false,
                        ord: 1,
                    },
                ],
            }
        })
        .collect();

    QuizDefinition {
        id: quiz_id,
        public_id: format!("QUIZ{quiz_id:04}"),
        title: format!("Quiz {quiz_id}"),
        description: String::new(),
        time_limit_minutes: 10,
        passing_score,
        max_attempts,
        is_active: true,
        questions,
    }
}

/// Correct choice id for a question built by `quiz_with_marks`.
pub fn correct_choice(question_id: i32) -> i32 {
    question_id * 10
}

pub fn controller(store: Arc<MemoryStore>) -> (AttemptController, SessionTracker) {
    let tracker = SessionTracker::new();
    let controller = AttemptController::new(store.clone(), store, tracker.clone());
    (controller, tracker)
}
