//! Pure scoring engine: maps a quiz definition and a submitted answer set to
//! per-question correctness and an aggregate result. No clock, no storage,
//! no randomness — identical inputs always yield identical output.

use std::collections::HashMap;

use crate::models::{QuestionScore, QuizDefinition, ScoringResult};

/// Score a submitted answer set against a quiz definition.
///
/// Every question of the quiz appears in the result, answered or not. A
/// missing answer, or a choice id that does not belong to the question it was
/// submitted for, scores as incorrect with no selected choice — caller-side
/// data mishaps degrade to a wrong answer, they never fail the attempt.
/// Submitted question ids that are not part of the quiz are ignored.
pub fn score(quiz: &QuizDefinition, submitted: &HashMap<i32, i32>) -> ScoringResult {
    let mut questions = Vec::with_capacity(quiz.questions.len());
    let mut total = 0i32;
    let mut obtained = 0i32;

    for question in &quiz.questions {
        total += question.marks;

        let choice = submitted
            .get(&question.id)
            .and_then(|choice_id| question.choices.iter().find(|c| c.id == *choice_id));

        let (selected, is_correct) = match choice {
            Some(c) => (Some(c.id), c.is_correct),
            None => (None, false),
        };
        let marks = if is_correct { question.marks } else { 0 };
        obtained += marks;

        questions.push(QuestionScore {
            question_id: question.id,
            selected_choice_id: selected,
            is_correct,
            marks_obtained: marks,
        });
    }

    let percentage = if total > 0 {
        f64::from(obtained) * 100.0 / f64::from(total)
    } else {
        0.0
    };
    // Non-strict: hitting the passing score exactly passes.
    let is_passed = percentage >= f64::from(quiz.passing_score);

    ScoringResult {
        score: obtained,
        total_marks: total,
        percentage,
        is_passed,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, Question};

    fn two_question_quiz() -> QuizDefinition {
        QuizDefinition {
            id: 1,
            public_id: "01TESTQUIZ".to_string(),
            title: "Basics".to_string(),
            description: String::new(),
            time_limit_minutes: 10,
            passing_score: 50,
            max_attempts: 3,
            is_active: true,
            questions: vec![
                Question {
                    id: 10,
                    text: "Q1".to_string(),
                    marks: 1,
                    ord: 0,
                    choices: vec![
                        Choice { id: 100, text: "right".to_string(), is_correct: true, ord: 0 },
                        Choice { id: 101, text: "wrong".to_string(), is_correct: false, ord: 1 },
                    ],
                },
                Question {
                    id: 11,
                    text: "Q2".to_string(),
                    marks: 1,
                    ord: 1,
                    choices: vec![
                        Choice { id: 110, text: "wrong".to_string(), is_correct: false, ord: 0 },
                        Choice { id: 111, text: "right".to_string(), is_correct: true, ord: 1 },
                    ],
                },
            ],
        }
    }

    #[test]
    fn one_correct_of_two_hits_passing_score_exactly() {
        let quiz = two_question_quiz();
        let submitted = HashMap::from([(10, 100)]);

        let result = score(&quiz, &submitted);
        assert_eq!(result.score, 1);
        assert_eq!(result.total_marks, 2);
        assert_eq!(result.percentage, 50.0);
        assert!(result.is_passed, "percentage equal to passing_score passes");
    }

    #[test]
    fn empty_submission_scores_zero_and_fails() {
        let quiz = two_question_quiz();
        let result = score(&quiz, &HashMap::new());

        assert_eq!(result.score, 0);
        assert_eq!(result.percentage, 0.0);
        assert!(!result.is_passed);
        // Unanswered questions still show up, with no selected choice.
        assert_eq!(result.questions.len(), 2);
        assert!(result
            .questions
            .iter()
            .all(|q| q.selected_choice_id.is_none() && !q.is_correct && q.marks_obtained == 0));
    }

    #[test]
    fn choice_from_another_question_scores_as_incorrect() {
        let quiz = two_question_quiz();
        // 111 is a correct choice, but it belongs to question 11, not 10.
        let submitted = HashMap::from([(10, 111), (11, 111)]);

        let result = score(&quiz, &submitted);
        assert_eq!(result.score, 1);
        let q1 = &result.questions[0];
        assert_eq!(q1.question_id, 10);
        assert_eq!(q1.selected_choice_id, None);
        assert!(!q1.is_correct);
        let q2 = &result.questions[1];
        assert_eq!(q2.selected_choice_id, Some(111));
        assert!(q2.is_correct);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let quiz = two_question_quiz();
        let submitted = HashMap::from([(999, 100), (10, 100), (11, 111)]);

        let result = score(&quiz, &submitted);
        assert_eq!(result.questions.len(), 2);
        assert_eq!(result.score, 2);
        assert_eq!(result.percentage, 100.0);
        assert!(result.is_passed);
    }

    #[test]
    fn zero_total_marks_yields_zero_percentage() {
        let mut quiz = two_question_quiz();
        quiz.questions.clear();
        quiz.passing_score = 0;

        let result = score(&quiz, &HashMap::new());
        assert_eq!(result.total_marks, 0);
        assert_eq!(result.percentage, 0.0);
        // 0 >= 0 still holds; the pass flag follows the comparison.
        assert!(result.is_passed);
    }

    #[test]
    fn marks_weight_the_score() {
        let mut quiz = two_question_quiz();
        quiz.questions[1].marks = 3;
        quiz.passing_score = 75;

        let result = score(&quiz, &HashMap::from([(11, 111)]));
        assert_eq!(result.score, 3);
        assert_eq!(result.total_marks, 4);
        assert_eq!(result.percentage, 75.0);
        assert!(result.is_passed);

        // total_marks is recomputed fresh and matches the definition's sum,
        // independent of call order.
        assert_eq!(quiz.total_marks(), 4);
        assert_eq!(quiz.total_marks(), result.total_marks);
    }

    #[test]
    fn scoring_is_deterministic() {
        let quiz = two_question_quiz();
        let submitted = HashMap::from([(10, 101), (11, 111)]);

        let first = score(&quiz, &submitted);
        let second = score(&quiz, &submitted);
        assert_eq!(first, second);
    }
}
