// Row structs the quiz definition queries deserialize into before assembly
// into the domain `QuizDefinition`.

#[derive(sqlx::FromRow)]
pub struct QuizRow {
    pub id: i32,
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub time_limit_minutes: i32,
    pub passing_score: i32,
    pub max_attempts: i32,
    pub is_active: bool,
}

#[derive(sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i32,
    pub question_text: String,
    pub marks: i32,
    pub ord: i32,
}

#[derive(sqlx::FromRow)]
pub struct ChoiceRow {
    pub id: i32,
    pub question_id: i32,
    pub choice_text: String,
    pub is_correct: bool,
    pub ord: i32,
}
