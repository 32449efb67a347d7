//! Quiz commands.

use super::{current_settings, lock, repository, CommandError};
use crate::state::AppState;
use study_core::{AnswerOutcome, EngineError, QuizQuestion, QuizSession};

#[derive(Debug, Clone, serde::Serialize)]
pub struct QuizScore {
    pub score: u32,
    pub combo: u32,
}

/// Start a fresh quiz and return its first question.
pub fn start_quiz(state: &AppState) -> Result<QuizQuestion, CommandError> {
    let settings = {
        let repo = repository(state)?;
        current_settings(&repo)?
    };
    let mut session = QuizSession::new(&settings);
    let question = {
        let mut rng = lock(&state.rng)?;
        session.start(&state.pool, &mut *rng)?.clone()
    };
    *lock(&state.quiz)? = Some(session);
    Ok(question)
}

/// Answer the current question. `None` when it was already answered.
pub fn answer_quiz(state: &AppState, option_index: usize) -> Result<Option<AnswerOutcome>, CommandError> {
    let now = state.clock.now();
    let mut quiz = lock(&state.quiz)?;
    let session = quiz.as_mut().ok_or(EngineError::NoActiveQuestion)?;
    session.answer(option_index, now).map_err(Into::into)
}

/// Next question once the display delay after an answer has elapsed.
pub fn poll_quiz(state: &AppState) -> Result<Option<QuizQuestion>, CommandError> {
    let now = state.clock.now();
    let mut quiz = lock(&state.quiz)?;
    let Some(session) = quiz.as_mut() else {
        return Ok(None);
    };
    let mut rng = lock(&state.rng)?;
    let next = session.poll(&state.pool, &mut *rng, now)?;
    Ok(next.cloned())
}

pub fn get_quiz_score(state: &AppState) -> Result<QuizScore, CommandError> {
    let quiz = lock(&state.quiz)?;
    Ok(quiz
        .as_ref()
        .map(|s| QuizScore {
            score: s.score(),
            combo: s.combo(),
        })
        .unwrap_or(QuizScore { score: 0, combo: 0 }))
}

/// Close the quiz. Score and combo are not kept.
pub fn stop_quiz(state: &AppState) -> Result<(), CommandError> {
    let mut quiz = lock(&state.quiz)?;
    if let Some(session) = quiz.as_mut() {
        tracing::info!(score = session.score(), "quiz closed");
        session.cancel();
    }
    *quiz = None;
    Ok(())
}
