//! Question bank operations.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::{NewQuestion, Question, QuestionError};
use crate::id::{self, IdKind};
use crate::repository::VendorRepository;

/// Validate and store a new question.
pub fn add_question<R: VendorRepository>(repo: &R, input: NewQuestion, now: DateTime<Utc>) -> Result<Question> {
    let question = repo.transaction(|store| {
        let question = Question::new(id::generate_id(IdKind::Question, store.question_ids()), input, now)?;
        store.questions.push(question.clone());
        Ok(question)
    })?;

    log::info!("Added question {} ({})", question.id, question.question_type);
    Ok(question)
}

/// Active questions, newest first.
pub fn list_questions<R: VendorRepository>(repo: &R) -> Result<Vec<Question>> {
    let store = repo.load()?;
    Ok(store.active_questions().into_iter().cloned().collect())
}

/// Soft-delete a question.
pub fn delete_question<R: VendorRepository>(repo: &R, id: &str) -> Result<Question> {
    repo.transaction(|store| {
        let question = store
            .question_mut(id)
            .ok_or_else(|| QuestionError::NotFound(id.to_string()))?;
        question.deactivate();
        Ok(question.clone())
    })
}
