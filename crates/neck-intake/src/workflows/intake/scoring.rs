use serde::Serialize;

use super::answers::AnswerSet;
use super::catalog::{QuestionCatalog, QuestionId};

/// Sum the answers of every scored question, walking the catalog in order.
///
/// Missing answers count as 0 and keys outside the catalog never contribute.
/// Values are summed as given; membership checks happen when answers are recorded.
pub fn compute_score(answers: &AnswerSet, catalog: &QuestionCatalog) -> u32 {
    catalog
        .questions()
        .iter()
        .filter(|question| question.scored)
        .fold(0u32, |total, question| {
            total.saturating_add(answers.value_or_zero(question.id))
        })
}

/// Highest total the catalog can produce.
pub fn max_score(catalog: &QuestionCatalog) -> u32 {
    catalog
        .questions()
        .iter()
        .filter(|question| question.scored)
        .fold(0u32, |total, question| {
            total.saturating_add(question.max_value())
        })
}

/// Per-question contribution to a total, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub question: QuestionId,
    pub value: u32,
    pub counted: bool,
}

pub fn score_breakdown(answers: &AnswerSet, catalog: &QuestionCatalog) -> Vec<ScoreComponent> {
    catalog
        .questions()
        .iter()
        .map(|question| ScoreComponent {
            question: question.id,
            value: answers.value_or_zero(question.id),
            counted: question.scored,
        })
        .collect()
}
