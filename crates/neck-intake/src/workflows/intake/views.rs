use serde::Serialize;

use super::answers::AnswerSet;
use super::catalog::{QuestionCatalog, QuestionDefinition};
use super::classification::{SeverityLevel, TierTable};
use super::contact::ContactInfo;
use super::scoring::ScoreComponent;
use super::session::{IntakeStep, SessionId};

/// Static questionnaire content for clients rendering the form.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireView {
    pub questions: QuestionCatalog,
    pub max_score: u32,
    pub tiers: TierTable,
}

/// Position within the question step ("Vraag 3 van 7").
#[derive(Debug, Clone, Serialize)]
pub struct QuestionProgress {
    pub current: usize,
    pub total: usize,
    pub question: QuestionDefinition,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub step: IntakeStep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<QuestionProgress>,
    pub answers: AnswerSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    pub submitting: bool,
    pub submitted: bool,
}

/// Scored outcome shown on the results step.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub session_id: SessionId,
    pub score: u32,
    pub max_score: u32,
    pub level: SeverityLevel,
    pub description: &'static str,
    pub urgency: &'static str,
    pub components: Vec<ScoreComponent>,
    pub report: String,
    pub submitted: bool,
}
