use serde::{Deserialize, Serialize};

use super::SessionId;
use crate::workflows::intake::answers::{AnswerError, AnswerSet};
use crate::workflows::intake::catalog::{QuestionCatalog, QuestionDefinition, QuestionId};
use crate::workflows::intake::contact::{ContactInfo, LeadForm, LeadValidationError};

/// Screen the respondent is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStep {
    #[default]
    Intro,
    Questions,
    LeadCapture,
    Results,
}

impl IntakeStep {
    pub const fn token(self) -> &'static str {
        match self {
            IntakeStep::Intro => "intro",
            IntakeStep::Questions => "questions",
            IntakeStep::LeadCapture => "lead-capture",
            IntakeStep::Results => "results",
        }
    }
}

/// State of one questionnaire run, mutated only through its transition methods.
///
/// The question cursor and submission flags live in memory only; a reloaded
/// session resumes at the first question of its step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSession {
    id: SessionId,
    step: IntakeStep,
    cursor: usize,
    answers: AnswerSet,
    contact: ContactInfo,
    submitting: bool,
    submitted: bool,
    submission_generation: u64,
}

/// Claim on the in-flight submission slot, handed out by `begin_submission`.
///
/// Only the ticket of the latest claim can release the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

impl IntakeSession {
    pub fn new(id: SessionId, catalog: &QuestionCatalog) -> Self {
        Self::restore(
            id,
            IntakeStep::Intro,
            AnswerSet::initialized(catalog),
            ContactInfo::default(),
        )
    }

    pub fn restore(
        id: SessionId,
        step: IntakeStep,
        answers: AnswerSet,
        contact: ContactInfo,
    ) -> Self {
        Self {
            id,
            step,
            cursor: 0,
            answers,
            contact,
            submitting: false,
            submitted: false,
            submission_generation: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn current_question<'c>(
        &self,
        catalog: &'c QuestionCatalog,
    ) -> Option<&'c QuestionDefinition> {
        match self.step {
            IntakeStep::Questions => catalog.get(self.cursor),
            _ => None,
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.expect_step("start", IntakeStep::Intro)?;
        self.step = IntakeStep::Questions;
        self.cursor = 0;
        Ok(())
    }

    pub fn answer(
        &mut self,
        catalog: &QuestionCatalog,
        raw_question: &str,
        value: u32,
    ) -> Result<QuestionId, TransitionError> {
        self.expect_step("answer", IntakeStep::Questions)?;
        let question = catalog
            .find(raw_question)
            .ok_or_else(|| AnswerError::UnknownQuestion(raw_question.to_string()))?;
        self.answers.record(question, value)?;
        Ok(question.id)
    }

    /// Move to the next question, or on to the lead form after the last one.
    pub fn next(&mut self, catalog: &QuestionCatalog) -> Result<IntakeStep, TransitionError> {
        self.expect_step("next", IntakeStep::Questions)?;
        if self.cursor + 1 < catalog.len() {
            self.cursor += 1;
        } else {
            self.step = IntakeStep::LeadCapture;
        }
        Ok(self.step)
    }

    pub fn previous(&mut self) -> Result<(), TransitionError> {
        self.expect_step("previous", IntakeStep::Questions)?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(())
    }

    pub fn capture_lead(&mut self, form: LeadForm) -> Result<(), TransitionError> {
        self.expect_step("capture_lead", IntakeStep::LeadCapture)?;
        self.contact = form.validate()?;
        self.step = IntakeStep::Results;
        Ok(())
    }

    /// Start over. Any submission still in flight loses its claim on the slot.
    pub fn reset(&mut self, catalog: &QuestionCatalog) {
        let generation = self.submission_generation;
        *self = Self::new(self.id, catalog);
        self.submission_generation = generation + 1;
    }

    /// Claim the in-flight slot for a submission.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, TransitionError> {
        self.expect_step("submit", IntakeStep::Results)?;
        if self.submitted {
            return Err(TransitionError::AlreadySubmitted);
        }
        if self.submitting {
            return Err(TransitionError::SubmissionInFlight);
        }
        self.submission_generation += 1;
        self.submitting = true;
        Ok(SubmissionTicket(self.submission_generation))
    }

    /// Release the in-flight slot. Tickets from before a reset, or from an
    /// earlier claim, leave the session untouched.
    pub fn finish_submission(&mut self, ticket: SubmissionTicket, delivered: bool) {
        if !self.submitting || ticket.0 != self.submission_generation {
            return;
        }
        self.submitting = false;
        self.submitted = delivered;
    }

    pub(crate) fn expect_step(
        &self,
        action: &'static str,
        expected: IntakeStep,
    ) -> Result<(), TransitionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(TransitionError::WrongStep {
                action,
                step: self.step,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while on the {} step", .step.token())]
    WrongStep {
        action: &'static str,
        step: IntakeStep,
    },
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Lead(#[from] LeadValidationError),
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("results have already been sent")]
    AlreadySubmitted,
}
