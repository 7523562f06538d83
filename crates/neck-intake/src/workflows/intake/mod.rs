//! Neck pain intake questionnaire: scoring, severity classification, session flow
//! and hand-off of the finished intake to practice staff.

pub mod answers;
pub mod catalog;
pub mod classification;
pub mod contact;
pub(crate) mod report;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod session;
pub mod submission;
pub mod views;

#[cfg(test)]
mod tests;

pub use answers::{AnswerError, AnswerSet};
pub use catalog::{
    CatalogError, ChoiceOption, QuestionCatalog, QuestionDefinition, QuestionId, QuestionKind,
    SLIDER_MAX, SLIDER_MIN,
};
pub use classification::{
    classify, standard_tiers, ClassificationTier, SeverityLevel, TierTable, TierTableError,
};
pub use contact::{ContactInfo, LeadForm, LeadValidationError};
pub use report::{format_report, UNRESOLVED_ANSWER};
pub use router::intake_router;
pub use scoring::{compute_score, max_score, score_breakdown, ScoreComponent};
pub use service::{IntakeService, IntakeServiceError};
pub use session::{
    FileSessionStore, InMemorySessionStore, IntakeSession, IntakeStep, SessionEntry, SessionId,
    SessionStore, StoreError, SubmissionTicket, TransitionError,
};
pub use submission::{
    compose_mailto, ContactPoints, DeliveryError, FallbackReason, PayloadEncoding,
    SubmissionGateway, SubmissionOutcome, SubmissionPayload, WebhookGateway,
};
pub use views::{QuestionProgress, QuestionnaireView, ResultView, SessionView};
