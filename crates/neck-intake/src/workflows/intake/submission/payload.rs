use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::intake::answers::AnswerSet;
use crate::workflows::intake::classification::SeverityLevel;
use crate::workflows::intake::contact::ContactInfo;

/// Origin marker staff tooling uses to route intake leads.
pub const SUBMISSION_SOURCE: &str = "fyfit-nekpijn-webapp";

/// Body posted to the staff webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub source: &'static str,
    pub timestamp: DateTime<Utc>,
    pub contact: ContactPayload,
    pub classification: SeverityLevel,
    pub total: u32,
    pub answers: AnswerSet,
    pub report: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPayload {
    pub naam: String,
    pub email: String,
    pub telefoon: String,
}

impl From<&ContactInfo> for ContactPayload {
    fn from(contact: &ContactInfo) -> Self {
        Self {
            naam: contact.name.clone(),
            email: contact.email.clone(),
            telefoon: contact.phone.clone().unwrap_or_default(),
        }
    }
}

impl SubmissionPayload {
    pub fn new(
        contact: &ContactInfo,
        classification: SeverityLevel,
        total: u32,
        answers: AnswerSet,
        report: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source: SUBMISSION_SOURCE,
            timestamp,
            contact: ContactPayload::from(contact),
            classification,
            total,
            answers,
            report,
        }
    }

    /// Subject line for the manual e-mail fallback.
    pub fn mail_subject(&self) -> String {
        format!("{} - {}", self.classification.label(), self.contact.naam)
    }
}
