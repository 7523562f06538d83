//! Lead hand-off: webhook delivery with a manual e-mail fallback.

mod mailto;
mod payload;
mod webhook;

pub use mailto::compose_mailto;
pub use payload::{ContactPayload, SubmissionPayload, SUBMISSION_SOURCE};
pub use webhook::{DeliveryError, PayloadEncoding, SubmissionGateway, WebhookGateway};

use serde::Serialize;
use tracing::warn;

/// Addresses shown to the respondent after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPoints {
    pub fallback_email: String,
    pub appointment_url: String,
}

impl Default for ContactPoints {
    fn default() -> Self {
        Self {
            fallback_email: "info@fysiotherapienijmegen.nl".to_string(),
            appointment_url: "https://www.fysiotherapienijmegen.nl/afspraak/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    NotConfigured,
    DeliveryFailed,
}

/// What the respondent sees after pressing send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Delivered {
        appointment_url: String,
    },
    Fallback {
        reason: FallbackReason,
        message: String,
        mailto: String,
    },
}

impl SubmissionOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered { .. })
    }
}

/// Turn a delivery attempt into the outcome shown to the respondent.
pub fn resolve_outcome(
    delivery: Result<(), DeliveryError>,
    payload: &SubmissionPayload,
    contact_points: &ContactPoints,
) -> SubmissionOutcome {
    let reason = match delivery {
        Ok(()) => {
            return SubmissionOutcome::Delivered {
                appointment_url: contact_points.appointment_url.clone(),
            }
        }
        Err(DeliveryError::NotConfigured) => {
            warn!("webhook endpoint not configured; offering e-mail fallback");
            FallbackReason::NotConfigured
        }
        Err(err) => {
            warn!(error = %err, "intake submission failed; offering e-mail fallback");
            FallbackReason::DeliveryFailed
        }
    };

    let message = match reason {
        FallbackReason::NotConfigured => format!(
            "Het automatisch doorsturen is momenteel niet beschikbaar. U kunt contact opnemen via {}.",
            contact_points.fallback_email
        ),
        FallbackReason::DeliveryFailed => format!(
            "Er is iets misgegaan bij het versturen. Probeer het later opnieuw of stuur uw resultaten per e-mail naar {}.",
            contact_points.fallback_email
        ),
    };

    SubmissionOutcome::Fallback {
        reason,
        message,
        mailto: compose_mailto(
            &contact_points.fallback_email,
            &payload.mail_subject(),
            &payload.report,
        ),
    }
}
