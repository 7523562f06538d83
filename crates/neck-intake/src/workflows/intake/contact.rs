use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lead details captured after the last question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

impl ContactInfo {
    pub fn is_captured(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && self.consent
    }
}

/// Raw lead form as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

impl LeadForm {
    pub fn validate(self) -> Result<ContactInfo, LeadValidationError> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();
        if name.is_empty() || email.is_empty() || !self.consent {
            return Err(LeadValidationError::MissingRequired);
        }
        if !email_pattern().is_match(&email) {
            return Err(LeadValidationError::InvalidEmail);
        }

        let phone = self
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty());

        Ok(ContactInfo {
            name,
            email,
            phone,
            consent: true,
        })
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

/// Lead form rejections, worded for display next to the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadValidationError {
    #[error("Vul alstublieft uw naam, e-mailadres in en geef toestemming.")]
    MissingRequired,
    #[error("Voer een geldig e-mailadres in.")]
    InvalidEmail,
}
