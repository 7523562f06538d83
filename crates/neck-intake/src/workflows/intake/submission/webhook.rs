use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{info, warn};

use super::payload::SubmissionPayload;

/// How the payload is declared on the wire. Staff endpoints accept either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadEncoding {
    #[default]
    Json,
    PlainText,
}

impl PayloadEncoding {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" | "application/json" => Some(Self::Json),
            "text" | "plain" | "text/plain" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn content_type(self) -> mime::Mime {
        match self {
            PayloadEncoding::Json => mime::APPLICATION_JSON,
            PayloadEncoding::PlainText => mime::TEXT_PLAIN_UTF_8,
        }
    }
}

/// Outbound delivery of a finished intake.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("no webhook endpoint configured")]
    NotConfigured,
    #[error("payload could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("webhook responded with HTTP {status}")]
    Rejected { status: u16 },
    #[error("webhook request failed: {0}")]
    Transport(String),
}

/// Single POST per submission; no retry and no timeout beyond the client default.
#[derive(Debug, Clone)]
pub struct WebhookGateway {
    client: reqwest::Client,
    endpoint: Option<String>,
    encoding: PayloadEncoding,
}

impl WebhookGateway {
    pub fn new(endpoint: Option<String>, encoding: PayloadEncoding) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, encoding)
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: Option<String>,
        encoding: PayloadEncoding,
    ) -> Self {
        let endpoint = endpoint
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        Self {
            client,
            endpoint,
            encoding,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

#[async_trait]
impl SubmissionGateway for WebhookGateway {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError> {
        let endpoint = self.endpoint.as_deref().ok_or(DeliveryError::NotConfigured)?;
        let body = serde_json::to_string(payload)?;

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, self.encoding.content_type().as_ref())
            .body(body)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "webhook rejected intake submission");
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(classification = payload.classification.label(), "intake submission delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoding_aliases() {
        assert_eq!(PayloadEncoding::parse("JSON"), Some(PayloadEncoding::Json));
        assert_eq!(
            PayloadEncoding::parse("text/plain"),
            Some(PayloadEncoding::PlainText)
        );
        assert_eq!(PayloadEncoding::parse("xml"), None);
        assert_eq!(
            PayloadEncoding::PlainText.content_type().as_ref(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn blank_endpoint_counts_as_unconfigured() {
        let gateway = WebhookGateway::new(Some("  ".to_string()), PayloadEncoding::Json);
        assert!(gateway.endpoint().is_none());
    }
}
