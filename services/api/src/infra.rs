use metrics_exporter_prometheus::PrometheusHandle;
use neck_intake::config::IntakeConfig;
use neck_intake::workflows::intake::{
    FileSessionStore, InMemorySessionStore, IntakeService, SessionEntry, SessionId, SessionStore,
    StoreError, WebhookGateway,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AppIntakeService = IntakeService<ConfiguredSessionStore, WebhookGateway>;

/// Session backend picked from `INTAKE_SESSION_DIR`.
pub(crate) enum ConfiguredSessionStore {
    Memory(InMemorySessionStore),
    File(FileSessionStore),
}

impl ConfiguredSessionStore {
    pub(crate) fn from_config(config: &IntakeConfig) -> Self {
        match &config.session_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "storing intake sessions on disk");
                Self::File(FileSessionStore::new(dir))
            }
            None => Self::Memory(InMemorySessionStore::default()),
        }
    }
}

impl SessionStore for ConfiguredSessionStore {
    fn read(&self, session: SessionId, entry: SessionEntry) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.read(session, entry),
            Self::File(store) => store.read(session, entry),
        }
    }

    fn write(
        &self,
        session: SessionId,
        entry: SessionEntry,
        payload: String,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.write(session, entry, payload),
            Self::File(store) => store.write(session, entry, payload),
        }
    }
}

pub(crate) fn build_intake_service(config: &IntakeConfig) -> AppIntakeService {
    let store = Arc::new(ConfiguredSessionStore::from_config(config));
    let gateway = Arc::new(WebhookGateway::new(
        config.webhook_url.clone(),
        config.webhook_encoding,
    ));
    if gateway.endpoint().is_none() {
        info!("INTAKE_WEBHOOK_URL not set; submissions will offer the e-mail fallback");
    }

    IntakeService::new(store, gateway, config.contact_points.clone())
}

/// Parse `question=value` as given to `--answer`.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, u32), String> {
    let (question, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected QUESTION=VALUE, got '{raw}'"))?;
    let question = question.trim();
    if question.is_empty() {
        return Err(format!("missing question id in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("failed to parse answer value in '{raw}' ({err})"))?;
    Ok((question.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_accepts_spaced_pairs() {
        assert_eq!(parse_answer("slapen = 6"), Ok(("slapen".to_string(), 6)));
        assert!(parse_answer("slapen").is_err());
        assert!(parse_answer("=4").is_err());
        assert!(parse_answer("slapen=-1").is_err());
    }

    #[test]
    fn session_dir_selects_file_store() {
        let config = IntakeConfig {
            session_dir: Some(std::env::temp_dir().join("neck-intake-sessions")),
            ..IntakeConfig::default()
        };
        assert!(matches!(
            ConfiguredSessionStore::from_config(&config),
            ConfiguredSessionStore::File(_)
        ));
        assert!(matches!(
            ConfiguredSessionStore::from_config(&IntakeConfig::default()),
            ConfiguredSessionStore::Memory(_)
        ));
    }
}
